#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::constants::OPTION_REFRESH_RATE;
    use crate::model::data::board::Board;
    use crate::model::data::forum::{Forum, ForumType};
    use crate::model::repository::board_store::{BoardStore, MemoryBoardStore};
    use crate::test_case;
    use crate::tests::shared::shared::{run_test, TestCase};

    #[tokio::test]
    async fn run_tests() {
        let tests: Vec<TestCase> = vec![
            test_case!(test_board_round_trip),
            test_case!(test_snapshot_round_trip),
            test_case!(test_save_forum_tree_replaces_order),
            test_case!(test_board_options_and_forum_vars),
            test_case!(test_update_and_delete),
        ];

        run_test(tests).await;
    }

    fn board_fixture() -> Board {
        let mut board = Board::new("Test board", "http://forum.test");
        board.service_url = String::from("http://forum.test/api.php");
        board.protocol_name = String::from("mock");
        board.username = String::from("owl");
        board.password = String::from("hunter2");
        board.enabled = false;
        board.auto_login = true;
        board.fav_icon = String::from("favicon.ico");
        board.last_update = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        board.options.set_or_add(OPTION_REFRESH_RATE, "600");
        board.options.set_or_add("custom", "value");

        let mut news = Forum::with_type("7", "News", ForumType::Category);
        news.add_child(Forum::with_type("71", "Announcements", ForumType::Forum));
        news.add_child(Forum::with_type("72", "Homepage", ForumType::Link));

        board.root_mut().add_child(Forum::with_type("3", "General", ForumType::Forum));
        board.root_mut().add_child(news);
        board.root_mut().add_child(Forum::with_type("1", "Off-topic", ForumType::Forum));

        return board;
    }

    fn child_ids(forum: &Forum) -> Vec<&str> {
        return forum.children.iter().map(|child| child.id.as_str()).collect();
    }

    fn assert_same_board(expected: &Board, actual: &Board) {
        assert_eq!(expected.id, actual.id);
        assert_eq!(expected.name, actual.name);
        assert_eq!(expected.url, actual.url);
        assert_eq!(expected.service_url, actual.service_url);
        assert_eq!(expected.protocol_name, actual.protocol_name);
        assert_eq!(expected.username, actual.username);
        assert_eq!(expected.password, actual.password);
        assert_eq!(expected.enabled, actual.enabled);
        assert_eq!(expected.auto_login, actual.auto_login);
        assert_eq!(expected.fav_icon, actual.fav_icon);
        assert_eq!(expected.last_update, actual.last_update);
        assert_eq!(expected.options, actual.options);
        assert_eq!(expected.root(), actual.root());
    }

    async fn test_board_round_trip() {
        let store = MemoryBoardStore::new();

        let mut board = board_fixture();
        assert!(store.create_board(&mut board).await.unwrap());
        assert_eq!(1, board.id);

        let loaded = store.load_board(board.id).await.unwrap().unwrap();

        assert_same_board(&board, &loaded);
        assert_eq!(Some(600), loaded.refresh_rate_seconds());
        assert_eq!(vec!["3", "7", "1"], child_ids(loaded.root()));
        assert_eq!(vec!["71", "72"], child_ids(loaded.find_forum("7").unwrap()));
        assert_eq!(Some(String::from("7")), loaded.find_forum("72").unwrap().parent_id);
        assert_eq!(Some(1), loaded.find_forum("72").unwrap().board_id);
        assert!(store.load_board(2).await.unwrap().is_none());
    }

    async fn test_snapshot_round_trip() {
        let store = MemoryBoardStore::new();

        let mut first = board_fixture();
        let mut second = Board::new("Second", "http://second.test");
        store.create_board(&mut first).await.unwrap();
        store.create_board(&mut second).await.unwrap();

        let json = store.to_json().await.unwrap();
        let restored = MemoryBoardStore::from_json(&json).unwrap();

        let boards = restored.load_all_boards().await.unwrap();
        assert_eq!(2, boards.len());
        assert_same_board(&first, &boards[0]);
        assert_same_board(&second, &boards[1]);

        let mut third = Board::new("Third", "http://third.test");
        restored.create_board(&mut third).await.unwrap();
        assert_eq!(3, third.id);

        assert!(MemoryBoardStore::from_json("{ not json").is_err());
    }

    async fn test_save_forum_tree_replaces_order() {
        let store = MemoryBoardStore::new();

        let mut board = board_fixture();
        store.create_board(&mut board).await.unwrap();

        let mut root = store.load_forum_tree(board.id, &board.root_id()).await.unwrap();
        root.children.reverse();
        root.children.retain(|child| child.id != "3");
        store.save_forum_tree(board.id, &mut root).await.unwrap();

        let reloaded = store.load_forum_tree(board.id, &board.root_id()).await.unwrap();
        assert_eq!(vec!["1", "7"], child_ids(&reloaded));
        assert_eq!(vec![0, 1], reloaded.children.iter().map(|child| child.display_order).collect::<Vec<u32>>());
        assert_eq!(root, reloaded);

        let mut orphan = Forum::create_root_forum("-1");
        assert!(store.save_forum_tree(42, &mut orphan).await.is_err());
    }

    async fn test_board_options_and_forum_vars() {
        let store = MemoryBoardStore::new();

        let mut board = board_fixture();
        store.create_board(&mut board).await.unwrap();

        assert_eq!(Some(String::from("600")), store.board_option(board.id, OPTION_REFRESH_RATE).await.unwrap());
        assert_eq!(None, store.board_option(board.id, "missing").await.unwrap());

        assert!(store.set_board_option(board.id, OPTION_REFRESH_RATE, "120").await.unwrap());
        assert!(!store.set_board_option(99, OPTION_REFRESH_RATE, "120").await.unwrap());

        let loaded = store.load_board(board.id).await.unwrap().unwrap();
        assert_eq!(Some(120), loaded.refresh_rate_seconds());

        let forum_db_id = loaded.find_forum("71").unwrap().db_id;
        assert!(forum_db_id > 0);

        assert!(store.set_forum_var(forum_db_id, "lastVisit", "1700000000").await.unwrap());
        assert!(!store.set_forum_var(-5, "lastVisit", "1").await.unwrap());
        assert_eq!(Some(String::from("1700000000")), store.forum_var(forum_db_id, "lastVisit").await.unwrap());

        let loaded = store.load_board(board.id).await.unwrap().unwrap();
        assert_eq!("1700000000", loaded.find_forum("71").unwrap().vars.get_text("lastVisit"));
    }

    async fn test_update_and_delete() {
        let store = MemoryBoardStore::new();

        let mut board = board_fixture();
        assert!(!store.update_board(&board).await.unwrap());

        store.create_board(&mut board).await.unwrap();
        board.name = String::from("Renamed");
        assert!(store.update_board(&board).await.unwrap());
        assert_eq!("Renamed", store.load_board(board.id).await.unwrap().unwrap().name);

        assert!(store.delete_board(&board).await.unwrap());
        assert!(!store.delete_board(&board).await.unwrap());
        assert_eq!(0, store.board_count().await);
        assert!(store.load_forum_tree(board.id, "-1").await.unwrap().children.is_empty());
    }
}
