#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio_test::assert_ok;

    use crate::constants::OPTION_REFRESH_RATE;
    use crate::model::data::board::{Board, BoardPtr};
    use crate::model::data::forum::{Forum, ForumType};
    use crate::model::parsers::parser::Parser;
    use crate::service::board_update_worker::{BoardUpdateWorker, TickResult};
    use crate::test_case;
    use crate::tests::shared::mock_boardware::MockBoardware;
    use crate::tests::shared::registry_shared::mock_forum_board;
    use crate::tests::shared::shared::{run_test, TestCase};

    const BASE_URL: &str = "http://forum.test";

    #[tokio::test]
    async fn run_tests() {
        let tests: Vec<TestCase> = vec![
            test_case!(test_concurrent_ticks_refresh_once),
            test_case!(test_tick_marks_unread_forums),
            test_case!(test_refresh_errors_are_swallowed),
            test_case!(test_fallback_refresh_rate),
            test_case!(test_deleted_worker_stops),
            test_case!(test_dropped_board_stops),
            test_case!(test_loop_ends_after_deletion),
        ];

        run_test(tests).await;
    }

    fn connected_board(mock: Arc<MockBoardware>, refresh_rate: Option<&str>) -> BoardPtr {
        let mut board = Board::new("Test board", BASE_URL);
        if let Some(refresh_rate) = refresh_rate {
            board.options.set_or_add(OPTION_REFRESH_RATE, refresh_rate);
        }

        board.set_parser(Arc::new(Parser::new(mock)));
        return board.into_ptr();
    }

    async fn test_concurrent_ticks_refresh_once() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL).with_delay(Duration::from_millis(100)));
        let board = connected_board(mock.clone(), Some("600"));
        let worker = BoardUpdateWorker::new(&board);

        let (first, second) = tokio::join!(worker.do_work(), worker.do_work());

        assert_eq!(TickResult::Completed(Duration::from_millis(600_000)), first);
        assert_eq!(TickResult::Skipped(Duration::from_millis(600_000)), second);
        assert_eq!(1, mock.calls("get_forum_list"));

        // The lock is released once the refresh is done.
        assert!(matches!(worker.do_work().await, TickResult::Completed(_)));
        assert_eq!(2, mock.calls("get_forum_list"));
    }

    async fn test_tick_marks_unread_forums() {
        let mut board = Board::new("Test board", BASE_URL);

        let mut category = Forum::with_type("1", "Category", ForumType::Category);
        category.add_child(Forum::with_type("11", "Unread", ForumType::Forum));

        let mut quiet = Forum::with_type("2", "Quiet", ForumType::Forum);
        quiet.has_unread = true;

        board.root_mut().add_child(category);
        board.root_mut().add_child(quiet);
        board.set_parser(Arc::new(Parser::new(Arc::new(mock_forum_board(BASE_URL)))));

        let board = board.into_ptr();
        let worker = BoardUpdateWorker::new(&board);
        assert!(matches!(worker.do_work().await, TickResult::Completed(_)));

        let board = board.read().await;
        assert!(board.find_forum("11").unwrap().has_unread);
        assert!(!board.find_forum("2").unwrap().has_unread);
        assert!(!board.find_forum("1").unwrap().has_unread);
    }

    async fn test_refresh_errors_are_swallowed() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL).with_transport_failure());
        let board = connected_board(mock.clone(), Some("30"));
        let worker = BoardUpdateWorker::new(&board);

        assert_eq!(TickResult::Completed(Duration::from_secs(30)), worker.do_work().await);
        assert_eq!(TickResult::Completed(Duration::from_secs(30)), worker.do_work().await);
        assert_eq!(2, mock.calls("get_forum_list"));

        let disconnected = Board::new("Disconnected", BASE_URL).into_ptr();
        let worker = BoardUpdateWorker::new(&disconnected);
        assert!(matches!(worker.do_work().await, TickResult::Completed(_)));
    }

    async fn test_fallback_refresh_rate() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL));

        let board = connected_board(mock.clone(), None);
        let worker = BoardUpdateWorker::new(&board);
        assert_eq!(TickResult::Completed(Duration::from_secs(3600)), worker.do_work().await);

        let board = connected_board(mock.clone(), Some("every minute"));
        let worker = BoardUpdateWorker::new(&board);
        assert_eq!(TickResult::Completed(Duration::from_secs(3600)), worker.do_work().await);

        let board = connected_board(mock.clone(), Some("0"));
        let worker = BoardUpdateWorker::new(&board);
        assert_eq!(TickResult::Completed(Duration::from_secs(3600)), worker.do_work().await);
    }

    async fn test_deleted_worker_stops() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL));
        let board = connected_board(mock.clone(), Some("600"));
        let worker = BoardUpdateWorker::new(&board);

        worker.mark_deleted();

        assert!(worker.is_deleted());
        assert_eq!(TickResult::Stopped, worker.do_work().await);
        assert_eq!(0, mock.calls("get_forum_list"));
    }

    async fn test_dropped_board_stops() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL));
        let board = connected_board(mock.clone(), Some("600"));
        let worker = BoardUpdateWorker::new(&board);

        drop(board);

        assert_eq!(TickResult::Stopped, worker.do_work().await);
        assert_eq!(0, mock.calls("get_forum_list"));
    }

    async fn test_loop_ends_after_deletion() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL));
        let board = connected_board(mock.clone(), Some("600"));
        let worker = Arc::new(BoardUpdateWorker::new(&board));

        worker.mark_deleted();

        let join_handle = worker.start().unwrap();
        assert!(worker.start().is_none());

        let join_result = assert_ok!(tokio::time::timeout(Duration::from_secs(1), join_handle).await);
        assert_ok!(join_result);
        assert_eq!(0, mock.calls("get_forum_list"));
    }
}
