#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::constants::{OPTION_ENCRYPTION_ENABLED, OPTION_ENCRYPTION_KEY, OPTION_ENCRYPTION_SEED};
    use crate::model::data::post::Post;
    use crate::model::data::results::EncryptionSettings;
    use crate::model::data::string_map::StringMap;
    use crate::model::parsers::error::ParserError;
    use crate::model::parsers::favicon::DEFAULT_BOARD_ICON;
    use crate::model::parsers::parser::Parser;
    use crate::model::web::web_client::WebClient;
    use crate::test_case;
    use crate::tests::shared::mock_boardware::MockBoardware;
    use crate::tests::shared::mock_web_client::MockWebClient;
    use crate::tests::shared::shared::{run_test, TestCase};

    const BASE_URL: &str = "http://forum.test";

    #[tokio::test]
    async fn run_tests() {
        let tests: Vec<TestCase> = vec![
            test_case!(test_post_quote),
            test_case!(test_user_agent_reaches_every_watcher),
            test_case!(test_encryption_options_configure_watchers),
            test_case!(test_fav_icon_uses_first_valid_image),
            test_case!(test_fav_icon_falls_back_to_default),
            test_case!(test_can_parse),
            test_case!(test_direct_calls_propagate_errors),
        ];

        run_test(tests).await;
    }

    async fn test_post_quote() {
        let parser = Parser::new(Arc::new(MockBoardware::new("mock", BASE_URL)));

        let mut post = Post::new("1");
        post.text = String::from("hello");

        assert_eq!("[QUOTE]hello[/QUOTE]\n\n", parser.get_post_quote(&post));
    }

    async fn test_user_agent_reaches_every_watcher() {
        let own_client = Arc::new(MockWebClient::new());
        let extra_client = Arc::new(MockWebClient::new());

        let mock = MockBoardware::new("mock", BASE_URL).with_web_client(own_client.clone());
        let parser = Parser::new(Arc::new(mock));
        assert_eq!(1, parser.watcher_count());

        let extra_watcher: Arc<dyn WebClient> = extra_client.clone();
        parser.add_watcher(extra_watcher.clone());
        parser.add_watcher(extra_watcher.clone());
        parser.add_watcher(own_client.clone());
        assert_eq!(2, parser.watcher_count());

        parser.set_user_agent("Agent/2.0");
        assert_eq!("Agent/2.0", own_client.config().user_agent);
        assert_eq!("Agent/2.0", extra_client.config().user_agent);

        parser.set_user_agent("   ");
        assert_eq!("Agent/2.0", parser.user_agent());

        parser.remove_watcher(&extra_watcher);
        parser.set_user_agent("Agent/3.0");
        assert_eq!("Agent/3.0", own_client.config().user_agent);
        assert_eq!("Agent/2.0", extra_client.config().user_agent);
    }

    async fn test_encryption_options_configure_watchers() {
        let client = Arc::new(MockWebClient::new());
        let parser = Parser::new(Arc::new(MockBoardware::new("mock", BASE_URL).with_web_client(client.clone())));

        let mut options = StringMap::new();
        options.set_or_add(OPTION_ENCRYPTION_ENABLED, "1");
        options.set_or_add(OPTION_ENCRYPTION_KEY, "secret");
        options.set_or_add(OPTION_ENCRYPTION_SEED, "salt");
        parser.set_options(options);

        let config = client.config();
        assert!(config.use_encryption);
        assert_eq!("secret", config.encrypt_key);
        assert_eq!("salt", config.encrypt_seed);

        parser.apply_encryption_settings(&EncryptionSettings::default());
        assert!(!client.config().use_encryption);
        assert_eq!("false", parser.options().get_text(OPTION_ENCRYPTION_ENABLED));
    }

    async fn test_fav_icon_uses_first_valid_image() {
        let parser = Parser::new(Arc::new(MockBoardware::new("mock", BASE_URL)));

        let client = MockWebClient::new();
        client.respond("http://forum.test/favicon.ico", 200, b"<html>not an icon</html>");
        client.respond("http://forum.test/favicon.png", 200, DEFAULT_BOARD_ICON);

        let icon_files = vec![
            String::from("favicon.ico"),
            String::from("/favicon.png"),
            String::from("/apple-touch-icon.png")
        ];

        let icon = parser.get_fav_icon_buffer_with(&client, &icon_files).await;

        assert_eq!(DEFAULT_BOARD_ICON.to_vec(), icon);
        assert_eq!(
            vec![String::from("http://forum.test/favicon.ico"), String::from("http://forum.test/favicon.png")],
            client.requested_urls()
        );
    }

    async fn test_fav_icon_falls_back_to_default() {
        let parser = Parser::new(Arc::new(MockBoardware::new("mock", BASE_URL)));

        let client = MockWebClient::new();
        client.fail("http://forum.test/favicon.ico");

        let icon_files = vec![String::from("/favicon.ico"), String::from("/favicon.png")];
        let icon = parser.get_fav_icon_buffer_with(&client, &icon_files).await;

        assert_eq!(DEFAULT_BOARD_ICON.to_vec(), icon);
        assert_eq!(2, client.requested_urls().len());

        let parser = Parser::new(Arc::new(MockBoardware::new("mock", "not a url")));
        let icon = parser.get_fav_icon_buffer_with(&client, &icon_files).await;

        assert_eq!(DEFAULT_BOARD_ICON.to_vec(), icon);
        assert_eq!(2, client.requested_urls().len());
    }

    async fn test_can_parse() {
        let parser = Parser::new(Arc::new(MockBoardware::new("mock", BASE_URL)));

        assert!(parser.can_parse("<footer>powered by mock</footer>"));
        assert!(!parser.can_parse("<footer>powered by something else</footer>"));
        assert!(!parser.can_parse(""));
    }

    async fn test_direct_calls_propagate_errors() {
        let mock = Arc::new(MockBoardware::new("mock", BASE_URL).with_transport_failure());
        let parser = Parser::new(mock.clone());

        let error = parser.get_root_sub_forum_list().await.unwrap_err();

        assert!(ParserError::from_error(&error).is_transport());
        assert_eq!(1, mock.calls("get_forum_list"));
    }
}
