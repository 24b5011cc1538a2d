#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;

    use crate::config::ClientConfig;
    use crate::model::parsers::boardware::Boardware;
    use crate::model::repository::parser_registry::ParserRegistry;
    use crate::test_case;
    use crate::tests::shared::mock_boardware::MockBoardware;
    use crate::tests::shared::shared::{run_test, TestCase};

    #[tokio::test]
    async fn run_tests() {
        let tests: Vec<TestCase> = vec![
            test_case!(test_detect_accepts_first_successful_probe),
            test_case!(test_detect_without_match),
            test_case!(test_create_parser),
            test_case!(test_resolve_verifies_named_boardware),
            test_case!(test_registry_configures_parsers),
        ];

        run_test(tests).await;
    }

    fn registry_fixture(probes: Arc<AtomicUsize>) -> ParserRegistry {
        let mut registry = ParserRegistry::new();

        let counter = probes.clone();
        registry.register("alpha", move |url| {
            counter.fetch_add(1, Ordering::SeqCst);
            let mock = MockBoardware::new("alpha", url).with_info_failure("Not an alpha board");
            return Ok(Arc::new(mock) as Arc<dyn Boardware>);
        });

        let counter = probes.clone();
        registry.register("beta", move |url| {
            counter.fetch_add(1, Ordering::SeqCst);
            let mock = MockBoardware::new("beta", url).with_info_error("unexpected page layout");
            return Ok(Arc::new(mock) as Arc<dyn Boardware>);
        });

        registry.register("broken", |_url| {
            return Err(anyhow!("can't construct"));
        });

        let counter = probes.clone();
        registry.register("gamma", move |url| {
            counter.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::new(MockBoardware::new("gamma", url)) as Arc<dyn Boardware>);
        });

        let counter = probes.clone();
        registry.register("delta", move |url| {
            counter.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::new(MockBoardware::new("delta", url)) as Arc<dyn Boardware>);
        });

        return registry;
    }

    async fn test_detect_accepts_first_successful_probe() {
        let probes = Arc::new(AtomicUsize::new(0));
        let registry = registry_fixture(probes.clone());

        assert_eq!(vec!["alpha", "beta", "broken", "gamma", "delta"], registry.parser_names());

        let parser = registry.detect_parser("forum.test/board").await.unwrap();

        assert_eq!("gamma", parser.name());
        assert_eq!("http://forum.test/board", parser.base_url());
        assert_eq!(3, probes.load(Ordering::SeqCst));
    }

    async fn test_detect_without_match() {
        let mut registry = ParserRegistry::new();
        registry.register("alpha", |url| {
            let mock = MockBoardware::new("alpha", url).with_transport_failure();
            return Ok(Arc::new(mock) as Arc<dyn Boardware>);
        });

        assert!(registry.detect_parser("http://forum.test").await.is_none());
        assert!(ParserRegistry::new().detect_parser("http://forum.test").await.is_none());
    }

    async fn test_create_parser() {
        let registry = registry_fixture(Arc::new(AtomicUsize::new(0)));

        let parser = registry.create_parser("alpha", "https://forum.test").unwrap();
        assert_eq!("alpha", parser.name());
        assert_eq!("https://forum.test", parser.base_url());

        assert!(registry.create_parser("omega", "https://forum.test").is_none());
        assert!(registry.create_parser("broken", "https://forum.test").is_none());
        assert!(registry.contains("broken"));
        assert!(!registry.contains("omega"));
    }

    async fn test_resolve_verifies_named_boardware() {
        let registry = registry_fixture(Arc::new(AtomicUsize::new(0)));

        assert!(registry.resolve(Some("alpha"), "http://forum.test").await.is_none());
        assert_eq!("delta", registry.resolve(Some("delta"), "http://forum.test").await.unwrap().name());
        assert_eq!("gamma", registry.resolve(None, "http://forum.test").await.unwrap().name());
        assert_eq!("gamma", registry.resolve(Some(" "), "http://forum.test").await.unwrap().name());
    }

    async fn test_registry_configures_parsers() {
        let mut config = ClientConfig::default();
        config.user_agent = String::from("Owl-Test/1.0");

        let mut registry = ParserRegistry::with_config(&config);
        registry.register("gamma", |url| {
            return Ok(Arc::new(MockBoardware::new("gamma", url)) as Arc<dyn Boardware>);
        });
        registry.register("gamma", |url| {
            return Ok(Arc::new(MockBoardware::new("gamma-v2", url)) as Arc<dyn Boardware>);
        });

        assert_eq!(vec!["gamma"], registry.parser_names());

        let parser = registry.create_parser("gamma", "forum.test").unwrap();
        assert_eq!("gamma-v2", parser.name());
        assert_eq!("Owl-Test/1.0", parser.user_agent());
    }
}
