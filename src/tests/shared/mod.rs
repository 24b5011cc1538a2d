pub mod mock_web_client;
