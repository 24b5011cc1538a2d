use log::LevelFilter;

pub fn init_logger(is_dev_build: bool) {
    let level_filter = if is_dev_build {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let result = env_logger::builder()
        .filter_level(level_filter)
        .try_init();

    if let Err(error) = result {
        eprintln!("init_logger() logger was already initialized: {}", error);
    }
}

/// Captured by the test harness, safe to call from every test.
pub fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(LevelFilter::Debug)
        .try_init();
}

#[test]
fn test_init_logger_twice() {
    init_logger(true);
    init_logger(false);

    info!("test_init_logger_twice() logger is usable");
}
