use std::fs;

use log::LevelFilter;
use taskdb::config::LoggingConfig;
use taskdb::logger;

#[test]
fn test_level_filter_parsing() {
    assert_eq!(logger::level_filter("INFO").unwrap(), LevelFilter::Info);
    assert_eq!(logger::level_filter("trace").unwrap(), LevelFilter::Trace);
    assert!(logger::level_filter("").is_err());
}

#[test]
fn test_line_format() {
    let line = logger::format_line("database_tests", log::Level::Info, &format_args!("Created {} roles", 3));
    let (timestamp, rest) = line.split_at(19);
    assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok());
    assert_eq!(rest, " [database_tests] [INFO] Created 3 roles");
}

// The global logger can only be installed once per process, so every
// assertion about the installed logger lives in this one test.
#[test]
fn test_init_writes_to_log_file() {
    let log_path = std::env::temp_dir().join("taskdb_logger_test").join("taskdb.log");
    let _ = fs::remove_file(&log_path);

    let config = LoggingConfig {
        level: "info".to_string(),
        logger_name: "logger_test".to_string(),
        file: Some(log_path.clone()),
    };
    logger::init(&config).unwrap();

    log::info!("Test message with file");
    log::debug!("Filtered out");
    log::logger().flush();

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("[logger_test] [INFO] Test message with file"));
    assert!(!content.contains("Filtered out"));

    // A second installation is refused
    assert!(logger::init(&config).is_err());

    let _ = fs::remove_dir_all(log_path.parent().unwrap());
}
