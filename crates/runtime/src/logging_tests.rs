use super::*;
use log::{Level, Metadata, Record};
use serial_test::serial;

#[test]
#[serial]
fn resolve_level_from_env_parses_cases() {
    let cases: &[(Option<&str>, Level)] = &[
        (None, Level::Warn),
        (Some("debug"), Level::Debug),
        (Some("DEBUG"), Level::Debug),
        (Some("info"), Level::Info),
        (Some("warn"), Level::Warn),
        (Some("error"), Level::Error),
        (Some("TRACE"), Level::Trace),
        (Some("garbage"), Level::Warn),
        (Some("off"), Level::Warn),
    ];

    for (value, expected) in cases {
        match value {
            Some(v) => unsafe { std::env::set_var(PROGRAM_LOG_LEVEL, v) },
            None => unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) },
        }

        let lvl = resolve_level(None);
        assert_eq!(
            lvl, *expected,
            "env {:?} should yield level {:?}, got {:?}",
            value, expected, lvl
        );
    }

    unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) };
}

#[test]
#[serial]
fn explicit_level_overrides_env() {
    unsafe { std::env::set_var(PROGRAM_LOG_LEVEL, "error") };

    assert_eq!(resolve_level(Some("debug")), Level::Debug);
    // An unusable explicit value falls through to the environment.
    assert_eq!(resolve_level(Some("nonsense")), Level::Error);

    unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) };
}

#[test]
fn enabled_respects_level_threshold() {
    let levels = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    for logger_level in levels {
        let logger = Logger {
            level: logger_level,
            target: LogTarget::Stderr,
        };

        for record_level in levels {
            let meta = Metadata::builder()
                .level(record_level)
                .target("test_target")
                .build();

            assert_eq!(
                logger.enabled(&meta),
                record_level <= logger_level,
                "logger level {:?}, record level {:?}",
                logger_level,
                record_level
            );
        }
    }
}

#[test]
fn format_line_carries_level_target_and_message() {
    let args = format_args!("hashing {}", "a.bin");
    let record = Record::builder()
        .level(Level::Info)
        .target("engine")
        .args(args)
        .build();

    let line = format_line(&record);
    assert!(line.ends_with("INFO [engine] hashing a.bin"), "got {line:?}");
}
