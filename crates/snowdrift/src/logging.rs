//! File logging through `env_logger`.
//!
//! The terminal belongs to the UI, so log records go to `snowdrift.log` in
//! the data directory, and only when a log level is configured.

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;

use color_eyre::eyre::eyre;
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use snowdrift_config::Config;

const LOG_FILE: &str = "snowdrift.log";

/// Install the file logger if the config asks for one.
///
/// Returns the log file path when logging was enabled.
pub fn init(config: &Config) -> color_eyre::Result<Option<PathBuf>> {
    let Some(level) = config.log_level.as_deref() else {
        return Ok(None);
    };
    let level: LevelFilter = level
        .parse()
        .map_err(|_| eyre!("invalid log_level {level:?} in config"))?;

    let dir = Config::data_dir()?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    file_logger(level, file).try_init()?;
    log::info!("snowdrift {} started", env!("CARGO_PKG_VERSION"));

    Ok(Some(path))
}

fn file_logger(level: LevelFilter, file: File) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .target(Target::Pipe(Box::new(file)))
        .write_style(WriteStyle::Never)
        .format_timestamp_millis();
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata, Record};

    #[test]
    fn test_file_logger_writes_enabled_records() {
        let path = std::env::temp_dir().join(format!("snowdrift-log-{}.log", std::process::id()));
        let file = File::create(&path).unwrap();
        let logger = file_logger(LevelFilter::Warn, file).build();

        let debug = Metadata::builder()
            .level(Level::Debug)
            .target("snowdrift_sim::snowfall")
            .build();
        assert!(!logger.enabled(&debug));

        logger.log(
            &Record::builder()
                .args(format_args!("capped"))
                .level(Level::Warn)
                .target("snowdrift_sim::snowfall")
                .build(),
        );
        logger.flush();

        let contents = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert!(contents.contains("WARN"), "{contents:?}");
        assert!(contents.contains("snowdrift_sim::snowfall"), "{contents:?}");
        assert!(contents.trim_end().ends_with("capped"), "{contents:?}");
        assert!(!contents.contains('\u{1b}'), "escape codes in {contents:?}");
    }

    #[test]
    fn test_init_without_level_is_noop() {
        assert_eq!(init(&Config::default()).unwrap(), None);
    }

    #[test]
    fn test_init_rejects_bad_level() {
        let config = Config {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(init(&config).is_err());
    }
}
