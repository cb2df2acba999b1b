use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{event, Level};
use tracing_subscriber::fmt::MakeWriter;

use crate::dates::DEFAULT_CENTURY_PIVOT;

/// Looked up in the current working directory. The file is optional.
pub const CONFIG_FILE_NAME: &str = "booking.yaml";

const DEFAULT_DB_FILE: &str = "data/bookings.db";
const DEFAULT_LOG_FILE: &str = "data/booking.log";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug)]
pub enum CreateConfigError {
    CenturyPivotOutOfRange(u8),
    NoLogFileName(PathBuf),
}
impl std::fmt::Display for CreateConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::CenturyPivotOutOfRange(x) => {
                write!(f, "century_pivot {x} is not within 0-100")
            }
            Self::NoLogFileName(x) => {
                write!(f, "log_file {} does not name a file", x.display())
            }
        }
    }
}
impl std::error::Error for CreateConfigError {}

/// The config file as written by the user. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigData {
    pub db_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub century_pivot: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Config {
    pub db_file: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
    /// two-digit years below this are in the 2000s, the rest in the 1900s
    pub century_pivot: u8,
}
impl Default for Config {
    fn default() -> Self {
        Config {
            db_file: PathBuf::from(DEFAULT_DB_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            century_pivot: DEFAULT_CENTURY_PIVOT,
        }
    }
}
impl Config {
    fn from_config_data(cd: ConfigData) -> Result<Config, CreateConfigError> {
        let century_pivot = match cd.century_pivot {
            Some(x) if x > 100 => return Err(CreateConfigError::CenturyPivotOutOfRange(x)),
            Some(x) => x,
            None => DEFAULT_CENTURY_PIVOT,
        };
        let log_file = cd
            .log_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
        if log_file.file_name().is_none() {
            return Err(CreateConfigError::NoLogFileName(log_file));
        }

        Ok(Config {
            db_file: cd.db_file.unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE)),
            log_file,
            log_level: cd
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            century_pivot,
        })
    }

    /// Read the config from `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = match std::fs::read_to_string(path) {
            Ok(x) => x,
            Err(e) => {
                event!(
                    Level::ERROR,
                    "config file {} not readable: {e}",
                    path.display()
                );
                return Err(Box::new(e));
            }
        };
        // an empty file means "use all defaults"
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config_data: ConfigData = match serde_yaml::from_str(&content) {
            Ok(x) => x,
            Err(e) => {
                event!(Level::ERROR, "config file had syntax errors: {e}");
                return Err(Box::new(e));
            }
        };
        Ok(Config::from_config_data(config_data)?)
    }

    /// Read the config from `path`, sending warnings and errors to `writer`.
    ///
    /// The file logger is set up from the config, so it does not exist yet while the config is read.
    pub fn from_file_reporting_to<W>(
        path: &Path,
        writer: W,
    ) -> Result<Config, Box<dyn std::error::Error>>
    where
        W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_writer(writer)
            .with_target(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, || Config::from_file(path))
    }

    pub fn create() -> Result<Config, Box<dyn std::error::Error>> {
        Config::from_file_reporting_to(Path::new(CONFIG_FILE_NAME), std::io::stderr)
    }
}
