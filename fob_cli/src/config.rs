//! Environment-based configuration for the CLI.
//!
//! | Variable       | Meaning                                   | Default                     |
//! |----------------|-------------------------------------------|-----------------------------|
//! | `FOB_DATA_DIR` | Directory holding `cost_sheets_history.json` | `<platform data dir>/fob` |
//! | `FOB_LOG`      | Log filter used when `RUST_LOG` is unset  | `warn`                      |

use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "FOB_DATA_DIR";
pub const LOG_ENV: &str = "FOB_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Resolved CLI configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Where the history blob is kept
    pub data_dir: PathBuf,

    /// Default tracing filter
    pub log_filter: String,
}

impl CliConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let log_filter = lookup(LOG_ENV)
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        CliConfig {
            data_dir,
            log_filter,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("fob"))
        .unwrap_or_else(|| PathBuf::from(".fob"))
}
