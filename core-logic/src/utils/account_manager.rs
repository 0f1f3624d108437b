use crate::error::ConfigError;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;
use zeroize::Zeroizing;

/// Line-delimited list of account credentials, loaded once and read-only
/// afterwards. Entries are wiped from memory on drop.
pub struct AccountManager {
    entries: Vec<Zeroizing<String>>,
}

impl AccountManager {
    /// Reads one credential per line. `\r` is stripped and blank lines are
    /// skipped; an empty result is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = Zeroizing::new(fs::read_to_string(path).map_err(|e| {
            ConfigError::IoError {
                path: path.display().to_string(),
                msg: e.to_string(),
            }
        })?);

        let manager = Self::from_lines(content.lines());
        if manager.is_empty() {
            return Err(ConfigError::NoAccounts {
                path: path.display().to_string(),
            });
        }

        info!("Loaded {} accounts from {}", manager.len(), path.display());
        Ok(manager)
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = lines
            .into_iter()
            .map(|line| line.trim_matches(|c: char| c == '\r' || c.is_whitespace()))
            .filter(|line| !line.is_empty())
            .map(|line| Zeroizing::new(line.to_string()))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.as_str())
    }
}

impl fmt::Debug for AccountManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountManager")
            .field("count", &self.entries.len())
            .field("entries", &"***REDACTED***")
            .finish()
    }
}
