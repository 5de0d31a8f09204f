//! Session configuration

use funcalc_ops::OperationRegistry;
use std::env;
use tracing::warn;

/// Default number of nested `read` levels
pub const DEFAULT_MAX_READ_DEPTH: usize = 8;

#[derive(Debug, Clone)]
pub struct Config {
    /// Registry capacity; prompted for when absent
    pub capacity: Option<usize>,
    /// List the catalogue before each interactive prompt
    pub show_catalogue: bool,
    pub max_read_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: None,
            show_catalogue: true,
            max_read_depth: DEFAULT_MAX_READ_DEPTH,
        }
    }
}

impl Config {
    /// Defaults overridden by `FUNCALC_CAPACITY` and `FUNCALC_QUIET`
    pub fn from_env() -> Self {
        Self::default().with_lookup(|key| env::var(key).ok())
    }

    fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("FUNCALC_CAPACITY") {
            let parsed = raw.trim().parse::<i64>().ok()
                .and_then(|n| OperationRegistry::validate_capacity(n).ok());
            match parsed {
                Some(capacity) => self.capacity = Some(capacity),
                None => warn!(value = %raw, "ignoring invalid FUNCALC_CAPACITY"),
            }
        }
        if let Some(quiet) = lookup("FUNCALC_QUIET") {
            self.show_catalogue = matches!(quiet.trim(), "" | "0" | "false");
        }
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_catalogue(mut self, show: bool) -> Self {
        self.show_catalogue = show;
        self
    }

    pub fn with_max_read_depth(mut self, depth: usize) -> Self {
        self.max_read_depth = depth;
        self
    }
}
