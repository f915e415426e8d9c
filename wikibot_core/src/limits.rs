//! Defaults for the query endpoint, session summaries and the
//! recent-sessions ledger.

use serde::{Deserialize, Serialize};

/// Query endpoint used when configuration does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://wikibot-backend.onrender.com/api/query";

pub const DEFAULT_TITLE_MAX_CHARS: usize = 30;
pub const DEFAULT_PREVIEW_MAX_CHARS: usize = 50;
pub const DEFAULT_LEDGER_CAPACITY: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionLimits {
    /// Characters of the user query kept in a summary title
    #[serde(default = "SessionLimits::default_title_max_chars")]
    pub title_max_chars: usize,
    /// Characters of the reply kept in a summary preview
    #[serde(default = "SessionLimits::default_preview_max_chars")]
    pub preview_max_chars: usize,
    /// Number of summaries the recent-sessions ledger retains
    #[serde(default = "SessionLimits::default_ledger_capacity")]
    pub ledger_capacity: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            preview_max_chars: DEFAULT_PREVIEW_MAX_CHARS,
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
        }
    }
}

impl SessionLimits {
    const fn default_title_max_chars() -> usize {
        DEFAULT_TITLE_MAX_CHARS
    }

    const fn default_preview_max_chars() -> usize {
        DEFAULT_PREVIEW_MAX_CHARS
    }

    const fn default_ledger_capacity() -> usize {
        DEFAULT_LEDGER_CAPACITY
    }
}
