//! Cache key layout for todo entries

use std::fmt;

use crate::domain::todo::TodoId;

/// Key of a cache entry
///
/// Single todos are keyed by the decimal form of their id. The full list lives
/// under a reserved key that can never parse as a decimal integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Single todo entry
    Item(TodoId),
    /// The collection view of all todos
    List,
}

impl CacheKey {
    /// Reserved key holding the collection view
    pub const LIST: &'static str = "__list__";

    /// Renders the key as stored in the backend (before any prefixing)
    pub fn render(&self) -> String {
        match self {
            Self::Item(id) => id.to_string(),
            Self::List => Self::LIST.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Item(id) => write!(f, "{}", id),
            Self::List => f.write_str(Self::LIST),
        }
    }
}
