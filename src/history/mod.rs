//! L3: history store + expansion.

pub mod expand;
pub mod ring;
pub mod search;

pub use expand::expand_history;
pub use ring::{HistoryEntry, HistoryRing};
pub use search::{ranked_search, SearchResult};
