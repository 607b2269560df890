//! Feed loading error types.
//!
//! Row-level problems are never errors: malformed rows are skipped and
//! loading continues. The only fatal condition is a feed that yields no
//! stops at all, which makes the process unable to serve any request.

use std::path::PathBuf;

/// Errors from loading a GTFS folder.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FeedError {
    /// Neither the `.csv` nor the `.txt` table set produced any stops.
    #[error("no stops loaded from GTFS folder {}", path.display())]
    NoStops { path: PathBuf },
}
