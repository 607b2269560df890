//! GTFS feed loading.
//!
//! Parses the feed tables (`routes`, `trips`, `stops`, `stop_times`, plus
//! an optional `agency`) from a folder into in-memory reference maps and
//! stop tables. Accepts either the `.csv` or `.txt` extension set and is
//! tolerant of malformed rows. Edge construction happens in the graph
//! builder, not here.

mod error;
mod feed;
mod table;

pub use error::FeedError;
pub use feed::{AgencyRecord, Feed, RouteRecord, StopRecord, StopTimeRecord, TripRecord};
