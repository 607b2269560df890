//! GTFS feed loading.
//!
//! Populates the reference maps (agencies, routes, trips) and the stop and
//! stop-time tables from a feed folder. The loader is deliberately lenient:
//! a missing table contributes nothing and a malformed row is skipped. It
//! builds no edges; stop times are handed to the graph builder as-is.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::{GeoPoint, Mode};

use super::error::FeedError;
use super::table::read_table;

/// An agency row. Informational only; the `agency` table is optional.
#[derive(Debug, Clone)]
pub struct AgencyRecord {
    pub id: String,
    pub name: String,
}

/// A route row, with the mode derived from its agency id.
#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub id: String,
    pub agency_id: String,
    pub short_name: String,
    pub mode: Mode,
}

/// A trip row.
#[derive(Debug, Clone)]
pub struct TripRecord {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
}

/// A stop row, in feed order. Position in [`Feed::stops`] becomes the
/// dense node id.
#[derive(Debug, Clone)]
pub struct StopRecord {
    pub stop_id: String,
    pub name: String,
    pub location: GeoPoint,
}

/// A stop-time row. Only rows referencing a known stop are kept.
#[derive(Debug, Clone)]
pub struct StopTimeRecord {
    pub trip_id: String,
    pub stop_id: String,
    pub seq: u32,
}

/// The parsed contents of a GTFS folder.
#[derive(Debug, Default)]
pub struct Feed {
    pub agencies: HashMap<String, AgencyRecord>,
    pub routes: HashMap<String, RouteRecord>,
    pub trips: HashMap<String, TripRecord>,
    pub stops: Vec<StopRecord>,
    pub stop_times: Vec<StopTimeRecord>,
}

/// Mode for a route, derived from the feed's agency identifiers.
/// Unknown agencies default to bus.
fn agency_mode(agency_id: &str) -> Mode {
    match agency_id {
        "M_CAI-METRO" => Mode::Metro,
        "MB_CAI_BUS" => Mode::Microbus,
        "B1_CAI_BUS" => Mode::Bus,
        _ => Mode::Bus,
    }
}

impl Feed {
    /// Load a feed folder, trying the `.csv` table set first and falling
    /// back to `.txt` when the first pass yields no stops.
    ///
    /// Returns [`FeedError::NoStops`] when both passes come up empty; the
    /// caller treats that as fatal.
    pub fn load(dir: &Path) -> Result<Feed, FeedError> {
        info!(path = %dir.display(), "loading GTFS feed");

        let feed = Self::load_with_extension(dir, "csv");
        let feed = if feed.stops.is_empty() {
            debug!("no stops in .csv tables, retrying with .txt");
            Self::load_with_extension(dir, "txt")
        } else {
            feed
        };

        if feed.stops.is_empty() {
            return Err(FeedError::NoStops {
                path: PathBuf::from(dir),
            });
        }

        info!(
            stops = feed.stops.len(),
            routes = feed.routes.len(),
            trips = feed.trips.len(),
            stop_times = feed.stop_times.len(),
            "feed loaded"
        );
        Ok(feed)
    }

    fn load_with_extension(dir: &Path, ext: &str) -> Feed {
        let mut feed = Feed::default();
        feed.load_agencies(&dir.join(format!("agency.{ext}")));
        feed.load_routes(&dir.join(format!("routes.{ext}")));
        feed.load_trips(&dir.join(format!("trips.{ext}")));
        feed.load_stops(&dir.join(format!("stops.{ext}")));
        feed.load_stop_times(&dir.join(format!("stop_times.{ext}")));
        feed
    }

    /// Mode of a route, if the route is known.
    pub fn route_mode(&self, route_id: &str) -> Option<Mode> {
        self.routes.get(route_id).map(|r| r.mode)
    }

    /// Mode of a trip via its route; unknown trips fall back to bus, the
    /// same default the route table uses for unknown agencies.
    pub fn trip_mode(&self, trip_id: &str) -> Mode {
        self.trips
            .get(trip_id)
            .and_then(|t| self.route_mode(&t.route_id))
            .unwrap_or(Mode::Bus)
    }

    fn load_agencies(&mut self, path: &Path) {
        let Some(records) = read_table(path) else {
            return;
        };
        for record in records {
            let (Some(id), Some(name)) = (record.get(0), record.get(1)) else {
                continue;
            };
            self.agencies.insert(
                id.to_string(),
                AgencyRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                },
            );
        }
        debug!(count = self.agencies.len(), "agencies loaded");
    }

    fn load_routes(&mut self, path: &Path) {
        let Some(records) = read_table(path) else {
            return;
        };
        for record in records {
            let (Some(id), Some(agency_id)) = (record.get(0), record.get(1)) else {
                debug!("routes row too short, skipping");
                continue;
            };
            self.routes.insert(
                id.to_string(),
                RouteRecord {
                    id: id.to_string(),
                    agency_id: agency_id.to_string(),
                    short_name: record.get(2).unwrap_or_default().to_string(),
                    mode: agency_mode(agency_id),
                },
            );
        }
        info!(count = self.routes.len(), "routes loaded");
    }

    fn load_trips(&mut self, path: &Path) {
        let Some(records) = read_table(path) else {
            return;
        };
        for record in records {
            let (Some(route_id), Some(service_id), Some(id)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                debug!("trips row too short, skipping");
                continue;
            };
            self.trips.insert(
                id.to_string(),
                TripRecord {
                    id: id.to_string(),
                    route_id: route_id.to_string(),
                    service_id: service_id.to_string(),
                },
            );
        }
        info!(count = self.trips.len(), "trips loaded");
    }

    fn load_stops(&mut self, path: &Path) {
        let Some(records) = read_table(path) else {
            return;
        };
        let mut seen: HashSet<String> = self.stops.iter().map(|s| s.stop_id.clone()).collect();
        for record in records {
            let (Some(stop_id), Some(name), Some(lat), Some(lon)) = (
                record.get(0),
                record.get(1),
                record.get(2),
                record.get(3),
            ) else {
                debug!("stops row too short, skipping");
                continue;
            };
            let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) else {
                debug!(stop_id, "unparseable coordinates, skipping stop");
                continue;
            };
            if !seen.insert(stop_id.to_string()) {
                debug!(stop_id, "duplicate stop id, skipping");
                continue;
            }
            self.stops.push(StopRecord {
                stop_id: stop_id.to_string(),
                name: name.to_string(),
                location: GeoPoint::new(lat, lon),
            });
        }
        info!(count = self.stops.len(), "stops loaded");
    }

    fn load_stop_times(&mut self, path: &Path) {
        let Some(records) = read_table(path) else {
            return;
        };
        let known: HashSet<&str> = self.stops.iter().map(|s| s.stop_id.as_str()).collect();
        for record in records {
            let (Some(trip_id), Some(stop_id), Some(seq)) =
                (record.get(0), record.get(1), record.get(2))
            else {
                debug!("stop_times row too short, skipping");
                continue;
            };
            let Ok(seq) = seq.trim().parse::<u32>() else {
                debug!(trip_id, "unparseable stop_sequence, skipping");
                continue;
            };
            if !known.contains(stop_id) {
                debug!(stop_id, "stop_times row references unknown stop, dropping");
                continue;
            }
            self.stop_times.push(StopTimeRecord {
                trip_id: trip_id.to_string(),
                stop_id: stop_id.to_string(),
                seq,
            });
        }
        info!(count = self.stop_times.len(), "stop times loaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    /// Write a throwaway feed folder under the system temp dir.
    fn write_feed(files: &[(&str, &str)]) -> PathBuf {
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "transit-feed-test-{}-{seq}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            fs::write(dir.join(name), contents).unwrap();
        }
        dir
    }

    const ROUTES: &str = "route_id,agency_id,route_short_name,route_type\n\
        R_M1,M_CAI-METRO,Line 1,1\n\
        R_B9,B1_CAI_BUS,Bus 9,3\n\
        R_MB4,MB_CAI_BUS,Micro 4,3\n\
        R_X,SOME_OTHER,Odd,3\n";

    const TRIPS: &str = "route_id,service_id,trip_id\n\
        R_M1,WD,T_M1\n\
        R_B9,WD,T_B9\n\
        R_MB4,WD,T_MB4\n";

    const STOPS: &str = "stop_id,stop_name,stop_lat,stop_lon\n\
        M_A,Helwan,29.849,31.334\n\
        B1_B,Ramses,30.062,31.246\n\
        MB_C,Ataba,30.052,31.247\n";

    const STOP_TIMES: &str = "trip_id,stop_id,stop_sequence\n\
        T_M1,M_A,1\n\
        T_M1,B1_B,2\n\
        T_B9,B1_B,1\n\
        T_B9,MB_C,2\n";

    #[test]
    fn loads_a_csv_feed() {
        let dir = write_feed(&[
            ("routes.csv", ROUTES),
            ("trips.csv", TRIPS),
            ("stops.csv", STOPS),
            ("stop_times.csv", STOP_TIMES),
        ]);
        let feed = Feed::load(&dir).unwrap();

        assert_eq!(feed.stops.len(), 3);
        assert_eq!(feed.routes.len(), 4);
        assert_eq!(feed.trips.len(), 3);
        assert_eq!(feed.stop_times.len(), 4);

        assert_eq!(feed.route_mode("R_M1"), Some(Mode::Metro));
        assert_eq!(feed.route_mode("R_B9"), Some(Mode::Bus));
        assert_eq!(feed.route_mode("R_MB4"), Some(Mode::Microbus));
        // Unknown agencies default to bus.
        assert_eq!(feed.route_mode("R_X"), Some(Mode::Bus));

        assert_eq!(feed.trip_mode("T_M1"), Mode::Metro);
        assert_eq!(feed.trip_mode("T_MB4"), Mode::Microbus);
        assert_eq!(feed.trip_mode("nope"), Mode::Bus);
    }

    #[test]
    fn falls_back_to_txt_tables() {
        let dir = write_feed(&[("stops.txt", STOPS), ("trips.txt", TRIPS)]);
        let feed = Feed::load(&dir).unwrap();
        assert_eq!(feed.stops.len(), 3);
        assert_eq!(feed.trips.len(), 3);
    }

    #[test]
    fn outer_quoted_rows_parse() {
        let stops = "stop_id,stop_name,stop_lat,stop_lon\n\
            \"M_A,Helwan,29.849,31.334\"\n\
            B1_B,\"Ramses, Square\",30.062,31.246\n";
        let dir = write_feed(&[("stops.csv", stops)]);
        let feed = Feed::load(&dir).unwrap();
        assert_eq!(feed.stops.len(), 2);
        assert_eq!(feed.stops[0].name, "Helwan");
        assert_eq!(feed.stops[1].name, "Ramses, Square");
    }

    #[test]
    fn duplicate_stop_ids_are_skipped() {
        let stops = "stop_id,stop_name,stop_lat,stop_lon\n\
            M_A,First,29.849,31.334\n\
            M_A,Second,29.850,31.335\n";
        let dir = write_feed(&[("stops.csv", stops)]);
        let feed = Feed::load(&dir).unwrap();
        assert_eq!(feed.stops.len(), 1);
        assert_eq!(feed.stops[0].name, "First");
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let stops = "stop_id,stop_name,stop_lat,stop_lon\n\
            M_A,Good,29.849,31.334\n\
            M_B,BadLat,not-a-number,31.0\n\
            M_C\n\
            M_D,AlsoGood,29.9,31.1\n";
        let dir = write_feed(&[("stops.csv", stops)]);
        let feed = Feed::load(&dir).unwrap();
        let ids: Vec<_> = feed.stops.iter().map(|s| s.stop_id.as_str()).collect();
        assert_eq!(ids, vec!["M_A", "M_D"]);
    }

    #[test]
    fn stop_times_for_unknown_stops_are_dropped() {
        let stop_times = "trip_id,stop_id,stop_sequence\n\
            T_1,M_A,1\n\
            T_1,GHOST,2\n\
            T_1,M_A,bad-seq\n";
        let stops = "stop_id,stop_name,stop_lat,stop_lon\nM_A,Only,29.8,31.3\n";
        let dir = write_feed(&[("stops.csv", stops), ("stop_times.csv", stop_times)]);
        let feed = Feed::load(&dir).unwrap();
        assert_eq!(feed.stop_times.len(), 1);
        assert_eq!(feed.stop_times[0].stop_id, "M_A");
    }

    #[test]
    fn empty_folder_is_fatal() {
        let dir = write_feed(&[]);
        assert!(matches!(Feed::load(&dir), Err(FeedError::NoStops { .. })));
    }

    #[test]
    fn missing_tables_contribute_nothing() {
        // Only stops present: the feed still loads, with empty reference maps.
        let dir = write_feed(&[("stops.csv", STOPS)]);
        let feed = Feed::load(&dir).unwrap();
        assert_eq!(feed.stops.len(), 3);
        assert!(feed.routes.is_empty());
        assert!(feed.trips.is_empty());
        assert!(feed.stop_times.is_empty());
    }

    #[test]
    fn agency_table_is_optional_but_loaded() {
        let agency = "agency_id,agency_name\nM_CAI-METRO,Cairo Metro\n";
        let dir = write_feed(&[("stops.csv", STOPS), ("agency.csv", agency)]);
        let feed = Feed::load(&dir).unwrap();
        assert_eq!(feed.agencies["M_CAI-METRO"].name, "Cairo Metro");
    }
}
