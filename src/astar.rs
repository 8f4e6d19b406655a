//! Time-cost A* over the stop departure index.
//!
//! The heuristic estimates remaining travel time as great-circle distance at
//! an assumed 30 km/h. That is not a guaranteed lower bound for services
//! slower than 30 km/h, so the search can return a suboptimal path on such
//! feeds; the approximation is kept as-is rather than silently changing
//! search semantics.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::geo;
use crate::store::{ScheduleStore, Timestamp};

/// Edge cost in hours when either clock field is unusable.
const DEFAULT_EDGE_COST: f64 = 1.0;
/// Assumed average service speed for the heuristic, meters per hour.
const ASSUMED_SPEED_M_PER_H: f64 = 30_000.0;

struct FrontierEntry {
    /// Accumulated cost plus heuristic, hours.
    estimated: f64,
    /// Cost of the path so far, hours.
    accumulated: f64,
    /// Insertion order, the final tie-break.
    seq: u64,
    stop_id: String,
    path: Vec<String>,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap, so the ordering is reversed: the cheapest
// estimate pops first, ties broken by accumulated cost, then insertion order.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimated
            .total_cmp(&self.estimated)
            .then_with(|| other.accumulated.total_cmp(&self.accumulated))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Best-first search from `start` to `end` over scheduled hops. Returns the
/// stop-id path, start to end inclusive, or `None` when the frontier empties
/// first (disconnected feeds are a valid outcome, not an error).
pub fn astar_query(store: &ScheduleStore, start: &str, end: &str) -> Option<Vec<String>> {
    let mut frontier = BinaryHeap::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut seq = 0u64;

    frontier.push(FrontierEntry {
        estimated: 0.0,
        accumulated: 0.0,
        seq,
        stop_id: start.to_owned(),
        path: vec![start.to_owned()],
    });

    let mut expanded = 0usize;
    while let Some(entry) = frontier.pop() {
        if entry.stop_id == end {
            log::debug!("path found after expanding {expanded} stops");
            return Some(entry.path);
        }
        if !visited.insert(entry.stop_id.clone()) {
            continue;
        }
        expanded += 1;

        for departure in store.departures_from(&entry.stop_id) {
            let Some(next) = &departure.next else { continue };
            if visited.contains(&next.stop_id) {
                continue;
            }
            let accumulated =
                entry.accumulated + edge_cost_hours(departure.departure, next.arrival);
            let estimated = accumulated + heuristic_hours(store, &next.stop_id, end);
            seq += 1;

            let mut path = entry.path.clone();
            path.push(next.stop_id.clone());
            frontier.push(FrontierEntry {
                estimated,
                accumulated,
                seq,
                stop_id: next.stop_id.clone(),
                path,
            });
        }
    }

    log::debug!("frontier exhausted after expanding {expanded} stops");
    None
}

/// Scheduled hop cost in hours. Clock values are truncated to whole minutes;
/// when the arrival minute is numerically earlier than the departure minute a
/// 24-hour wrap is added (overnight trips). Missing times cost one hour.
fn edge_cost_hours(departure: Option<Timestamp>, arrival: Option<Timestamp>) -> f64 {
    let (Some(departure), Some(arrival)) = (departure, arrival) else {
        return DEFAULT_EDGE_COST;
    };

    let departure_min = i64::from(departure / 60);
    let arrival_min = i64::from(arrival / 60);
    let mut diff = arrival_min - departure_min;
    if diff < 0 {
        diff += 24 * 60;
    }
    diff as f64 / 60.0
}

/// Straight-line travel time estimate between two stops at the assumed
/// average speed. Zero when either stop has no usable position.
fn heuristic_hours(store: &ScheduleStore, from: &str, to: &str) -> f64 {
    let from = store.stop(from).and_then(|stop| stop.position);
    let to = store.stop(to).and_then(|stop| stop.position);
    match (from, to) {
        (Some(from), Some(to)) => geo::distance_meters(from, to) / ASSUMED_SPEED_M_PER_H,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedTables, RawTable};
    use crate::utils;

    fn table(csv: &str) -> Option<RawTable> {
        Some(RawTable::from_csv_reader(csv.as_bytes()))
    }

    fn time(s: &str) -> Option<Timestamp> {
        Some(utils::parse_time(s).unwrap())
    }

    fn linear_store() -> ScheduleStore {
        ScheduleStore::load(&FeedTables {
            stops: table(
                "stop_id,stop_name,stop_lat,stop_lon\n\
                 S1,Alpha,0.0,0.0\n\
                 S2,Beta,0.0,1.0\n\
                 S3,Gamma,0.0,2.0\n\
                 LONER,Island,10.0,10.0\n",
            ),
            stop_times: table(
                "trip_id,stop_id,arrival_time,departure_time,stop_sequence\n\
                 T1,S1,08:00:00,08:00:00,1\n\
                 T1,S2,08:10:00,08:10:00,2\n\
                 T1,S3,08:20:00,08:20:00,3\n",
            ),
            ..FeedTables::default()
        })
    }

    #[test]
    fn follows_the_trip_in_stop_order() {
        let store = linear_store();
        assert_eq!(
            astar_query(&store, "S1", "S3"),
            Some(vec!["S1".to_owned(), "S2".to_owned(), "S3".to_owned()])
        );
    }

    #[test]
    fn start_equals_end() {
        let store = linear_store();
        assert_eq!(astar_query(&store, "S2", "S2"), Some(vec!["S2".to_owned()]));
    }

    #[test]
    fn disconnected_stop_yields_none() {
        let store = linear_store();
        assert_eq!(astar_query(&store, "S1", "LONER"), None);
        // Hops are one-directional; there is no trip back from S3.
        assert_eq!(astar_query(&store, "S3", "S1"), None);
    }

    #[test]
    fn prefers_the_cheaper_branch() {
        // Diamond: S1 -> S2 -> S4 in 10-minute hops, S1 -> S3 -> S4 in
        // 30-minute hops. All stops share a position so the heuristic is
        // neutral and only accumulated cost decides.
        let store = ScheduleStore::load(&FeedTables {
            stops: table(
                "stop_id,stop_name,stop_lat,stop_lon\n\
                 S1,A,0.0,0.0\n\
                 S2,B,0.0,0.0\n\
                 S3,C,0.0,0.0\n\
                 S4,D,0.0,0.0\n",
            ),
            stop_times: table(
                "trip_id,stop_id,arrival_time,departure_time,stop_sequence\n\
                 FAST,S1,08:00:00,08:00:00,1\n\
                 FAST,S2,08:10:00,08:10:00,2\n\
                 FAST,S4,08:20:00,08:20:00,3\n\
                 SLOW,S1,08:00:00,08:00:00,1\n\
                 SLOW,S3,08:30:00,08:30:00,2\n\
                 SLOW,S4,09:00:00,09:00:00,3\n",
            ),
            ..FeedTables::default()
        });
        assert_eq!(
            astar_query(&store, "S1", "S4"),
            Some(vec!["S1".to_owned(), "S2".to_owned(), "S4".to_owned()])
        );
    }

    #[test]
    fn overnight_edge_cost_wraps_forward() {
        let cost = edge_cost_hours(time("23:50:00"), time("00:10:00"));
        assert!((cost - 20.0 / 60.0).abs() < 1e-12, "got {cost}");
        assert!(cost > 0.0);
    }

    #[test]
    fn edge_cost_truncates_to_whole_minutes() {
        let cost = edge_cost_hours(time("08:00:59"), time("08:30:00"));
        assert!((cost - 0.5).abs() < 1e-12, "got {cost}");
    }

    #[test]
    fn missing_times_fall_back_to_one_hour() {
        assert_eq!(edge_cost_hours(None, time("08:10:00")), DEFAULT_EDGE_COST);
        assert_eq!(edge_cost_hours(time("08:00:00"), None), DEFAULT_EDGE_COST);
        assert_eq!(edge_cost_hours(None, None), DEFAULT_EDGE_COST);
    }

    #[test]
    fn search_is_deterministic() {
        let store = linear_store();
        let first = astar_query(&store, "S1", "S3");
        let second = astar_query(&store, "S1", "S3");
        assert_eq!(first, second);
    }
}
