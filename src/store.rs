//! Typed schedule store and its derived stop departure index.
//!
//! A store is built once per feed import and frozen: every read path takes
//! `&ScheduleStore`, so concurrent searches over one store are safe. A
//! reload builds a new store and swaps the reference.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rgb::RGB8;

use crate::feed::{FeedTables, RawTable};
use crate::geo::Coord;
use crate::utils;

/// Seconds since service-day midnight; may exceed 24h for post-midnight
/// service.
pub type Timestamp = u32;

pub struct Stop {
    pub id: String,
    pub name: String,
    /// Absent when `stop_lat`/`stop_lon` are missing, unparsable, or outside
    /// the valid coordinate ranges.
    pub position: Option<Coord>,
    pub description: String,
}

/// GTFS `route_type` mode code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableCar,
    Gondola,
    Funicular,
    Other(u16),
}

impl RouteMode {
    fn from_code(code: u16) -> Self {
        match code {
            0 => RouteMode::Tram,
            1 => RouteMode::Subway,
            2 => RouteMode::Rail,
            3 => RouteMode::Bus,
            4 => RouteMode::Ferry,
            5 => RouteMode::CableCar,
            6 => RouteMode::Gondola,
            7 => RouteMode::Funicular,
            other => RouteMode::Other(other),
        }
    }
}

pub struct Route {
    pub id: String,
    pub agency_id: Option<String>,
    pub short_name: String,
    pub long_name: String,
    pub mode: Option<RouteMode>,
    pub color: Option<RGB8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Inbound,
}

pub struct Trip {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub headsign: Option<String>,
    pub direction: Option<Direction>,
}

/// One scheduled call of a trip at a stop. Stored grouped by trip id and
/// sorted by `sequence`.
pub struct StopTime {
    pub stop_id: String,
    pub arrival: Option<Timestamp>,
    pub departure: Option<Timestamp>,
    pub sequence: u32,
}

pub struct ServiceCalendar {
    pub service_id: String,
    /// Monday-first weekday mask.
    pub weekdays: [bool; 7],
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ServiceCalendar {
    /// True when the service runs on `date`: weekday enabled and date inside
    /// the validity range.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.weekdays[date.weekday().num_days_from_monday() as usize]
            && self.start_date <= date
            && date <= self.end_date
    }
}

/// Polyline point of a shape; retained for completeness, not consumed by the
/// search.
pub struct ShapePoint {
    pub lat: f64,
    pub lon: f64,
    pub sequence: u32,
}

/// One boarding opportunity at a stop: a (trip, position-in-trip) pair plus
/// the onward hop, when the trip continues past this stop.
pub struct StopDeparture {
    pub trip_id: String,
    pub position: u32,
    pub arrival: Option<Timestamp>,
    pub departure: Option<Timestamp>,
    pub next: Option<NextStop>,
}

pub struct NextStop {
    pub stop_id: String,
    pub arrival: Option<Timestamp>,
}

#[derive(Default)]
pub struct ScheduleStore {
    stops: HashMap<String, Stop>,
    routes: HashMap<String, Route>,
    trips: HashMap<String, Trip>,
    stop_times: HashMap<String, Vec<StopTime>>,
    calendar: HashMap<String, ServiceCalendar>,
    shapes: HashMap<String, Vec<ShapePoint>>,
    departures: HashMap<String, Vec<StopDeparture>>,
}

impl ScheduleStore {
    /// The "nothing loaded" state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a frozen store from one feed import. Rows missing their key
    /// field are dropped silently; malformed fields degrade per entity; an
    /// absent table yields an empty entity table.
    pub fn load(tables: &FeedTables) -> Self {
        let mut store = Self::default();
        if let Some(table) = &tables.stops {
            store.load_stops(table);
        }
        if let Some(table) = &tables.routes {
            store.load_routes(table);
        }
        if let Some(table) = &tables.trips {
            store.load_trips(table);
        }
        if let Some(table) = &tables.stop_times {
            store.load_stop_times(table);
        }
        if let Some(table) = &tables.calendar {
            store.load_calendar(table);
        }
        if let Some(table) = &tables.shapes {
            store.load_shapes(table);
        }
        store.build_departure_index();

        log::info!(
            "schedule loaded: {} stops, {} routes, {} trips, {} services, {} shapes",
            store.stops.len(),
            store.routes.len(),
            store.trips.len(),
            store.calendar.len(),
            store.shapes.len(),
        );
        store
    }

    fn load_stops(&mut self, table: &RawTable) {
        for row in table.rows() {
            let Some(id) = row.field("stop_id") else { continue };
            self.stops.insert(
                id.to_owned(),
                Stop {
                    id: id.to_owned(),
                    name: row.field("stop_name").unwrap_or("").to_owned(),
                    position: parse_position(row.field("stop_lat"), row.field("stop_lon")),
                    description: row.field("stop_desc").unwrap_or("").to_owned(),
                },
            );
        }
    }

    fn load_routes(&mut self, table: &RawTable) {
        for row in table.rows() {
            let Some(id) = row.field("route_id") else { continue };
            self.routes.insert(
                id.to_owned(),
                Route {
                    id: id.to_owned(),
                    agency_id: row.field("agency_id").map(str::to_owned),
                    short_name: row.field("route_short_name").unwrap_or("").to_owned(),
                    long_name: row.field("route_long_name").unwrap_or("").to_owned(),
                    mode: row
                        .field("route_type")
                        .and_then(|v| v.trim().parse().ok())
                        .map(RouteMode::from_code),
                    color: row.field("route_color").and_then(parse_color),
                },
            );
        }
    }

    fn load_trips(&mut self, table: &RawTable) {
        for row in table.rows() {
            let Some(id) = row.field("trip_id") else { continue };
            let direction = match row.field("direction_id").map(str::trim) {
                Some("0") => Some(Direction::Outbound),
                Some("1") => Some(Direction::Inbound),
                _ => None,
            };
            self.trips.insert(
                id.to_owned(),
                Trip {
                    id: id.to_owned(),
                    route_id: row.field("route_id").unwrap_or("").to_owned(),
                    service_id: row.field("service_id").unwrap_or("").to_owned(),
                    headsign: row.field("trip_headsign").map(str::to_owned),
                    direction,
                },
            );
        }
    }

    fn load_stop_times(&mut self, table: &RawTable) {
        for row in table.rows() {
            let Some(trip_id) = row.field("trip_id") else { continue };
            let Some(stop_id) = row.field("stop_id") else { continue };
            let Some(sequence) = row.field("stop_sequence").and_then(|v| v.trim().parse().ok())
            else {
                continue;
            };
            self.stop_times.entry(trip_id.to_owned()).or_default().push(StopTime {
                stop_id: stop_id.to_owned(),
                arrival: row.field("arrival_time").and_then(|v| utils::parse_time(v).ok()),
                departure: row.field("departure_time").and_then(|v| utils::parse_time(v).ok()),
                sequence,
            });
        }
        for times in self.stop_times.values_mut() {
            times.sort_by_key(|stop_time| stop_time.sequence);
        }
    }

    fn load_calendar(&mut self, table: &RawTable) {
        const WEEKDAY_COLUMNS: [&str; 7] =
            ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"];

        for row in table.rows() {
            let Some(id) = row.field("service_id") else { continue };
            let Some(start_date) = row.field("start_date").and_then(utils::parse_service_date)
            else {
                continue;
            };
            let Some(end_date) = row.field("end_date").and_then(utils::parse_service_date) else {
                continue;
            };

            let mut weekdays = [false; 7];
            for (day, column) in weekdays.iter_mut().zip(WEEKDAY_COLUMNS) {
                *day = row.field(column).map(str::trim) == Some("1");
            }
            self.calendar.insert(
                id.to_owned(),
                ServiceCalendar { service_id: id.to_owned(), weekdays, start_date, end_date },
            );
        }
    }

    fn load_shapes(&mut self, table: &RawTable) {
        for row in table.rows() {
            let Some(id) = row.field("shape_id") else { continue };
            let Some(lat) = row.field("shape_pt_lat").and_then(|v| v.trim().parse().ok()) else {
                continue;
            };
            let Some(lon) = row.field("shape_pt_lon").and_then(|v| v.trim().parse().ok()) else {
                continue;
            };
            let Some(sequence) =
                row.field("shape_pt_sequence").and_then(|v| v.trim().parse().ok())
            else {
                continue;
            };
            self.shapes.entry(id.to_owned()).or_default().push(ShapePoint { lat, lon, sequence });
        }
        for points in self.shapes.values_mut() {
            points.sort_by_key(|point| point.sequence);
        }
    }

    /// Rebuild the stop departure index from the stop time groups. Derived
    /// wholesale on every load, never patched incrementally. Records whose
    /// stop (or next stop) is missing from the stop table are not emitted.
    fn build_departure_index(&mut self) {
        self.departures.clear();

        // Fixed trip order keeps per-stop record order, and with it frontier
        // tie-breaking, reproducible across processes.
        let mut trip_ids: Vec<&String> = self.stop_times.keys().collect();
        trip_ids.sort();

        for trip_id in trip_ids {
            let times = &self.stop_times[trip_id];
            for (position, stop_time) in times.iter().enumerate() {
                if !self.stops.contains_key(&stop_time.stop_id) {
                    log::debug!(
                        "trip {trip_id} calls at unknown stop {}, record dropped",
                        stop_time.stop_id
                    );
                    continue;
                }
                let next = times.get(position + 1).and_then(|next_time| {
                    self.stops.contains_key(&next_time.stop_id).then(|| NextStop {
                        stop_id: next_time.stop_id.clone(),
                        arrival: next_time.arrival,
                    })
                });
                self.departures.entry(stop_time.stop_id.clone()).or_default().push(
                    StopDeparture {
                        trip_id: trip_id.clone(),
                        position: position as u32,
                        arrival: stop_time.arrival,
                        departure: stop_time.departure,
                        next,
                    },
                );
            }
        }
    }

    /// True iff at least one stop is present.
    pub fn is_loaded(&self) -> bool {
        !self.stops.is_empty()
    }

    pub fn stop(&self, id: &str) -> Option<&Stop> {
        self.stops.get(id)
    }

    pub fn route(&self, id: &str) -> Option<&Route> {
        self.routes.get(id)
    }

    pub fn trip(&self, id: &str) -> Option<&Trip> {
        self.trips.get(id)
    }

    pub fn calendar(&self, service_id: &str) -> Option<&ServiceCalendar> {
        self.calendar.get(service_id)
    }

    pub fn shape(&self, shape_id: &str) -> Option<&[ShapePoint]> {
        self.shapes.get(shape_id).map(Vec::as_slice)
    }

    pub fn trip_stop_times(&self, trip_id: &str) -> &[StopTime] {
        self.stop_times.get(trip_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The departure index entry for a stop; empty when the stop is unknown
    /// or nothing departs from it.
    pub fn departures_from(&self, stop_id: &str) -> &[StopDeparture] {
        self.departures.get(stop_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stops<'a>(&'a self) -> impl Iterator<Item = &'a Stop> + 'a {
        self.stops.values()
    }

    pub fn num_stops(&self) -> usize {
        self.stops.len()
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn num_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn print_stats(&self) {
        println!(
            "Schedule loaded with {} stops, {} routes, {} trips, and {} indexed departures.",
            self.stops.len(),
            self.routes.len(),
            self.trips.len(),
            self.departures.values().map(Vec::len).sum::<usize>(),
        );
    }
}

fn parse_position(lat: Option<&str>, lon: Option<&str>) -> Option<Coord> {
    let lat: f64 = lat?.trim().parse().ok()?;
    let lon: f64 = lon?.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(Coord { lat, lon })
}

fn parse_color(value: &str) -> Option<RGB8> {
    let hex = value.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let n = u32::from_str_radix(hex, 16).ok()?;
    Some(RGB8::new((n >> 16) as u8, (n >> 8) as u8, n as u8))
}
