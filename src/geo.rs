//! Great-circle distance and nearest-stop lookup.

use crate::store::{ScheduleStore, Stop};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine great-circle distance in meters.
pub fn distance_meters(a: Coord, b: Coord) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat_a.cos() * lat_b.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Linear scan for the stop closest to `point`, strictly within
/// `max_distance_meters`. Stops without a parsed position are skipped.
/// Equal distances resolve to the lexicographically smallest stop id, so the
/// result does not depend on table iteration order.
pub fn nearest_stop(
    store: &ScheduleStore,
    point: Coord,
    max_distance_meters: f64,
) -> Option<(&Stop, f64)> {
    let mut nearest: Option<(&Stop, f64)> = None;

    for stop in store.stops() {
        let Some(position) = stop.position else { continue };
        let distance = distance_meters(point, position);
        if distance >= max_distance_meters {
            continue;
        }
        let closer = match nearest {
            None => true,
            Some((best, best_distance)) => {
                distance < best_distance || (distance == best_distance && stop.id < best.id)
            }
        };
        if closer {
            nearest = Some((stop, distance));
        }
    }

    nearest
}
