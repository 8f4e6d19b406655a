//! Point-to-point query facade: locate the endpoint stops, search, format.

use crate::astar;
use crate::geo::{self, Coord};
use crate::itinerary::{self, Itinerary};
use crate::store::ScheduleStore;

#[derive(thiserror::Error, Debug)]
pub enum RouteError {
    /// The store has no feed loaded; callers can distinguish this from "no
    /// path exists".
    #[error("no schedule feed loaded")]
    NotReady,
}

/// Compute an itinerary between two free coordinates.
///
/// `Ok(None)` means no itinerary: either endpoint has no stop strictly
/// within `max_stop_distance_meters`, or the schedule graph has no path
/// between the located stops.
pub fn find_route(
    store: &ScheduleStore,
    origin: Coord,
    destination: Coord,
    max_stop_distance_meters: f64,
) -> Result<Option<Itinerary>, RouteError> {
    if !store.is_loaded() {
        return Err(RouteError::NotReady);
    }

    let Some((origin_stop, origin_distance)) =
        geo::nearest_stop(store, origin, max_stop_distance_meters)
    else {
        log::info!("no stop within {max_stop_distance_meters} m of the origin");
        return Ok(None);
    };
    let Some((destination_stop, destination_distance)) =
        geo::nearest_stop(store, destination, max_stop_distance_meters)
    else {
        log::info!("no stop within {max_stop_distance_meters} m of the destination");
        return Ok(None);
    };
    log::debug!(
        "boarding at {} ({origin_distance:.0} m away), alighting at {} ({destination_distance:.0} m away)",
        origin_stop.id,
        destination_stop.id,
    );

    let Some(path) = astar::astar_query(store, &origin_stop.id, &destination_stop.id) else {
        log::info!("no path between {} and {}", origin_stop.id, destination_stop.id);
        return Ok(None);
    };

    Ok(Some(itinerary::format_itinerary(store, &path, origin, destination)))
}
