//! Itinerary output: a raw stop-id path merged with the query coordinates
//! into an ordered waypoint sequence.

use std::fmt::Display;

use crate::geo::Coord;
use crate::store::ScheduleStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointKind {
    Origin,
    Stop,
    Destination,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub kind: WaypointKind,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
    pub stop_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub waypoints: Vec<Waypoint>,
}

impl Itinerary {
    /// Number of scheduled stops between the two synthetic endpoints.
    pub fn num_stops(&self) -> usize {
        self.waypoints.iter().filter(|w| w.kind == WaypointKind::Stop).count()
    }
}

/// Merge a stop-id path with the raw query endpoints. Stop ids with no
/// matching record, or whose stop has no usable position, are skipped; an
/// empty path still yields the two synthetic endpoints.
pub fn format_itinerary(
    store: &ScheduleStore,
    path: &[String],
    origin: Coord,
    destination: Coord,
) -> Itinerary {
    let mut waypoints = Vec::with_capacity(path.len() + 2);

    waypoints.push(Waypoint {
        kind: WaypointKind::Origin,
        lat: origin.lat,
        lon: origin.lon,
        name: "Origin".to_owned(),
        stop_id: None,
    });

    for stop_id in path {
        let Some(stop) = store.stop(stop_id) else { continue };
        let Some(position) = stop.position else { continue };
        waypoints.push(Waypoint {
            kind: WaypointKind::Stop,
            lat: position.lat,
            lon: position.lon,
            name: stop.name.clone(),
            stop_id: Some(stop.id.clone()),
        });
    }

    waypoints.push(Waypoint {
        kind: WaypointKind::Destination,
        lat: destination.lat,
        lon: destination.lon,
        name: "Destination".to_owned(),
        stop_id: None,
    });

    Itinerary { waypoints }
}

impl Display for Itinerary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "-----------------------------------------------")?;
        for waypoint in self.waypoints.iter() {
            writeln!(f)?;
            match waypoint.kind {
                WaypointKind::Origin => {
                    write!(f, "Start at ({:.4}, {:.4}).", waypoint.lat, waypoint.lon)?
                }
                WaypointKind::Stop => write!(
                    f,
                    "Via {} [{}] ({:.4}, {:.4}).",
                    waypoint.name,
                    waypoint.stop_id.as_deref().unwrap_or("?"),
                    waypoint.lat,
                    waypoint.lon,
                )?,
                WaypointKind::Destination => {
                    write!(f, "Finish at ({:.4}, {:.4}).", waypoint.lat, waypoint.lon)?
                }
            }
        }
        writeln!(f)?;
        writeln!(f, "{} stops along the way.", self.num_stops())?;
        write!(f, "-----------------------------------------------")?;
        Ok(())
    }
}
