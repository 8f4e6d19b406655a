pub mod feed;

pub use feed::{DirFeedLoader, FeedLoader, FeedTables, RawTable};

pub mod store;

pub use store::ScheduleStore;

pub mod geo;

pub use geo::Coord;

pub mod astar;

pub use astar::astar_query;

pub mod itinerary;

pub use itinerary::{Itinerary, Waypoint, WaypointKind};

pub mod router;

pub use router::{find_route, RouteError};

pub mod utils;
