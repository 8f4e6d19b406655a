use chrono::NaiveDate;

use gtfs_astar::feed::{FeedTables, RawTable};
use gtfs_astar::geo::Coord;
use gtfs_astar::ScheduleStore;

// Common sample data for the demos and benchmarks: a small fictional metro
// network in central Paris.

pub const SAMPLE_MAX_STOP_DISTANCE_M: f64 = 500.0;

const STOPS: &str = "\
stop_id,stop_name,stop_lat,stop_lon,stop_desc
S1,Châtelet,48.8584,2.3470,Central station
S2,Gare du Nord,48.8809,2.3553,Rail terminus
S3,République,48.8676,2.3633,Place de la République
S4,Bastille,48.8532,2.3692,Place de la Bastille
S5,Nation,48.8484,2.3960,Place de la Nation
S6,Saint-Lazare,48.8762,2.3255,Gare Saint-Lazare
S7,Opéra,48.8716,2.3314,Palais Garnier
S8,Montparnasse,48.8420,2.3213,Gare Montparnasse
";

const ROUTES: &str = "\
route_id,agency_id,route_short_name,route_long_name,route_type,route_color
R1,AGENCY1,1,Line 1 - East-West,1,FFCD00
R2,AGENCY1,4,Line 4 - North-South,1,9F1B51
R3,AGENCY1,14,Line 14,1,62259D
";

const TRIPS: &str = "\
route_id,service_id,trip_id,trip_headsign,direction_id
R1,WD,T1_1,Towards Nation,0
R1,WD,T1_2,Towards Châtelet,1
R2,WD,T2_1,Towards Bastille,0
R3,WD,T3_1,Towards Châtelet,0
";

const STOP_TIMES: &str = "\
trip_id,arrival_time,departure_time,stop_id,stop_sequence
T1_1,08:00:00,08:00:00,S1,1
T1_1,08:05:00,08:05:00,S3,2
T1_1,08:10:00,08:10:00,S4,3
T1_1,08:15:00,08:15:00,S5,4
T1_2,09:00:00,09:00:00,S5,1
T1_2,09:05:00,09:05:00,S4,2
T1_2,09:10:00,09:10:00,S3,3
T1_2,09:15:00,09:15:00,S1,4
T2_1,08:30:00,08:30:00,S2,1
T2_1,08:35:00,08:35:00,S3,2
T2_1,08:40:00,08:40:00,S4,3
T3_1,10:00:00,10:00:00,S6,1
T3_1,10:05:00,10:05:00,S7,2
T3_1,10:10:00,10:10:00,S1,3
";

const CALENDAR: &str = "\
service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date
WD,1,1,1,1,1,0,0,20240101,20241231
WE,0,0,0,0,0,1,1,20240101,20241231
";

pub fn sample_tables() -> FeedTables {
    FeedTables {
        stops: Some(RawTable::from_csv_reader(STOPS.as_bytes())),
        routes: Some(RawTable::from_csv_reader(ROUTES.as_bytes())),
        trips: Some(RawTable::from_csv_reader(TRIPS.as_bytes())),
        stop_times: Some(RawTable::from_csv_reader(STOP_TIMES.as_bytes())),
        calendar: Some(RawTable::from_csv_reader(CALENDAR.as_bytes())),
        shapes: None,
    }
}

pub fn sample_store() -> ScheduleStore {
    ScheduleStore::load(&sample_tables())
}

/// A query from just outside Châtelet to just outside Nation.
pub fn sample_query() -> (Coord, Coord) {
    (Coord::new(48.8583, 2.3469), Coord::new(48.8484, 2.3962))
}

/// A weekday inside the sample calendar's validity range.
pub fn sample_service_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
}
