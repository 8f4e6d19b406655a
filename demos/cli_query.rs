use std::io::{stdout, Write};

use gtfs_astar::feed::{DirFeedLoader, FeedLoader};
use gtfs_astar::{find_route, Coord, ScheduleStore};

const MAX_STOP_DISTANCE_M: f64 = 1000.0;

fn read_coord(prompt: &str) -> Result<Coord, std::io::Error> {
    loop {
        print!("{prompt} (lat,lon): ");
        stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;

        let mut parts = line.trim().splitn(2, ',');
        let lat = parts.next().map(str::trim).and_then(|v| v.parse::<f64>().ok());
        let lon = parts.next().map(str::trim).and_then(|v| v.parse::<f64>().ok());
        if let (Some(lat), Some(lon)) = (lat, lon) {
            return Ok(Coord::new(lat, lon));
        }
        println!("Could not parse coordinates. Please try again.");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let feed_dir = std::env::args().nth(1).unwrap_or_else(|| String::from("gtfs"));
    let tables = DirFeedLoader::new(&feed_dir).load_tables()?;
    let store = ScheduleStore::load(&tables);
    store.print_stats();
    println!();

    loop {
        let origin = read_coord("Where are you starting")?;
        let destination = read_coord("Where are you going")?;

        println!();
        let query_start = std::time::Instant::now();
        match find_route(&store, origin, destination, MAX_STOP_DISTANCE_M)? {
            Some(itinerary) => {
                println!("Query took {:?}", query_start.elapsed());
                println!("{itinerary}");
            }
            None => println!("No itinerary found."),
        }

        break;
    }

    Ok(())
}
