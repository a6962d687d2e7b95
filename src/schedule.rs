use crate::collection::GroupedCollection;
use crate::objects::*;
use crate::{Error, ScheduleReader};
use std::collections::HashMap;

/// Groups [Trip] by their route
pub fn route_key(trip: &Trip) -> &str {
    &trip.route_id
}

/// Groups [StopTime] by their trip
pub fn trip_key(stop_time: &StopTime) -> &str {
    &stop_time.trip_id
}

/// The trips and stop times of a network, indexed for lookups by route and by trip
///
/// A `Schedule` is complete as soon as it exists and offers no way to be
/// modified afterwards: it can be shared between threads (for instance behind
/// an [std::sync::Arc]) and read without any lock.
#[derive(Debug)]
pub struct Schedule {
    /// Time needed to read and index the tables in milliseconds
    pub read_duration: i64,
    /// sha256 sum of the archive, when read from a zip file
    pub sha256: Option<String>,
    trips: GroupedCollection<Trip>,
    stop_times: GroupedCollection<StopTime>,
    trip_positions: HashMap<String, usize>,
}

impl Schedule {
    /// Reads from a local directory or zip archive holding trips.txt and stop_times.txt
    ///
    /// See [ScheduleReader] to customize the reading.
    pub fn new(path: &str) -> Result<Schedule, Error> {
        ScheduleReader::default().read(path)
    }

    /// Builds a schedule from tables already indexed by [route_key] and [trip_key]
    ///
    /// Stop times of unknown trips are kept, but no route leads to them.
    pub fn from_parts(
        trips: GroupedCollection<Trip>,
        stop_times: GroupedCollection<StopTime>,
    ) -> Schedule {
        let mut trip_positions = HashMap::with_capacity(trips.len());
        for (i, trip) in trips.iter().enumerate() {
            trip_positions.entry(trip.id.clone()).or_insert(i);
        }

        let orphans = stop_times
            .keys()
            .into_iter()
            .filter(|trip_id| !trip_positions.contains_key(*trip_id))
            .count();
        if orphans > 0 {
            log::warn!(
                "stop times reference {} trips that are not in {}, they will not be served",
                orphans,
                Trip::FILE_NAME
            );
        }

        Schedule {
            read_duration: 0,
            sha256: None,
            trips,
            stop_times,
            trip_positions,
        }
    }

    /// All the trips of a route, in the order of the trips file
    ///
    /// An unknown route has no trips, it is not an error.
    pub fn trips_for_route<'a>(&'a self, route_id: &str) -> impl Iterator<Item = &'a Trip> + 'a {
        self.trips.group(route_id)
    }

    /// All the stop times of a trip, in the order of the stop times file
    ///
    /// The order is never changed: it is the sequence of stops served by the trip.
    pub fn stop_times_for_trip<'a>(
        &'a self,
        trip_id: &str,
    ) -> impl Iterator<Item = &'a StopTime> + 'a {
        self.stop_times.group(trip_id)
    }

    /// The first trip of the trips file with this id
    pub fn get_trip<'a>(&'a self, id: &str) -> Result<&'a Trip, Error> {
        self.trip_positions
            .get(id)
            .and_then(|i| self.trips.get(*i))
            .ok_or_else(|| Error::ReferenceError(id.to_owned()))
    }

    /// Routes that have at least one trip, in the order they first appear
    pub fn route_ids(&self) -> Vec<&str> {
        self.trips.keys()
    }

    /// All the trips, in file order
    pub fn trips(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }

    /// All the stop times, in file order
    pub fn stop_times(&self) -> std::slice::Iter<'_, StopTime> {
        self.stop_times.iter()
    }

    pub fn nb_trips(&self) -> usize {
        self.trips.len()
    }

    pub fn nb_stop_times(&self) -> usize {
        self.stop_times.len()
    }

    pub fn nb_routes(&self) -> usize {
        self.trips.nb_groups()
    }

    /// Prints on stdout some basic statistics about the schedule. Mostly to be sure that everything was read
    pub fn print_stats(&self) {
        println!("Schedule data:");
        println!("  Read in {} ms", self.read_duration);
        println!("  Routes: {}", self.nb_routes());
        println!("  Trips: {}", self.nb_trips());
        println!("  Stop times: {}", self.nb_stop_times());
        if let Some(sha256) = &self.sha256 {
            println!("  sha256: {}", sha256);
        }
    }
}
