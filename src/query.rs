//! Assembles the trips of a route with their stop schedules
use crate::objects::{StopTime, Trip};
use crate::Schedule;

/// A trip with all its stop times, as served to the clients
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TripSchedule<'data> {
    pub trip_id: &'data str,
    pub service_id: &'data str,
    pub route_id: &'data str,
    pub schedules: Vec<StopSchedule<'data>>,
}

/// One stop of a [TripSchedule]
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StopSchedule<'data> {
    pub stop_id: &'data str,
    pub arrival_time: &'data str,
    pub departure_time: &'data str,
}

impl<'data> From<&'data StopTime> for StopSchedule<'data> {
    fn from(stop_time: &'data StopTime) -> Self {
        StopSchedule {
            stop_id: &stop_time.stop_id,
            arrival_time: &stop_time.arrival_time,
            departure_time: &stop_time.departure_time,
        }
    }
}

impl Schedule {
    /// The trips of a route with their stop times
    ///
    /// Trips come in the order of the trips file and the stops of each trip in
    /// the order of the stop times file. An unknown route gives an empty list,
    /// a trip without stop times gives an empty `schedules`.
    ///
    /// ```
    /// let schedule = route_schedules::Schedule::new("fixtures/basic")?;
    /// let blue = schedule.assemble_schedule("Blue");
    /// assert_eq!("T1", blue[0].trip_id);
    /// assert_eq!("Aquarium", blue[0].schedules[0].stop_id);
    /// assert!(schedule.assemble_schedule("Nonexistent").is_empty());
    /// # Ok::<(), route_schedules::Error>(())
    /// ```
    pub fn assemble_schedule<'data>(&'data self, route_id: &str) -> Vec<TripSchedule<'data>> {
        self.trips_for_route(route_id)
            .map(|trip| self.trip_to_schedule(trip))
            .collect()
    }

    /// One trip with its stop times, `None` if the trip is unknown
    pub fn trip_schedule<'data>(&'data self, trip_id: &str) -> Option<TripSchedule<'data>> {
        self.get_trip(trip_id)
            .ok()
            .map(|trip| self.trip_to_schedule(trip))
    }

    fn trip_to_schedule<'data>(&'data self, trip: &'data Trip) -> TripSchedule<'data> {
        TripSchedule {
            trip_id: &trip.id,
            service_id: &trip.service_id,
            route_id: &trip.route_id,
            schedules: self
                .stop_times_for_trip(&trip.id)
                .map(StopSchedule::from)
                .collect(),
        }
    }
}
