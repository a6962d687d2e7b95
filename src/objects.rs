use std::fmt;

/// A delimited file holding one kind of object, one object per row
///
/// The header of the file must start with [Table::HEADERS], in that order.
/// Extra trailing columns are allowed and ignored.
pub trait Table: for<'de> serde::Deserialize<'de> {
    /// Name of the file inside a directory or an archive
    const FILE_NAME: &'static str;
    /// Expected leading header columns
    const HEADERS: &'static [&'static str];
}

/// A scheduled run of a route. Read from the file trips.txt
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Trip {
    /// Route this trip belongs to
    pub route_id: String,
    /// Service calendar of the trip, kept as an opaque identifier
    pub service_id: String,
    /// Unique identifier of the trip (uniqueness is not checked)
    #[serde(rename = "trip_id")]
    pub id: String,
}

impl Table for Trip {
    const FILE_NAME: &'static str = "trips.txt";
    const HEADERS: &'static [&'static str] = &["route_id", "service_id", "trip_id"];
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Trip {} of route {}", self.id, self.route_id)
    }
}

/// A visit of a [Trip] at a stop. Read from the file stop_times.txt
///
/// Times are kept as written in the file. They are often `HH:MM:SS` but can go
/// beyond `24:00:00` for trips running after midnight, so they are never parsed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StopTime {
    /// [Trip] of this stop time, might not reference a known trip
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
}

impl Table for StopTime {
    const FILE_NAME: &'static str = "stop_times.txt";
    const HEADERS: &'static [&'static str] =
        &["trip_id", "arrival_time", "departure_time", "stop_id"];
}

impl fmt::Display for StopTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} at {} ({} - {})",
            self.trip_id, self.stop_id, self.arrival_time, self.departure_time
        )
    }
}
