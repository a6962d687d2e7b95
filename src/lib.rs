/*! Static transit timetables, indexed to answer "what are the trips of this route and where do they stop"

Two tables are read, `trips.txt` and `stop_times.txt`, from a directory or a zip archive.
Their header is checked before any row is used: a file in an unexpected format is an error,
never a partially read schedule.

The reading produces a [Schedule]: every trip grouped by route, and every stop time grouped by trip,
both in the order of the files. A [Schedule] is never modified once built and can be shared between threads.

```
let schedule = route_schedules::Schedule::new("fixtures/basic")?;
for trip in schedule.assemble_schedule("Blue") {
    println!("{} ({} stops)", trip.trip_id, trip.schedules.len());
}
# Ok::<(), route_schedules::Error>(())
```

The [server] module exposes the schedule over HTTP.
*/

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate serde_derive;

mod collection;
pub mod error;
mod objects;
pub mod query;
mod schedule;
mod schedule_reader;
pub mod server;
pub mod table_loader;


pub use collection::GroupedCollection;
pub use error::Error;
pub use objects::*;
pub use query::{StopSchedule, TripSchedule};
pub use schedule::{route_key, trip_key, Schedule};
pub use schedule_reader::ScheduleReader;
