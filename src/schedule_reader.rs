use crate::collection::GroupedCollection;
use crate::objects::{StopTime, Table, Trip};
use crate::schedule::{route_key, trip_key};
use crate::{Error, Schedule};
use chrono::Utc;
use sha2::digest::Digest;
use sha2::Sha256;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Allows to parameterize how the schedule is read
///
/// ```
///let schedule = route_schedules::ScheduleReader::default()
///    .sequential()
///    .read("fixtures/basic")?;
///assert_eq!(2, schedule.stop_times_for_trip("T1").count());
/// # Ok::<(), route_schedules::error::Error>(())
///```
#[derive(Derivative)]
#[derivative(Default)]
pub struct ScheduleReader {
    /// Read trips.txt and stop_times.txt at the same time, one thread each.
    /// Only used when reading from a directory or from explicit files
    #[derivative(Default(value = "true"))]
    pub parallel: bool,
}

impl ScheduleReader {
    /// Configures the reader to read the tables one after the other
    ///
    /// Returns Self and can be chained
    pub fn sequential(&mut self) -> &mut Self {
        self.parallel = false;
        self
    }

    /// Reads from a local path, either a directory or a zip archive
    pub fn read<P>(&self, path: P) -> Result<Schedule, Error>
    where
        P: AsRef<Path>,
    {
        let p = path.as_ref();
        if p.is_file() {
            let reader = File::open(p).map_err(|e| Error::NamedFileIO {
                file_name: format!("{}", p.display()),
                source: Box::new(e),
            })?;
            self.from_named_reader(reader, &format!("{}", p.display()))
        } else if p.is_dir() {
            self.from_directory(p)
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", p.display())))
        }
    }

    /// Reads trips.txt and stop_times.txt from a directory
    pub fn from_directory<P: AsRef<Path>>(&self, dir: P) -> Result<Schedule, Error> {
        let dir = dir.as_ref();
        self.from_files(dir.join(Trip::FILE_NAME), dir.join(StopTime::FILE_NAME))
    }

    /// Reads the two tables from explicit paths
    ///
    /// The returned [Schedule] only exists once both tables are completely read.
    pub fn from_files<P, Q>(&self, trips_path: P, stop_times_path: Q) -> Result<Schedule, Error>
    where
        P: AsRef<Path> + Sync,
        Q: AsRef<Path> + Sync,
    {
        let now = Utc::now();
        let read_trips = || GroupedCollection::from_path(&trips_path, route_key);
        let read_stop_times = || GroupedCollection::from_path(&stop_times_path, trip_key);

        let (trips, stop_times) = if self.parallel {
            rayon::join(read_trips, read_stop_times)
        } else {
            (read_trips(), read_stop_times())
        };

        let mut schedule = Schedule::from_parts(trips?, stop_times?);
        schedule.read_duration = Utc::now().signed_duration_since(now).num_milliseconds();
        Ok(schedule)
    }

    /// Reads a zip archive from any object implementing [std::io::Read] and [std::io::Seek]
    ///
    /// The tables can be in a sub directory of the archive. The archive is always read sequentially.
    pub fn from_reader<T: std::io::Read + std::io::Seek>(
        &self,
        reader: T,
    ) -> Result<Schedule, Error> {
        self.from_named_reader(reader, "zip archive")
    }

    /// Same as [ScheduleReader::from_reader], `archive_name` is used in the errors about the archive itself
    fn from_named_reader<T: std::io::Read + std::io::Seek>(
        &self,
        reader: T,
        archive_name: &str,
    ) -> Result<Schedule, Error> {
        let now = Utc::now();
        let archive_err = |e: Box<dyn std::error::Error + Send + Sync>| Error::NamedFileIO {
            file_name: archive_name.to_owned(),
            source: e,
        };
        let mut hasher = Sha256::new();
        let mut buf_reader = std::io::BufReader::new(reader);
        let _n = std::io::copy(&mut buf_reader, &mut hasher).map_err(|e| archive_err(e.into()))?;
        let hash = hasher.finalize();
        let mut archive =
            zip::ZipArchive::new(buf_reader).map_err(|e| archive_err(e.into()))?;
        let mut file_mapping = HashMap::new();

        for i in 0..archive.len() {
            let archive_file = archive.by_index(i).map_err(|e| archive_err(e.into()))?;
            if archive_file.name().starts_with("__MACOSX") {
                continue;
            }
            let path = Path::new(archive_file.name());
            for table_file in &[Trip::FILE_NAME, StopTime::FILE_NAME] {
                if path.file_name() == Some(std::ffi::OsStr::new(table_file)) {
                    file_mapping.insert(*table_file, i);
                    break;
                }
            }
        }

        let trips = GroupedCollection::read_from(
            archive_table(&mut archive, &file_mapping, Trip::FILE_NAME)?,
            Trip::FILE_NAME,
            route_key,
        )?;
        let stop_times = GroupedCollection::read_from(
            archive_table(&mut archive, &file_mapping, StopTime::FILE_NAME)?,
            StopTime::FILE_NAME,
            trip_key,
        )?;

        let mut schedule = Schedule::from_parts(trips, stop_times);
        schedule.read_duration = Utc::now().signed_duration_since(now).num_milliseconds();
        schedule.sha256 = Some(format!("{:x}", hash));
        Ok(schedule)
    }
}

fn archive_table<'a, T: std::io::Read + std::io::Seek>(
    archive: &'a mut zip::ZipArchive<T>,
    file_mapping: &HashMap<&str, usize>,
    file_name: &str,
) -> Result<zip::read::ZipFile<'a>, Error> {
    let i = *file_mapping
        .get(file_name)
        .ok_or_else(|| Error::MissingFile(file_name.to_owned()))?;
    archive.by_index(i).map_err(|e| Error::NamedFileIO {
        file_name: file_name.to_owned(),
        source: Box::new(e),
    })
}
