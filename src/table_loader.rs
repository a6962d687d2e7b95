//! Streams the rows of a delimited file after checking its header
use crate::error::LineError;
use crate::objects::Table;
use crate::Error;
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// One data row of a table, handed to the row callback of [read_table]
pub struct Row<'r> {
    file_name: &'r str,
    headers: &'r StringRecord,
    record: &'r StringRecord,
}

impl<'r> Row<'r> {
    /// Positional access to a field
    pub fn get(&self, i: usize) -> Option<&'r str> {
        self.record.get(i)
    }

    /// Number of fields of the row
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Line of the row in the file (the header is on line 1)
    pub fn line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or_default()
    }

    /// Builds an object out of the first [Table::HEADERS] fields of the row
    ///
    /// Only those leading fields are used, by position: trailing columns can be
    /// missing or have any value.
    pub fn deserialize<T: Table>(&self) -> Result<T, Error> {
        let headers = StringRecord::from(T::HEADERS.to_vec());
        let fields: StringRecord = self.record.iter().take(T::HEADERS.len()).collect();
        fields
            .deserialize(Some(&headers))
            .map_err(|e| Error::CSVError {
                file_name: self.file_name.to_owned(),
                source: e,
                line_in_error: Some(self.line_error()),
            })
    }

    fn line_error(&self) -> LineError {
        LineError {
            headers: self.headers.iter().map(|s| s.to_owned()).collect(),
            values: self.record.iter().map(|s| s.to_owned()).collect(),
        }
    }
}

/// Opens the file at `path` and calls [read_table] on it
///
/// ```
/// let mut route_ids = Vec::new();
/// let nb_rows = route_schedules::table_loader::load_table(
///     "fixtures/basic/trips.txt",
///     &["route_id", "service_id", "trip_id"],
///     |row, _ordinal| {
///         route_ids.push(row.get(0).unwrap_or_default().to_owned());
///         Ok(())
///     },
/// )?;
/// assert_eq!(nb_rows, route_ids.len());
/// # Ok::<(), route_schedules::Error>(())
/// ```
pub fn load_table<P, F>(path: P, headers: &[&str], on_row: F) -> Result<usize, Error>
where
    P: AsRef<Path>,
    F: FnMut(Row<'_>, usize) -> Result<(), Error>,
{
    let (file, file_name) = open_table(path)?;
    read_table(file, &file_name, headers, on_row)
}

/// Opens a table file, returning it with its file name
pub fn open_table<P: AsRef<Path>>(path: P) -> Result<(File, String), Error> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("invalid_file_name")
        .to_string();
    if !path.exists() {
        return Err(Error::MissingFile(format!("{}", path.display())));
    }
    File::open(path)
        .map(|f| (f, file_name.to_owned()))
        .map_err(|e| Error::NamedFileIO {
            file_name,
            source: Box::new(e),
        })
}

/// Reads a delimited table, row by row
///
/// The first row must start with the `headers` columns, in that order,
/// otherwise [Error::SchemaMismatch] is returned before any row is given to
/// `on_row`. Every following row is given to `on_row` with its zero-based
/// ordinal (the header is not counted). Rows with fewer fields than `headers`
/// stop the reading with [Error::MalformedRow].
///
/// Returns the number of data rows read. Nothing is kept once a row has been handed over.
pub fn read_table<R, F>(
    mut reader: R,
    file_name: &str,
    headers: &[&str],
    mut on_row: F,
) -> Result<usize, Error>
where
    R: Read,
    F: FnMut(Row<'_>, usize) -> Result<(), Error>,
{
    let csv_err = |e: csv::Error| Error::CSVError {
        file_name: file_name.to_owned(),
        source: e,
        line_in_error: None,
    };

    let mut prefix = Vec::with_capacity(BOM.len());
    reader
        .by_ref()
        .take(BOM.len() as u64)
        .read_to_end(&mut prefix)
        .map_err(|e| Error::NamedFileIO {
            file_name: file_name.to_owned(),
            source: Box::new(e),
        })?;
    if prefix == BOM {
        prefix.clear();
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(prefix.as_slice().chain(reader));

    let file_headers = reader.headers().map_err(csv_err)?.clone();
    if file_headers.is_empty() {
        return Err(Error::EmptyFile(file_name.to_owned()));
    }
    check_headers(file_name, headers, &file_headers)?;

    let mut record = StringRecord::new();
    let mut ordinal = 0;
    while reader
        .read_record(&mut record)
        .map_err(csv_err)?
    {
        let row = Row {
            file_name,
            headers: &file_headers,
            record: &record,
        };
        if row.len() < headers.len() {
            return Err(Error::MalformedRow {
                file_name: file_name.to_owned(),
                line: row.line(),
                expected: headers.len(),
                found: row.len(),
                line_in_error: row.line_error(),
            });
        }
        on_row(row, ordinal)?;
        ordinal += 1;
    }

    Ok(ordinal)
}

fn check_headers(file_name: &str, expected: &[&str], actual: &StringRecord) -> Result<(), Error> {
    let matches = actual.len() >= expected.len()
        && expected
            .iter()
            .zip(actual.iter())
            .all(|(expected, actual)| expected == &actual);
    if matches {
        Ok(())
    } else {
        Err(Error::SchemaMismatch {
            file_name: file_name.to_owned(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            actual: actual.iter().map(|s| s.to_owned()).collect(),
        })
    }
}

/// Reads a whole [Table] in file order
pub fn read_objects<T: Table, R: Read>(reader: R, file_name: &str) -> Result<Vec<T>, Error> {
    let mut res = Vec::new();
    read_table(reader, file_name, T::HEADERS, |row, _| {
        res.push(row.deserialize()?);
        Ok(())
    })?;
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{StopTime, Trip};

    fn rows(data: &str, headers: &[&str]) -> Result<Vec<(usize, Vec<String>)>, Error> {
        let mut res = Vec::new();
        read_table(data.as_bytes(), "test.txt", headers, |row, ordinal| {
            let fields = (0..row.len())
                .filter_map(|i| row.get(i))
                .map(|s| s.to_owned())
                .collect();
            res.push((ordinal, fields));
            Ok(())
        })?;
        Ok(res)
    }

    #[test]
    fn ordinals_skip_header() {
        let res = rows("a,b\n1,2\n3,4\n", &["a", "b"]).unwrap();
        assert_eq!(
            vec![
                (0, vec!["1".to_owned(), "2".to_owned()]),
                (1, vec!["3".to_owned(), "4".to_owned()])
            ],
            res
        );
    }

    #[test]
    fn header_mismatch_before_any_row() {
        let mut called = false;
        let err = read_table(
            "route_id,trip_id,service_id\nr,t,s\n".as_bytes(),
            "trips.txt",
            Trip::HEADERS,
            |_, _| {
                called = true;
                Ok(())
            },
        )
        .unwrap_err();
        assert!(!called);
        match err {
            Error::SchemaMismatch {
                file_name,
                expected,
                actual,
            } => {
                assert_eq!("trips.txt", file_name);
                assert_eq!(vec!["route_id", "service_id", "trip_id"], expected);
                assert_eq!(vec!["route_id", "trip_id", "service_id"], actual);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn short_header_is_a_mismatch() {
        let err = rows("route_id,service_id\nr,s\n", Trip::HEADERS).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let data = "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                    t1,08:00:00,08:01:00,s1,1\n";
        let stop_times: Vec<StopTime> = read_objects(data.as_bytes(), "stop_times.txt").unwrap();
        assert_eq!(1, stop_times.len());
        assert_eq!("s1", stop_times[0].stop_id);
        assert_eq!("08:01:00", stop_times[0].departure_time);
    }

    #[test]
    fn short_row() {
        let err = rows("a,b,c\n1,2,3\n4,5\n", &["a", "b", "c"]).unwrap_err();
        match err {
            Error::MalformedRow {
                line,
                expected,
                found,
                line_in_error,
                ..
            } => {
                assert_eq!(3, line);
                assert_eq!(3, expected);
                assert_eq!(2, found);
                assert_eq!(vec!["4", "5"], line_in_error.values);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn bom_and_spaces_in_header() {
        let data = "\u{feff}a, b\n1,2\n";
        let res = rows(data, &["a", "b"]).unwrap();
        assert_eq!(vec![(0, vec!["1".to_owned(), "2".to_owned()])], res);
    }

    #[test]
    fn values_are_kept_verbatim() {
        let data = "trip_id,arrival_time,departure_time,stop_id\n\
                    T1, 08:00:00,08:01:00 ,Aquarium\n";
        let stop_times: Vec<StopTime> = read_objects(data.as_bytes(), "stop_times.txt").unwrap();
        assert_eq!(" 08:00:00", stop_times[0].arrival_time);
        assert_eq!("08:01:00 ", stop_times[0].departure_time);
    }

    #[test]
    fn missing_optional_trailing_columns() {
        let data = "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
                    T1,08:00:00,08:01:00,Aquarium\n\
                    T1,08:05:00,08:06:00,Maverick,2\n";
        let stop_times: Vec<StopTime> = read_objects(data.as_bytes(), "stop_times.txt").unwrap();
        assert_eq!(2, stop_times.len());
        assert_eq!("Aquarium", stop_times[0].stop_id);
        assert_eq!("08:01:00", stop_times[0].departure_time);
        assert_eq!("Maverick", stop_times[1].stop_id);
    }

    #[test]
    fn fields_mapped_by_position() {
        let data = "route_id,service_id,trip_id,trip_headsign\nBlue,S1,T1,Bowdoin\n";
        let trips: Vec<Trip> = read_objects(data.as_bytes(), "trips.txt").unwrap();
        assert_eq!("Blue", trips[0].route_id);
        assert_eq!("S1", trips[0].service_id);
        assert_eq!("T1", trips[0].id);
    }

    #[test]
    fn empty_input() {
        assert!(matches!(rows("", &["a"]), Err(Error::EmptyFile(_))));
        assert!(matches!(rows("a", &["a"]), Ok(r) if r.is_empty()));
    }

    #[test]
    fn missing_file() {
        let err = load_table("fixtures/does_not_exist.txt", &["a"], |_, _| Ok(())).unwrap_err();
        assert!(matches!(err, Error::MissingFile(_)));
    }

    #[test]
    fn row_error_stops_reading() {
        let mut seen = 0;
        let err = read_table("a\n1\n2\n3\n".as_bytes(), "a.txt", &["a"], |_, ordinal| {
            seen += 1;
            if ordinal == 1 {
                Err(Error::ReferenceError("2".to_owned()))
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert_eq!(2, seen);
        assert!(matches!(err, Error::ReferenceError(_)));
    }
}
