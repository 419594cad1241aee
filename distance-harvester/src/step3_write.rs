//! Appends resolved distances to the output table, one batch per start coordinate.

use common::types::config::OutputMode;
use common::types::DistanceRecord;
use csv::{Writer, WriterBuilder};
use log::debug;
use std::fmt::{self, Display};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Write-only handle on the output table. Assumes it is the only writer.
pub struct ResultSink {
    writer: Writer<File>,
}

impl ResultSink {
    pub fn open(path: &Path, mode: OutputMode) -> Result<Self, WriteError> {
        let mut options = OpenOptions::new();
        match mode {
            OutputMode::Truncate => options.write(true).truncate(true),
            OutputMode::Append => options.append(true),
        };
        let file = options.create(true).open(path)?;

        debug!(target: "write", "Opened {path:?} ({mode:?})");

        Ok(Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(file),
        })
    }

    /// Writes one `start,end,distance` row per record and flushes before returning.
    pub fn append(&mut self, distances: &[DistanceRecord]) -> Result<(), WriteError> {
        for distance in distances {
            self.writer.write_record([
                distance.start_name.as_str(),
                distance.end_name.as_str(),
                format_distance(distance.distance_meters).as_str(),
            ])?;
        }
        self.writer.flush()?;

        Ok(())
    }
}

// Fixed-point with six decimals; `{:.6}` never switches to exponent notation.
pub fn format_distance(meters: f64) -> String {
    format!("{:.6}", meters)
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    File(#[from] io::Error),
    Csv(#[from] csv::Error),
}

impl Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let err: &dyn Display = match self {
            WriteError::File(err) => err,
            WriteError::Csv(err) => err,
        };
        write!(f, "{}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::read_to_string;
    use tempfile::tempdir;

    fn record(start: &str, end: &str, distance_meters: f64) -> DistanceRecord {
        DistanceRecord {
            start_name: start.to_string(),
            end_name: end.to_string(),
            distance_meters,
        }
    }

    #[test]
    fn test_rows_fixed_point() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.csv");

        let mut sink = ResultSink::open(&path, OutputMode::Truncate).unwrap();
        sink.append(&[record("A", "B", 1000.0), record("A", "C", 2000.0)]).unwrap();

        assert_eq!("A,B,1000.000000\nA,C,2000.000000\n", read_to_string(&path).unwrap());
    }

    #[test]
    fn test_flushed_after_each_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.csv");

        let mut sink = ResultSink::open(&path, OutputMode::Truncate).unwrap();
        sink.append(&[record("A", "B", 1.0)]).unwrap();
        assert_eq!("A,B,1.000000\n", read_to_string(&path).unwrap());

        sink.append(&[record("B", "B", 0.0)]).unwrap();
        assert_eq!("A,B,1.000000\nB,B,0.000000\n", read_to_string(&path).unwrap());
    }

    #[test]
    fn test_no_scientific_notation() {
        assert_eq!("0.000001", format_distance(1e-6));
        assert_eq!("100000000000000000000.000000", format_distance(1e20));
    }

    #[test]
    fn test_format_round_trip() {
        for meters in [0.0, 0.5, 1234.5678, 98765.4321, 40_075_016.686] {
            let parsed: f64 = format_distance(meters).parse().unwrap();
            assert!((parsed - meters).abs() < 1e-6, "{meters} came back as {parsed}");
        }
    }

    #[test]
    fn test_names_with_commas_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.csv");

        let mut sink = ResultSink::open(&path, OutputMode::Truncate).unwrap();
        sink.append(&[record("Berlin, Mitte", "B", 2.0)]).unwrap();

        assert_eq!("\"Berlin, Mitte\",B,2.000000\n", read_to_string(&path).unwrap());
    }

    #[test]
    fn test_truncate_discards_previous_run() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.csv");
        std::fs::write(&path, "old,row,1.000000\n").unwrap();

        let mut sink = ResultSink::open(&path, OutputMode::Truncate).unwrap();
        sink.append(&[record("A", "B", 3.0)]).unwrap();

        assert_eq!("A,B,3.000000\n", read_to_string(&path).unwrap());
    }

    #[test]
    fn test_append_accumulates_across_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.csv");
        let batch = [record("A", "B", 1000.0), record("A", "C", 2000.0)];

        for _ in 0..2 {
            let mut sink = ResultSink::open(&path, OutputMode::Append).unwrap();
            sink.append(&batch).unwrap();
        }

        assert_eq!(
            "A,B,1000.000000\nA,C,2000.000000\nA,B,1000.000000\nA,C,2000.000000\n",
            read_to_string(&path).unwrap()
        );
    }

    #[test]
    fn test_empty_batch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("distances.csv");

        let mut sink = ResultSink::open(&path, OutputMode::Truncate).unwrap();
        sink.append(&[]).unwrap();

        assert!(path.exists());
        assert_eq!("", read_to_string(&path).unwrap());
    }
}
