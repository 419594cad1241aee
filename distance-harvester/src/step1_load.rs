//! Loads a coordinate set from a headerless `name,latitude,longitude` table.

use common::types::Coordinate;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::fmt::{self, Display};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

pub fn load_coordinates_file(path: &Path) -> Result<Vec<Coordinate>, LoadError> {
    let file = File::open(path)?;
    let coordinates = load_coordinates(file)?;

    debug!(target: "load", "Read {} coordinates from {path:?}", coordinates.len());

    Ok(coordinates)
}

/// Like [`load_coordinates_file`] but accepts any `Read` source.
///
/// Rows come back in source order. The first bad row fails the whole load.
pub fn load_coordinates<R: Read>(reader: R) -> Result<Vec<Coordinate>, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut coordinates = vec![];
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        // Blank lines are skipped by the reader, so count source lines, not records.
        let line = record.position().map(|p| p.line()).unwrap_or(idx as u64 + 1);

        coordinates.push(Coordinate {
            name: get_field(&record, line, Field::Name)?.to_string(),
            latitude: number(&record, line, Field::Latitude)?,
            longitude: number(&record, line, Field::Longitude)?,
        });
    }

    Ok(coordinates)
}

fn get_field(record: &StringRecord, line: u64, field: Field) -> Result<&str, LoadError> {
    record
        .get(field as usize)
        .ok_or(LoadError::MissingField { line, field })
}

fn number(record: &StringRecord, line: u64, field: Field) -> Result<f64, LoadError> {
    let value = get_field(record, line, field)?;
    f64::from_str(value).map_err(|_| LoadError::MalformedCoordinate {
        line,
        field,
        value: value.to_string(),
    })
}

/// Column positions of an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name = 0,
    Latitude = 1,
    Longitude = 2,
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
        };
        write!(f, "{}", name)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    File(#[from] io::Error),
    Csv(#[from] csv::Error),
    MalformedCoordinate { line: u64, field: Field, value: String },
    MissingField { line: u64, field: Field },
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::File(err) => write!(f, "{}", err),
            LoadError::Csv(err) => write!(f, "{}", err),
            LoadError::MalformedCoordinate { line, field, value } => {
                write!(f, "Line {}: {} '{}' is not a number", line, field, value)
            }
            LoadError::MissingField { line, field } => {
                write!(f, "Line {}: missing {} column", line, field)
            }
        }
    }
}
