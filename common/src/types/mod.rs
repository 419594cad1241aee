pub mod config;

/// A named point as read from one of the input tables.
///
/// Identity is positional within the loaded sequence, so `name` does not have to be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }
}

/// Driving distance in meters between one start and one end coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRecord {
    pub start_name: String,
    pub end_name: String,
    pub distance_meters: f64,
}
