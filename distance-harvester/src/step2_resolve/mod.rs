//! Resolves the driving distance from one start coordinate to every end coordinate.
//!
//! Pairs are resolved one after another; a request is only sent once the previous
//! response has been handled. A body that cannot be parsed only drops its pair.
//! Transport failures and responses without any route abort the whole run.

mod osrm;

pub use osrm::OsrmClient;

use async_trait::async_trait;
use common::types::{Coordinate, DistanceRecord};
use indicatif::ProgressBar;
use log::{debug, error};
use serde::Deserialize;
use std::fmt::{self, Display};

/// Source of raw routing responses for a single pair.
#[async_trait]
pub trait RoutingBackend: Send + Sync {
    /// Returns the response body for a route from `from` to `to`, whatever its status.
    async fn fetch_route(&self, from: &Coordinate, to: &Coordinate) -> Result<String, TransportError>;
}

/// The part of an OSRM route response that is actually read.
#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    distance: f64,
}

pub async fn resolve_distances<B: RoutingBackend + ?Sized>(
    backend: &B,
    start: &Coordinate,
    ends: &[Coordinate],
    pb: &ProgressBar,
) -> Result<Vec<DistanceRecord>, ResolveError> {
    let mut distances = Vec::with_capacity(ends.len());

    for (idx, end) in ends.iter().enumerate() {
        debug!(target: "resolve", "Getting distance of location {}/{}...", idx + 1, ends.len());

        let body = backend.fetch_route(start, end).await?;

        match extract_distance(&body) {
            Ok(distance_meters) => distances.push(DistanceRecord {
                start_name: start.name.clone(),
                end_name: end.name.clone(),
                distance_meters,
            }),
            Err(ExtractError::Parse(err)) => {
                error!(target: "resolve", "Skipping {} -> {}: {}", start.name, end.name, err);
                debug!(target: "resolve", "Response body: {}", body);
            }
            Err(ExtractError::EmptyRouteList { code, message }) => {
                return Err(ResolveError::EmptyRouteList {
                    start: start.name.clone(),
                    end: end.name.clone(),
                    code,
                    message,
                });
            }
        }

        pb.inc(1);
    }

    Ok(distances)
}

/// Distance in meters of the first route in an OSRM response body.
pub fn extract_distance(body: &str) -> Result<f64, ExtractError> {
    let response: RouteResponse = serde_json::from_str(body)?;

    match response.routes.first() {
        Some(route) => Ok(route.distance),
        None => Err(ExtractError::EmptyRouteList {
            code: response.code,
            message: response.message,
        }),
    }
}

#[derive(thiserror::Error, Debug)]
pub struct TransportError(#[from] pub reqwest::Error);

impl Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Routing backend unreachable: {}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    Parse(#[from] serde_json::Error),
    EmptyRouteList { code: String, message: Option<String> },
}

impl Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtractError::Parse(err) => write!(f, "Malformed response: {}", err),
            ExtractError::EmptyRouteList { code, message } => {
                write!(f, "No route returned (code '{}')", code)?;
                if let Some(message) = message {
                    write!(f, ": {}", message)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    Transport(#[from] TransportError),
    EmptyRouteList {
        start: String,
        end: String,
        code: String,
        message: Option<String>,
    },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResolveError::Transport(err) => write!(f, "{}", err),
            ResolveError::EmptyRouteList { start, end, code, message } => {
                write!(f, "No route from '{}' to '{}' (code '{}')", start, end, code)?;
                if let Some(message) = message {
                    write!(f, ": {}", message)?;
                }
                Ok(())
            }
        }
    }
}
