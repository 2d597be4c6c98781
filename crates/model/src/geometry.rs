use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

use crate::{measurement::MeasurementKind, point::LatLng};

/// A GeoJSON position: longitude first, then latitude.
pub type Position = [f64; 2];

/// The GeoJSON geometries used to store measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<Position> },
    Polygon { coordinates: Vec<Vec<Position>> },
}

/// Converts a map position into a GeoJSON position. GeoJSON puts the
/// longitude first.
pub fn position(lat_lng: LatLng) -> Position {
    [lat_lng.lng, lat_lng.lat]
}

/// Inverse of [`position`].
pub fn lat_lng(position: &Position) -> LatLng {
    LatLng::new(position[1], position[0])
}

impl Geometry {
    pub fn kind(&self) -> MeasurementKind {
        match self {
            Self::LineString { .. } => MeasurementKind::Distance,
            Self::Polygon { .. } => MeasurementKind::Area,
        }
    }

    /// Length of a line string in meters, or area of a polygon's exterior ring
    /// in square meters. Holes are not subtracted.
    pub fn measure(&self) -> f64 {
        match self {
            Self::LineString { coordinates } => {
                let points = coordinates.iter().map(lat_lng).collect::<Vec<_>>();
                geo::polyline_length_meters(&points)
            }
            Self::Polygon { coordinates } => match coordinates.first() {
                Some(ring) => {
                    let points = ring.iter().map(lat_lng).collect::<Vec<_>>();
                    geo::polygon_area_square_meters(&points)
                }
                None => 0.0,
            },
        }
    }
}
