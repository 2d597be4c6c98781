use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::point::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    #[default]
    None,
    Distance,
    Area,
}

impl MeasurementMode {
    pub fn kind(self) -> Option<MeasurementKind> {
        match self {
            Self::None => None,
            Self::Distance => Some(MeasurementKind::Distance),
            Self::Area => Some(MeasurementKind::Area),
        }
    }
}

impl From<MeasurementKind> for MeasurementMode {
    fn from(kind: MeasurementKind) -> Self {
        match kind {
            MeasurementKind::Distance => Self::Distance,
            MeasurementKind::Area => Self::Area,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Distance,
    Area,
}

impl MeasurementKind {
    /// Number of points needed before a measurement of this kind can be finished.
    pub fn min_points(self) -> usize {
        match self {
            Self::Distance => 2,
            Self::Area => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Area => "area",
        }
    }
}

impl fmt::Display for MeasurementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit a measurement is shown in, picked by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayUnit {
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "m²")]
    SquareMeters,
    #[serde(rename = "ha")]
    Hectares,
}

impl DisplayUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::SquareMeters => "m²",
            Self::Hectares => "ha",
        }
    }
}

impl fmt::Display for DisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A completed measurement. Never changes after it was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedMeasurement {
    pub id: Id<FinalizedMeasurement>,
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
    pub points: Vec<GeoPoint>,
    /// meters or square meters
    pub value: f64,
    pub unit: DisplayUnit,
    pub label: String,
}

impl HasId for FinalizedMeasurement {
    type IdType = String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_serialize_as_symbols() {
        let units = [
            DisplayUnit::Meters,
            DisplayUnit::Kilometers,
            DisplayUnit::SquareMeters,
            DisplayUnit::Hectares,
        ];
        for unit in units {
            assert_eq!(
                serde_json::to_string(&unit).unwrap(),
                format!("\"{}\"", unit.symbol())
            );
        }
    }

    #[test]
    fn modes_map_to_kinds() {
        assert_eq!(MeasurementMode::None.kind(), None);
        assert_eq!(
            MeasurementMode::Area.kind(),
            Some(MeasurementKind::Area)
        );
        assert_eq!(
            MeasurementMode::from(MeasurementKind::Distance),
            MeasurementMode::Distance
        );
        let mode: MeasurementMode = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(mode, MeasurementMode::None);
    }
}
