use std::fmt;

use model::{
    measurement::{DisplayUnit, MeasurementKind},
    point::GeoPoint,
};
use serde::Serialize;
use utility::geo;

/// Distances from this many meters on are shown in kilometers.
pub const KILOMETER_THRESHOLD: f64 = 1000.0;
/// Areas from this many square meters on are shown in hectares.
pub const HECTARE_THRESHOLD: f64 = 10_000.0;

/// A measurement value ready for display. `value` is already rounded to the
/// number of decimals its unit is shown with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedValue {
    pub value: String,
    pub unit: DisplayUnit,
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

pub fn format_measurement(value: f64, kind: MeasurementKind) -> FormattedValue {
    let (value, unit) = match kind {
        MeasurementKind::Distance if value < KILOMETER_THRESHOLD => {
            (format!("{:.1}", value), DisplayUnit::Meters)
        }
        MeasurementKind::Distance => (
            format!("{:.2}", value / KILOMETER_THRESHOLD),
            DisplayUnit::Kilometers,
        ),
        MeasurementKind::Area if value < HECTARE_THRESHOLD => {
            (format!("{:.1}", value), DisplayUnit::SquareMeters)
        }
        MeasurementKind::Area => (
            format!("{:.2}", value / HECTARE_THRESHOLD),
            DisplayUnit::Hectares,
        ),
    };
    FormattedValue { value, unit }
}

/// Raw value of a point sequence: path length for distances, enclosed area
/// for areas.
pub fn measure(kind: MeasurementKind, points: &[GeoPoint]) -> f64 {
    match kind {
        MeasurementKind::Distance => geo::polyline_length_meters(points),
        MeasurementKind::Area => geo::polygon_area_square_meters(points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(value: f64, kind: MeasurementKind) -> (String, DisplayUnit) {
        let formatted = format_measurement(value, kind);
        (formatted.value, formatted.unit)
    }

    #[test]
    fn distance_switches_to_kilometers_at_1000() {
        assert_eq!(
            formatted(999.0, MeasurementKind::Distance),
            ("999.0".to_owned(), DisplayUnit::Meters)
        );
        assert_eq!(
            formatted(1000.0, MeasurementKind::Distance),
            ("1.00".to_owned(), DisplayUnit::Kilometers)
        );
        assert_eq!(
            formatted(877_463.0, MeasurementKind::Distance),
            ("877.46".to_owned(), DisplayUnit::Kilometers)
        );
    }

    #[test]
    fn area_switches_to_hectares_at_10000() {
        assert_eq!(
            formatted(9999.0, MeasurementKind::Area).1,
            DisplayUnit::SquareMeters
        );
        assert_eq!(
            formatted(10_000.0, MeasurementKind::Area),
            ("1.00".to_owned(), DisplayUnit::Hectares)
        );
        assert_eq!(
            formatted(12.34, MeasurementKind::Area),
            ("12.3".to_owned(), DisplayUnit::SquareMeters)
        );
    }

    #[test]
    fn keeps_trailing_zeros() {
        assert_eq!(formatted(0.0, MeasurementKind::Distance).0, "0.0");
        assert_eq!(formatted(20_000.0, MeasurementKind::Area).0, "2.00");
    }

    #[test]
    fn label_is_value_and_unit() {
        let formatted = format_measurement(1500.0, MeasurementKind::Distance);
        assert_eq!(formatted.to_string(), "1.50 km");
        let formatted = format_measurement(25.0, MeasurementKind::Area);
        assert_eq!(formatted.to_string(), "25.0 m²");
    }
}
