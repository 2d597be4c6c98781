use chrono::{DateTime, Local, TimeZone};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{
    geometry::{Geometry, Position},
    measurement::MeasurementKind,
    ExampleData,
};

/// A measurement as stored by the geo-measurements API.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GeoMeasurement {
    pub measurement_type: MeasurementKind,
    pub geometry: Geometry,
    pub value: f64,
    pub unit: String,
    pub label: Option<String>,
    pub notes: Option<String>,
    pub project_id: Option<String>,
    pub measured_by: String,
    pub measured_at: DateTime<Local>,
}

impl HasId for GeoMeasurement {
    type IdType = i32;
}

impl ExampleData for GeoMeasurement {
    fn example_data() -> Self {
        Self {
            measurement_type: MeasurementKind::Distance,
            geometry: Geometry::LineString {
                coordinates: vec![[10.1228, 54.3233], [10.1394, 54.3213]],
            },
            value: 1099.4,
            unit: "km".to_owned(),
            label: Some("1.10 km".to_owned()),
            notes: Some("trench along the main road".to_owned()),
            project_id: Some("c1a7e3c2-3e0f-4b8e-9f4e-5d1f0a2b7c11".to_owned()),
            measured_by: "system".to_owned(),
            measured_at: Local
                .with_ymd_and_hms(2024, 6, 3, 9, 30, 0)
                .single()
                .unwrap_or_else(Local::now),
        }
    }
}

/// Body of a create request. A missing value is computed from the geometry
/// by the receiving side.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CreateMeasurementRequest {
    pub project_id: Option<String>,
    pub measurement_type: MeasurementKind,
    pub geometry: Geometry,
    pub value: Option<f64>,
    pub unit: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub measured_by: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateMeasurementRequest {
    pub project_id: Option<String>,
    pub measurement_type: Option<MeasurementKind>,
    pub geometry: Option<Geometry>,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFilter {
    pub project_id: Option<String>,
    pub measurement_type: Option<MeasurementKind>,
    pub measured_by: Option<String>,
}

impl MeasurementFilter {
    pub fn project<S: Into<String>>(project_id: S) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, measurement: &GeoMeasurement) -> bool {
        let project = match &self.project_id {
            Some(project_id) => measurement.project_id.as_ref() == Some(project_id),
            None => true,
        };
        let kind = self
            .measurement_type
            .map_or(true, |kind| measurement.measurement_type == kind);
        let author = self
            .measured_by
            .as_ref()
            .map_or(true, |author| &measurement.measured_by == author);
        project && kind && author
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistanceRequest {
    pub coordinates: Vec<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DistanceResponse {
    pub distance_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AreaRequest {
    pub coordinates: Vec<Vec<Position>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AreaResponse {
    pub area_square_meters: f64,
}
