use chrono::Local;
use measurement::store::{StoreError, StoreResult};
use model::{
    geometry::Geometry,
    measurement::MeasurementKind,
    remote::{CreateMeasurementRequest, GeoMeasurement, UpdateMeasurementRequest},
};

pub const DEFAULT_AUTHOR: &str = "system";

fn check_geometry(kind: MeasurementKind, geometry: &Geometry) -> StoreResult<()> {
    if geometry.kind() != kind {
        return Err(StoreError::Invalid(format!(
            "a {} measurement needs a {} geometry",
            kind,
            match kind {
                MeasurementKind::Distance => "LineString",
                MeasurementKind::Area => "Polygon",
            }
        )));
    }
    Ok(())
}

fn check_unit(unit: &str) -> StoreResult<()> {
    if unit.trim().is_empty() {
        return Err(StoreError::Invalid("the unit must not be empty".to_owned()));
    }
    Ok(())
}

/// A value of zero counts as missing, like an absent one.
fn value_or_measured(value: Option<f64>, geometry: &Geometry) -> f64 {
    value
        .filter(|value| *value != 0.0)
        .unwrap_or_else(|| geometry.measure())
}

pub(crate) fn new_record(request: CreateMeasurementRequest) -> StoreResult<GeoMeasurement> {
    check_geometry(request.measurement_type, &request.geometry)?;
    check_unit(&request.unit)?;

    Ok(GeoMeasurement {
        measurement_type: request.measurement_type,
        value: value_or_measured(request.value, &request.geometry),
        geometry: request.geometry,
        unit: request.unit,
        label: request.description,
        notes: request.notes,
        project_id: request.project_id,
        measured_by: request
            .measured_by
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_owned()),
        measured_at: Local::now(),
    })
}

/// Applies the fields present in `request`. A new geometry without a new
/// value has its value computed again.
pub(crate) fn updated_record(
    mut record: GeoMeasurement,
    request: UpdateMeasurementRequest,
) -> StoreResult<GeoMeasurement> {
    if let Some(project_id) = request.project_id {
        record.project_id = Some(project_id);
    }
    if let Some(kind) = request.measurement_type {
        record.measurement_type = kind;
    }
    if let Some(unit) = request.unit {
        check_unit(&unit)?;
        record.unit = unit;
    }
    if let Some(description) = request.description {
        record.label = Some(description);
    }
    if let Some(notes) = request.notes {
        record.notes = Some(notes);
    }
    match request.geometry {
        Some(geometry) => {
            record.value = value_or_measured(request.value, &geometry);
            record.geometry = geometry;
        }
        None => {
            if let Some(value) = request.value {
                record.value = value;
            }
        }
    }
    check_geometry(record.measurement_type, &record.geometry)?;
    Ok(record)
}
