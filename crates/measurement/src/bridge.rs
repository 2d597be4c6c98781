use std::sync::Arc;

use model::{
    geometry::{self, Geometry, Position},
    measurement::{FinalizedMeasurement, MeasurementKind},
    point::GeoPoint,
    remote::{CreateMeasurementRequest, GeoMeasurement},
    WithId,
};
use tokio::{runtime::Handle, task::JoinHandle};

use crate::store::{MeasurementStore, StoreResult};

/// Converts a point into a GeoJSON position (longitude first).
pub fn to_position(point: &GeoPoint) -> Position {
    geometry::position(point.lat_lng())
}

/// Distances become line strings, areas polygons with a single exterior
/// ring. The ring is not closed by repeating its first point.
pub fn to_geometry(measurement: &FinalizedMeasurement) -> Geometry {
    let coordinates = measurement.points.iter().map(to_position).collect();
    match measurement.kind {
        MeasurementKind::Distance => Geometry::LineString { coordinates },
        MeasurementKind::Area => Geometry::Polygon {
            coordinates: vec![coordinates],
        },
    }
}

/// Hands finished measurements of one project to a [`MeasurementStore`].
///
/// Saving is best effort: a failed save is logged and leaves the local
/// measurement alone.
#[derive(Clone)]
pub struct PersistenceBridge {
    project_id: String,
    store: Arc<dyn MeasurementStore>,
}

impl PersistenceBridge {
    pub fn new<S: Into<String>>(project_id: S, store: Arc<dyn MeasurementStore>) -> Self {
        Self {
            project_id: project_id.into(),
            store,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn to_request(&self, measurement: &FinalizedMeasurement) -> CreateMeasurementRequest {
        CreateMeasurementRequest {
            project_id: Some(self.project_id.clone()),
            measurement_type: measurement.kind,
            geometry: to_geometry(measurement),
            value: Some(measurement.value),
            unit: measurement.unit.symbol().to_owned(),
            description: Some(measurement.label.clone()),
            notes: None,
            measured_by: None,
        }
    }

    /// Starts saving `measurement` in the background without waiting for it.
    /// Returns `None` if there is no tokio runtime to run the save on.
    pub fn save(&self, measurement: &FinalizedMeasurement) -> Option<JoinHandle<()>> {
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(why) => {
                log::error!(
                    "Failed to save measurement {}: no async runtime ({})",
                    measurement.id,
                    why
                );
                return None;
            }
        };

        let request = self.to_request(measurement);
        let store = self.store.clone();
        let id = measurement.id.clone();
        Some(runtime.spawn(async move {
            match store.create(request).await {
                Ok(saved) => log::info!("Saved measurement {} as {}", id, saved.id),
                Err(why) => log::error!("Failed to save measurement {}: {}", id, why),
            }
        }))
    }

    /// Saves `measurement` and waits for the result, e.g. for a manual retry.
    pub async fn save_now(
        &self,
        measurement: &FinalizedMeasurement,
    ) -> StoreResult<WithId<GeoMeasurement>> {
        self.store.create(self.to_request(measurement)).await
    }
}
