use std::{cmp::Reverse, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use measurement::store::{MeasurementStore, StoreError, StoreResult};
use model::{
    remote::{
        CreateMeasurementRequest, GeoMeasurement, MeasurementFilter,
        UpdateMeasurementRequest,
    },
    WithId,
};
use tokio::sync::RwLock;
use utility::id::Id;

mod records;

pub use records::DEFAULT_AUTHOR;

#[derive(Default)]
struct Tables {
    last_id: i32,
    measurements: IndexMap<i32, GeoMeasurement>,
}

/// Keeps measurements in memory. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tables.read().await.measurements.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MeasurementStore for MemoryDatabase {
    async fn create(
        &self,
        request: CreateMeasurementRequest,
    ) -> StoreResult<WithId<GeoMeasurement>> {
        let record = records::new_record(request)?;
        let mut tables = self.tables.write().await;
        tables.last_id += 1;
        let id = tables.last_id;
        tables.measurements.insert(id, record.clone());
        log::debug!("created {} measurement {}", record.measurement_type, id);
        Ok(WithId::new(Id::new(id), record))
    }

    async fn list(
        &self,
        filter: MeasurementFilter,
    ) -> StoreResult<Vec<WithId<GeoMeasurement>>> {
        let tables = self.tables.read().await;
        let mut result = tables
            .measurements
            .iter()
            .filter(|(_, measurement)| filter.matches(measurement))
            .map(|(id, measurement)| WithId::new(Id::new(*id), measurement.clone()))
            .collect::<Vec<_>>();
        // newest first
        result.sort_by_key(|entry| Reverse((entry.content.measured_at, entry.id.raw())));
        Ok(result)
    }

    async fn get(&self, id: Id<GeoMeasurement>) -> StoreResult<WithId<GeoMeasurement>> {
        self.tables
            .read()
            .await
            .measurements
            .get(&id.raw())
            .cloned()
            .map(|measurement| WithId::new(id, measurement))
            .ok_or(StoreError::NotFound)
    }

    async fn update(
        &self,
        id: Id<GeoMeasurement>,
        request: UpdateMeasurementRequest,
    ) -> StoreResult<WithId<GeoMeasurement>> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .measurements
            .get_mut(&id.raw())
            .ok_or(StoreError::NotFound)?;
        let updated = records::updated_record(entry.clone(), request)?;
        *entry = updated.clone();
        Ok(WithId::new(id, updated))
    }

    async fn delete(&self, id: Id<GeoMeasurement>) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .measurements
            .shift_remove(&id.raw())
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use model::{geometry::Geometry, measurement::MeasurementKind};

    use super::*;

    fn request(project_id: &str, kind: MeasurementKind) -> CreateMeasurementRequest {
        let geometry = match kind {
            MeasurementKind::Distance => Geometry::LineString {
                coordinates: vec![[0.0, 0.0], [0.01, 0.0]],
            },
            MeasurementKind::Area => Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0], [0.01, 0.0], [0.01, 0.01]]],
            },
        };
        CreateMeasurementRequest {
            project_id: Some(project_id.to_owned()),
            measurement_type: kind,
            geometry,
            value: None,
            unit: "m".to_owned(),
            description: None,
            notes: None,
            measured_by: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let database = MemoryDatabase::new();
        let created = database
            .create(request("p1", MeasurementKind::Distance))
            .await
            .unwrap();
        let fetched = database.get(created.id.clone()).await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.content, created.content);
        assert!(created.content.value > 1000.0);
    }

    #[tokio::test]
    async fn ids_are_not_reused() {
        let database = MemoryDatabase::new();
        let first = database
            .create(request("p1", MeasurementKind::Distance))
            .await
            .unwrap();
        database.delete(first.id.clone()).await.unwrap();
        let second = database
            .create(request("p1", MeasurementKind::Distance))
            .await
            .unwrap();
        assert_ne!(first.id, second.id);
        assert!(matches!(
            database.get(first.id).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_filters_and_orders_newest_first() {
        let database = MemoryDatabase::new();
        for (project, kind) in [
            ("p1", MeasurementKind::Distance),
            ("p2", MeasurementKind::Distance),
            ("p1", MeasurementKind::Area),
        ] {
            database.create(request(project, kind)).await.unwrap();
        }

        let all = database.list(MeasurementFilter::default()).await.unwrap();
        let ids = all.iter().map(|entry| entry.id.raw()).collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 2, 1]);

        let p1 = database.list(MeasurementFilter::project("p1")).await.unwrap();
        assert_eq!(p1.len(), 2);

        let areas = database
            .list(MeasurementFilter {
                measurement_type: Some(MeasurementKind::Area),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].id.raw(), 3);
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids() {
        let database = MemoryDatabase::new();
        assert!(matches!(
            database
                .update(Id::new(7), UpdateMeasurementRequest::default())
                .await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            database.delete(Id::new(7)).await,
            Err(StoreError::NotFound)
        ));
        assert!(database.is_empty().await);
    }

    #[tokio::test]
    async fn update_changes_given_fields() {
        let database = MemoryDatabase::new();
        let created = database
            .create(request("p1", MeasurementKind::Area))
            .await
            .unwrap();
        let updated = database
            .update(
                created.id.clone(),
                UpdateMeasurementRequest {
                    notes: Some("north field".to_owned()),
                    value: Some(5.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content.notes.as_deref(), Some("north field"));
        assert_eq!(updated.content.value, 5.0);
        assert_eq!(database.get(created.id).await.unwrap().content, updated.content);
    }
}
