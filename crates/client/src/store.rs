use async_trait::async_trait;
use measurement::store::{MeasurementStore, StoreResult};
use model::{
    remote::{
        CreateMeasurementRequest, GeoMeasurement, MeasurementFilter,
        UpdateMeasurementRequest,
    },
    WithId,
};
use utility::id::Id;

use crate::GeoMeasurementsClient;

#[async_trait]
impl MeasurementStore for GeoMeasurementsClient {
    async fn create(
        &self,
        request: CreateMeasurementRequest,
    ) -> StoreResult<WithId<GeoMeasurement>> {
        Ok(self.create_measurement(&request).await?)
    }

    async fn list(
        &self,
        filter: MeasurementFilter,
    ) -> StoreResult<Vec<WithId<GeoMeasurement>>> {
        Ok(self.get_measurements(&filter).await?)
    }

    async fn get(&self, id: Id<GeoMeasurement>) -> StoreResult<WithId<GeoMeasurement>> {
        Ok(self.get_measurement(&id).await?)
    }

    async fn update(
        &self,
        id: Id<GeoMeasurement>,
        request: UpdateMeasurementRequest,
    ) -> StoreResult<WithId<GeoMeasurement>> {
        Ok(self.update_measurement(&id, &request).await?)
    }

    async fn delete(&self, id: Id<GeoMeasurement>) -> StoreResult<()> {
        Ok(self.delete_measurement(&id).await?)
    }
}
