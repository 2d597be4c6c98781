use std::{error, fmt, result};

use async_trait::async_trait;
use model::{
    remote::{
        CreateMeasurementRequest, GeoMeasurement, MeasurementFilter,
        UpdateMeasurementRequest,
    },
    WithId,
};
use utility::id::Id;

#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Invalid(String),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl StoreError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl error::Error for StoreError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "The requested measurement does not exist."),
            Self::Invalid(why) => write!(f, "Invalid measurement: {}", why),
            Self::Other(why) => write!(f, "{}", why),
        }
    }
}

pub type StoreResult<T> = result::Result<T, StoreError>;

/// Somewhere finished measurements can be persisted to.
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    async fn create(
        &self,
        request: CreateMeasurementRequest,
    ) -> StoreResult<WithId<GeoMeasurement>>;

    async fn list(
        &self,
        filter: MeasurementFilter,
    ) -> StoreResult<Vec<WithId<GeoMeasurement>>>;

    async fn get(&self, id: Id<GeoMeasurement>) -> StoreResult<WithId<GeoMeasurement>>;

    async fn update(
        &self,
        id: Id<GeoMeasurement>,
        request: UpdateMeasurementRequest,
    ) -> StoreResult<WithId<GeoMeasurement>>;

    async fn delete(&self, id: Id<GeoMeasurement>) -> StoreResult<()>;
}
