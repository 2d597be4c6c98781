use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo::Coordinate,
    id::{HasId, Id},
};

/// A raw map position, as delivered by click events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Coordinate for LatLng {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lng(&self) -> f64 {
        self.lng
    }
}

/// A point placed by the user while measuring. The id is only unique within
/// the session that issued it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub id: Id<GeoPoint>,
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(id: Id<GeoPoint>, position: LatLng) -> Self {
        Self {
            id,
            lat: position.lat,
            lng: position.lng,
        }
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

impl HasId for GeoPoint {
    type IdType = String;
}

impl Coordinate for GeoPoint {
    fn lat(&self) -> f64 {
        self.lat
    }

    fn lng(&self) -> f64 {
        self.lng
    }
}
