use std::env;

use model::{
    geometry::Position,
    remote::{
        AreaRequest, AreaResponse, CreateMeasurementRequest, DistanceRequest,
        DistanceResponse, GeoMeasurement, MeasurementFilter, UpdateMeasurementRequest,
    },
    WithId,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utility::id::Id;

use crate::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl ApiConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
        }
    }

    /// Reads `COMETA_API_URL` and `COMETA_API_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("COMETA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned()),
            auth_token: env::var("COMETA_API_TOKEN").ok().filter(|token| !token.is_empty()),
        }
    }

    pub fn with_auth_token<S: Into<String>>(mut self, token: S) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}

/// Client for the `/api/geo-measurements` resource.
#[derive(Clone, Debug)]
pub struct GeoMeasurementsClient {
    config: ApiConfig,
    endpoint: String,
    http: reqwest::Client,
}

/// Picks the human readable part of an error body.
fn error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| value.get(*key)?.as_str().map(str::to_owned))
}

impl GeoMeasurementsClient {
    pub fn new(config: ApiConfig) -> Self {
        let endpoint = format!(
            "{}/api/geo-measurements",
            config.base_url.trim_end_matches('/')
        );
        Self {
            config,
            endpoint,
            http: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.config.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        url: String,
    ) -> Result<reqwest::Response, ApiError> {
        log::debug!("Requesting '{url}'.");
        let response = builder.send().await?;
        let status_code = response.status();
        if status_code.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| error_message(&body));
        Err(ApiError::InvalidResponse {
            status_code,
            url,
            message,
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        url: String,
    ) -> Result<T, ApiError> {
        let response = self.send(builder, url).await?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    pub async fn get_measurements(
        &self,
        filter: &MeasurementFilter,
    ) -> Result<Vec<WithId<GeoMeasurement>>, ApiError> {
        let url = self.url("");
        let builder = self.request(reqwest::Method::GET, &url).query(filter);
        self.json(builder, url).await
    }

    pub async fn get_measurement(
        &self,
        id: &Id<GeoMeasurement>,
    ) -> Result<WithId<GeoMeasurement>, ApiError> {
        let url = self.url(&format!("/{id}"));
        let builder = self.request(reqwest::Method::GET, &url);
        self.json(builder, url).await
    }

    pub async fn create_measurement(
        &self,
        request: &CreateMeasurementRequest,
    ) -> Result<WithId<GeoMeasurement>, ApiError> {
        let url = self.url("");
        let builder = self.request(reqwest::Method::POST, &url).json(request);
        self.json(builder, url).await
    }

    pub async fn update_measurement(
        &self,
        id: &Id<GeoMeasurement>,
        request: &UpdateMeasurementRequest,
    ) -> Result<WithId<GeoMeasurement>, ApiError> {
        let url = self.url(&format!("/{id}"));
        let builder = self.request(reqwest::Method::PATCH, &url).json(request);
        self.json(builder, url).await
    }

    pub async fn delete_measurement(&self, id: &Id<GeoMeasurement>) -> Result<(), ApiError> {
        let url = self.url(&format!("/{id}"));
        let builder = self.request(reqwest::Method::DELETE, &url);
        self.send(builder, url).await?;
        Ok(())
    }

    /// Length of a line in meters, computed by the service.
    pub async fn calculate_distance(&self, coordinates: Vec<Position>) -> Result<f64, ApiError> {
        let url = self.url("/calculate/distance");
        let builder = self
            .request(reqwest::Method::POST, &url)
            .json(&DistanceRequest { coordinates });
        let response: DistanceResponse = self.json(builder, url).await?;
        Ok(response.distance_meters)
    }

    /// Area of a polygon in square meters, computed by the service.
    pub async fn calculate_area(&self, coordinates: Vec<Vec<Position>>) -> Result<f64, ApiError> {
        let url = self.url("/calculate/area");
        let builder = self
            .request(reqwest::Method::POST, &url)
            .json(&AreaRequest { coordinates });
        let response: AreaResponse = self.json(builder, url).await?;
        Ok(response.area_square_meters)
    }
}
