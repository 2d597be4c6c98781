use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{Method, StatusCode, Uri},
    routing::{get, on, post},
    Json, Router,
};
use model::{
    geometry::Geometry,
    remote::{
        AreaRequest, AreaResponse, CreateMeasurementRequest, DistanceRequest,
        DistanceResponse, GeoMeasurement, MeasurementFilter, UpdateMeasurementRequest,
    },
    WithId,
};
use utility::id::Id;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(list_measurements).post(create_measurement))
        .route("/schema", get(schema::<GeoMeasurement>))
        .route("/calculate/distance", post(calculate_distance))
        .route("/calculate/area", post(calculate_area))
        .route(
            "/:id",
            get(get_measurement)
                .patch(update_measurement)
                .delete(delete_measurement),
        )
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Turns any rejection or store error into an error response for `method`
/// on `uri`.
fn annotated<E: Into<RouteErrorResponse>>(
    method: Method,
    uri: &Uri,
) -> impl Fn(E) -> RouteErrorResponse + '_ {
    move |why| why.into().with_method(&method).with_uri(uri.path())
}

async fn list_measurements(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState>,
    filter: Result<Query<MeasurementFilter>, QueryRejection>,
) -> RouteResult<Json<Vec<WithId<GeoMeasurement>>>> {
    let Query(filter) = filter.map_err(annotated(Method::GET, &original_uri))?;
    let measurements = store
        .list(filter)
        .await
        .map_err(annotated(Method::GET, &original_uri))?;
    Ok(Json(measurements))
}

async fn create_measurement(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState>,
    payload: Result<Json<CreateMeasurementRequest>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<WithId<GeoMeasurement>>)> {
    let Json(request) = payload.map_err(annotated(Method::POST, &original_uri))?;
    let created = store
        .create(request)
        .await
        .map_err(annotated(Method::POST, &original_uri))?;
    log::info!(
        "Created {} measurement {}.",
        created.content.measurement_type,
        created.id
    );
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_measurement(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState>,
    id: Result<Path<i32>, PathRejection>,
) -> RouteResult<Json<WithId<GeoMeasurement>>> {
    let Path(id) = id.map_err(annotated(Method::GET, &original_uri))?;
    let measurement = store
        .get(Id::new(id))
        .await
        .map_err(annotated(Method::GET, &original_uri))?;
    Ok(Json(measurement))
}

async fn update_measurement(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateMeasurementRequest>, JsonRejection>,
) -> RouteResult<Json<WithId<GeoMeasurement>>> {
    let Path(id) = id.map_err(annotated(Method::PATCH, &original_uri))?;
    let Json(request) = payload.map_err(annotated(Method::PATCH, &original_uri))?;
    let updated = store
        .update(Id::new(id), request)
        .await
        .map_err(annotated(Method::PATCH, &original_uri))?;
    Ok(Json(updated))
}

async fn delete_measurement(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { store }): State<WebState>,
    id: Result<Path<i32>, PathRejection>,
) -> RouteResult<StatusCode> {
    let Path(id) = id.map_err(annotated(Method::DELETE, &original_uri))?;
    store
        .delete(Id::new(id))
        .await
        .map_err(annotated(Method::DELETE, &original_uri))?;
    log::info!("Deleted measurement {}.", id);
    Ok(StatusCode::NO_CONTENT)
}

async fn calculate_distance(
    OriginalUri(original_uri): OriginalUri,
    payload: Result<Json<DistanceRequest>, JsonRejection>,
) -> RouteResult<Json<DistanceResponse>> {
    let Json(request) = payload.map_err(annotated(Method::POST, &original_uri))?;
    let line = Geometry::LineString {
        coordinates: request.coordinates,
    };
    Ok(Json(DistanceResponse {
        distance_meters: line.measure(),
    }))
}

async fn calculate_area(
    OriginalUri(original_uri): OriginalUri,
    payload: Result<Json<AreaRequest>, JsonRejection>,
) -> RouteResult<Json<AreaResponse>> {
    let Json(request) = payload.map_err(annotated(Method::POST, &original_uri))?;
    let polygon = Geometry::Polygon {
        coordinates: request.coordinates,
    };
    Ok(Json(AreaResponse {
        area_square_meters: polygon.measure(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use database::MemoryDatabase;
    use model::measurement::MeasurementKind;

    use super::*;

    fn state() -> WebState {
        WebState {
            store: Arc::new(MemoryDatabase::new()),
        }
    }

    fn uri() -> OriginalUri {
        OriginalUri(Uri::from_static("/api/geo-measurements"))
    }

    fn line_request() -> CreateMeasurementRequest {
        CreateMeasurementRequest {
            project_id: Some("p1".to_owned()),
            measurement_type: MeasurementKind::Distance,
            geometry: Geometry::LineString {
                coordinates: vec![[10.0, 54.0], [10.001, 54.0]],
            },
            value: None,
            unit: "m".to_owned(),
            description: Some("65.4 m".to_owned()),
            notes: None,
            measured_by: None,
        }
    }

    #[tokio::test]
    async fn create_answers_created_with_computed_value() {
        let state = state();
        let (status, Json(created)) =
            create_measurement(uri(), State(state.clone()), Ok(Json(line_request())))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.content.value > 60.0 && created.content.value < 70.0);
        assert_eq!(created.content.measured_by, database::DEFAULT_AUTHOR);

        let Json(listed) = list_measurements(
            uri(),
            State(state),
            Ok(Query(MeasurementFilter::project("p1"))),
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn mismatched_geometry_is_a_bad_request() {
        let mut request = line_request();
        request.measurement_type = MeasurementKind::Area;
        let error = create_measurement(uri(), State(state()), Ok(Json(request)))
            .await
            .unwrap_err();
        assert_eq!(error.status_code, StatusCode::BAD_REQUEST);
        assert_eq!(error.http_method.as_deref(), Some("POST"));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let error = get_measurement(uri(), State(state()), Ok(Path(12)))
            .await
            .unwrap_err();
        assert_eq!(error.status_code, StatusCode::NOT_FOUND);

        let error = delete_measurement(uri(), State(state()), Ok(Path(12)))
            .await
            .unwrap_err();
        assert_eq!(error.status_code, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_answers_no_content() {
        let state = state();
        let (_, Json(created)) =
            create_measurement(uri(), State(state.clone()), Ok(Json(line_request())))
                .await
                .unwrap();
        let status = delete_measurement(uri(), State(state.clone()), Ok(Path(created.id.raw())))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(get_measurement(uri(), State(state), Ok(Path(created.id.raw())))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn calculations_use_the_geometry_helpers() {
        let Json(distance) = calculate_distance(
            uri(),
            Ok(Json(DistanceRequest {
                coordinates: vec![[0.0, 0.0]],
            })),
        )
        .await
        .unwrap();
        assert_eq!(distance.distance_meters, 0.0);

        let Json(area) = calculate_area(
            uri(),
            Ok(Json(AreaRequest {
                coordinates: vec![vec![[0.0, 0.0], [0.01, 0.0], [0.01, 0.01], [0.0, 0.01]]],
            })),
        )
        .await
        .unwrap();
        assert!((area.area_square_meters - 1_239_200.0).abs() < 2_000.0);
    }
}
