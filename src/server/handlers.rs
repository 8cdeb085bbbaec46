use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::delivery::{config_warnings, DeliveryAddress, DeliveryAreaResolver, DeliveryConfig, DeliveryQuote};
use crate::geo::{format_coords, haversine_great_circle_distance_km, GeoPoint};
use crate::money::format_cents;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        api_error(rejection.status(), rejection.body_text())
    }
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ─── GET /api/quote ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct QuoteQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Serialize)]
pub struct QuoteResponse {
    pub store_id: String,
    pub mode: String,
    pub formatted_coords: String,
    #[serde(flatten)]
    pub quote: DeliveryQuote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_display: Option<String>,
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QuoteQuery>, QueryRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let Query(params) = params?;
    let order = require_point(params.lat, params.lon, "lat", "lon")?;

    let address = match (params.neighborhood, params.city, params.state) {
        (Some(neighborhood), Some(city), Some(state)) => Some(DeliveryAddress {
            neighborhood,
            city,
            state,
        }),
        (None, None, None) => None,
        _ => {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "Provide all of 'neighborhood', 'city' and 'state', or none",
            ))
        }
    };

    let resolver = DeliveryAreaResolver::new(&state.config);
    let quote = resolver.quote(order, address.as_ref());

    tracing::info!(
        store = %state.config.store_id,
        lat = order.latitude,
        lon = order.longitude,
        covered = quote.covered,
        fee_in_cents = ?quote.fee_in_cents,
        "quote"
    );

    Ok(Json(QuoteResponse {
        store_id: state.config.store_id.clone(),
        mode: resolver.mode().to_string(),
        formatted_coords: format_coords(order),
        fee_display: quote.fee_in_cents.map(format_cents),
        quote,
    }))
}

// ─── GET /api/distance ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct DistanceQuery {
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
}

#[derive(Serialize)]
pub struct DistanceResponse {
    pub distance_km: f64,
}

pub async fn distance(
    params: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let Query(params) = params?;
    let from = require_point(params.from_lat, params.from_lon, "from_lat", "from_lon")?;
    let to = require_point(params.to_lat, params.to_lon, "to_lat", "to_lon")?;
    Ok(Json(DistanceResponse {
        distance_km: haversine_great_circle_distance_km(from, to),
    }))
}

// ─── GET /api/areas ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct AreasResponse {
    #[serde(flatten)]
    pub config: DeliveryConfig,
    pub warnings: Vec<String>,
}

pub async fn areas(State(state): State<Arc<AppState>>) -> Json<AreasResponse> {
    Json(AreasResponse {
        config: state.config.clone(),
        warnings: config_warnings(&state.config).iter().map(ToString::to_string).collect(),
    })
}

// ─── Helpers ─────────────────────────────────────────────────────

fn require_point(lat: Option<f64>, lon: Option<f64>, lat_name: &str, lon_name: &str) -> Result<GeoPoint, ApiError> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Missing '{}' or '{}' parameter", lat_name, lon_name),
        ));
    };
    let point = GeoPoint::new(lat, lon);
    if !point.is_valid() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid coordinates. Lat: -90..90, Lon: -180..180",
        ));
    }
    Ok(point)
}
