use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, header},
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

use super::{ApiError, AppState, assets};
use crate::db::NewScanEvent;

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub pharmacy_public_id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub raw_qr: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub ok: bool,
    pub scan_id: i64,
}

/// GET /
///
/// Landing page: shows the QR scanner immediately, no login required.
pub async fn scanner_page() -> Response {
    assets::page("scan.html")
}

/// POST /api/scan
///
/// Receives scan data from the browser after QR detection, resolves the
/// pharmacy by its opaque public token and logs the event. Coordinates and
/// the raw QR text are passed through unvalidated on purpose.
pub async fn submit_scan(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ScanRequest>,
) -> Result<Json<ScanResponse>, ApiError> {
    let public_id = payload
        .pharmacy_public_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingField("pharmacy_public_id"))?;

    let pharmacy = state
        .store
        .get_pharmacy_by_public_id(public_id)
        .await?
        .ok_or(ApiError::UnknownPharmacy)?;

    // The region id stored on the event is a snapshot taken now; a dangling
    // region reference degrades to "no region" instead of failing the scan.
    let region = match pharmacy.region_id {
        Some(region_id) => state.store.get_region(region_id).await?,
        None => None,
    };

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    let scan_id = state
        .store
        .record_scan(NewScanEvent {
            pharmacy_id: pharmacy.id,
            region_id: region.map(|region| region.id),
            latitude: payload.latitude,
            longitude: payload.longitude,
            raw_qr: payload.raw_qr,
            user_agent,
            ip_address: Some(addr.ip().to_string()),
        })
        .await?;

    Ok(Json(ScanResponse { ok: true, scan_id }))
}
