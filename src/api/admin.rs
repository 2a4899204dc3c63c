use axum::{
    Extension, Json,
    extract::{Query, State},
    response::{Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::{ApiError, AppState, assets, auth::CurrentAdmin};
use crate::db::ScanEventRecord;

#[derive(Debug, Serialize)]
pub struct ScanEventDto {
    pub id: i64,
    pub pharmacy: String,
    pub region: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub raw_qr: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub scanned_at: String,
}

impl From<ScanEventRecord> for ScanEventDto {
    fn from(record: ScanEventRecord) -> Self {
        Self {
            id: record.id,
            pharmacy: record.pharmacy,
            region: record.region,
            latitude: record.latitude,
            longitude: record.longitude,
            raw_qr: record.raw_qr,
            user_agent: record.user_agent,
            ip_address: record.ip_address,
            scanned_at: record.scanned_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScanListQuery {
    pub limit: Option<u64>,
}

/// GET /admin
pub async fn admin_home() -> Redirect {
    Redirect::to("/admin/scans")
}

/// GET /admin/scans
pub async fn scans_page() -> Response {
    assets::page("admin_scans.html")
}

/// GET /admin/api/scans
pub async fn list_scans(
    State(state): State<Arc<AppState>>,
    Extension(CurrentAdmin(admin)): Extension<CurrentAdmin>,
    Query(query): Query<ScanListQuery>,
) -> Result<Json<Vec<ScanEventDto>>, ApiError> {
    let limit = query.limit.unwrap_or(50).min(500);

    let scans = state.store.recent_scans(limit).await?;
    debug!("Admin '{}' listed {} scans", admin.login, scans.len());

    Ok(Json(scans.into_iter().map(ScanEventDto::from).collect()))
}
