use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;

use crate::entities::{pharmacies, prelude::*, regions, scan_events};

/// Scan payload captured at ingest time.
#[derive(Debug, Clone)]
pub struct NewScanEvent {
    pub pharmacy_id: i32,
    /// Region snapshot resolved from the pharmacy at scan time.
    pub region_id: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub raw_qr: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// Scan event joined with pharmacy and region names for the admin console.
#[derive(Debug, Clone)]
pub struct ScanEventRecord {
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

pub struct ScanEventRepository {
    conn: DatabaseConnection,
}

impl ScanEventRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, scan: NewScanEvent) -> Result<i64> {
        let pharmacy_id = scan.pharmacy_id;

        let active_model = scan_events::ActiveModel {
            pharmacy_id: Set(scan.pharmacy_id),
            region_id: Set(scan.region_id),
            latitude: Set(scan.latitude),
            longitude: Set(scan.longitude),
            raw_qr: Set(scan.raw_qr),
            user_agent: Set(scan.user_agent),
            ip_address: Set(scan.ip_address),
            scanned_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let res = ScanEvents::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to insert scan event")?;

        info!(
            "Recorded scan {} for pharmacy {}",
            res.last_insert_id, pharmacy_id
        );
        Ok(res.last_insert_id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<scan_events::Model>> {
        ScanEvents::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query scan event by id")
    }

    /// Most recent scans first, joined with pharmacy and region names via
    /// explicit queries.
    pub async fn recent(&self, limit: u64) -> Result<Vec<ScanEventRecord>> {
        let rows = ScanEvents::find()
            .order_by_desc(scan_events::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query scan events")?;

        let pharmacy_ids: Vec<i32> = rows
            .iter()
            .map(|row| row.pharmacy_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let region_ids: Vec<i32> = rows
            .iter()
            .filter_map(|row| row.region_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let pharmacy_names: HashMap<i32, String> = Pharmacies::find()
            .filter(pharmacies::Column::Id.is_in(pharmacy_ids))
            .all(&self.conn)
            .await
            .context("Failed to query pharmacies for scan listing")?
            .into_iter()
            .map(|pharmacy| (pharmacy.id, pharmacy.name))
            .collect();

        let region_names: HashMap<i32, String> = Regions::find()
            .filter(regions::Column::Id.is_in(region_ids))
            .all(&self.conn)
            .await
            .context("Failed to query regions for scan listing")?
            .into_iter()
            .map(|region| (region.id, region.name))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| ScanEventRecord {
                id: row.id,
                pharmacy: pharmacy_names
                    .get(&row.pharmacy_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Unknown ({})", row.pharmacy_id)),
                region: row
                    .region_id
                    .and_then(|region_id| region_names.get(&region_id).cloned()),
                latitude: row.latitude,
                longitude: row.longitude,
                raw_qr: row.raw_qr,
                user_agent: row.user_agent,
                ip_address: row.ip_address,
                scanned_at: row.scanned_at,
            })
            .collect())
    }
}
