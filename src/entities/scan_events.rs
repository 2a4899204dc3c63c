use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "scan_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    pub raw_qr: Option<String>,

    pub user_agent: Option<String>,

    pub ip_address: Option<String>,

    /// RFC 3339 timestamp, set at insert time.
    pub scanned_at: String,

    pub pharmacy_id: i32,

    /// Snapshot of the pharmacy's region at scan time, not a live join.
    /// Stays valid even if the pharmacy later moves to another region.
    pub region_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
