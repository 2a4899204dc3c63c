use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "regions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Human-readable internal code ("NW1", "Berlin").
    pub code: String,

    /// Opaque public region token embedded in QR payloads. Generated once,
    /// never derived from the name.
    #[sea_orm(unique)]
    pub public_id: String,

    pub is_active: bool,
}

// Pharmacies reference regions through a plain region_id column with explicit
// join queries; no relations or FK constraints are declared so a pharmacy may
// outlive its region row.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
