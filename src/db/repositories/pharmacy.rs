use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;

use super::generate_public_id;
use crate::entities::{pharmacies, prelude::*};

pub struct PharmacyRepository {
    conn: DatabaseConnection,
}

impl PharmacyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(
        &self,
        name: &str,
        address: Option<&str>,
        region_id: Option<i32>,
    ) -> Result<pharmacies::Model> {
        let active_model = pharmacies::ActiveModel {
            name: Set(name.to_string()),
            address: Set(address.map(ToString::to_string)),
            public_id: Set(generate_public_id()),
            is_active: Set(true),
            region_id: Set(region_id),
            ..Default::default()
        };

        let pharmacy = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert pharmacy")?;

        info!(
            "Created pharmacy '{}' ({})",
            pharmacy.name, pharmacy.public_id
        );
        Ok(pharmacy)
    }

    /// Look up a pharmacy by its opaque public token, not its name.
    pub async fn get_by_public_id(&self, public_id: &str) -> Result<Option<pharmacies::Model>> {
        Pharmacies::find()
            .filter(pharmacies::Column::PublicId.eq(public_id))
            .one(&self.conn)
            .await
            .context("Failed to query pharmacy by public id")
    }
}
