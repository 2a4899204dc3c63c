use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;

use super::generate_public_id;
use crate::entities::{prelude::*, regions};

/// Repository for business regions (e.g. "NRW West").
pub struct RegionRepository {
    conn: DatabaseConnection,
}

impl RegionRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, name: &str, code: &str) -> Result<regions::Model> {
        let active_model = regions::ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
            public_id: Set(generate_public_id()),
            is_active: Set(true),
            ..Default::default()
        };

        let region = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert region")?;

        info!("Created region '{}' ({})", region.name, region.public_id);
        Ok(region)
    }

    pub async fn get(&self, id: i32) -> Result<Option<regions::Model>> {
        Regions::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query region by id")
    }
}
