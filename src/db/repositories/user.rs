use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;
use tracing::info;

use crate::entities::{prelude::*, users};

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub login: String,
    pub is_active: bool,
    pub is_superuser: bool,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            login: model.login,
            is_active: model.is_active,
            is_superuser: model.is_superuser,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by id")?;

        Ok(user.map(User::from))
    }

    pub async fn create(
        &self,
        login: &str,
        password: &str,
        is_active: bool,
        is_superuser: bool,
    ) -> Result<User> {
        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let active_model = users::ActiveModel {
            login: Set(login.to_string()),
            password_hash: Set(password_hash),
            is_active: Set(is_active),
            is_superuser: Set(is_superuser),
            ..Default::default()
        };

        let res = Users::insert(active_model).exec(&self.conn).await?;
        info!("Created user '{login}'");

        Ok(User {
            id: res.last_insert_id,
            login: login.to_string(),
            is_active,
            is_superuser,
        })
    }

    /// Resolve login credentials to an admin user.
    ///
    /// Unknown login, wrong password and missing superuser privilege all
    /// collapse to `None` so the caller cannot tell which check failed.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Login.eq(login))
            .one(&self.conn)
            .await
            .context("Failed to query user for login")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        // Argon2 verification is CPU-bound; keep it off the async runtime.
        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        if !is_valid || !user.is_superuser {
            return Ok(None);
        }

        Ok(Some(User::from(user)))
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
