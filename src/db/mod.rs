use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use crate::entities::pharmacies::Model as Pharmacy;
pub use crate::entities::regions::Model as Region;
pub use crate::entities::scan_events::Model as ScanEvent;
pub use repositories::scan_event::{NewScanEvent, ScanEventRecord};
pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn region_repo(&self) -> repositories::region::RegionRepository {
        repositories::region::RegionRepository::new(self.conn.clone())
    }

    fn pharmacy_repo(&self) -> repositories::pharmacy::PharmacyRepository {
        repositories::pharmacy::PharmacyRepository::new(self.conn.clone())
    }

    fn scan_repo(&self) -> repositories::scan_event::ScanEventRepository {
        repositories::scan_event::ScanEventRepository::new(self.conn.clone())
    }

    /// Resolve login credentials to an admin user. Returns `None` for any
    /// failure cause (unknown login, bad password, not a superuser).
    pub async fn authenticate_admin(&self, login: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().authenticate(login, password).await
    }

    pub async fn get_admin(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn create_user(
        &self,
        login: &str,
        password: &str,
        is_active: bool,
        is_superuser: bool,
    ) -> Result<User> {
        self.user_repo()
            .create(login, password, is_active, is_superuser)
            .await
    }

    pub async fn create_region(&self, name: &str, code: &str) -> Result<Region> {
        self.region_repo().create(name, code).await
    }

    pub async fn get_region(&self, id: i32) -> Result<Option<Region>> {
        self.region_repo().get(id).await
    }

    pub async fn create_pharmacy(
        &self,
        name: &str,
        address: Option<&str>,
        region_id: Option<i32>,
    ) -> Result<Pharmacy> {
        self.pharmacy_repo().create(name, address, region_id).await
    }

    pub async fn get_pharmacy_by_public_id(&self, public_id: &str) -> Result<Option<Pharmacy>> {
        self.pharmacy_repo().get_by_public_id(public_id).await
    }

    pub async fn record_scan(&self, scan: NewScanEvent) -> Result<i64> {
        self.scan_repo().insert(scan).await
    }

    pub async fn get_scan(&self, id: i64) -> Result<Option<ScanEvent>> {
        self.scan_repo().get(id).await
    }

    pub async fn recent_scans(&self, limit: u64) -> Result<Vec<ScanEventRecord>> {
        self.scan_repo().recent(limit).await
    }
}
