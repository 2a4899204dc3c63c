pub use super::pharmacies::Entity as Pharmacies;
pub use super::regions::Entity as Regions;
pub use super::scan_events::Entity as ScanEvents;
pub use super::users::Entity as Users;
