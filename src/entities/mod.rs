pub mod prelude;

pub mod pharmacies;
pub mod regions;
pub mod scan_events;
pub mod users;
