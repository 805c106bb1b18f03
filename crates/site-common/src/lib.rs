pub mod error;
pub mod site_api;
pub mod sqlite;
