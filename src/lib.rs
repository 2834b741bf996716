pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod types;

pub use account::Account;
pub use auth::{AccessToken, Credentials};
pub use config::Region;
pub use error::{Error, Result};
pub use models::{Device, Location};
