#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "Password hashing, access token issuance and verification, cookie-based identity"]
#![doc = "resolution, CSRF protection and owner-scoped task CRUD. The binary (`main.rs`)"]
#![doc = "wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod csrf;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;
pub mod users;

pub use error::AppError;
pub use state::AppState;
