#![doc = "The `tasklist` library crate."]
#![doc = ""]
#![doc = "Password authentication, bearer-token issuance, per-request identity resolution"]
#![doc = "and owner-scoped task storage for the task-list service. The binary (`main.rs`)"]
#![doc = "wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use crate::config::Config;
pub use crate::error::AppError;
pub use crate::state::AppState;
