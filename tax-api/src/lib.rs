//! HTTP front end for the municipal tax rate store.
//!
//! Routes:
//! - `GET /health`
//! - `GET /api/tax?municipality=..&date=..` applicable rate
//! - `GET /api/tax/all`
//! - `POST /api/tax`
//! - `PUT /api/tax/:id`
//! - `DELETE /api/tax/:id`

pub mod app;
pub mod boundary;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
