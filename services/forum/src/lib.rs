//! StudyBud forum service
//!
//! Topics, rooms and messages over PostgreSQL, with user profiles whose
//! avatar files are kept in step with their records.

pub mod avatar;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use state::AppState;
