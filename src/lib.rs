//! Two small web properties behind one axum server: Abhay Kumar Gautam's
//! portfolio and PapaJi, which turns a photo of something broken into a
//! step-by-step repair guide using a multimodal model.

pub mod config;
pub mod data_url;
pub mod diagnosis;
pub mod error;
pub mod extract;
pub mod portfolio;
pub mod routes;
pub mod upload_client;
pub mod vision;

pub use routes::{build_router, AppState};
