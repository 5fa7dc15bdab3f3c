// Siam portal - API Core
//
// Backend for a Korean-language portal about Thailand: a business directory
// with fair exposure rotation, and a news archive fed by AI-assisted ingestion.
//
// Domain logic lives in domains/*; infrastructure behind traits in kernel/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
