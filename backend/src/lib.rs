//! Employee Registry - Backend Library
//!
//! CRUD API over employee records, mirroring every change into an
//! append-only audit table.

#[macro_use]
mod macros;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
