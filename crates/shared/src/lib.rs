//! Shared types, errors, and configuration for Ledgerly.
//!
//! This crate holds the pieces every layer needs: the application-wide
//! error taxonomy and configuration loading. It has no database or web
//! dependencies.

pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
