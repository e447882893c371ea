//! Dashboard view selection over per-user nutrition records, plus the
//! onboarding webhook relay. `main.rs` serves both over HTTP; the
//! `dashboard` module is also usable by an embedding client directly.

pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod records;
pub mod relay;
pub mod state;
