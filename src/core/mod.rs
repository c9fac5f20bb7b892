//! Core module - settings, records, candidate collection

pub mod config;
pub mod detail;
pub mod scan;

pub use config::Settings;
pub use detail::{Component, Detail, DetailError, Profile};
