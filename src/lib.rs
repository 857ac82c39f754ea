//! Nutri Profile — nutrition profile wizard core.

pub mod config;
pub mod error;
pub mod profile;
pub mod store;
pub mod wizard;
