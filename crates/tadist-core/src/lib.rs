//! Tadist Core Library
//!
//! Domain logic for distributing grading work among teaching assistants.

pub mod config;
pub mod db;
pub mod distribute;
pub mod error;
pub mod logging;
pub mod model;
pub mod sheets;
pub mod store;
