//! Exempt development assessment for sheds, carports and outdoor entertainment areas.
//!
//! The [`assessment`] module holds the rules engine; [`rules`] loads the legislative rule
//! table it cites. Property lookup and audit persistence are thin collaborators around it.

pub mod assessment;
pub mod audit;
pub mod config;
pub mod error;
pub mod property;
pub mod rules;
pub mod telemetry;
