//! `lr-fit` library crate.
//!
//! The binary (`lr`) is a thin wrapper around this library so that:
//!
//! - the estimators are testable without spawning processes
//! - the numerical core (`math`, `fit`, `models`, `report::mse`) can be used
//!   without any of the CSV / CLI plumbing

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
