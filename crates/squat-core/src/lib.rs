//! # Squat-Core
//!
//! Core types and utilities for the squat performance analysis system:
//! the COCO keypoint layout, per-frame input series, the joint-angle
//! geometry engine and the tunable analysis configuration.

pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::*;
pub use error::{Error, Result};
pub use geometry::*;
pub use types::*;
