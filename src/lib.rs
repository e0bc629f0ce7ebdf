//! Tiny Deficit Library
//!
//! Core functionality for the calorie and weight journal.

pub mod build_info;
pub mod chart;
pub mod db;
pub mod error;
pub mod journal;
pub mod lookup;
pub mod mcp;
pub mod models;
pub mod persist;
pub mod store;
pub mod sync;
pub mod timeline;
pub mod tools;
pub mod weight;
