//! Data models for alarm fax extraction.

pub mod alarm;
pub mod config;
pub mod fields;
