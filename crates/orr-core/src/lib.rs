//! # orr-core
//!
//! Core types and domain calculations for Orrery.
//!
//! This crate provides the foundational types shared across all Orrery crates:
//! - Entity structs for portfolio, blog, astronomy, research and finance rows
//! - Choice enums with storage strings and display labels
//! - ID prefix constants
//! - Validated input payloads
//! - Slugs, reading time, pagination
//! - Finance aggregation and astronomy measurement helpers
//! - Cross-cutting error types

pub mod data_entry;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod finance;
pub mod ids;
pub mod inputs;
pub mod pagination;
pub mod responses;
pub mod text;
