//! Repository modules implementing storage operations for every Orrery entity.
//!
//! Each module adds methods to `OrrService` via `impl OrrService` blocks.

pub mod accounts;
pub mod astro_research;
pub mod astronomy;
pub mod blog;
pub mod contact;
pub mod finance;
pub mod portfolio;
pub mod research;
