//! Family-tree engine for a single patrilineal lineage.
//!
//! Flat person records are assembled into a rooted tree ([`tree`]), indexed
//! for navigation ([`index`]), and queried through kinship computation
//! ([`relation`]), typo-tolerant name matching ([`fuzzy`]) and a bilingual
//! question resolver ([`resolver`]). [`store::FamilyTree`] owns the records
//! and rebuilds the index whenever they change; [`persist`] moves them to
//! and from disk.

pub mod config;
pub mod error;
pub mod fuzzy;
pub mod gender;
pub mod index;
pub mod persist;
pub mod phrases;
pub mod relation;
pub mod resolver;
pub mod store;
pub mod tree;

#[cfg(test)]
mod fixtures;

pub use error::{LineageError, Result};
pub use vanshavali_types::{PersonId, PersonRecord};
