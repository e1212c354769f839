//! Resource abstraction layer
//!
//! The per-kind listing boilerplate collapses to one counter driven by a
//! closed descriptor table:
//!
//! - [`kind`] - the [`kind::ResourceKind`] enum and its static descriptors
//! - [`counter`] - paginated listing reduced to a count, failures folded
//!   into absent values

pub mod counter;
pub mod kind;
