//! Reference adapters for the collaborator traits.

pub mod memory;
