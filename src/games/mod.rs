//! Game implementations.

pub mod fortune;
