//! Concrete backends behind the crate's traits.

pub mod vault;
