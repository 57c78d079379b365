//! Infrastructure Layer
//!
//! Registration store implementations.

pub mod memory;
pub mod postgres;
