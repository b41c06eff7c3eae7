//! Commands - bridge from outer surfaces (CLI, route handlers) to the core

mod harness;
mod policy;

pub use harness::*;
pub use policy::*;
