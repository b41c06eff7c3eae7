//! Small shared helpers
//!
//! - **[`macros`]**: `impl_status_conversions!` for tag-style enums
//! - **[`serde`]**: `Duration` as integer milliseconds for JSON artifacts

#[macro_use]
pub mod macros;
pub mod serde;

pub use self::serde::duration_millis;
