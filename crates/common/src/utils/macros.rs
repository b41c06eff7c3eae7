//! Macros for tag-style enums
//!
//! Scenario type tags and report statuses travel as fixed strings (CLI
//! filters, JSON artifacts, log messages). `impl_status_conversions!`
//! generates the `Display`/`FromStr` pair for them.

/// Implements Display and FromStr traits for tag enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively
///
/// # Example
///
/// ```rust
/// use retrylab_common::impl_status_conversions;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// pub enum Outcome {
///     Succeeded,
///     Exhausted,
///     Aborted,
/// }
///
/// impl_status_conversions!(Outcome {
///     Succeeded => "succeeded",
///     Exhausted => "exhausted",
///     Aborted => "aborted",
/// });
///
/// assert_eq!(Outcome::Exhausted.to_string(), "exhausted");
/// ```
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let tag = s.trim();
                $(
                    if tag.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
