//! Macro for implementing Display and FromStr for record enums
//!
//! Source systems hand categorical columns over as free text (`"PIX"`,
//! `"Totem"`, `"Overdue"`). This macro maps each variant to its canonical
//! spelling and parses case-insensitively, so adapters never hand-roll the
//! string matching.
//!
//! # Example
//!
//! ```rust
//! use recarga_domain::impl_record_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Morning,
//!     Night,
//! }
//!
//! impl_record_enum_conversions!(Shift {
//!     Morning => "Morning",
//!     Night => "Night",
//! });
//!
//! assert_eq!("NIGHT".parse::<Shift>().ok(), Some(Shift::Night));
//! assert_eq!(Shift::Morning.to_string(), "Morning");
//! ```

/// Implements Display and FromStr for record enums
///
/// This macro generates:
/// - Display trait: writes the canonical spelling of the variant
/// - FromStr trait: parses case-insensitively, failing with
///   `DashboardError::DataSource` on unknown input
///
/// Surrounding whitespace is ignored when parsing.
#[macro_export]
macro_rules! impl_record_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::DashboardError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err($crate::DashboardError::DataSource(format!(
                    "invalid {}: {}",
                    stringify!($enum_name),
                    s
                )))
            }
        }
    };
}
