//! Display/FromStr generation for lifecycle enums
//!
//! Lifecycle enums (sync call states, for instance) are logged as lowercase
//! strings and parsed back case-insensitively. The macro keeps both
//! directions in a single mapping.
//!
//! # Example
//!
//! ```rust
//! use timesync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum DeliveryState {
//!     Queued,
//!     Delivered,
//! }
//!
//! impl_domain_status_conversions!(DeliveryState {
//!     Queued => "queued",
//!     Delivered => "delivered",
//! });
//!
//! assert_eq!(DeliveryState::Queued.to_string(), "queued");
//! assert_eq!("DELIVERED".parse::<DeliveryState>(), Ok(DeliveryState::Delivered));
//! ```

/// Implements `Display` and `FromStr` for a fieldless enum.
///
/// Parsing lowercases the input before matching, so the `$str` values must be
/// lowercase.
#[macro_export]
macro_rules! impl_domain_status_conversions {
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
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
