//! Wire-name conversions for small domain enums
//!
//! Session phases, user types and pending operations all travel as short
//! lowercase strings (in logs, persisted records and API payloads). This
//! macro gives each of them `as_str`, `Display` and a case-insensitive
//! `FromStr` from a single variant table.
//!
//! # Example
//!
//! ```rust
//! use wildwelcome_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Portal {
//!     Tenant,
//!     Landlord,
//! }
//!
//! impl_wire_name_conversions!(Portal {
//!     Tenant => "tenant",
//!     Landlord => "landlord",
//! });
//!
//! assert_eq!("LANDLORD".parse::<Portal>(), Ok(Portal::Landlord));
//! assert_eq!(Portal::Tenant.as_str(), "tenant");
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum.
///
/// Parsing lowercases its input before matching, so every wire name in the
/// table must itself be lowercase. Aliases accepted only on parse can be
/// listed after a `;`.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    (
        $enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }
        $(; aliases { $($alias:literal => $alias_variant:ident),+ $(,)? })?
    ) => {
        impl $enum_name {
            /// Canonical wire name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    $($($alias => Ok(Self::$alias_variant),)+)?
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
