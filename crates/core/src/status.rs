//! Text-backed status enums.
//!
//! Statuses are persisted as snake_case text. [`define_status_enum!`]
//! generates the enum together with its string conversions, so the db layer
//! can decode a column with `#[sqlx(try_from = "String")]` and bind it with
//! `as_str()`.

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant ),+
        }

        impl $name {
            /// Every variant, in lifecycle order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The value stored in the database and used on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Invalid {} '{}'. Must be one of: {}",
                        stringify!($name),
                        other,
                        [$($value),+].join(", ")
                    ))),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use define_status_enum;

#[cfg(test)]
mod tests {
    use super::define_status_enum;

    define_status_enum! {
        /// Enum used only to exercise the macro.
        Light {
            Red = "red" => "Red",
            AmberFlashing = "amber_flashing" => "Amber (flashing)",
        }
    }

    #[test]
    fn round_trips_through_strings() {
        for light in Light::ALL {
            assert_eq!(light.as_str().parse::<Light>().unwrap(), *light);
        }
    }

    #[test]
    fn unknown_value_lists_valid_options() {
        let err = "green".parse::<Light>().unwrap_err().to_string();
        assert!(err.contains("Invalid Light 'green'"));
        assert!(err.contains("red, amber_flashing"));
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(Light::AmberFlashing.to_string(), "Amber (flashing)");
    }

    #[test]
    fn serde_uses_stored_value() {
        let json = serde_json::to_string(&Light::AmberFlashing).unwrap();
        assert_eq!(json, "\"amber_flashing\"");
        let back: Light = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(back, Light::Red);
    }
}
