/// Configuration macros for zero-repetition config definitions
///
/// `config_struct!` defines a configuration struct together with its
/// defaults in a single declaration and generates:
/// - The struct with public fields
/// - The `Default` implementation
/// - Serde support with `#[serde(default)]`, so partial TOML files load
///
/// # Example
/// ```
/// swaprelay::config_struct! {
///     pub struct ExampleConfig {
///         listing_ttl_secs: i64 = 300,
///         enabled: bool = true,
///     }
/// }
/// ```
#[macro_export]
macro_rules! config_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_name:ident: $field_type:ty = $default_value:expr
            ),*
            $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field_name: $field_type,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $(
                        $field_name: $default_value,
                    )*
                }
            }
        }
    };
}
