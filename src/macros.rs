//! Macros to reduce boilerplate in the codebase

/// Macro to generate Display and FromStr implementations for enums
///
/// Parsing is case-insensitive and also accepts `-` or spaces in place of `_`,
/// so `"Under Review"`, `"under-review"` and `"under_review"` all parse.
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     MyStatus,
///     SiteworkError::InvalidStatus,
///     {
///         Draft => "draft",
///         InReview => "in_review",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::SiteworkError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}

/// Declares a record status vocabulary: the enum, its serde representation,
/// `Display`/`FromStr`, and the `Status` impl listing every value in pipeline
/// order together with the named actions that transition into each value.
///
/// # Usage
///
/// ```rust,ignore
/// status_vocabulary!(
///     /// Lifecycle of an RFI
///     RfiStatus {
///         Draft => "draft" [],
///         Open => "open" ["open", "reopen"],
///     }
/// );
/// ```
#[macro_export]
macro_rules! status_vocabulary {
    (
        $(#[$meta:meta])*
        $enum_name:ident {
            $($variant:ident => $str:literal [$($action:literal),* $(,)?]),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        pub enum $enum_name {
            $($variant,)+
        }

        $crate::enum_display_fromstr!(
            $enum_name,
            $crate::error::SiteworkError::InvalidStatus,
            { $($variant => $str,)+ }
        );

        impl $crate::domain::Status for $enum_name {
            const ALL: &'static [Self] = &[$($enum_name::$variant,)+];

            fn for_action(action: &str) -> Option<Self> {
                match action {
                    $($($action => Some($enum_name::$variant),)*)+
                    _ => None,
                }
            }

            fn actions() -> &'static [&'static str] {
                &[$($($action,)*)+]
            }
        }
    };
}
