//! Closed string vocabularies backing enumerated columns.
//!
//! Each vocabulary is a plain enum whose wire and storage form is a fixed
//! lowercase string. The [`define_vocabulary!`] macro generates the enum,
//! `as_str`, `Display`, `FromStr`, and serde impls from one table so the
//! string forms cannot drift between layers.

/// Raised when a stored or submitted string is not part of a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} value: {value}")]
pub struct UnknownVariant {
    /// Vocabulary that rejected the value.
    pub vocabulary: &'static str,
    /// Rejected input.
    pub value: String,
}

macro_rules! define_vocabulary {
    (
        $(#[$outer:meta])*
        pub enum $name:ident as $label:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $text)]
                $variant,
            )*
        }

        impl $name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Canonical storage and wire form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::vocabulary::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok(Self::$variant),)*
                    other => Err($crate::domain::vocabulary::UnknownVariant {
                        vocabulary: $label,
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

pub(crate) use define_vocabulary;
