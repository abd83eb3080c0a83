/// Implements the text-carrier surface shared by the temporal primitives.
///
/// The target type must be a tuple struct over `String` and provide
/// `fn check(text: &str) -> Result<()>`. Every entry point that produces a
/// value from text goes through `check`.
macro_rules! text_primitive {
    ($ty:ident, $kind:expr) => {
        impl $ty {
            /// Validates `text` and wraps it unchanged.
            pub fn new(text: impl Into<String>) -> $crate::error::Result<Self> {
                let text = text.into();
                Self::check(&text)?;
                Ok(Self(text))
            }

            /// Construction for literals known to be valid.
            ///
            /// # Panics
            ///
            /// Panics with the format error if `text` is not valid.
            pub fn from_static(text: &'static str) -> Self {
                match Self::new(text) {
                    Ok(value) => value,
                    Err(e) => {
                        tracing::warn!(
                            kind = %$kind,
                            value = text,
                            "invalid literal in forced construction"
                        );
                        panic!("{e}")
                    }
                }
            }

            /// Canonical text of this value
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True for the absent (default) value.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Re-checks the text against the grammar. Fails for the absent value.
            pub fn validate(&self) -> $crate::error::Result<()> {
                Self::check(&self.0)
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::PrimitiveError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::error::PrimitiveError;

            fn try_from(value: String) -> $crate::error::Result<Self> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $ty {
            type Error = $crate::error::PrimitiveError;

            fn try_from(value: &str) -> $crate::error::Result<Self> {
                Self::new(value)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                Self::check(&self.0).map_err(<S::Error as serde::ser::Error>::custom)?;
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                Self::new(s).map_err(serde::de::Error::custom)
            }
        }
    };
}
