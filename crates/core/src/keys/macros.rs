/// Implements `FromStr`, `Serialize` and `Deserialize` for a key type in terms
/// of its canonical string. The type must already implement `Display`.
macro_rules! string_codec {
    ($ty:ty, $decode:expr) => {
        impl ::std::str::FromStr for $ty {
            type Err = $crate::keys::KeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ($decode)(s)
            }
        }

        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                ($decode)(&raw).map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Declares a kind whose payload is an opaque identifier.
macro_rules! opaque_kind {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn id(&self) -> &str {
                &self.0
            }
        }

        impl $crate::keys::KeyKind for $name {
            const PREFIX: &'static str = $prefix;

            fn payload(&self) -> String {
                self.0.clone()
            }

            fn from_payload(payload: &str) -> Result<Self, $crate::keys::KeyError> {
                Ok(Self(payload.to_string()))
            }
        }

        kind_display!($name);
    };
}

/// `Display` for a single kind is its prefix followed by its payload.
macro_rules! kind_display {
    ($name:ident) => {
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(
                    f,
                    "{}{}",
                    <Self as $crate::keys::KeyKind>::PREFIX,
                    $crate::keys::KeyKind::payload(self)
                )
            }
        }

        string_codec!($name, <$name as $crate::keys::KeyKind>::decode);
    };
}

/// Declares a closed set of kinds usable in one key position.
///
/// Decoding goes through a single prefix registry built from the variant list,
/// so adding a kind to the set is a one-line change here.
macro_rules! key_set {
    ($(#[$meta:meta])* $set:ident { $($variant:ident($kind:ty)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $set {
            $($variant($kind)),+
        }

        impl $set {
            const REGISTRY: &'static [(&'static str, fn(&str) -> Result<$set, $crate::keys::KeyError>)] = &[
                $((
                    <$kind as $crate::keys::KeyKind>::PREFIX,
                    |payload| <$kind as $crate::keys::KeyKind>::from_payload(payload).map($set::$variant),
                )),+
            ];

            /// Decodes a canonical key string, dispatching on the longest matching prefix.
            pub fn decode(s: &str) -> Result<Self, $crate::keys::KeyError> {
                let (prefix, decode) = Self::REGISTRY
                    .iter()
                    .filter(|(prefix, _)| s.starts_with(*prefix))
                    .max_by_key(|(prefix, _)| prefix.len())
                    .ok_or_else(|| $crate::keys::KeyError::UnknownPrefix(s.to_string()))?;

                decode(&s[prefix.len()..])
            }

            /// The literal prefix of the wrapped kind.
            pub fn prefix(&self) -> &'static str {
                match self {
                    $($set::$variant(_) => <$kind as $crate::keys::KeyKind>::PREFIX),+
                }
            }
        }

        impl ::std::fmt::Display for $set {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $($set::$variant(key) => ::std::fmt::Display::fmt(key, f)),+
                }
            }
        }

        $(
            impl From<$kind> for $set {
                fn from(key: $kind) -> Self {
                    $set::$variant(key)
                }
            }
        )+

        string_codec!($set, $set::decode);
    };
}
