//! Interned identifiers.
//!
//! `TypeName` names a type definition in a [`SchemaRegistry`](crate::schema::SchemaRegistry)
//! and `StatId` names a field of a modifier source. Both wrap `Arc<str>` so
//! cloning is cheap and equality is a plain string comparison.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

macro_rules! interned_ident {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new identifier from a string slice.
            pub fn new(s: &str) -> Self {
                Self(Arc::from(s))
            }

            /// Get the string representation of this identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s))
            }
        }

        impl From<&$name> for $name {
            fn from(id: &$name) -> Self {
                id.clone()
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.as_ref().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s))
            }
        }
    };
}

interned_ident! {
    /// Name of a type definition in the schema registry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hatchstat::TypeName;
    ///
    /// let pet = TypeName::new("pet");
    /// let pet2: TypeName = "pet".into();
    /// assert_eq!(pet, pet2);
    /// assert_eq!(pet.as_str(), "pet");
    /// ```
    TypeName
}

interned_ident! {
    /// Name of a numeric or boolean field carried by a modifier source,
    /// such as `luck` or `mythicChanceMultiplier`.
    StatId
}
