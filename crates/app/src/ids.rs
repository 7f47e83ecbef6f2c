//! Typed identifiers.
//!
//! Each aggregate gets its own UUID newtype so a user id cannot be passed
//! where an order id is expected. Catalog item ids stay plain [`Uuid`]
//! because they cross into the `kaiten` core crate's line model.

use std::fmt;

use uuid::Uuid;

macro_rules! typed_uuid {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The raw UUID.
            #[must_use]
            pub const fn into_uuid(self) -> Uuid {
                self.0
            }

            /// Generate a fresh v7 id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

typed_uuid! {
    /// Identifies a user account.
    UserUuid
}

typed_uuid! {
    /// Identifies an order.
    OrderUuid
}

typed_uuid! {
    /// Identifies a loyalty card.
    CardUuid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_raw_uuid() {
        let raw = Uuid::now_v7();
        let typed = UserUuid::from_uuid(raw);

        assert_eq!(typed.into_uuid(), raw);
        assert_eq!(Uuid::from(typed), raw);
        assert_eq!(typed.to_string(), raw.to_string());
    }
}
