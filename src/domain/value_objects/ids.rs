//! # Identifiers
//!
//! UUID-based identity types for every aggregate the engine touches.
//!
//! # Examples
//!
//! ```
//! use invoice_financing::domain::value_objects::{InvoiceId, PurchaserId};
//!
//! let invoice = InvoiceId::new_v4();
//! let purchaser = PurchaserId::new_v4();
//! assert_ne!(invoice.get(), purchaser.get());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wraps an existing UUID.
            #[inline]
            #[must_use]
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generates a new random identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the underlying UUID.
            #[inline]
            #[must_use]
            pub const fn get(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a [`Creditor`](crate::domain::entities::Creditor).
    CreditorId
);

uuid_id!(
    /// Identifier of a [`Debtor`](crate::domain::entities::Debtor).
    DebtorId
);

uuid_id!(
    /// Identifier of a [`Purchaser`](crate::domain::entities::Purchaser).
    PurchaserId
);

uuid_id!(
    /// Identifier of an [`Invoice`](crate::domain::entities::Invoice).
    InvoiceId
);

uuid_id!(
    /// Identifier of one allocation run.
    FinancingRunId
);
