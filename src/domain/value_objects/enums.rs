//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`FinancingStatus`] - Whether an invoice is still pending or already financed
//! - [`RunPhase`] - Phases of one allocation run
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Financing status of an invoice.
///
/// Derived from the invoice's result amounts: an invoice is financed exactly
/// when both amounts are present.
///
/// # Examples
///
/// ```
/// use invoice_financing::domain::value_objects::enums::FinancingStatus;
///
/// assert!(FinancingStatus::Pending.is_pending());
/// assert_eq!(FinancingStatus::Financed.to_string(), "FINANCED");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum FinancingStatus {
    /// Not yet financed; eligible for the next run.
    Pending = 0,
    /// Financed exactly once; never processed again.
    Financed = 1,
}

impl FinancingStatus {
    /// Returns true if the invoice still awaits financing.
    #[inline]
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true if the invoice has been financed.
    #[inline]
    #[must_use]
    pub const fn is_financed(self) -> bool {
        matches!(self, Self::Financed)
    }
}

impl fmt::Display for FinancingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Financed => write!(f, "FINANCED"),
        }
    }
}

impl FromStr for FinancingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "FINANCED" => Ok(Self::Financed),
            _ => Err(ParseEnumError::InvalidValue("FinancingStatus", s.to_string())),
        }
    }
}

/// Phase of an allocation run.
///
/// A run moves `Idle → Loading → Iterating ⇄ Flushing → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RunPhase {
    /// Nothing started yet.
    #[default]
    Idle,
    /// Pending invoices and purchasers are being loaded.
    Loading,
    /// Invoices are being matched and financed.
    Iterating,
    /// Buffered writes are being flushed and tracking released.
    Flushing,
    /// The run has completed.
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Loading => "LOADING",
            Self::Iterating => "ITERATING",
            Self::Flushing => "FLUSHING",
            Self::Done => "DONE",
        };
        write!(f, "{name}")
    }
}

impl FromStr for RunPhase {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "IDLE" => Ok(Self::Idle),
            "LOADING" => Ok(Self::Loading),
            "ITERATING" => Ok(Self::Iterating),
            "FLUSHING" => Ok(Self::Flushing),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseEnumError::InvalidValue("RunPhase", s.to_string())),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod financing_status {
        use super::*;

        #[test]
        fn predicates() {
            assert!(FinancingStatus::Pending.is_pending());
            assert!(!FinancingStatus::Pending.is_financed());
            assert!(FinancingStatus::Financed.is_financed());
        }

        #[test]
        fn from_str_is_case_insensitive() {
            assert_eq!(
                "financed".parse::<FinancingStatus>().unwrap(),
                FinancingStatus::Financed
            );
            assert!("PAID".parse::<FinancingStatus>().is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let json = serde_json::to_string(&FinancingStatus::Pending).unwrap();
            assert_eq!(json, "\"PENDING\"");
            let back: FinancingStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, FinancingStatus::Pending);
        }
    }

    mod run_phase {
        use super::*;

        #[test]
        fn default_is_idle() {
            assert_eq!(RunPhase::default(), RunPhase::Idle);
        }

        #[test]
        fn display_and_parse_agree() {
            for phase in [
                RunPhase::Idle,
                RunPhase::Loading,
                RunPhase::Iterating,
                RunPhase::Flushing,
                RunPhase::Done,
            ] {
                assert_eq!(phase.to_string().parse::<RunPhase>().unwrap(), phase);
            }
        }

        #[test]
        fn parse_error_names_enum() {
            let err = "RUNNING".parse::<RunPhase>().unwrap_err();
            assert!(err.to_string().contains("RunPhase"));
        }
    }
}
