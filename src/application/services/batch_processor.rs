//! # Invoice Batch Processor
//!
//! Bounds the memory of a financing run: after every `batch_size` financed
//! invoices it flushes the unit of work and clears its tracked entities.
//! Neither call ends the transaction.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::infrastructure::persistence::traits::UnitOfWork;

/// Default number of financed invoices between flushes.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Per-run financed counter and flush trigger.
#[derive(Debug, Clone)]
pub struct InvoiceBatchProcessor {
    batch_size: u64,
    financed: u64,
    flushes: u64,
}

impl InvoiceBatchProcessor {
    /// Creates a processor that flushes every `batch_size` financings.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` if `batch_size` is zero.
    pub fn new(batch_size: usize) -> ApplicationResult<Self> {
        if batch_size == 0 {
            return Err(ApplicationError::configuration(
                "batch size must be positive",
            ));
        }
        let batch_size = u64::try_from(batch_size)
            .map_err(|_| ApplicationError::configuration("batch size out of range"))?;
        Ok(Self {
            batch_size,
            financed: 0,
            flushes: 0,
        })
    }

    /// Counts one financed invoice and flushes/clears on batch boundaries.
    ///
    /// Returns true if a flush happened.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Repository` if the flush or clear fails.
    pub async fn record_financed<U>(&mut self, uow: &U) -> ApplicationResult<bool>
    where
        U: UnitOfWork + ?Sized,
    {
        self.financed += 1;
        if self.financed % self.batch_size != 0 {
            return Ok(false);
        }

        uow.flush().await?;
        uow.clear().await?;
        self.flushes += 1;
        tracing::info!(
            financed = self.financed,
            flushes = self.flushes,
            "flushed financing batch"
        );
        Ok(true)
    }

    /// Returns the number of invoices financed so far.
    #[inline]
    #[must_use]
    pub fn financed(&self) -> u64 {
        self.financed
    }

    /// Returns the number of flushes so far.
    #[inline]
    #[must_use]
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Returns the batch size.
    #[inline]
    #[must_use]
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }
}
