//! Persistence sink trait.

use crate::{BotMetrics, PersistError};

/// A destination for finished metrics records.
///
/// The tracker calls `persist` exactly once per tracked scope, after the
/// record is finalized. Implementations must not mutate the record.
pub trait PersistMetrics {
    fn persist(&self, metrics: &BotMetrics) -> Result<(), PersistError>;
}

impl<P: PersistMetrics + ?Sized> PersistMetrics for &P {
    fn persist(&self, metrics: &BotMetrics) -> Result<(), PersistError> {
        (**self).persist(metrics)
    }
}

impl<P: PersistMetrics + ?Sized> PersistMetrics for Box<P> {
    fn persist(&self, metrics: &BotMetrics) -> Result<(), PersistError> {
        (**self).persist(metrics)
    }
}
