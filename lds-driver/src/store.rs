use arc_swap::ArcSwap;
use lds_data::{MeasurementTable, Reading};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Latest published sweep, shared between the capture thread and any number
/// of readers.
///
/// A sweep is published by swapping in a whole new table, so a reader sees
/// either the previous sweep or the next one, never a mix.
pub struct MeasurementStore {
    current: ArcSwap<MeasurementTable>,
    data_available: AtomicBool,
    sweep_count: AtomicU64,
}

impl MeasurementStore {
    pub fn new() -> MeasurementStore {
        MeasurementStore {
            current: ArcSwap::from_pointee(MeasurementTable::new()),
            data_available: AtomicBool::new(false),
            sweep_count: AtomicU64::new(0),
        }
    }

    pub fn publish(&self, table: MeasurementTable) {
        self.current.store(Arc::new(table));
        self.sweep_count.fetch_add(1, Ordering::AcqRel);
        self.data_available.store(true, Ordering::Release);
    }

    /// `true` once the first sweep has been published.
    pub fn data_available(&self) -> bool {
        self.data_available.load(Ordering::Acquire)
    }

    /// Number of sweeps published so far.
    pub fn sweep_count(&self) -> u64 {
        self.sweep_count.load(Ordering::Acquire)
    }

    pub fn reading_at(&self, angle: usize) -> Option<Reading> {
        self.current.load().reading_at(angle)
    }

    /// Consistent copy of the whole sweep.
    pub fn snapshot(&self) -> MeasurementTable {
        self.current.load().as_ref().clone()
    }

    /// Shared handle to the current sweep, without copying it.
    pub fn latest(&self) -> Arc<MeasurementTable> {
        self.current.load_full()
    }
}

impl Default for MeasurementStore {
    fn default() -> Self {
        MeasurementStore::new()
    }
}
