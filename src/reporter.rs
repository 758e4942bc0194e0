//! Defect reporting.

use std::sync::{Mutex, MutexGuard};

use crate::types::Defect;

/// Sink for recoverable anomalies found while resolving.
///
/// Called synchronously at the point the defect is found; implementations
/// must return promptly.
pub trait DefectReporter {
    fn report(&self, defect: &Defect);
}

impl<F> DefectReporter for F
where
    F: Fn(&Defect),
{
    fn report(&self, defect: &Defect) {
        self(defect)
    }
}

/// A reporter that keeps every defect it receives.
#[derive(Debug, Default)]
pub struct DefectLog {
    defects: Mutex<Vec<Defect>>,
}

impl DefectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the collected defects, in report order.
    pub fn defects(&self) -> Vec<Defect> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes and returns all collected defects.
    pub fn take(&self) -> Vec<Defect> {
        std::mem::take(&mut *self.lock())
    }

    // A poisoned lock still holds a valid list.
    fn lock(&self) -> MutexGuard<'_, Vec<Defect>> {
        self.defects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DefectReporter for DefectLog {
    fn report(&self, defect: &Defect) {
        self.lock().push(defect.clone());
    }
}
