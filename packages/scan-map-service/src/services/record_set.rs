use std::fmt::Display;
use tracing::{debug, error};

/// The records currently backing a view.
///
/// A successful fetch replaces the whole set verbatim. A failed fetch leaves
/// the previous set in place.
#[derive(Debug, Clone)]
pub struct RecordSet<T> {
    records: Vec<T>,
    generation: u64,
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RecordSet<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            generation: 0,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bumped on every successful replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply a fetch result, handing the error back after logging it.
    pub fn refresh<E: Display>(&mut self, fetched: Result<Vec<T>, E>) -> Result<(), E> {
        match fetched {
            Ok(records) => {
                self.generation += 1;
                debug!(
                    generation = self.generation,
                    "Replacing {} records with {}",
                    self.records.len(),
                    records.len()
                );
                self.records = records;
                Ok(())
            }
            Err(e) => {
                error!(
                    generation = self.generation,
                    "Fetch failed, keeping {} previous records: {}",
                    self.records.len(),
                    e
                );
                Err(e)
            }
        }
    }
}
