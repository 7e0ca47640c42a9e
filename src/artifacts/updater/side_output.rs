use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

/// Per-path values recorded by concurrently running item updates
///
/// Keyed by path so the value reported back does not depend on which update
/// finished last.
#[derive(Debug)]
pub struct SideOutput<T> {
    entries: Mutex<BTreeMap<String, T>>,
}

impl<T: Clone> SideOutput<T> {
    pub fn new() -> Self {
        SideOutput {
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn record(&self, path: &str, value: T) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), value);
    }

    /// Value recorded for the lexicographically first path
    pub fn first(&self) -> Option<T> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .next()
            .cloned()
    }

    pub fn get(&self, path: &str) -> Option<T> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for SideOutput<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_records_from_many_threads() {
        let output = Arc::new(SideOutput::new());

        let handles = (0..16)
            .map(|i| {
                let output = Arc::clone(&output);
                std::thread::spawn(move || output.record(&format!("file-{i:02}"), i))
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(output.len(), 16);
        assert_eq!(output.first(), Some(0));
        assert_eq!(output.get("file-15"), Some(15));
    }

    #[test]
    fn test_empty_output_has_no_first_value() {
        let output = SideOutput::<String>::default();
        assert!(output.is_empty());
        assert_eq!(output.first(), None);
    }
}
