use std::fmt;
use std::sync::{Arc, OnceLock};

/// Compute-once cell for values derived from immutable data (distinct sets,
/// schemas, hashes).
///
/// Clones share the same cell, so a value computed through one handle is
/// visible through every other. Concurrent first use is safe: the value is
/// published atomically and every caller observes the same result.
pub struct Memo<T> {
    cell: Arc<OnceLock<T>>,
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// A cell that is already populated.
    pub fn ready(value: T) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            cell: Arc::new(cell),
        }
    }

    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(init)
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_computes_once() {
        let calls = AtomicUsize::new(0);
        let memo = Memo::new();
        let a = *memo.get_or_init(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            42
        });
        let b = *memo.get_or_init(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            7
        });
        assert_eq!((a, b), (42, 42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clones_share_cell() {
        let memo: Memo<String> = Memo::new();
        let other = memo.clone();
        memo.get_or_init(|| "shared".to_string());
        assert_eq!(other.get().map(String::as_str), Some("shared"));
    }

    #[test]
    fn test_concurrent_first_use() {
        let memo: Memo<usize> = Memo::new();
        std::thread::scope(|s| {
            for i in 0..8 {
                let memo = memo.clone();
                s.spawn(move || {
                    memo.get_or_init(|| i);
                });
            }
        });
        assert!(memo.is_computed());
    }
}
