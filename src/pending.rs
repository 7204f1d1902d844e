// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lines waiting for the log file's lock.
//!
//! When a writer finds the file locked by someone else it does not wait. It
//! parks its already-rendered line here, and whichever writer of this process
//! next gets the lock writes everything parked, in arrival order, ahead of its
//! own line.
//!
//! One queue is shared by every writer of a process that targets the same
//! file. It is constructed explicitly and handed out as an `Arc`, rather than
//! being a hidden global.
//!
//! The queue is unbounded. Lines only pile up while the file stays locked by
//! another writer, which on the intended targets is brief.

use std::sync::{Mutex, MutexGuard};

/// Prefix of a line that was written later than it was logged.
pub const DEFERRED_MARKER: &str = " * ";

/// Process-wide ordered buffer of rendered lines.
#[derive(Debug, Default)]
pub struct PendingQueue {
    lines: Mutex<Vec<String>>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // a panic while holding the lock leaves a consistent Vec behind
    fn lines(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Parks `line` behind the [`DEFERRED_MARKER`].
    pub fn defer(&self, line: &str) {
        let mut marked = String::with_capacity(DEFERRED_MARKER.len() + line.len());
        marked.push_str(DEFERRED_MARKER);
        marked.push_str(line);
        self.lines().push(marked);
    }

    /**
    Takes every parked line, leaving the queue empty.

    The lock is held only for the swap; callers write the returned lines
    without it.
    */
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines())
    }

    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn drain_keeps_order_and_clears() {
        let queue = PendingQueue::new();
        queue.defer("b\r\n");
        queue.defer("c\r\n");
        queue.defer("d\r\n");
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain(), vec![" * b\r\n", " * c\r\n", " * d\r\n"]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn concurrent_defers_are_all_kept() {
        let queue = Arc::new(PendingQueue::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        queue.defer(&format!("{t}-{i}"));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Thread should complete successfully");
        }
        let lines = queue.drain();
        assert_eq!(lines.len(), 800);
        // each producer's own lines stay in its order
        for t in 0..8 {
            let mine: Vec<_> = lines
                .iter()
                .filter(|l| l.starts_with(&format!(" * {t}-")))
                .collect();
            for (i, line) in mine.iter().enumerate() {
                assert_eq!(**line, format!(" * {t}-{i}"));
            }
        }
    }
}
