use tracing::info;

/// Insertion-ordered set of completed recipe names. Never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    names: Vec<String>,
}

impl CompletionSet {
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns false when `name` was already present.
    fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Result of recording a new completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub count: usize,
    /// Set on the single completion that reaches the target.
    pub all_complete: bool,
}

/// Observable completion state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionSnapshot {
    pub completed_names: Vec<String>,
    pub count: usize,
}

/// Counts distinct completed recipes against a fixed target.
#[derive(Debug, Clone)]
pub struct SessionTracker {
    completed: CompletionSet,
    target: usize,
    all_complete_fired: bool,
}

impl SessionTracker {
    pub fn new(target: usize) -> Self {
        Self {
            completed: CompletionSet::default(),
            target,
            all_complete_fired: false,
        }
    }

    /// Idempotent: `None` when the recipe was already recorded.
    pub fn record_completion(&mut self, name: &str) -> Option<Recorded> {
        if !self.completed.insert(name) {
            return None;
        }
        let count = self.completed.len();
        let all_complete = self.is_complete(count) && !self.all_complete_fired;
        if all_complete {
            self.all_complete_fired = true;
            info!(count, target = self.target, "all drinks completed");
        }
        Some(Recorded {
            count,
            all_complete,
        })
    }

    pub fn is_complete(&self, count: usize) -> bool {
        count >= self.target
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn snapshot(&self) -> CompletionSnapshot {
        CompletionSnapshot {
            completed_names: self.completed.names().to_vec(),
            count: self.completed.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_completion_is_idempotent() {
        let mut tracker = SessionTracker::new(2);
        assert_eq!(
            tracker.record_completion("AMERICANO"),
            Some(Recorded {
                count: 1,
                all_complete: false
            })
        );
        assert_eq!(tracker.record_completion("AMERICANO"), None);
        assert_eq!(tracker.completed().names(), ["AMERICANO".to_string()]);
    }

    #[test]
    fn test_all_complete_fires_once_at_target() {
        let mut tracker = SessionTracker::new(2);
        tracker.record_completion("AMERICANO");
        let recorded = tracker.record_completion("HOT CHOCOLATE").unwrap();
        assert!(recorded.all_complete);
        assert_eq!(recorded.count, 2);

        let extra = tracker.record_completion("MOCHA").unwrap();
        assert_eq!(extra.count, 3);
        assert!(!extra.all_complete);
    }

    #[test]
    fn test_snapshot_preserves_insertion_order() {
        let mut tracker = SessionTracker::new(2);
        tracker.record_completion("HOT CHOCOLATE");
        tracker.record_completion("AMERICANO");
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.completed_names, ["HOT CHOCOLATE", "AMERICANO"]);
        assert_eq!(snapshot.count, 2);
        assert!(tracker.is_complete(snapshot.count));
    }
}
