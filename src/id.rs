use std::sync::atomic::{AtomicU64, Ordering};

/// Source of process-unique instance and asset ids. Injected so tests can
/// substitute a deterministic sequence.
pub trait IdSource {
    fn next_id(&self) -> String;
}

#[derive(Debug, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Default)]
pub struct SequentialIds(AtomicU64);

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.0.fetch_add(1, Ordering::Relaxed);
        format!("fixture-{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_ids_are_unique_and_non_empty() {
        let ids = UuidIds;
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn test_sequential_ids_count_up() {
        let ids = SequentialIds::default();
        assert_eq!(ids.next_id(), "fixture-0");
        assert_eq!(ids.next_id(), "fixture-1");
        assert_eq!(ids.next_id(), "fixture-2");
    }
}
