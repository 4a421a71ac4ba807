use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh block identifiers.
///
/// Invoked once for every block constructed without an explicit id.
pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> String;
}

impl<F> IdProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Default provider: random (v4) UUIDs in hyphenated form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().hyphenated().to_string()
    }
}

/// Deterministic provider producing `prefix1`, `prefix2`, ...
#[derive(Debug)]
pub struct SequentialIdProvider {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{n}", self.prefix)
    }
}

/// Generate an id with the default provider.
pub fn generate_id() -> String {
    UuidProvider.next_id()
}
