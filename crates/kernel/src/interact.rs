use std::sync::atomic::{AtomicUsize, Ordering};

/// Capability exposed by scene entities that can be interacted with.
///
/// Handles are shared (`Arc<dyn Interactable>`), so `interact` takes `&self`;
/// implementors keep their own interior state.
pub trait Interactable: Send + Sync {
    fn interact(&self);

    fn label(&self) -> &str {
        "interactable"
    }
}

/// Interactable that only counts how often it was used.
#[derive(Debug, Default)]
pub struct InteractionCounter {
    label: String,
    count: AtomicUsize,
}

impl InteractionCounter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            count: AtomicUsize::new(0),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Interactable for InteractionCounter {
    fn interact(&self) {
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(label = %self.label, count = n, "interacted");
    }

    fn label(&self) -> &str {
        &self.label
    }
}
