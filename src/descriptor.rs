use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one native overlay instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShadowDescriptor {
    pub kind: String,
    pub instance_id: String,
    pub owner_id: String,
}

impl ShadowDescriptor {
    /// Allocates a fresh process-unique `instance_id` for `kind`.
    #[must_use]
    pub fn allocate(kind: &str, owner_id: impl Into<String>) -> Self {
        let id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            kind: kind.to_string(),
            instance_id: format!("{kind}-{id}"),
            owner_id: owner_id.into(),
        }
    }
}
