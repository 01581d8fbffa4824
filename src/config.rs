const DEFAULT_OWNER_ID: &str = "page";
const DEFAULT_OUTBOUND_QUEUE_CAP: usize = 256;

/// Failure handling knobs each component adapter chooses for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// A sync request on an instance whose insert failed re-issues the insert.
    pub auto_recover_insert: bool,
    /// A failed remove leaves the instance `Inserted` with its baseline.
    pub retain_on_remove_failure: bool,
    /// Only one instance of the kind may be inserted per page.
    pub singleton: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            auto_recover_insert: true,
            retain_on_remove_failure: false,
            singleton: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub owner_id: String,
    pub outbound_queue_cap: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            owner_id: DEFAULT_OWNER_ID.to_string(),
            outbound_queue_cap: DEFAULT_OUTBOUND_QUEUE_CAP,
        }
    }
}

impl SyncConfig {
    /// Reads `SHADOW_OWNER_ID` and `SHADOW_OUTBOUND_QUEUE_CAP`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let owner_id = lookup("SHADOW_OWNER_ID")
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER_ID.to_string());

        let outbound_queue_cap = lookup("SHADOW_OUTBOUND_QUEUE_CAP")
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_OUTBOUND_QUEUE_CAP);

        Self {
            owner_id,
            outbound_queue_cap,
        }
    }
}
