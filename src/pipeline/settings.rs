use serde::{Deserialize, Serialize};

/// Engine tuning knobs shared by the activity log and the bulk updater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size applied when callers pass `0` to the activity history.
    pub activity_page_size: usize,
    /// Hard cap on a single activity page.
    pub activity_page_size_max: usize,
    /// Hard cap on the number of applications in one bulk stage move.
    pub bulk_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            activity_page_size: 20,
            activity_page_size_max: 100,
            bulk_limit: 100,
        }
    }
}
