use serde::{Deserialize, Serialize};

/// Per-member record naming the one track that is currently running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserTimer {
    pub card_id: String,
    pub timer_list_id: String,
    pub timer_id: String,
    pub track_id: String,
}
