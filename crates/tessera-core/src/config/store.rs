//! Store configuration.

use serde::{Deserialize, Serialize};

/// Settings for the in-process session and user stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file with an array of user records loaded at startup.
    #[serde(default)]
    pub users_file: Option<String>,
}
