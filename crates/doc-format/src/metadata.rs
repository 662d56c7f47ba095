use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name and timestamps carried in every exported document. The name
/// defaults to the parameter-derived file stem but is free-form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    /// Updated on each re-export; equals `created` for a fresh document.
    pub modified: DateTime<Utc>,
}

impl DocumentMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            created: now,
            modified: now,
        }
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}
