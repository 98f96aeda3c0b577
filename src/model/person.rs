//! Person record

use serde::{Deserialize, Serialize};

/// Entity name used in not-found errors
pub const PERSON_ENTITY: &str = "Person";

/// A person as stored in the `person` table.
///
/// `id` is assigned by the database and is never read from a request
/// body. Every other field defaults when absent so that partial update
/// payloads deserialize; the validator decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Database-assigned identifier, formatted as a string
    #[serde(default, skip_deserializing)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub age: f64,

    #[serde(default)]
    pub address: String,
}

impl Person {
    /// Create an unsaved person (no id yet)
    pub fn new(name: impl Into<String>, age: f64, address: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            age,
            address: address.into(),
        }
    }

    /// Attach a database identifier
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id.to_string();
        self
    }

    /// True when the payload carries no revisable field
    pub fn has_no_updates(&self) -> bool {
        self.name.is_empty() && self.address.is_empty()
    }
}
