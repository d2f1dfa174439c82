use serde::{Deserialize, Serialize};

pub type ClientId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
}

/// A client that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
}

impl NewClient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn with_id(self, id: ClientId) -> Client {
        Client {
            id,
            name: self.name,
            email: self.email,
        }
    }
}
