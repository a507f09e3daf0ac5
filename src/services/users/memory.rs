use std::collections::HashMap;

use async_trait::async_trait;

use crate::services::users::directory::{DirectoryError, Principal, UserDirectory};

/// Fixed set of accounts, loaded once at startup (see `AUTH_USERS`).
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, Principal>,
}

impl InMemoryUserDirectory {
    pub fn new(principals: impl IntoIterator<Item = Principal>) -> Self {
        let users = principals
            .into_iter()
            .map(|p| (p.username.clone(), p))
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn load_user_by_name(&self, username: &str) -> Result<Principal, DirectoryError> {
        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(username.to_string()))
    }
}
