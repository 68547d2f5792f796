use std::{cell::RefCell, collections::HashMap};

use crate::{ArcryptError, Result};

use super::{Secret, SecretStore};

/// In-memory secret store for tests.
pub struct MemSecretStore {
    secrets: RefCell<HashMap<(String, String), HashMap<String, Vec<u8>>>>,
}

impl MemSecretStore {
    pub fn new() -> Self {
        MemSecretStore {
            secrets: RefCell::new(HashMap::new()),
        }
    }

    pub fn insert(&self, name: &str, namespace: &str, data: HashMap<String, Vec<u8>>) {
        self.secrets
            .borrow_mut()
            .insert((namespace.to_string(), name.to_string()), data);
    }

    pub fn remove(&self, name: &str, namespace: &str) {
        self.secrets
            .borrow_mut()
            .remove(&(namespace.to_string(), name.to_string()));
    }
}

impl SecretStore for MemSecretStore {
    fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret> {
        match self
            .secrets
            .borrow()
            .get(&(namespace.to_string(), name.to_string()))
        {
            Some(data) => Ok(Secret::new(data.clone())),
            None => Err(ArcryptError::SecretStore {
                description: format!("secret {namespace}/{name} not found"),
            }),
        }
    }
}
