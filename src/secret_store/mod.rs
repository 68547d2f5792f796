use std::collections::HashMap;

use serde::Deserialize;
use serde_with::{base64::Base64, serde_as};
use zeroize::Zeroize;

use crate::Result;

mod fs_store;
pub use fs_store::FileSystemSecretStore;

#[cfg(test)]
pub mod mem_store;

/// Abstraction over a backend that stores named secrets per namespace.
pub trait SecretStore {
    /// Fetch the secret stored under `name` in `namespace`.
    fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret>;
}

/// Opaque data fields of a stored secret.
///
/// `Debug` redacts the contents and the field values are zeroized on drop.
#[serde_as]
#[derive(Clone, Default, Deserialize)]
pub struct Secret {
    #[serde_as(as = "HashMap<_, Base64>")]
    #[serde(default)]
    data: HashMap<String, Vec<u8>>,
}

impl Secret {
    pub fn new(data: HashMap<String, Vec<u8>>) -> Self {
        Secret { data }
    }

    pub fn data(&self) -> &HashMap<String, Vec<u8>> {
        &self.data
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("data", &"[REDACTED]")
            .finish()
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        for value in self.data.values_mut() {
            value.zeroize();
        }
    }
}
