use std::{
    fs::File,
    path::PathBuf,
};

use log::debug;

use crate::{ArcryptError, Result};

use super::{Secret, SecretStore};

/// Secret store reading YAML secret documents from a directory tree.
///
/// A secret `name` in `namespace` lives at `<root>/<namespace>/<name>.yaml`
/// with base64-encoded data fields:
///
/// ```yaml
/// data:
///   encryptionKey: YWJjZGVmZ2hpamtsbW5vcHFyc3R1dnd4
/// ```
pub struct FileSystemSecretStore {
    root: PathBuf,
}

impl FileSystemSecretStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileSystemSecretStore { root: root.into() }
    }

    fn secret_path(&self, name: &str, namespace: &str) -> PathBuf {
        self.root.join(namespace).join(format!("{name}.yaml"))
    }
}

impl SecretStore for FileSystemSecretStore {
    fn get_secret(&self, name: &str, namespace: &str) -> Result<Secret> {
        let path = self.secret_path(name, namespace);
        debug!("loading secret '{namespace}/{name}' from {}", path.display());

        let file = File::open(&path).map_err(|e| ArcryptError::SecretStore {
            description: format!("failed to open secret file {}: {e}", path.display()),
        })?;
        serde_yaml::from_reader(file).map_err(|e| ArcryptError::SecretStore {
            description: format!("failed to parse secret file {}: {e}", path.display()),
        })
    }
}
