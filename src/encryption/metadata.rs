use serde::{Deserialize, Serialize};

/// Information about the encryption of a backup, persisted alongside the
/// backup record. Restore logic uses it to decide whether to route the
/// archive through a [`DecryptionReader`](super::DecryptionReader) and
/// which secret identifies the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionMetadata {
    /// Whether this backup is encrypted.
    pub is_encrypted: bool,
    /// Name of the secret containing the encryption key used for encryption.
    #[serde(default)]
    pub encryption_secret_name: String,
}

impl EncryptionMetadata {
    /// Metadata for a backup encrypted with the key from the named secret.
    pub fn encrypted(secret_name: impl Into<String>) -> Self {
        EncryptionMetadata {
            is_encrypted: true,
            encryption_secret_name: secret_name.into(),
        }
    }

    /// Metadata for an unencrypted backup.
    pub fn unencrypted() -> Self {
        EncryptionMetadata::default()
    }
}
