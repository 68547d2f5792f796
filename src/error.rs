use std::io;

/// Central error type for the crate.
///
/// Variants are grouped by failure class: construction errors (bad key size,
/// bad retriever config) are fatal to the operation, transient I/O errors
/// carry the underlying cause for the caller to retry, and integrity errors
/// (authentication, truncated ciphertext) are fatal and never return partial
/// plaintext.
#[derive(Debug, thiserror::Error)]
pub enum ArcryptError {
    #[error("invalid key size {size}: AES-GCM requires a 16, 24, or 32 byte key")]
    InvalidKeySize { size: usize },

    #[error("failed to create AES-GCM cipher: {description}")]
    CipherInit { description: String },

    #[error("failed to create nonce for encryption: {description}")]
    NonceGeneration { description: String },

    #[error("failed to encrypt plaintext: {description}")]
    Encryption { description: String },

    #[error("failed to decrypt: ciphertext (length {length}) too short")]
    CiphertextTooShort { length: usize },

    #[error("failed to decrypt ciphertext: message authentication failed")]
    Authentication,

    #[error("failed to write: encryption writer is closed")]
    WriterClosed,

    #[error("failed to write ciphertext to output writer: {source}")]
    SinkWrite {
        #[source]
        source: io::Error,
    },

    #[error("failed to read ciphertext from input reader: {source}")]
    SourceRead {
        #[source]
        source: io::Error,
    },

    #[error("encryption key retriever for type '{retriever_type}' does not exist")]
    UnknownRetrieverType { retriever_type: String },

    #[error("could not create encryption key retriever for type '{retriever_type}': {source}")]
    KeyRetrieverConstruction {
        retriever_type: String,
        #[source]
        source: Box<ArcryptError>,
    },

    #[error("secret name cannot be empty")]
    EmptySecretName,

    #[error("namespace cannot be empty")]
    EmptyNamespace,

    #[error("failed to get encryption key secret '{secret_name}': {source}")]
    SecretNotFound {
        secret_name: String,
        #[source]
        source: Box<ArcryptError>,
    },

    #[error("encryption key secret '{secret_name}' lacks field '{field}'")]
    SecretFieldMissing { secret_name: String, field: String },

    #[error("secret store error: {description}")]
    SecretStore { description: String },

    #[error("invalid parameter: {description}")]
    InvalidParameter { description: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key_size_format() {
        let error = ArcryptError::InvalidKeySize { size: 7 };
        assert_eq!(
            error.to_string(),
            "invalid key size 7: AES-GCM requires a 16, 24, or 32 byte key"
        );
    }

    #[test]
    fn ciphertext_too_short_references_input_length() {
        let error = ArcryptError::CiphertextTooShort { length: 5 };
        assert_eq!(
            error.to_string(),
            "failed to decrypt: ciphertext (length 5) too short"
        );
    }

    #[test]
    fn retriever_construction_wraps_inner_error() {
        let error = ArcryptError::KeyRetrieverConstruction {
            retriever_type: "invalid".to_string(),
            source: Box::new(ArcryptError::UnknownRetrieverType {
                retriever_type: "invalid".to_string(),
            }),
        };
        assert_eq!(
            error.to_string(),
            "could not create encryption key retriever for type 'invalid': \
             encryption key retriever for type 'invalid' does not exist"
        );
    }

    #[test]
    fn secret_not_found_carries_store_error() {
        let error = ArcryptError::SecretNotFound {
            secret_name: "encryption-key".to_string(),
            source: Box::new(ArcryptError::SecretStore {
                description: "secret backup-ns/encryption-key not found".to_string(),
            }),
        };
        let rendered = error.to_string();
        assert!(rendered.starts_with("failed to get encryption key secret 'encryption-key'"));
        assert!(rendered.contains("not found"));
    }
}
