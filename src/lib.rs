pub mod encryption;
pub mod error;
pub mod secret_store;

pub use encryption::{
    encryption_key_from_secret, key_retriever_for, secret_key_config, AesGcmEncryptor,
    DecryptionReader, EncryptionMetadata, EncryptionWriter, Encryptor, KeyRetriever,
    RetrieverConfig, SecretKeyRetriever, ENCRYPTION_KEY_SECRET_FIELD, NONCE_SIZE,
    SECRET_RETRIEVER_TYPE, TAG_SIZE,
};
pub use error::ArcryptError;
pub use secret_store::{FileSystemSecretStore, Secret, SecretStore};

pub type Error = ArcryptError;
pub type Result<T> = std::result::Result<T, Error>;
