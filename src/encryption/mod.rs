mod encryptor;
mod key_retriever;
mod metadata;
mod reader;
mod secret_key_retriever;
mod writer;

pub use encryptor::{AesGcmEncryptor, Encryptor, NONCE_SIZE, TAG_SIZE};
pub use key_retriever::{key_retriever_for, KeyRetriever, RetrieverConfig, SECRET_RETRIEVER_TYPE};
pub use metadata::EncryptionMetadata;
pub use reader::DecryptionReader;
pub use secret_key_retriever::{
    encryption_key_from_secret, secret_key_config, SecretKeyRetriever,
    ENCRYPTION_KEY_SECRET_FIELD,
};
pub use writer::EncryptionWriter;

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Read, io::Write, sync::Arc};

    use super::*;
    use crate::secret_store::mem_store::MemSecretStore;

    const KEY: &str = "abcdefghijklmnopqrstuvwx";

    #[test]
    fn writer_output_feeds_reader_back_to_plaintext() {
        let mut writer = EncryptionWriter::new(Vec::new(), KEY).unwrap();
        writer.write_all(b"plaintext").unwrap();
        writer.close().unwrap();

        let ciphertext = writer.into_inner();
        assert_eq!(ciphertext.len(), NONCE_SIZE + "plaintext".len() + TAG_SIZE);

        let mut reader = DecryptionReader::new(ciphertext.as_slice(), KEY).unwrap();
        let mut plaintext = String::new();
        reader.read_to_string(&mut plaintext).unwrap();
        assert_eq!(plaintext, "plaintext");
    }

    #[test]
    fn backup_and_restore_through_retriever_and_metadata() {
        let store = Arc::new(MemSecretStore::new());
        store.insert(
            "encryption-key",
            "backup-ns",
            HashMap::from([(
                ENCRYPTION_KEY_SECRET_FIELD.to_string(),
                KEY.as_bytes().to_vec(),
            )]),
        );

        // Backup: resolve the key and seal the archive bytes.
        let config = secret_key_config("encryption-key", "backup-ns");
        let retriever =
            key_retriever_for(SECRET_RETRIEVER_TYPE, &config, store.clone()).unwrap();
        let key = retriever.get_key().unwrap();

        let mut writer = EncryptionWriter::new(Vec::new(), &key).unwrap();
        writer.write_all(b"serialized archive contents").unwrap();
        writer.close().unwrap();
        let ciphertext = writer.into_inner();

        let metadata = EncryptionMetadata::encrypted("encryption-key");

        // Restore: reconstruct the retriever from persisted metadata and the
        // round-tripped retriever config.
        assert!(metadata.is_encrypted);
        let restore_config =
            secret_key_config(&metadata.encryption_secret_name, "backup-ns");
        let restore_retriever =
            key_retriever_for(SECRET_RETRIEVER_TYPE, &restore_config, store).unwrap();
        assert_eq!(restore_retriever.config(), restore_config);

        let restore_key = restore_retriever.get_key().unwrap();
        let mut reader = DecryptionReader::new(ciphertext.as_slice(), &restore_key).unwrap();
        let mut plaintext = Vec::new();
        reader.read_to_end(&mut plaintext).unwrap();
        assert_eq!(plaintext, b"serialized archive contents");
    }
}
