use std::sync::Arc;

use log::debug;

use crate::{secret_store::SecretStore, ArcryptError, Result};

use super::key_retriever::{KeyRetriever, RetrieverConfig, SECRET_RETRIEVER_TYPE};

/// Field inside a secret's data map that holds the encryption key.
pub const ENCRYPTION_KEY_SECRET_FIELD: &str = "encryptionKey";

const CONFIG_SECRET_NAME_KEY: &str = "secretName";
const CONFIG_NAMESPACE_KEY: &str = "namespace";

/// Fetches the encryption key from a named secret in a [`SecretStore`].
pub struct SecretKeyRetriever {
    store: Arc<dyn SecretStore>,
    secret_name: String,
    namespace: String,
}

impl SecretKeyRetriever {
    /// Create a retriever from a config carrying `secretName` and
    /// `namespace`, both required non-empty.
    pub fn new(store: Arc<dyn SecretStore>, config: &RetrieverConfig) -> Result<Self> {
        let secret_name = config
            .get(CONFIG_SECRET_NAME_KEY)
            .filter(|name| !name.is_empty())
            .ok_or(ArcryptError::EmptySecretName)?
            .clone();
        let namespace = config
            .get(CONFIG_NAMESPACE_KEY)
            .filter(|namespace| !namespace.is_empty())
            .ok_or(ArcryptError::EmptyNamespace)?
            .clone();

        Ok(SecretKeyRetriever {
            store,
            secret_name,
            namespace,
        })
    }
}

impl KeyRetriever for SecretKeyRetriever {
    /// Every call re-fetches the secret; keys are never cached.
    fn get_key(&self) -> Result<String> {
        encryption_key_from_secret(self.store.as_ref(), &self.secret_name, &self.namespace)
    }

    fn retriever_type(&self) -> &'static str {
        SECRET_RETRIEVER_TYPE
    }

    fn config(&self) -> RetrieverConfig {
        secret_key_config(&self.secret_name, &self.namespace)
    }
}

/// Build the retriever config for a key stored in a secret.
pub fn secret_key_config(secret_name: &str, namespace: &str) -> RetrieverConfig {
    RetrieverConfig::from([
        (CONFIG_SECRET_NAME_KEY.to_string(), secret_name.to_string()),
        (CONFIG_NAMESPACE_KEY.to_string(), namespace.to_string()),
    ])
}

/// Fetch the encryption key field from the named secret.
pub fn encryption_key_from_secret(
    store: &dyn SecretStore,
    secret_name: &str,
    namespace: &str,
) -> Result<String> {
    debug!("fetching encryption key from secret '{namespace}/{secret_name}'");

    let secret =
        store
            .get_secret(secret_name, namespace)
            .map_err(|source| ArcryptError::SecretNotFound {
                secret_name: secret_name.to_string(),
                source: Box::new(source),
            })?;

    let key = secret
        .data()
        .get(ENCRYPTION_KEY_SECRET_FIELD)
        .ok_or_else(|| ArcryptError::SecretFieldMissing {
            secret_name: secret_name.to_string(),
            field: ENCRYPTION_KEY_SECRET_FIELD.to_string(),
        })?;

    String::from_utf8(key.clone()).map_err(|_| ArcryptError::InvalidParameter {
        description: format!("encryption key in secret '{secret_name}' is not valid UTF-8"),
    })
}
