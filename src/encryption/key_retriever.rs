use std::{collections::HashMap, sync::Arc};

use crate::{secret_store::SecretStore, ArcryptError, Result};

use super::secret_key_retriever::SecretKeyRetriever;

/// Retriever-type tag for keys fetched from a secret store.
pub const SECRET_RETRIEVER_TYPE: &str = "secret";

/// Flat string mapping describing where a retriever finds its key.
pub type RetrieverConfig = HashMap<String, String>;

/// Capability to fetch an encryption key from a named external source.
pub trait KeyRetriever {
    /// Fetch the encryption key.
    fn get_key(&self) -> Result<String>;
    /// Tag designating the source this retriever fetches the key from.
    fn retriever_type(&self) -> &'static str;
    /// Configuration another retriever of the same type can use to fetch
    /// the same key.
    fn config(&self) -> RetrieverConfig;
}

/// Create a [`KeyRetriever`] of the given type according to the given
/// configuration.
pub fn key_retriever_for(
    retriever_type: &str,
    config: &RetrieverConfig,
    store: Arc<dyn SecretStore>,
) -> Result<Box<dyn KeyRetriever>> {
    let retriever: Result<Box<dyn KeyRetriever>> = match retriever_type {
        SECRET_RETRIEVER_TYPE => SecretKeyRetriever::new(store, config)
            .map(|retriever| Box::new(retriever) as Box<dyn KeyRetriever>),
        unknown => Err(ArcryptError::UnknownRetrieverType {
            retriever_type: unknown.to_string(),
        }),
    };

    retriever.map_err(|source| ArcryptError::KeyRetrieverConstruction {
        retriever_type: retriever_type.to_string(),
        source: Box::new(source),
    })
}
