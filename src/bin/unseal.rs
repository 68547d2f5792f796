use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::Parser;
use log::{error, info};

use arcrypt::{
    key_retriever_for, secret_key_config, ArcryptError, DecryptionReader, EncryptionMetadata,
    FileSystemSecretStore, Result, SECRET_RETRIEVER_TYPE,
};

#[derive(Parser)]
#[command(
    name = "unseal",
    version,
    author,
    about = "Decrypt a backup archive encrypted by seal.",
    long_about = r#"Decrypt a backup archive encrypted by seal.

The key is fetched from a file system secret store
(<root>/<namespace>/<name>.yaml) or passed directly as base64. With a
metadata sidecar the secret name is taken from there, and an unencrypted
backup is copied through unchanged.

Examples:
  # Decrypt with a key from a secret store
  unseal -s /etc/backup/secrets -n encryption-key --namespace backup-ns archive.tar.enc archive.tar

  # Decrypt using a metadata sidecar
  unseal -s /etc/backup/secrets --namespace backup-ns -m archive.meta.yaml archive.tar.enc archive.tar"#
)]
struct Args {
    /// Base64-encoded encryption key (alternative to the secret store).
    #[arg(short = 'k', long = "key", conflicts_with = "secret_store")]
    key: Option<String>,

    /// Root directory of the file system secret store.
    #[arg(short = 's', long = "secret-store", required_unless_present = "key")]
    secret_store: Option<PathBuf>,

    /// Name of the secret holding the encryption key.
    #[arg(
        short = 'n',
        long = "secret-name",
        required_unless_present_any = ["key", "metadata"]
    )]
    secret_name: Option<String>,

    /// Namespace the secret lives in.
    #[arg(long = "namespace", required_unless_present = "key")]
    namespace: Option<String>,

    /// Read the encryption metadata YAML sidecar from this path.
    #[arg(short = 'm', long = "metadata")]
    metadata: Option<PathBuf>,

    /// Input encrypted archive file.
    input: PathBuf,

    /// Output file for the decrypted archive.
    output: PathBuf,
}

fn load_metadata(path: &Path) -> Result<EncryptionMetadata> {
    let file = File::open(path)?;
    serde_yaml::from_reader(file).map_err(|e| ArcryptError::InvalidParameter {
        description: format!("failed to parse encryption metadata {}: {e}", path.display()),
    })
}

fn resolve_key(args: &Args, metadata: Option<&EncryptionMetadata>) -> Result<String> {
    if let Some(encoded) = &args.key {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ArcryptError::InvalidParameter {
                description: format!("key is not valid base64: {e}"),
            })?;
        return String::from_utf8(bytes).map_err(|_| ArcryptError::InvalidParameter {
            description: "decoded key is not valid UTF-8".to_string(),
        });
    }

    let secret_name = args
        .secret_name
        .clone()
        .or_else(|| metadata.map(|m| m.encryption_secret_name.clone()))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ArcryptError::InvalidParameter {
            description: "no secret name given on the command line or in the metadata".to_string(),
        })?;

    let (Some(root), Some(namespace)) = (&args.secret_store, &args.namespace) else {
        return Err(ArcryptError::InvalidParameter {
            description: "either --key or --secret-store and --namespace are required".to_string(),
        });
    };

    let store = Arc::new(FileSystemSecretStore::new(root));
    let config = secret_key_config(&secret_name, namespace);
    let retriever = key_retriever_for(SECRET_RETRIEVER_TYPE, &config, store)?;
    retriever.get_key()
}

fn unseal(args: &Args, key: &str) -> Result<()> {
    let input = File::open(&args.input)?;
    let mut reader = DecryptionReader::new(BufReader::new(input), key)?;

    let output = File::create(&args.output)?;
    let mut writer = BufWriter::new(output);
    let copied = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    info!("restored {copied} plaintext bytes into {}", args.output.display());
    Ok(())
}

fn copy_through(args: &Args) -> Result<()> {
    let mut input = File::open(&args.input)?;
    let mut output = File::create(&args.output)?;
    io::copy(&mut input, &mut output)?;
    Ok(())
}

fn main() {
    env_logger::builder().format_timestamp(None).init();
    let args = Args::parse();

    let metadata = match &args.metadata {
        Some(path) => match load_metadata(path) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                error!("Failed to load encryption metadata: {e}");
                process::exit(1);
            }
        },
        None => None,
    };

    if let Some(metadata) = &metadata {
        if !metadata.is_encrypted {
            info!("backup is not encrypted; copying input through unchanged");
            if let Err(e) = copy_through(&args) {
                error!("Failed to copy {}: {e}", args.input.display());
                process::exit(1);
            }
            return;
        }
    }

    let key = match resolve_key(&args, metadata.as_ref()) {
        Ok(key) => key,
        Err(e) => {
            error!("Failed to resolve encryption key: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = unseal(&args, &key) {
        error!("Failed to unseal {}: {e}", args.input.display());
        process::exit(1);
    }
}
