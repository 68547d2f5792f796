use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
    process,
    sync::Arc,
};

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::Parser;
use log::{error, info};

use arcrypt::{
    key_retriever_for, secret_key_config, ArcryptError, EncryptionMetadata, EncryptionWriter,
    FileSystemSecretStore, Result, SECRET_RETRIEVER_TYPE,
};

#[derive(Parser)]
#[command(
    name = "seal",
    version,
    author,
    about = "Encrypt a backup archive with a key fetched from a secret store.",
    long_about = r#"Encrypt a backup archive with AES-GCM.

The key is fetched from a file system secret store
(<root>/<namespace>/<name>.yaml) or passed directly as base64.

Examples:
  # Encrypt with a key from a secret store
  seal -s /etc/backup/secrets -n encryption-key --namespace backup-ns archive.tar archive.tar.enc

  # Encrypt with an explicit key and write a metadata sidecar
  seal -k YWJjZGVmZ2hpamtsbW5vcHFyc3R1dnd4 -m archive.meta.yaml archive.tar archive.tar.enc"#
)]
struct Args {
    /// Base64-encoded encryption key (alternative to the secret store).
    #[arg(short = 'k', long = "key", conflicts_with = "secret_store")]
    key: Option<String>,

    /// Root directory of the file system secret store.
    #[arg(short = 's', long = "secret-store", required_unless_present = "key")]
    secret_store: Option<PathBuf>,

    /// Name of the secret holding the encryption key.
    #[arg(short = 'n', long = "secret-name", required_unless_present = "key")]
    secret_name: Option<String>,

    /// Namespace the secret lives in.
    #[arg(long = "namespace", required_unless_present = "key")]
    namespace: Option<String>,

    /// Write an encryption metadata YAML sidecar to this path.
    #[arg(short = 'm', long = "metadata")]
    metadata: Option<PathBuf>,

    /// Input archive file.
    input: PathBuf,

    /// Output file for the encrypted archive.
    output: PathBuf,
}

fn resolve_key(args: &Args) -> Result<String> {
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

    let (Some(root), Some(secret_name), Some(namespace)) =
        (&args.secret_store, &args.secret_name, &args.namespace)
    else {
        return Err(ArcryptError::InvalidParameter {
            description: "either --key or --secret-store, --secret-name, and --namespace \
                          are required"
                .to_string(),
        });
    };

    let store = Arc::new(FileSystemSecretStore::new(root));
    let config = secret_key_config(secret_name, namespace);
    let retriever = key_retriever_for(SECRET_RETRIEVER_TYPE, &config, store)?;
    retriever.get_key()
}

fn seal(args: &Args, key: &str) -> Result<()> {
    let input = File::open(&args.input)?;
    let output = File::create(&args.output)?;

    let mut writer = EncryptionWriter::new(BufWriter::new(output), key)?;
    let copied = io::copy(&mut BufReader::new(input), &mut writer)?;
    writer.close()?;
    writer.into_inner().flush()?;
    info!("sealed {copied} bytes into {}", args.output.display());

    if let Some(path) = &args.metadata {
        let metadata =
            EncryptionMetadata::encrypted(args.secret_name.clone().unwrap_or_default());
        let yaml =
            serde_yaml::to_string(&metadata).map_err(|e| ArcryptError::InvalidParameter {
                description: format!("failed to serialize encryption metadata: {e}"),
            })?;
        fs::write(path, yaml)?;
        info!("wrote encryption metadata to {}", path.display());
    }

    Ok(())
}

fn main() {
    env_logger::builder().format_timestamp(None).init();
    let args = Args::parse();

    let key = match resolve_key(&args) {
        Ok(key) => key,
        Err(e) => {
            error!("Failed to resolve encryption key: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = seal(&args, &key) {
        error!("Failed to seal {}: {e}", args.input.display());
        process::exit(1);
    }
}
