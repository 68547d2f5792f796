use std::io::{self, Write};

use log::debug;
use zeroize::Zeroize;

use crate::{ArcryptError, Result};

use super::encryptor::{AesGcmEncryptor, Encryptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    /// Accepting writes; nothing has been encrypted yet.
    Open,
    /// Plaintext encrypted, ciphertext not yet delivered to the sink.
    Sealed,
    /// Ciphertext written to the sink.
    Delivered,
}

/// Writer that buffers everything written to it and encrypts the whole
/// buffer in one call when closed, emitting the ciphertext to the wrapped
/// sink.
///
/// Nothing reaches the sink before [`EncryptionWriter::close`]. Closing
/// encrypts at most once per writer lifetime, which keeps the nonce drawn
/// for that call unique to this payload.
pub struct EncryptionWriter<W: Write> {
    encryptor: Box<dyn Encryptor>,
    plaintext: Vec<u8>,
    out: W,
    state: WriterState,
}

impl<W: Write> EncryptionWriter<W> {
    /// Create a writer that encrypts into `out` with the given key.
    pub fn new(out: W, key: &str) -> Result<Self> {
        let encryptor = AesGcmEncryptor::new(key.as_bytes())?;
        Ok(Self::with_encryptor(out, Box::new(encryptor)))
    }

    /// Create a writer with an explicit encryptor.
    pub fn with_encryptor(out: W, encryptor: Box<dyn Encryptor>) -> Self {
        EncryptionWriter {
            encryptor,
            plaintext: Vec::new(),
            out,
            state: WriterState::Open,
        }
    }

    /// Encrypt the buffered plaintext once and write the ciphertext to the
    /// sink.
    ///
    /// Idempotent: closing an already-closed writer is a no-op returning
    /// success. If encryption fails the writer stays open and close may be
    /// retried (a fresh nonce is drawn). If the sink write fails the writer
    /// is already closed: the plaintext has been consumed and a retried
    /// close will not encrypt again.
    pub fn close(&mut self) -> Result<()> {
        if self.state != WriterState::Open {
            return Ok(());
        }

        let ciphertext = self.encryptor.encrypt(&self.plaintext)?;
        self.state = WriterState::Sealed;
        debug!(
            "sealed {} plaintext bytes into {} ciphertext bytes",
            self.plaintext.len(),
            ciphertext.len()
        );
        self.plaintext.zeroize();

        self.out
            .write_all(&ciphertext)
            .map_err(|source| ArcryptError::SinkWrite { source })?;
        self.state = WriterState::Delivered;
        Ok(())
    }

    /// Whether the writer no longer accepts writes.
    pub fn is_closed(&self) -> bool {
        self.state != WriterState::Open
    }

    /// Borrow the wrapped sink.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Consume the writer, returning the wrapped sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Write for EncryptionWriter<W> {
    /// Appends to the internal buffer; never a short write.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.state != WriterState::Open {
            return Err(io::Error::other(ArcryptError::WriterClosed));
        }
        self.plaintext.extend_from_slice(buf);
        Ok(buf.len())
    }

    /// No-op: bytes only reach the sink on close.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
