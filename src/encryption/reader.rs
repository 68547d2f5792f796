use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::{ArcryptError, Result};

use super::encryptor::{AesGcmEncryptor, Encryptor};

/// Reader that eagerly consumes an entire ciphertext stream, decrypts it in
/// one call, and exposes the plaintext as an in-memory readable sequence.
///
/// Seeking back to the start re-reads the same plaintext.
pub struct DecryptionReader {
    plaintext: Cursor<Vec<u8>>,
}

impl DecryptionReader {
    /// Read `source` to its end and decrypt the contents with `key`.
    pub fn new<R: Read>(mut source: R, key: &str) -> Result<Self> {
        let encryptor = AesGcmEncryptor::new(key.as_bytes())?;

        let mut ciphertext = Vec::new();
        source
            .read_to_end(&mut ciphertext)
            .map_err(|source| ArcryptError::SourceRead { source })?;

        let plaintext = encryptor.decrypt(&ciphertext)?;
        Ok(DecryptionReader {
            plaintext: Cursor::new(plaintext),
        })
    }

    /// Decrypted payload length in bytes.
    pub fn len(&self) -> usize {
        self.plaintext.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plaintext.get_ref().is_empty()
    }
}

impl Read for DecryptionReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.plaintext.read(buf)
    }
}

impl Seek for DecryptionReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.plaintext.seek(pos)
    }
}
