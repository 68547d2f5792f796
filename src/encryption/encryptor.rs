use aes::Aes192;
use aes_gcm::{
    aead::{consts::U12, Aead, KeyInit},
    Aes128Gcm, Aes256Gcm, AesGcm, Nonce,
};
use rand::{rngs::OsRng, RngCore};

use crate::{ArcryptError, Result};

/// AES-GCM nonce length in bytes, prefixed to every ciphertext.
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag length in bytes, appended by the seal operation.
pub const TAG_SIZE: usize = 16;

// The aes-gcm crate predefines the 128- and 256-bit variants only.
type Aes192Gcm = AesGcm<Aes192, U12>;

type GcmNonce = Nonce<U12>;

/// Authenticated encryption and decryption of whole byte blobs.
pub trait Encryptor {
    /// Encrypt `plaintext`, returning `nonce || sealed` with a fresh random nonce.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;
    /// Decrypt data produced by [`Encryptor::encrypt`].
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

enum GcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

impl GcmCipher {
    fn seal(&self, nonce: &GcmNonce, plaintext: &[u8]) -> aes_gcm::aead::Result<Vec<u8>> {
        match self {
            GcmCipher::Aes128(cipher) => cipher.encrypt(nonce, plaintext),
            GcmCipher::Aes192(cipher) => cipher.encrypt(nonce, plaintext),
            GcmCipher::Aes256(cipher) => cipher.encrypt(nonce, plaintext),
        }
    }

    fn open(&self, nonce: &GcmNonce, sealed: &[u8]) -> aes_gcm::aead::Result<Vec<u8>> {
        match self {
            GcmCipher::Aes128(cipher) => cipher.decrypt(nonce, sealed),
            GcmCipher::Aes192(cipher) => cipher.decrypt(nonce, sealed),
            GcmCipher::Aes256(cipher) => cipher.decrypt(nonce, sealed),
        }
    }
}

/// AES-GCM encryptor; the key length selects AES-128, -192, or -256.
pub struct AesGcmEncryptor {
    cipher: GcmCipher,
}

impl AesGcmEncryptor {
    /// Build an encryptor from raw key material. The key is used directly;
    /// any length other than 16, 24, or 32 bytes is rejected.
    pub fn new(key: &[u8]) -> Result<Self> {
        let cipher = match key.len() {
            16 => GcmCipher::Aes128(Aes128Gcm::new_from_slice(key).map_err(cipher_init_error)?),
            24 => GcmCipher::Aes192(Aes192Gcm::new_from_slice(key).map_err(cipher_init_error)?),
            32 => GcmCipher::Aes256(Aes256Gcm::new_from_slice(key).map_err(cipher_init_error)?),
            size => return Err(ArcryptError::InvalidKeySize { size }),
        };
        Ok(AesGcmEncryptor { cipher })
    }
}

fn cipher_init_error(e: impl std::fmt::Display) -> ArcryptError {
    ArcryptError::CipherInit {
        description: e.to_string(),
    }
}

impl Encryptor for AesGcmEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        // A fresh random nonce per call; GCM nonce reuse under the same key
        // breaks both confidentiality and integrity.
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| ArcryptError::NonceGeneration {
                description: e.to_string(),
            })?;
        let nonce = GcmNonce::from(nonce_bytes);

        let sealed = self
            .cipher
            .seal(&nonce, plaintext)
            .map_err(|e| ArcryptError::Encryption {
                description: e.to_string(),
            })?;

        let mut ciphertext = Vec::with_capacity(NONCE_SIZE + sealed.len());
        ciphertext.extend_from_slice(&nonce_bytes);
        ciphertext.extend_from_slice(&sealed);
        Ok(ciphertext)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() <= NONCE_SIZE {
            return Err(ArcryptError::CiphertextTooShort {
                length: ciphertext.len(),
            });
        }

        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_SIZE);
        let nonce = GcmNonce::from_slice(nonce_bytes);
        self.cipher
            .open(nonce, sealed)
            .map_err(|_| ArcryptError::Authentication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_24: &[u8] = b"abcdefghijklmnopqrstuvwx";

    #[test]
    fn rejects_invalid_key_size() {
        let result = AesGcmEncryptor::new(b"invalid");
        assert!(matches!(
            result,
            Err(ArcryptError::InvalidKeySize { size: 7 })
        ));
    }

    #[test]
    fn round_trips_all_key_sizes() {
        for key_len in [16usize, 24, 32] {
            let key = vec![0x42u8; key_len];
            let encryptor = AesGcmEncryptor::new(&key).unwrap();
            let ciphertext = encryptor.encrypt(b"plaintext").unwrap();
            let plaintext = encryptor.decrypt(&ciphertext).unwrap();
            assert_eq!(plaintext, b"plaintext");
        }
    }

    #[test]
    fn ciphertext_has_nonce_plus_payload_plus_tag_length() {
        let encryptor = AesGcmEncryptor::new(KEY_24).unwrap();
        let ciphertext = encryptor.encrypt(b"plaintext").unwrap();
        assert_eq!(ciphertext.len(), NONCE_SIZE + "plaintext".len() + TAG_SIZE);
    }

    #[test]
    fn successive_encrypts_use_distinct_nonces() {
        let encryptor = AesGcmEncryptor::new(KEY_24).unwrap();
        let first = encryptor.encrypt(b"plaintext").unwrap();
        let second = encryptor.encrypt(b"plaintext").unwrap();

        assert_ne!(first, second);
        assert_ne!(first[..NONCE_SIZE], second[..NONCE_SIZE]);
        assert_eq!(encryptor.decrypt(&first).unwrap(), b"plaintext");
        assert_eq!(encryptor.decrypt(&second).unwrap(), b"plaintext");
    }

    #[test]
    fn detects_tampering_at_every_byte_position() {
        let encryptor = AesGcmEncryptor::new(KEY_24).unwrap();
        let ciphertext = encryptor.encrypt(b"plaintext").unwrap();

        for position in 0..ciphertext.len() {
            let mut tampered = ciphertext.clone();
            tampered[position] ^= 0x01;
            let result = encryptor.decrypt(&tampered);
            assert!(
                matches!(result, Err(ArcryptError::Authentication)),
                "flipped byte {} went undetected",
                position
            );
        }
    }

    #[test]
    fn rejects_too_short_ciphertext() {
        let encryptor = AesGcmEncryptor::new(KEY_24).unwrap();

        let result = encryptor.decrypt(b"short");
        assert!(matches!(
            result,
            Err(ArcryptError::CiphertextTooShort { length: 5 })
        ));
        let rendered = result.unwrap_err().to_string();
        assert!(rendered.contains("length 5"));

        // Exactly nonce-sized input carries no sealed data at all.
        let result = encryptor.decrypt(&[0u8; NONCE_SIZE]);
        assert!(matches!(
            result,
            Err(ArcryptError::CiphertextTooShort { length: 12 })
        ));
    }

    #[test]
    fn rejects_wrong_key() {
        let encryptor = AesGcmEncryptor::new(KEY_24).unwrap();
        let ciphertext = encryptor.encrypt(b"plaintext").unwrap();

        let other = AesGcmEncryptor::new(b"xwvutsrqponmlkjihgfedcba").unwrap();
        assert!(matches!(
            other.decrypt(&ciphertext),
            Err(ArcryptError::Authentication)
        ));
    }
}
