use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use argon2::{self, Argon2, Params};
use rand::RngCore;
use zeroize::Zeroize;

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const MAGIC: &[u8; 4] = b"LUNE";
const FORMAT_VERSION: u8 = 1;
/// magic (4) || version (1) || m_cost (4, LE) || t_cost (4, LE)
const HEADER_LEN: usize = MAGIC.len() + 1 + 4 + 4;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("key derivation failed")]
    KeyDerivation,
    #[error("encryption failed")]
    Encryption,
    #[error("decryption failed: wrong passphrase or corrupted vault")]
    Decryption,
    #[error("not a vault file")]
    InvalidFormat,
    #[error("unsupported vault version {0}")]
    UnsupportedVersion(u8),
}

/// Argon2id cost. Stored in the vault header so a vault always opens with
/// the parameters it was sealed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
        }
    }
}

fn derive_key(passphrase: &str, salt: &[u8], kdf: KdfParams) -> Result<[u8; KEY_LEN], CryptoError> {
    let params = Params::new(kdf.memory_kib, kdf.iterations, 1, Some(KEY_LEN))
        .map_err(|_| CryptoError::KeyDerivation)?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|_| CryptoError::KeyDerivation)?;

    Ok(key)
}

fn encode_header(kdf: KdfParams) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];
    header[..4].copy_from_slice(MAGIC);
    header[4] = FORMAT_VERSION;
    header[5..9].copy_from_slice(&kdf.memory_kib.to_le_bytes());
    header[9..13].copy_from_slice(&kdf.iterations.to_le_bytes());
    header
}

fn decode_header(header: &[u8]) -> Result<KdfParams, CryptoError> {
    if header.len() != HEADER_LEN || &header[..4] != MAGIC {
        return Err(CryptoError::InvalidFormat);
    }
    if header[4] != FORMAT_VERSION {
        return Err(CryptoError::UnsupportedVersion(header[4]));
    }
    let word = |at: usize| {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&header[at..at + 4]);
        u32::from_le_bytes(buf)
    };
    Ok(KdfParams {
        memory_kib: word(5),
        iterations: word(9),
    })
}

/// Seal plaintext under a passphrase.
/// Returns: header || salt (32) || nonce (12) || ciphertext, with the header
/// authenticated as associated data.
pub fn encrypt(passphrase: &str, plaintext: &[u8], kdf: KdfParams) -> Result<Vec<u8>, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    rand::thread_rng().fill_bytes(&mut nonce_bytes);

    let header = encode_header(kdf);
    let mut key = derive_key(passphrase, &salt, kdf)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::Encryption);
    key.zeroize();
    let cipher = cipher?;

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: &header,
            },
        )
        .map_err(|_| CryptoError::Encryption)?;

    let mut output = Vec::with_capacity(HEADER_LEN + SALT_LEN + NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&header);
    output.extend_from_slice(&salt);
    output.extend_from_slice(&nonce_bytes);
    output.extend_from_slice(&ciphertext);

    Ok(output)
}

/// Open data sealed by `encrypt`.
pub fn decrypt(passphrase: &str, sealed: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < HEADER_LEN + SALT_LEN + NONCE_LEN {
        return Err(CryptoError::InvalidFormat);
    }

    let (header, rest) = sealed.split_at(HEADER_LEN);
    let kdf = decode_header(header)?;
    let (salt, rest) = rest.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let mut key = derive_key(passphrase, salt, kdf)?;
    let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CryptoError::Decryption);
    key.zeroize();

    cipher?
        .decrypt(
            Nonce::from_slice(nonce_bytes),
            Payload {
                msg: ciphertext,
                aad: header,
            },
        )
        .map_err(|_| CryptoError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        memory_kib: 256,
        iterations: 1,
    };

    #[test]
    fn sealed_vault_opens_with_same_passphrase() {
        let sealed = encrypt("test-passphrase-123", b"hello lune", FAST).unwrap();
        assert_eq!(&sealed[..4], MAGIC);
        assert_eq!(decrypt("test-passphrase-123", &sealed).unwrap(), b"hello lune");
    }

    #[test]
    fn wrong_passphrase_fails() {
        let sealed = encrypt("correct", b"secret data", FAST).unwrap();
        assert!(matches!(decrypt("wrong", &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn tampered_header_fails_authentication() {
        let mut sealed = encrypt("pass", b"secret data", FAST).unwrap();
        // Bump iterations: header still parses but no longer matches the AAD.
        sealed[9] = 2;
        assert!(matches!(decrypt("pass", &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn truncated_or_foreign_data_is_rejected() {
        assert!(matches!(decrypt("any", &[0u8; 10]), Err(CryptoError::InvalidFormat)));

        let mut sealed = encrypt("pass", b"x", FAST).unwrap();
        sealed[4] = 9;
        assert!(matches!(
            decrypt("pass", &sealed),
            Err(CryptoError::UnsupportedVersion(9))
        ));
        sealed[0] = b'X';
        assert!(matches!(decrypt("pass", &sealed), Err(CryptoError::InvalidFormat)));
    }
}
