use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroize;

use crate::crypto::{self, KdfParams};
use crate::models::AppData;

const VAULT_FILE: &str = "data.lune";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("crypto error: {0}")]
    Crypto(#[from] crypto::CryptoError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Encrypted `AppData` file inside a data directory.
#[derive(Debug, Clone)]
pub struct Vault {
    path: PathBuf,
    kdf: KdfParams,
}

impl Vault {
    pub fn new(data_dir: &Path, kdf: KdfParams) -> Self {
        Self {
            path: data_dir.join(VAULT_FILE),
            kdf,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if a vault exists (i.e., the tracker has been set up before).
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Save app data encrypted with the given passphrase.
    pub fn save(&self, passphrase: &str, data: &AppData) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut json = serde_json::to_vec(data)?;
        let sealed = crypto::encrypt(passphrase, &json, self.kdf);
        json.zeroize();

        // Write then rename so a crash never leaves a half-written vault.
        let tmp = self.path.with_extension("lune.tmp");
        fs::write(&tmp, sealed?)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "vault saved");
        Ok(())
    }

    /// Load and decrypt app data with the given passphrase.
    pub fn load(&self, passphrase: &str) -> Result<AppData, StorageError> {
        let sealed = fs::read(&self.path)?;
        let mut json = crypto::decrypt(passphrase, &sealed)?;
        let data: Result<AppData, _> = serde_json::from_slice(&json);
        json.zeroize();
        tracing::debug!(path = %self.path.display(), "vault loaded");
        Ok(data?)
    }

    /// Delete all data permanently.
    pub fn wipe(&self) -> Result<(), StorageError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            tracing::info!(path = %self.path.display(), "vault wiped");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CycleEvent;
    use chrono::NaiveDate;

    const FAST: KdfParams = KdfParams {
        memory_kib: 256,
        iterations: 1,
    };

    #[test]
    fn save_load_wipe() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(&dir.path().join("nested"), FAST);
        assert!(!vault.exists());

        let mut data = AppData::default();
        data.periods
            .push(CycleEvent::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        vault.save("pass", &data).unwrap();
        assert!(vault.exists());

        let loaded = vault.load("pass").unwrap();
        assert_eq!(loaded.periods, data.periods);
        assert_eq!(loaded.settings.cycle.cycle_length, 28);

        assert!(matches!(
            vault.load("nope"),
            Err(StorageError::Crypto(crypto::CryptoError::Decryption))
        ));

        vault.wipe().unwrap();
        assert!(!vault.exists());
        vault.wipe().unwrap();
    }

    #[test]
    fn file_on_disk_is_not_plaintext() {
        let dir = tempfile::tempdir().unwrap();
        let vault = Vault::new(dir.path(), FAST);
        vault.save("pass", &AppData::default()).unwrap();
        let raw = fs::read(vault.path()).unwrap();
        assert!(!String::from_utf8_lossy(&raw).contains("cycle_length"));
    }
}
