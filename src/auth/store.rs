use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use tracing::{debug, warn};

/// Credential slot file name in the storage directory
const CREDENTIAL_FILE: &str = "access_token";

/// Persisted bearer credential, one slot, fixed name.
///
/// The store is the only component that touches the slot; everything else
/// goes through `read`/`write`/`clear`. At most one credential is current
/// at any time - writing replaces, clearing removes.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage_dir: PathBuf,
}

impl CredentialStore {
    pub fn new(storage_dir: PathBuf) -> Self {
        Self { storage_dir }
    }

    /// The persisted credential, if present. I/O problems are logged and
    /// reported as absent; callers never branch on storage errors.
    pub fn read(&self) -> Option<String> {
        let path = self.credential_path();
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read credential slot");
                None
            }
        }
    }

    /// Persist the credential, replacing any existing one.
    pub fn write(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.storage_dir)
            .context("Failed to create credential storage directory")?;
        std::fs::write(self.credential_path(), token)
            .context("Failed to write credential slot")?;
        Ok(())
    }

    /// Remove the persisted credential. An already-empty slot is fine.
    pub fn clear(&self) -> Result<()> {
        let path = self.credential_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove credential slot")?;
        }
        Ok(())
    }

    /// Whether the credential's embedded expiry claim is still in the
    /// future. Pure and side-effect-free: a missing, malformed, or past
    /// `exp` claim yields `false`, never an error, and the network is
    /// never consulted.
    pub fn is_valid(token: &str) -> bool {
        match decode_exp_claim(token) {
            Some(exp) => {
                let now = Utc::now().timestamp();
                let valid = exp > now;
                debug!(exp, now, valid, "Credential expiry check");
                valid
            }
            None => {
                debug!("Credential has no readable exp claim, treating as invalid");
                false
            }
        }
    }

    fn credential_path(&self) -> PathBuf {
        self.storage_dir.join(CREDENTIAL_FILE)
    }
}

/// Decode the `exp` claim from a JWT payload without verifying the
/// signature. Verification belongs to the backend; this is only the local
/// staleness check.
fn decode_exp_claim(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let decoded = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    claims.get("exp")?.as_i64()
}
