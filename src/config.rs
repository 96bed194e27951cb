// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! persisted wallet record.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `OCTRA_WEBUI_HOST` | Bridge bind address | `127.0.0.1` |
//! | `OCTRA_WEBUI_PORT` | Bridge bind port | `8765` |
//! | `OCTRA_WEBUI_DIR` | Directory holding the browser UI | `webui` |
//! | `OCTRA_WALLET_PATH` | Explicit wallet file location | `~/.octra/wallet.json`, then `./wallet.json` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=info` |
//!
//! ## Wallet Record
//!
//! ```json
//! { "priv": "<base64 secret>", "addr": "oct...", "rpc": "https://octra.network" }
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const HOST_ENV: &str = "OCTRA_WEBUI_HOST";
pub const PORT_ENV: &str = "OCTRA_WEBUI_PORT";
pub const WEBUI_DIR_ENV: &str = "OCTRA_WEBUI_DIR";
pub const WALLET_PATH_ENV: &str = "OCTRA_WALLET_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_WEBUI_DIR: &str = "webui";

/// RPC node used when the wallet record does not name one.
pub const DEFAULT_RPC_URL: &str = "https://octra.network";

const WALLET_FILE_NAME: &str = "wallet.json";
const WALLET_HOME_DIR: &str = ".octra";

/// Listener and UI settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub webui_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = std::env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var(PORT_ENV)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let webui_dir = std::env::var(WEBUI_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEBUI_DIR));

        Self {
            host,
            port,
            webui_dir,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Persisted wallet record (`wallet.json`).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Base64 secret key.
    #[serde(rename = "priv", default)]
    pub priv_key: String,
    /// Account address.
    #[serde(default)]
    pub addr: String,
    /// RPC base URL.
    #[serde(default = "default_rpc")]
    pub rpc: String,
}

fn default_rpc() -> String {
    DEFAULT_RPC_URL.to_string()
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("priv", &"<redacted>")
            .field("addr", &self.addr)
            .field("rpc", &self.rpc)
            .finish()
    }
}

/// Errors reading or writing the wallet file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Location of the wallet file.
#[derive(Debug, Clone)]
pub struct WalletStore {
    path: PathBuf,
}

impl WalletStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Resolve the wallet file: `OCTRA_WALLET_PATH`, then the per-user
    /// `~/.octra/wallet.json` if it exists, then `./wallet.json`.
    pub fn discover() -> Self {
        if let Ok(path) = std::env::var(WALLET_PATH_ENV) {
            return Self::new(path);
        }

        let home = dirs::home_dir().map(|home| home.join(WALLET_HOME_DIR).join(WALLET_FILE_NAME));
        match home {
            Some(path) if path.is_file() => Self::new(path),
            _ => Self::new(WALLET_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the wallet record. A missing file is `Ok(None)`.
    pub fn load(&self) -> Result<Option<WalletRecord>, ConfigError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&data)?))
    }

    /// Write the wallet record, pretty-printed (atomic write via rename).
    pub fn save(&self, record: &WalletRecord) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        match fs::remove_file(&temp_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        {
            let file = create_private(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// Create a new file readable and writable by the owner only.
#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}
