//! # Store Configuration
//!
//! Settings read once when the cart store is created.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`KAYLIE_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after startup, so it is passed around by
//! reference and never locked.

use std::path::PathBuf;

use directories::ProjectDirs;
use kaylie_core::validation::validate_storage_key;
use kaylie_core::Money;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::file::FileStorage;

/// Storage key the storefront has always used for its cart.
pub const DEFAULT_STORAGE_KEY: &str = "kaylie-labs-cart";

/// Cart store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Storage slot the snapshot is written to.
    pub storage_key: String,

    /// Directory for file-backed storage.
    /// `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Currency symbol (for display)
    pub currency_symbol: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: None,
            currency_symbol: "$".to_string(),
        }
    }
}

impl StoreConfig {
    /// Creates a StoreConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `KAYLIE_CART_KEY`: Override the storage key
    /// - `KAYLIE_DATA_DIR`: Override the snapshot directory
    /// - `KAYLIE_CURRENCY_SYMBOL`: Override the display symbol
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = StoreConfig::default();

        if let Some(key) = lookup("KAYLIE_CART_KEY").filter(|k| !k.is_empty()) {
            config.storage_key = key;
        }

        if let Some(dir) = lookup("KAYLIE_DATA_DIR").filter(|d| !d.is_empty()) {
            config.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(symbol) = lookup("KAYLIE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        config
    }

    /// Checks settings that would otherwise fail on first use.
    pub fn validate(&self) -> StorageResult<()> {
        validate_storage_key(&self.storage_key)?;
        Ok(())
    }

    /// The configured data directory, or the platform default:
    /// - **macOS**: `~/Library/Application Support/com.kaylie-labs.storefront`
    /// - **Windows**: `%APPDATA%\kaylie-labs\storefront\data`
    /// - **Linux**: `~/.local/share/storefront`
    pub fn resolve_data_dir(&self) -> StorageResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        ProjectDirs::from("com", "kaylie-labs", "storefront")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDir)
    }

    /// Opens file storage in the resolved data directory.
    pub fn open_file_storage(&self) -> StorageResult<FileStorage> {
        FileStorage::open(self.resolve_data_dir()?)
    }

    /// Formats an amount using the configured symbol.
    ///
    /// Amounts are always cents, so two decimal places are printed.
    ///
    /// ## Example
    /// ```rust
    /// use kaylie_core::Money;
    /// use kaylie_store::StoreConfig;
    ///
    /// let config = StoreConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part()
        )
    }
}
