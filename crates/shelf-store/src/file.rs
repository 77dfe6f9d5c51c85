//! # File Persistence
//!
//! A directory used as a key-value store: the cart under key `cart` lives
//! in `<dir>/cart.json`. Saves write a sibling temp file and rename it over
//! the slot, so readers see either the old cart or the new one.

use async_trait::async_trait;
use shelf_core::{decode_cart, encode_cart, Cart, CartPersistence, ShelfError, ShelfResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Maximum length of a storage key
const MAX_KEY_LEN: usize = 100;

/// JSON file persistence backend
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
    key: String,
}

impl FilePersistence {
    /// Create a backend storing `key` under `dir`.
    ///
    /// The directory is created lazily on first save.
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> ShelfResult<Self> {
        let key = key.into();
        if !is_valid_key(&key) {
            return Err(ShelfError::Configuration(format!(
                "invalid storage key '{}': use letters, digits, '-' or '_'",
                key
            )));
        }
        Ok(Self {
            dir: dir.into(),
            key,
        })
    }

    /// Path of the slot file
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", self.key))
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> ShelfError {
    ShelfError::Persistence(format!("{} {}: {}", action, path.display(), err))
}

#[async_trait]
impl CartPersistence for FilePersistence {
    #[instrument(skip(self), fields(path = %self.path().display()))]
    async fn load(&self) -> ShelfResult<Option<Cart>> {
        let path = self.path();
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => decode_cart(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No stored cart");
                Ok(None)
            }
            Err(e) => Err(io_error("read", &path, e)),
        }
    }

    #[instrument(skip(self, cart), fields(path = %self.path().display(), lines = cart.len()))]
    async fn save(&self, cart: &Cart) -> ShelfResult<()> {
        let encoded = encode_cart(cart)?;
        let path = self.path();
        let temp = self.temp_path();

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, e))?;
        tokio::fs::write(&temp, encoded)
            .await
            .map_err(|e| io_error("write", &temp, e))?;
        tokio::fs::rename(&temp, &path)
            .await
            .map_err(|e| io_error("rename", &path, e))?;

        debug!("Cart saved");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
