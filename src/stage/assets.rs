//! Asset existence checks for local files and remote URIs

use std::fs::File;
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::assets;

/// Checks whether a remote asset can be opened
pub trait RemoteProbe: Send + Sync {
    fn exists(&self, uri: &str) -> bool;
}

impl<F> RemoteProbe for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn exists(&self, uri: &str) -> bool {
        self(uri)
    }
}

/// Decides whether an asset path refers to an existing, readable document
///
/// Paths starting with the remote prefix go through the configured
/// [`RemoteProbe`]; without one, remote assets are reported missing.
/// Everything else must be a regular local file that can be opened.
pub struct AssetLocator {
    remote_prefix: String,
    probe: Option<Box<dyn RemoteProbe>>,
}

impl AssetLocator {
    pub fn new(remote_prefix: impl Into<String>) -> Self {
        Self {
            remote_prefix: remote_prefix.into(),
            probe: None,
        }
    }

    pub fn with_probe(mut self, probe: impl RemoteProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn remote_prefix(&self) -> &str {
        &self.remote_prefix
    }

    pub fn is_remote(&self, asset_path: &str) -> bool {
        asset_path.starts_with(&self.remote_prefix)
    }

    pub fn exists(&self, asset_path: &str) -> bool {
        if asset_path.is_empty() {
            return false;
        }

        if self.is_remote(asset_path) {
            return match &self.probe {
                Some(probe) => probe.exists(asset_path),
                None => {
                    debug!("No remote probe configured, treating {} as missing", asset_path);
                    false
                }
            };
        }

        let path = Path::new(asset_path);
        path.is_file() && File::open(path).is_ok()
    }
}

impl Default for AssetLocator {
    fn default() -> Self {
        Self::new(assets::DEFAULT_REMOTE_PREFIX)
    }
}

impl std::fmt::Debug for AssetLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLocator")
            .field("remote_prefix", &self.remote_prefix)
            .field("probe", &self.probe.is_some())
            .finish()
    }
}

/// `<asset_root>/<brand>/01_Models/<model>/sku/<model>_<sku>.usd`
pub fn sku_payload_path(asset_root: &Path, brand: &str, model: &str, sku: &str) -> PathBuf {
    asset_root
        .join(brand)
        .join(assets::MODELS_FOLDER)
        .join(model)
        .join(assets::SKU_FOLDER)
        .join(format!("{}_{}.{}", model, sku, assets::PAYLOAD_EXTENSION))
}
