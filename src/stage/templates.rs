//! Camera, light and backdrop templates

use std::fmt;
use std::path::{Path, PathBuf};

use stagehand_core::Document;

use super::assets::AssetLocator;
use super::hierarchy::ensure_bootstrap;
use super::reference::{attach, AttachResult};
use crate::constants::{assets, layout};
use crate::error::{Result, StageError};

/// A studio template that can be referenced into the setup scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Brand-specific camera rig
    Camera { brand: String },
    Lights,
    /// Backdrop
    Limbo,
}

impl Template {
    /// Node the template is attached to
    pub fn target_path(&self) -> &'static str {
        match self {
            Template::Camera { .. } => layout::CAMERAS_PATH,
            Template::Lights => layout::LIGHTS_PATH,
            Template::Limbo => layout::LIMBO_PATH,
        }
    }

    /// Template file below `templates_dir`
    pub fn asset_path(&self, templates_dir: &Path) -> Result<PathBuf> {
        let library = templates_dir.join(assets::TEMPLATE_FOLDER);
        match self {
            Template::Camera { brand } => {
                if brand.trim().is_empty() {
                    return Err(StageError::InvalidArgument(
                        "camera template needs a brand".to_string(),
                    ));
                }
                Ok(library
                    .join("camera")
                    .join(format!("{}_cam.usd", brand.trim().replace(' ', "_"))))
            }
            Template::Lights => Ok(library.join("lights.usd")),
            Template::Limbo => Ok(library.join("limbo.usd")),
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Camera { brand } => write!(f, "{} camera", brand),
            Template::Lights => write!(f, "lights"),
            Template::Limbo => write!(f, "limbo"),
        }
    }
}

/// Bootstrap the document and attach a template at its setup location
pub fn import_template(
    document: &mut Document,
    locator: &AssetLocator,
    templates_dir: &Path,
    template: &Template,
) -> AttachResult {
    let asset_path = template.asset_path(templates_dir)?;
    ensure_bootstrap(document)?;
    attach(
        document,
        locator,
        template.target_path(),
        &asset_path.to_string_lossy(),
        "",
    )
}
