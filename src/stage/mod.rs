//! Hierarchy, reference and visibility operations on a scene document
//!
//! Every operation takes the document explicitly. Paths are resolved by
//! [`paths`], nodes are created by [`hierarchy`], assets are attached by
//! [`reference`] and scopes are isolated by [`visibility`].

pub mod assets;
pub mod hierarchy;
pub mod paths;
pub mod reference;
pub mod scopes;
pub mod templates;
pub mod visibility;

pub use assets::{sku_payload_path, AssetLocator, RemoteProbe};
pub use hierarchy::{classify_segment, ensure_bootstrap, ensure_hierarchy, ensure_path, parse_target};
pub use paths::{resolve_path, CanonicalPath};
pub use reference::{attach, AttachResult, AttachedReference};
pub use scopes::selectable_scopes;
pub use templates::{import_template, Template};
pub use visibility::{isolate, VisibilityReport};
