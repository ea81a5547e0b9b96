//! Stagehand - scene hierarchy tools for product imagery
//!
//! Builds the canonical model hierarchy in a scene document, attaches asset
//! payloads and templates, isolates one SKU at a time for capture and drives
//! the capture queue.

pub mod capture;
pub mod config;
pub mod constants;
pub mod error;
pub mod file_manager;
pub mod host;
pub mod notify;
pub mod stage;
pub mod tools;

pub use capture::{
    wait_for_outputs, CaptureOutcome, CapturePlan, FrameCapturer, FrameRange, PollPolicy,
    QueueResult, RenderQueue,
};
pub use config::Config;
pub use error::{Result, StageError};
pub use file_manager::FileManager;
pub use host::{require_document, DocumentHost};
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier, Severity};
pub use stage::{AssetLocator, AttachResult, AttachedReference, CanonicalPath, Template, VisibilityReport};
pub use tools::StageTools;

pub use stagehand_core::{Document, NodeId, NodeKind, NodePath};
