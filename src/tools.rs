//! User-facing entry points
//!
//! [`StageTools`] wraps the [`crate::stage`] operations for a UI or CLI: it
//! resolves the active document, supplies configuration and turns every
//! outcome into a notification.

use std::path::Path;

use log::error;
use stagehand_core::NodeId;
use tokio_util::sync::CancellationToken;

use crate::capture::{CaptureOutcome, CapturePlan, FrameCapturer, QueueResult, RenderQueue};
use crate::config::Config;
use crate::error::{Result, StageError};
use crate::host::{require_document, DocumentHost};
use crate::notify::{LogNotifier, Notification, Notifier};
use crate::stage::{
    self, sku_payload_path, AssetLocator, AttachResult, CanonicalPath, Template, VisibilityReport,
};

/// Configured facade over the stage operations
pub struct StageTools<N: Notifier = LogNotifier> {
    config: Config,
    locator: AssetLocator,
    notifier: N,
}

impl StageTools<LogNotifier> {
    pub fn new(config: Config) -> Self {
        Self::with_notifier(config, LogNotifier)
    }
}

impl<N: Notifier> StageTools<N> {
    pub fn with_notifier(config: Config, notifier: N) -> Self {
        let locator = AssetLocator::new(config.remote_prefix.clone());
        Self {
            config,
            locator,
            notifier,
        }
    }

    /// Replace the asset locator, e.g. to install a remote probe
    pub fn with_locator(mut self, locator: AssetLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn locator(&self) -> &AssetLocator {
        &self.locator
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn info(&self, message: impl Into<String>) {
        self.notifier
            .post(Notification::info(message, &self.config.notifications));
    }

    fn warning(&self, message: impl Into<String>) {
        self.notifier
            .post(Notification::warning(message, &self.config.notifications));
    }

    /// Post a warning for a failed operation and hand the result back
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if !e.is_recoverable() {
                error!("{}", e);
            }
            self.warning(e.to_string());
        }
        result
    }

    pub fn resolve_path(&self, model: &str, sku: &str, release: &str) -> Result<CanonicalPath> {
        self.report(stage::resolve_path(model, sku, release))
    }

    /// Ensure the canonical hierarchy for a model/SKU/release exists
    pub fn ensure_hierarchy<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        model: &str,
        sku: &str,
        release: &str,
    ) -> Result<NodeId> {
        let result = require_document(host)
            .and_then(|document| stage::ensure_hierarchy(document, model, sku, release));
        self.report(result)
    }

    /// Ensure the `World`/`Setup` scaffolding exists
    pub fn ensure_bootstrap<H: DocumentHost + ?Sized>(&self, host: &mut H) -> Result<NodeId> {
        let result = require_document(host).and_then(stage::ensure_bootstrap);
        self.report(result)
    }

    /// Attach an asset to the node at `target_path`
    pub fn import_reference<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        asset_path: &str,
        target_path: &str,
    ) -> AttachResult {
        let result = require_document(host).and_then(|document| {
            stage::attach(document, &self.locator, target_path, asset_path, "")
        });
        if let Ok(attached) = &result {
            self.info(format!("Imported {} at {}", asset_path, attached.target_path));
        }
        self.report(result)
    }

    /// Isolate a scope, keeping the named infrastructure scopes visible
    pub fn isolate_scope<H: DocumentHost + ?Sized, S: AsRef<str>>(
        &self,
        host: &mut H,
        target_name: &str,
        keep_names: &[S],
    ) -> Result<VisibilityReport> {
        let result = require_document(host)
            .and_then(|document| stage::isolate(document, target_name, keep_names));
        if let Ok(report) = &result {
            if !report.missing_keep.is_empty() {
                self.warning(format!(
                    "Scopes not found, left as they were: {}",
                    report.missing_keep.join(", ")
                ));
            }
        }
        self.report(result)
    }

    /// Isolate a scope with the configured keep list
    pub fn isolate_model<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        target_name: &str,
    ) -> Result<VisibilityReport> {
        self.isolate_scope(host, target_name, &self.config.keep_scopes)
    }

    /// Build the hierarchy for a SKU and attach its payload from the asset
    /// library. Nothing is created when the payload is missing.
    pub fn import_sku<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        model: &str,
        sku: &str,
        release: &str,
    ) -> AttachResult {
        let result = self.import_sku_inner(host, model, sku, release);
        if let Ok(attached) = &result {
            self.info(format!("Imported {}_{} at {}", model, sku, attached.target_path));
        }
        self.report(result)
    }

    fn import_sku_inner<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        model: &str,
        sku: &str,
        release: &str,
    ) -> AttachResult {
        let canonical = stage::resolve_path(model, sku, release)?;
        let brand = self.config.brand_for_model(model).ok_or_else(|| {
            StageError::InvalidArgument(format!("no brand configured for model '{}'", model))
        })?;
        let payload = sku_payload_path(&self.config.asset_root, &brand, model, sku);
        let payload = payload.to_string_lossy();

        let document = require_document(host)?;
        if !self.locator.exists(&payload) {
            return Err(StageError::NotFound(payload.into_owned()));
        }

        stage::ensure_hierarchy(document, model, sku, release)?;
        stage::attach(document, &self.locator, canonical.as_str(), &payload, "")
    }

    /// Attach a camera, light or backdrop template below `/World/Setup`
    pub fn import_template<H: DocumentHost + ?Sized>(
        &self,
        host: &mut H,
        template: &Template,
    ) -> AttachResult {
        let result = require_document(host).and_then(|document| {
            stage::import_template(document, &self.locator, &self.config.templates_dir, template)
        });
        if result.is_ok() {
            self.info(format!("Imported {} template", template));
        }
        self.report(result)
    }

    /// Queue a full capture of each SKU into `output_dir`, isolating with
    /// the configured keep list
    pub fn render_queue<S: AsRef<str>>(&self, skus: &[S], output_dir: &Path) -> Result<RenderQueue> {
        let result = self.config.capture.poll_policy().and_then(|policy| {
            let mut queue = RenderQueue::new(self.config.keep_scopes.clone(), policy);
            for sku in skus {
                queue.push(CapturePlan::from_config(
                    sku.as_ref(),
                    output_dir,
                    &self.config.capture,
                )?);
            }
            Ok(queue)
        });
        self.report(result)
    }

    /// Run a render queue against the active document and report each SKU
    pub async fn capture<H, C>(
        &self,
        host: &mut H,
        queue: &RenderQueue,
        capturer: &mut C,
        cancel: &CancellationToken,
    ) -> Result<Vec<QueueResult>>
    where
        H: DocumentHost + ?Sized,
        C: FrameCapturer,
    {
        let document = self.report(require_document(host))?;
        let results = queue.run(document, capturer, cancel).await;

        for result in &results {
            match &result.outcome {
                Ok(CaptureOutcome::Completed) => self.info(format!("Captured {}", result.sku)),
                Ok(CaptureOutcome::TimedOut { missing }) => self.warning(format!(
                    "Timed out capturing {}: {} frame(s) missing",
                    result.sku,
                    missing.len()
                )),
                Ok(CaptureOutcome::Cancelled) => {
                    self.warning(format!("Capture of {} cancelled", result.sku))
                }
                Err(e) => self.warning(format!("Capture of {} failed: {}", result.sku, e)),
            }
        }
        Ok(results)
    }

    /// Scopes offered for selection
    pub fn selectable_scopes<H: DocumentHost + ?Sized>(&self, host: &mut H) -> Result<Vec<String>> {
        let result =
            require_document(host).and_then(|document| stage::selectable_scopes(document));
        self.report(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemoryNotifier, Severity};
    use stagehand_core::{Document, NodePath};
    use std::sync::Arc;

    fn tools() -> (StageTools<Arc<MemoryNotifier>>, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let tools = StageTools::with_notifier(Config::default(), notifier.clone());
        (tools, notifier)
    }

    #[test]
    fn test_no_active_document_is_reported() {
        let (tools, notifier) = tools();
        let mut host: Option<Document> = None;

        let result = tools.ensure_hierarchy(&mut host, "CD40235I", "52E", "261");

        assert!(matches!(result, Err(StageError::NoActiveDocument)));
        let warnings = notifier.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "no active document");
        assert_eq!(warnings[0].duration.as_secs(), 10);
    }

    #[test]
    fn test_import_reference_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let asset = dir.path().join("model.usd");
        std::fs::write(&asset, "").unwrap();
        let (tools, notifier) = tools();
        let mut doc = Document::new();

        tools
            .import_reference(&mut doc, asset.to_str().unwrap(), "/World/Models")
            .unwrap();
        let missing = tools.import_reference(&mut doc, "/nonexistent/x.usd", "/World/Models");

        assert!(matches!(missing, Err(StageError::NotFound(_))));
        let posted = notifier.drain();
        assert_eq!(posted.len(), 2);
        assert_eq!(posted[0].severity, Severity::Info);
        assert_eq!(posted[1].severity, Severity::Warning);
        assert!(posted[1].message.contains("/nonexistent/x.usd"));
    }

    #[test]
    fn test_isolate_model_warns_about_missing_keeps() {
        let (tools, notifier) = tools();
        let mut doc = Document::new();
        tools.ensure_hierarchy(&mut doc, "CD40235I", "52E", "261").unwrap();

        let report = tools.isolate_model(&mut doc, "CD40235I_52E").unwrap();

        assert_eq!(report.missing_keep, vec!["Setup", "Lights", "Cameras"]);
        assert_eq!(notifier.warnings().len(), 1);
    }

    #[test]
    fn test_isolate_model_hides_sibling_skus() {
        let (tools, _) = tools();
        let mut doc = Document::new();
        tools.ensure_hierarchy(&mut doc, "CD40235I", "52E", "261").unwrap();
        tools.ensure_hierarchy(&mut doc, "CD40235I", "69A", "261").unwrap();
        tools.ensure_bootstrap(&mut doc).unwrap();

        let report = tools.isolate_model(&mut doc, "CD40235I_52E").unwrap();

        assert_eq!(report.hidden, vec!["CD40235I_69A"]);
        let release = "/World/Models/glass_Xform/CD40235I_Xform/Release_261";
        let visible = |doc: &Document, path: &str| {
            doc.is_effectively_visible(doc.node_at_path(&NodePath::parse(path).unwrap()).unwrap())
        };
        assert!(visible(&doc, &format!("{}/CD40235I_52E", release)));
        assert!(!visible(&doc, &format!("{}/CD40235I_69A", release)));
        assert!(visible(&doc, "/World/Setup"));
    }

    #[test]
    fn test_import_sku() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.asset_root = dir.path().to_path_buf();
        config
            .brands
            .insert("CD".to_string(), "Christian Dior".to_string());

        let payload = sku_payload_path(dir.path(), "Christian_Dior", "CD40235I", "52E");
        std::fs::create_dir_all(payload.parent().unwrap()).unwrap();
        std::fs::write(&payload, "").unwrap();

        let tools = StageTools::with_notifier(config, MemoryNotifier::new());
        let mut doc = Document::new();

        let attached = tools.import_sku(&mut doc, "CD40235I", "52E", "261").unwrap();
        assert_eq!(
            attached.target_path.to_string(),
            "/World/Models/glass_Xform/CD40235I_Xform/Release_261/CD40235I_52E"
        );
        assert_eq!(doc.len(), 6);

        let missing = tools.import_sku(&mut doc, "CD40235I", "69A", "261");
        assert!(matches!(missing, Err(StageError::NotFound(_))));
        assert_eq!(doc.len(), 6);

        let unknown = tools.import_sku(&mut doc, "ZZ1", "1", "1");
        assert!(matches!(unknown, Err(StageError::InvalidArgument(_))));
    }

    struct WritingCapturer;

    impl FrameCapturer for WritingCapturer {
        fn request_frame(&mut self, _plan: &CapturePlan, _frame: i32, output: &Path) -> Result<()> {
            std::fs::write(output, b"png")?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_capture_uses_configured_queue() {
        let dir = tempfile::tempdir().unwrap();
        let (tools, notifier) = tools();
        let mut doc = Document::new();
        tools.ensure_hierarchy(&mut doc, "CD40235I", "52E", "261").unwrap();
        tools.ensure_hierarchy(&mut doc, "CD40235I", "69A", "261").unwrap();

        let skus = tools.selectable_scopes(&mut doc).unwrap();
        let queue = tools.render_queue(&skus[..1], dir.path()).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.plans()[0].expected_files().len(), 8);

        let results = tools
            .capture(&mut doc, &queue, &mut WritingCapturer, &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(results[0].outcome, Ok(CaptureOutcome::Completed)));
        let sibling = NodePath::parse(
            "/World/Models/glass_Xform/CD40235I_Xform/Release_261/CD40235I_69A",
        )
        .unwrap();
        assert!(!doc.is_effectively_visible(doc.node_at_path(&sibling).unwrap()));
        assert_eq!(notifier.drain().last().unwrap().message, "Captured CD40235I_52E");
    }

    #[test]
    fn test_render_queue_rejects_bad_poll_interval() {
        let mut config = Config::default();
        config.capture.poll_interval_ms = 0;
        let notifier = Arc::new(MemoryNotifier::new());
        let tools = StageTools::with_notifier(config, notifier.clone());

        let result = tools.render_queue(&["CD40235I_52E"], Path::new("/renders"));

        assert!(matches!(result, Err(StageError::Config(_))));
        assert_eq!(notifier.warnings().len(), 1);
    }
}
