//! Access to the document currently open in the host

use stagehand_core::Document;

use crate::error::{Result, StageError};

/// Something that may or may not have a document open
///
/// Operations receive the host explicitly rather than looking up an ambient
/// "current document". A bare [`Document`] is always open; an
/// `Option<Document>` models a host with nothing loaded.
pub trait DocumentHost {
    fn active_document(&mut self) -> Option<&mut Document>;
}

impl DocumentHost for Document {
    fn active_document(&mut self) -> Option<&mut Document> {
        Some(self)
    }
}

impl DocumentHost for Option<Document> {
    fn active_document(&mut self) -> Option<&mut Document> {
        self.as_mut()
    }
}

impl<H: DocumentHost + ?Sized> DocumentHost for &mut H {
    fn active_document(&mut self) -> Option<&mut Document> {
        (**self).active_document()
    }
}

/// The open document, or [`StageError::NoActiveDocument`]
pub fn require_document<H: DocumentHost + ?Sized>(host: &mut H) -> Result<&mut Document> {
    host.active_document().ok_or(StageError::NoActiveDocument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_host_has_no_document() {
        let mut host: Option<Document> = None;
        assert!(matches!(
            require_document(&mut host),
            Err(StageError::NoActiveDocument)
        ));

        let mut host = Some(Document::new());
        assert!(require_document(&mut host).is_ok());
    }
}
