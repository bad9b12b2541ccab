// Suppresses page scrolling while a modal form is open.
use crate::theme::platform::Document;
use std::rc::Rc;

const OVERFLOW: &str = "overflow";

/// Holds `overflow: hidden` on the body until released or dropped, then puts back
/// whatever was there before.
pub struct ScrollLock {
    document: Option<Rc<dyn Document>>,
    previous: Option<String>,
    held: bool,
}

impl ScrollLock {
    pub fn acquire(document: Option<Rc<dyn Document>>) -> Self {
        let previous = document.as_ref().and_then(|doc| doc.body_style(OVERFLOW));
        if let Some(doc) = &document {
            doc.set_body_style(OVERFLOW, Some("hidden"));
        }
        Self {
            document,
            previous,
            held: true,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    pub fn release(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;
        if let Some(doc) = &self.document {
            doc.set_body_style(OVERFLOW, self.previous.as_deref());
        }
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::platform::RecordingDocument;

    #[test]
    fn restores_previous_overflow_on_drop() {
        let doc = Rc::new(RecordingDocument::new());
        doc.set_body_style(OVERFLOW, Some("auto"));
        {
            let _lock = ScrollLock::acquire(Some(doc.clone() as Rc<dyn Document>));
            assert_eq!(doc.body_style(OVERFLOW).as_deref(), Some("hidden"));
        }
        assert_eq!(doc.body_style(OVERFLOW).as_deref(), Some("auto"));
    }

    #[test]
    fn clears_overflow_when_none_was_set() {
        let doc = Rc::new(RecordingDocument::new());
        let lock = ScrollLock::acquire(Some(doc.clone() as Rc<dyn Document>));
        lock.release();
        assert_eq!(doc.body_style(OVERFLOW), None);
    }

    #[test]
    fn restored_even_when_unwinding() {
        let doc = Rc::new(RecordingDocument::new());
        let handle = doc.clone() as Rc<dyn Document>;
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _lock = ScrollLock::acquire(Some(handle));
            panic!("component blew up");
        }));
        assert!(result.is_err());
        assert_eq!(doc.body_style(OVERFLOW), None);
    }

    #[test]
    fn no_document_is_fine() {
        let lock = ScrollLock::acquire(None);
        assert!(lock.is_held());
        drop(lock);
    }
}
