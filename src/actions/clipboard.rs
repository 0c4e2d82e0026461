// ABOUTME: System clipboard writer backed by arboard

use super::{ActionError, ClipboardWriter};

/// Holds on to the arboard handle: on X11 the copied text only stays
/// available while its owner is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardWriter for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ActionError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ActionError::Clipboard(e.to_string()))?;
            self.inner = Some(clipboard);
        }

        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_string())
                .map_err(|e| ActionError::Clipboard(e.to_string())),
            None => Err(ActionError::Clipboard("clipboard unavailable".to_string())),
        }
    }
}
