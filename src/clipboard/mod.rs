use crate::errors::{Result, WizardError};

pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// System clipboard. The handle is opened lazily so headless sessions only
/// fail when the user actually asks to copy.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            let cb = arboard::Clipboard::new().map_err(|e| WizardError::Clipboard(e.to_string()))?;
            self.inner = Some(cb);
        }
        let Some(cb) = self.inner.as_mut() else {
            return Err(WizardError::Clipboard("clipboard unavailable".into()));
        };
        cb.set_text(text.to_string()).map_err(|e| WizardError::Clipboard(e.to_string()))
    }
}

/// Keeps copied text in memory; used when no system clipboard is wanted.
#[derive(Default)]
pub struct BufferClipboard {
    pub last: Option<String>,
}

impl ClipboardSink for BufferClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        self.last = Some(text.to_string());
        Ok(())
    }
}
