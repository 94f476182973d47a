use crate::errors::ClipboardError;
use std::sync::Mutex;

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The clipboard of the machine running the server, used by the no-script
/// copy form.
///
/// The `arboard` handle is opened on first use and kept for the life of the
/// process; on X11 the copied text disappears once its owner is dropped.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut guard = self
            .handle
            .lock()
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        if guard.is_none() {
            let opened = arboard::Clipboard::new()
                .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
            *guard = Some(opened);
        }
        let Some(clipboard) = guard.as_mut() else {
            return Err(ClipboardError::Unavailable("clipboard not opened".to_string()));
        };
        clipboard
            .set_text(text)
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))
    }
}
