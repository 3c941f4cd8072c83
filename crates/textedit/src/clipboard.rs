/// Where cut and copied text goes. The session only talks to this trait so
/// a front end can plug in a platform clipboard.
pub trait Clipboard {
    fn get(&mut self) -> Option<String>;
    fn set(&mut self, text: String);
}

/// Process-wide register. Used when no system clipboard is reachable, e.g.
/// over SSH without a display.
#[derive(Debug, Clone, Default)]
pub struct Register {
    content: String,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for Register {
    fn get(&mut self) -> Option<String> {
        if self.content.is_empty() {
            None
        } else {
            Some(self.content.clone())
        }
    }

    fn set(&mut self, text: String) {
        self.content = text;
    }
}

/// The operating system clipboard, shared with other applications.
///
/// Copied text is also kept in a local register so a paste still works when
/// the platform clipboard fails between calls.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
    local: Register,
}

impl SystemClipboard {
    pub fn new() -> anyhow::Result<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| anyhow::anyhow!("System clipboard unavailable: {}", e))?;
        Ok(Self {
            inner,
            local: Register::new(),
        })
    }
}

impl Clipboard for SystemClipboard {
    fn get(&mut self) -> Option<String> {
        match self.inner.get_text() {
            Ok(text) if text.is_empty() => None,
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                log::warn!("Failed to read system clipboard: {}", e);
                self.local.get()
            }
        }
    }

    fn set(&mut self, text: String) {
        if let Err(e) = self.inner.set_text(text.as_str()) {
            log::warn!("Failed to write system clipboard: {}", e);
        }
        self.local.set(text);
    }
}

/// The system clipboard when one is reachable, otherwise a [`Register`].
pub fn system_or_register() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(clipboard) => {
            log::debug!("Using the system clipboard");
            Box::new(clipboard)
        }
        Err(e) => {
            log::warn!("{}, cut and copy stay inside the editor", e);
            Box::new(Register::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_register_has_nothing() {
        assert!(Register::new().get().is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut register = Register::new();
        register.set("one".to_string());
        register.set("two".to_string());
        assert_eq!(register.get().as_deref(), Some("two"));
    }
}
