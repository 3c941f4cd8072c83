use std::time::{Duration, Instant};

pub const READY: &str = "Ready";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub content: String,
    pub message_type: MessageType,
    pub created_at: Instant,
    pub auto_clear_duration: Option<Duration>,
}

impl StatusMessage {
    pub fn new(content: String, message_type: MessageType) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: Self::default_duration_for_type(message_type),
        }
    }

    pub fn with_duration(content: String, message_type: MessageType, duration: Duration) -> Self {
        Self {
            content,
            message_type,
            created_at: Instant::now(),
            auto_clear_duration: Some(duration),
        }
    }

    pub fn is_expired(&self) -> bool {
        match self.auto_clear_duration {
            Some(duration) => self.created_at.elapsed() > duration,
            None => false,
        }
    }

    fn default_duration_for_type(message_type: MessageType) -> Option<Duration> {
        match message_type {
            MessageType::Info => Some(Duration::from_secs(4)),
            MessageType::Success => Some(Duration::from_secs(3)),
            MessageType::Warning => Some(Duration::from_secs(5)),
            MessageType::Error => Some(Duration::from_secs(7)),
        }
    }
}

/// Left side of the status bar (transient message, falling back to
/// "Ready") and the cursor label on the right.
#[derive(Debug, Clone)]
pub struct StatusManager {
    current_message: Option<StatusMessage>,
    cursor_label: String,
}

impl StatusManager {
    pub fn new() -> Self {
        Self {
            current_message: None,
            cursor_label: cursor_label(0, 0),
        }
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Info);
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Success);
    }

    pub fn set_warning(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Warning);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.set(message.into(), MessageType::Error);
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.current_message = Some(message);
    }

    fn set(&mut self, content: String, message_type: MessageType) {
        self.current_message = Some(StatusMessage::new(content, message_type));
    }

    /// Drop the current message once it has expired.
    pub fn update(&mut self) {
        if self
            .current_message
            .as_ref()
            .is_some_and(StatusMessage::is_expired)
        {
            self.current_message = None;
        }
    }

    pub fn current_message(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn text(&self) -> &str {
        self.current_message
            .as_ref()
            .map(|m| m.content.as_str())
            .unwrap_or(READY)
    }

    pub fn has_message(&self) -> bool {
        self.current_message.is_some()
    }

    pub fn refresh_cursor(&mut self, line: usize, col: usize) {
        self.cursor_label = cursor_label(line, col);
    }

    pub fn cursor_label(&self) -> &str {
        &self.cursor_label
    }
}

impl Default for StatusManager {
    fn default() -> Self {
        Self::new()
    }
}

/// "Line L, Col C" from a zero-based cursor.
pub fn cursor_label(line: usize, col: usize) -> String {
    format!("Line {}, Col {}", line + 1, col + 1)
}
