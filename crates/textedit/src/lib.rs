// TextEdit library exports

pub mod app;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod file_manager;
pub mod history;
pub mod recent;
pub mod session;
pub mod status_manager;
pub mod text_width;
pub mod theme;
pub mod ui;
pub mod ui_state;

pub use app::App;
pub use clipboard::{Clipboard, Register, SystemClipboard};
pub use commands::{Action, Keymap};
pub use config::Config;
pub use editor::Editor;
pub use error::EditorError;
pub use recent::RecentFiles;
pub use session::{Dialog, DialogKind, Outcome, PendingAction, PromptChoice, Session};
pub use ui_state::{Mode, UIState};
