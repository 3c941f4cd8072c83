//! The editor session: one document, its file, the recent-files list and
//! every user command, independent of the terminal front end.
//!
//! Commands that would throw away unsaved work (new, open, quit) go through a
//! save-changes gate. When the document is dirty the command is parked and
//! [`Outcome::Prompt`] is returned; the front end asks the user and calls
//! [`Session::answer_prompt`].

use std::ops::Range;
use std::path::{Path, PathBuf};

use textcore::DocumentStats;

use crate::clipboard::{Clipboard, Register};
use crate::config::Config;
use crate::editor::Editor;
use crate::file_manager::{display_name, FileManager};
use crate::status_manager::StatusManager;

pub const APP_NAME: &str = "TextEdit";
pub const MIN_FONT_SIZE: u16 = 8;
pub const MAX_FONT_SIZE: u16 = 48;
pub const ZOOM_STEP: i32 = 2;

/// Welcome text shown until the first keystroke or click.
pub const BANNER: &str = include_str!("banner.txt");

pub fn default_font_size() -> u16 {
    if cfg!(target_os = "macos") {
        14
    } else {
        11
    }
}

/// Command waiting on the save-changes answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open(PathBuf),
    Quit,
}

/// Answer to "Do you want to save changes to the current document?".
/// Escape maps to `Cancel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptChoice {
    Save,
    Discard,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran to completion.
    Done,
    /// The document is dirty; waiting on [`Session::answer_prompt`].
    Prompt,
    /// The document has no file; the front end must ask for a path and call
    /// [`Session::save_as`].
    NeedPath,
    /// The user backed out. Nothing changed.
    Cancelled,
    /// The command failed; the error is in [`Session::dialog`].
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// Modal message for the front end to show until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Choice(PendingAction),
    SavePath(PendingAction),
}

pub struct Session {
    editor: Editor,
    file_manager: FileManager,
    config: Config,
    config_path: Option<PathBuf>,
    clipboard: Box<dyn Clipboard>,
    status: StatusManager,
    has_default_text: bool,
    font_size: u16,
    highlights: Vec<Range<usize>>,
    pending: Option<Pending>,
    dialog: Option<Dialog>,
    should_quit: bool,
}

impl Session {
    /// Start a session with preferences read from `config_path`. Config
    /// problems are logged and defaults used.
    pub async fn load(config_path: Option<PathBuf>) -> Self {
        let config = match &config_path {
            Some(path) => Config::load_from(path).await.unwrap_or_else(|e| {
                log::warn!("Failed to load config from {}: {}", path.display(), e);
                Config::default()
            }),
            None => Config::default(),
        };
        Self::with_config(config, config_path)
    }

    pub fn with_config(config: Config, config_path: Option<PathBuf>) -> Self {
        let mut editor = Editor::new();
        editor.set_content(BANNER);

        Self {
            editor,
            file_manager: FileManager::new(),
            config,
            config_path,
            clipboard: Box::new(Register::new()),
            status: StatusManager::new(),
            has_default_text: true,
            font_size: default_font_size(),
            highlights: Vec::new(),
            pending: None,
            dialog: None,
            should_quit: false,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    // Queries

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn content(&self) -> String {
        self.editor.get_content()
    }

    pub fn is_modified(&self) -> bool {
        self.editor.is_modified()
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.file_manager.current_path()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn status(&self) -> &StatusManager {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusManager {
        &mut self.status
    }

    pub fn has_default_text(&self) -> bool {
        self.has_default_text
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn highlights(&self) -> &[Range<usize>] {
        &self.highlights
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        match &self.pending {
            Some(Pending::Choice(action)) | Some(Pending::SavePath(action)) => Some(action),
            None => None,
        }
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// "• name - TextEdit" style window title.
    pub fn title(&self) -> String {
        let mut title = match self.current_file() {
            Some(path) => format!("{} - {}", display_name(path), APP_NAME),
            None => APP_NAME.to_string(),
        };
        if self.is_modified() {
            title.insert_str(0, "• ");
        }
        title
    }

    /// Recompute the cursor label. The front end calls this once the current
    /// event has been handled.
    pub fn refresh_cursor(&mut self) {
        let (line, col) = self.editor.cursor_position();
        self.status.refresh_cursor(line, col);
    }

    pub fn set_geometry(&mut self, cols: u16, rows: u16) {
        self.config.window_geometry = format!("{}x{}", cols, rows);
    }

    // File commands

    pub async fn new_document(&mut self) -> Outcome {
        self.gate(PendingAction::New).await
    }

    pub async fn open(&mut self, path: &Path) -> Outcome {
        self.gate(PendingAction::Open(path.to_path_buf())).await
    }

    pub async fn open_recent(&mut self, index: usize) -> Outcome {
        match self.config.recent_files.get(index) {
            Some(path) => {
                let path = path.to_path_buf();
                self.open(&path).await
            }
            None => Outcome::Cancelled,
        }
    }

    /// Recent files that still exist, with their index for
    /// [`Session::open_recent`].
    pub fn recent_files(&self) -> Vec<(usize, PathBuf)> {
        self.config
            .recent_files
            .existing()
            .into_iter()
            .map(|(i, p)| (i, p.to_path_buf()))
            .collect()
    }

    pub async fn save(&mut self) -> Outcome {
        if !self.file_manager.has_file() {
            return Outcome::NeedPath;
        }

        match self.file_manager.save_file(&mut self.editor).await {
            Ok(message) => {
                self.status.set_success(message);
                Outcome::Done
            }
            Err(e) => {
                log::error!("Failed to save file: {}", e);
                self.show_error(format!("Could not save file:\n{}", e));
                Outcome::Failed
            }
        }
    }

    /// Write to `path` and adopt it as the current file. A command parked
    /// behind "save changes" continues only if the write succeeds.
    pub async fn save_as(&mut self, path: &Path) -> Outcome {
        let parked = match self.pending.take() {
            Some(Pending::SavePath(action)) => Some(action),
            other => {
                self.pending = other;
                None
            }
        };

        match self.file_manager.save_file_as(path, &mut self.editor).await {
            Ok(message) => {
                self.status.set_success(message);
                self.remember(path).await;
                match parked {
                    Some(action) => self.perform(action).await,
                    None => Outcome::Done,
                }
            }
            Err(e) => {
                log::error!("Failed to save file as {}: {}", path.display(), e);
                self.show_error(format!("Could not save file:\n{}", e));
                Outcome::Failed
            }
        }
    }

    pub async fn quit(&mut self) -> Outcome {
        self.gate(PendingAction::Quit).await
    }

    /// Resolve the save-changes prompt for the parked command.
    pub async fn answer_prompt(&mut self, choice: PromptChoice) -> Outcome {
        let action = match self.pending.take() {
            Some(Pending::Choice(action)) => action,
            other => {
                self.pending = other;
                return Outcome::Cancelled;
            }
        };

        match choice {
            PromptChoice::Cancel => {
                self.status.set_info("Cancelled");
                Outcome::Cancelled
            }
            PromptChoice::Discard => self.perform(action).await,
            PromptChoice::Save => {
                if !self.file_manager.has_file() {
                    self.pending = Some(Pending::SavePath(action));
                    return Outcome::NeedPath;
                }
                match self.save().await {
                    Outcome::Done => self.perform(action).await,
                    other => other,
                }
            }
        }
    }

    /// Drop a parked command, e.g. when the save-as path input is abandoned.
    pub fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            self.status.set_info("Cancelled");
        }
    }

    async fn gate(&mut self, action: PendingAction) -> Outcome {
        if self.is_modified() {
            self.pending = Some(Pending::Choice(action));
            return Outcome::Prompt;
        }
        self.perform(action).await
    }

    async fn perform(&mut self, action: PendingAction) -> Outcome {
        match action {
            PendingAction::New => {
                self.editor.set_content(BANNER);
                self.has_default_text = true;
                self.file_manager.clear();
                self.highlights.clear();
                self.status.set_info("New file created");
                Outcome::Done
            }
            PendingAction::Open(path) => self.load_file(&path).await,
            PendingAction::Quit => {
                self.persist_config().await;
                self.should_quit = true;
                log::info!("Session quit");
                Outcome::Done
            }
        }
    }

    async fn load_file(&mut self, path: &Path) -> Outcome {
        match self.file_manager.open_file(path).await {
            Ok(content) => {
                self.editor.set_content(&content);
                self.has_default_text = false;
                self.highlights.clear();
                self.status
                    .set_success(format!("Opened: {}", display_name(path)));
                self.remember(path).await;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Failed to open {}: {}", path.display(), e);
                self.show_error(format!("Could not open file:\n{}", e));
                Outcome::Failed
            }
        }
    }

    /// Push `path` to the recent list and persist the config.
    async fn remember(&mut self, path: &Path) {
        let stored = self.config.recent_files.push(path);
        if let Some(parent) = stored.parent() {
            self.config.last_directory = parent.display().to_string();
        }
        self.persist_config().await;
    }

    async fn persist_config(&mut self) {
        if self.config.last_directory.is_empty() {
            if let Ok(dir) = std::env::current_dir() {
                self.config.last_directory = dir.display().to_string();
            }
        }

        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        if let Err(e) = self.config.save_to(path).await {
            log::warn!("Failed to save config: {}", e);
        }
    }

    fn show_error(&mut self, message: String) {
        self.status.set_error("Error");
        self.dialog = Some(Dialog {
            kind: DialogKind::Error,
            title: "Error".to_string(),
            message,
        });
    }

    // Text input

    /// Clear the welcome banner. Called on the first keystroke or click.
    pub fn dismiss_placeholder(&mut self) {
        if self.has_default_text {
            self.editor.set_content("");
            self.has_default_text = false;
            self.highlights.clear();
            self.status.set_info("Ready to edit...");
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.dismiss_placeholder();
        self.editor.insert_char(c);
        self.highlights.clear();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn insert_tab(&mut self) {
        self.insert_char('\t');
    }

    pub fn delete_backward(&mut self) {
        self.dismiss_placeholder();
        self.editor.delete_char_backward();
        self.highlights.clear();
    }

    pub fn delete_forward(&mut self) {
        self.dismiss_placeholder();
        self.editor.delete_char_forward();
        self.highlights.clear();
    }

    /// Move the cursor; with `extend` the selection grows from where it
    /// started, otherwise any selection is dropped.
    pub fn move_cursor(&mut self, motion: Motion, extend: bool) {
        if extend {
            self.editor.start_selection();
        } else {
            self.editor.clear_selection();
        }

        match motion {
            Motion::Left => self.editor.move_cursor_left(),
            Motion::Right => self.editor.move_cursor_right(),
            Motion::Up => self.editor.move_cursor_up(),
            Motion::Down => self.editor.move_cursor_down(),
            Motion::LineStart => self.editor.move_to_line_start(),
            Motion::LineEnd => self.editor.move_to_line_end(),
            Motion::PageUp => self.editor.page_up(),
            Motion::PageDown => self.editor.page_down(),
        }
    }

    /// Place the cursor from a mouse click.
    pub fn click(&mut self, line: usize, col: usize) {
        self.dismiss_placeholder();
        self.editor.clear_selection();
        self.editor.set_cursor_position(line, col);
    }

    // Edit commands

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let changed = self.editor.undo();
        if changed {
            self.highlights.clear();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.editor.redo();
        if changed {
            self.highlights.clear();
        }
        changed
    }

    pub fn cut(&mut self) -> bool {
        match self.editor.delete_selection() {
            Some(text) => {
                self.clipboard.set(text);
                self.highlights.clear();
                true
            }
            None => false,
        }
    }

    pub fn copy(&mut self) -> bool {
        match self.editor.selected_text() {
            Some(text) => {
                self.clipboard.set(text);
                true
            }
            None => false,
        }
    }

    pub fn paste(&mut self) -> bool {
        match self.clipboard.get() {
            Some(text) => {
                self.dismiss_placeholder();
                self.editor.insert_str(&text);
                self.highlights.clear();
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.editor.select_all();
    }

    /// Tag every case-insensitive match of `term`. Returns the match count;
    /// an empty term changes nothing.
    pub fn find(&mut self, term: &str) -> usize {
        if term.is_empty() {
            return 0;
        }

        self.highlights = textcore::find_all(&self.editor.get_content(), term);
        let count = self.highlights.len();
        match count {
            0 => self.status.set_warning(format!("No matches for '{}'", term)),
            1 => self.status.set_info("Found 1 match"),
            n => self.status.set_info(format!("Found {} matches", n)),
        }
        count
    }

    /// Replace every literal occurrence of `term` as one undoable edit.
    /// Returns the number of replacements.
    pub fn replace(&mut self, term: &str, replacement: &str) -> usize {
        if term.is_empty() {
            return 0;
        }

        let result = textcore::replace_all(&self.editor.get_content(), term, replacement);
        if result.count == 0 {
            self.status
                .set_warning(format!("No occurrences of '{}'", term));
            return 0;
        }

        self.editor.replace_content(&result.text);
        self.highlights.clear();
        self.status
            .set_info(format!("Replaced {} occurrence(s)", result.count));
        result.count
    }

    // View commands

    pub fn zoom(&mut self, delta: i32) -> u16 {
        let size = (i32::from(self.font_size) + delta)
            .clamp(i32::from(MIN_FONT_SIZE), i32::from(MAX_FONT_SIZE));
        self.font_size = size as u16;
        self.status.set_info(format!("Font size: {}", self.font_size));
        self.font_size
    }

    pub fn zoom_in(&mut self) -> u16 {
        self.zoom(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> u16 {
        self.zoom(-ZOOM_STEP)
    }

    pub fn reset_zoom(&mut self) -> u16 {
        self.font_size = default_font_size();
        self.status
            .set_info(format!("Font size reset to {}", self.font_size));
        self.font_size
    }

    pub fn word_count(&self) -> DocumentStats {
        DocumentStats::of(&self.editor.get_content())
    }

    /// Put the statistics in a dialog.
    pub fn show_word_count(&mut self) {
        let stats = self.word_count();
        self.dialog = Some(Dialog {
            kind: DialogKind::Info,
            title: "Document Statistics".to_string(),
            message: stats.to_string(),
        });
    }
}
