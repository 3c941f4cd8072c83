use anyhow::Result;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use std::path::{Path, PathBuf};

use crate::clipboard;
use crate::commands::{Action, Keymap};
use crate::config::Config;
use crate::session::{Motion, Outcome, PromptChoice, Session};
use crate::text_width;
use crate::ui_state::{InputKind, Mode, UIState};

/// Terminal front end: routes keys and mouse events to the session according
/// to the current mode.
pub struct App {
    pub session: Session,
    pub ui_state: UIState,
    pub keymap: Keymap,
    /// Where the text area was last drawn, for mapping mouse clicks.
    pub text_area: Rect,
    /// First display column shown in the text area.
    pub scroll_x: usize,
}

impl App {
    pub async fn new() -> Result<Self> {
        let config_path = Config::config_path();
        if config_path.is_none() {
            log::warn!("No config directory available, preferences will not be saved");
        }
        let session = Session::load(config_path)
            .await
            .with_clipboard(clipboard::system_or_register());
        Ok(Self::with_session(session))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            ui_state: UIState::new(),
            keymap: Keymap::default(),
            text_area: Rect::default(),
            scroll_x: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.ui_state.mode()
    }

    pub fn should_quit(&self) -> bool {
        self.session.should_quit()
    }

    pub fn update_status(&mut self) {
        self.session.status_mut().update();
    }

    /// Open the file named on the command line. Missing paths are ignored.
    pub async fn open_initial(&mut self, path: &Path) {
        if !path.exists() {
            log::info!("Startup path does not exist, ignoring: {}", path.display());
            return;
        }
        let outcome = self.session.open(path).await;
        self.handle_outcome(outcome);
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        log::debug!("Terminal resized to {}x{}", cols, rows);
        self.session.set_geometry(cols, rows);
    }

    pub async fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        match self.ui_state.mode() {
            Mode::Editing => self.handle_editing_key(key).await?,
            Mode::Input(kind) => self.handle_input_key(kind, key).await?,
            Mode::SavePrompt => self.handle_save_prompt_key(key).await?,
            Mode::RecentFiles => self.handle_recent_key(key).await?,
            Mode::Dialog => self.handle_dialog_key(),
        }
        Ok(())
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.ui_state.is_editing() {
            return;
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((line, col)) = self.text_position(mouse.column, mouse.row) {
                    self.session.click(line, col);
                }
            }
            MouseEventKind::ScrollUp => self.session.move_cursor(Motion::Up, false),
            MouseEventKind::ScrollDown => self.session.move_cursor(Motion::Down, false),
            _ => {}
        }
    }

    /// Run a command by its action name.
    pub async fn dispatch_named(&mut self, name: &str) -> Result<()> {
        let action: Action = name.parse()?;
        self.dispatch(action).await;
        Ok(())
    }

    pub async fn dispatch(&mut self, action: Action) {
        log::debug!("Dispatching action: {}", action);

        match action {
            Action::New => {
                let outcome = self.session.new_document().await;
                self.handle_outcome(outcome);
            }
            Action::Open => {
                let initial = self.directory_prefill();
                self.ui_state.enter_input(InputKind::OpenPath, initial);
            }
            Action::Save => {
                let outcome = self.session.save().await;
                self.handle_outcome(outcome);
            }
            Action::SaveAs => self.prompt_for_save_path(),
            Action::Quit => {
                let outcome = self.session.quit().await;
                self.handle_outcome(outcome);
            }
            Action::Undo => {
                self.session.undo();
            }
            Action::Redo => {
                self.session.redo();
            }
            Action::Cut => {
                self.session.cut();
            }
            Action::Copy => {
                self.session.copy();
            }
            Action::Paste => {
                self.session.paste();
            }
            Action::SelectAll => self.session.select_all(),
            Action::Find => self.ui_state.enter_input(InputKind::Find, ""),
            Action::Replace => self.ui_state.enter_input(InputKind::ReplaceTerm, ""),
            Action::ZoomIn => {
                self.session.zoom_in();
            }
            Action::ZoomOut => {
                self.session.zoom_out();
            }
            Action::ResetZoom => {
                self.session.reset_zoom();
            }
            Action::WordCount => {
                self.session.show_word_count();
                self.ui_state.enter_dialog();
            }
            Action::RecentFiles => {
                if self.session.recent_files().is_empty() {
                    self.session.status_mut().set_info("No recent files");
                } else {
                    self.ui_state.enter_recent_files();
                }
            }
        }
    }

    async fn handle_editing_key(&mut self, key: KeyEvent) -> Result<()> {
        self.session.dismiss_placeholder();

        if let Some(action) = self.keymap.lookup(&key) {
            self.dispatch(action).await;
            return Ok(());
        }

        let extend = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char(c) if is_text_input(key.modifiers) => self.session.insert_char(c),
            KeyCode::Enter => self.session.insert_newline(),
            KeyCode::Tab => self.session.insert_tab(),
            KeyCode::Backspace => self.session.delete_backward(),
            KeyCode::Delete => self.session.delete_forward(),

            KeyCode::Left => self.session.move_cursor(Motion::Left, extend),
            KeyCode::Right => self.session.move_cursor(Motion::Right, extend),
            KeyCode::Up => self.session.move_cursor(Motion::Up, extend),
            KeyCode::Down => self.session.move_cursor(Motion::Down, extend),
            KeyCode::Home => self.session.move_cursor(Motion::LineStart, extend),
            KeyCode::End => self.session.move_cursor(Motion::LineEnd, extend),
            KeyCode::PageUp => self.session.move_cursor(Motion::PageUp, extend),
            KeyCode::PageDown => self.session.move_cursor(Motion::PageDown, extend),

            _ => {}
        }
        Ok(())
    }

    async fn handle_input_key(&mut self, kind: InputKind, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                if kind == InputKind::SavePath {
                    self.session.cancel_pending();
                }
                self.ui_state.enter_editing();
            }
            KeyCode::Enter => {
                let input = self.ui_state.take_input();
                self.submit_input(kind, input).await;
            }
            KeyCode::Backspace => self.ui_state.pop_input(),
            KeyCode::Up if is_search(kind) => self.ui_state.history_up(),
            KeyCode::Down if is_search(kind) => self.ui_state.history_down(),
            KeyCode::Char(c) if is_text_input(key.modifiers) => self.ui_state.push_input(c),
            _ => {}
        }
        Ok(())
    }

    async fn submit_input(&mut self, kind: InputKind, input: String) {
        match kind {
            InputKind::OpenPath => {
                if input.trim().is_empty() {
                    self.ui_state.enter_editing();
                    return;
                }
                let outcome = self.session.open(&PathBuf::from(input.trim())).await;
                self.handle_outcome(outcome);
            }
            InputKind::SavePath => {
                if input.trim().is_empty() {
                    self.session.cancel_pending();
                    self.ui_state.enter_editing();
                    return;
                }
                let outcome = self.session.save_as(&PathBuf::from(input.trim())).await;
                self.handle_outcome(outcome);
            }
            InputKind::Find => {
                self.ui_state.add_to_history(&input);
                self.session.find(&input);
                self.ui_state.enter_editing();
            }
            InputKind::ReplaceTerm => {
                if input.is_empty() {
                    self.ui_state.enter_editing();
                    return;
                }
                self.ui_state.add_to_history(&input);
                self.ui_state.replace_term = input;
                self.ui_state.enter_input(InputKind::ReplaceWith, "");
            }
            InputKind::ReplaceWith => {
                let term = std::mem::take(&mut self.ui_state.replace_term);
                self.session.replace(&term, &input);
                self.ui_state.enter_editing();
            }
        }
    }

    async fn handle_save_prompt_key(&mut self, key: KeyEvent) -> Result<()> {
        let choice = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => PromptChoice::Save,
            KeyCode::Char('n') | KeyCode::Char('N') => PromptChoice::Discard,
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => PromptChoice::Cancel,
            _ => return Ok(()),
        };

        let outcome = self.session.answer_prompt(choice).await;
        self.handle_outcome(outcome);
        Ok(())
    }

    async fn handle_recent_key(&mut self, key: KeyEvent) -> Result<()> {
        let recent = self.session.recent_files();
        match key.code {
            KeyCode::Esc => self.ui_state.enter_editing(),
            KeyCode::Up => self.ui_state.recent_up(),
            KeyCode::Down => self.ui_state.recent_down(recent.len()),
            KeyCode::Enter => match recent.get(self.ui_state.recent_index) {
                Some((index, _)) => {
                    let outcome = self.session.open_recent(*index).await;
                    self.handle_outcome(outcome);
                }
                None => self.ui_state.enter_editing(),
            },
            _ => {}
        }
        Ok(())
    }

    fn handle_dialog_key(&mut self) {
        self.session.dismiss_dialog();
        self.ui_state.enter_editing();
    }

    /// Move the front end to whatever the session needs next.
    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Prompt => self.ui_state.enter_save_prompt(),
            Outcome::NeedPath => self.prompt_for_save_path(),
            Outcome::Done | Outcome::Cancelled | Outcome::Failed => {
                if self.session.dialog().is_some() {
                    self.ui_state.enter_dialog();
                } else {
                    self.ui_state.enter_editing();
                }
            }
        }
    }

    fn prompt_for_save_path(&mut self) {
        let initial = match self.session.current_file() {
            Some(path) => path.display().to_string(),
            None => self.directory_prefill(),
        };
        self.ui_state.enter_input(InputKind::SavePath, initial);
    }

    fn directory_prefill(&self) -> String {
        let dir = &self.session.config().last_directory;
        if dir.is_empty() {
            String::new()
        } else {
            PathBuf::from(dir).join("").display().to_string()
        }
    }

    /// Buffer position under a terminal cell inside the text area.
    fn text_position(&mut self, column: u16, row: u16) -> Option<(usize, usize)> {
        let area = self.text_area;
        if column < area.x
            || row < area.y
            || column >= area.x + area.width
            || row >= area.y + area.height
        {
            return None;
        }

        // The banner goes first so the click lands in the real text
        self.session.dismiss_placeholder();

        let editor = self.session.editor();
        let line = editor.viewport_offset() + usize::from(row - area.y);
        let text = editor.line_text(line);
        let col =
            text_width::col_to_char_index(&text, self.scroll_x + usize::from(column - area.x));
        Some((line, col))
    }
}

/// Whether a character key types text. Ctrl+Alt together is AltGr on
/// Windows, which produces characters like `@` on many layouts.
fn is_text_input(modifiers: KeyModifiers) -> bool {
    let chord = modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
    chord.is_empty() || chord == KeyModifiers::CONTROL | KeyModifiers::ALT
}

fn is_search(kind: InputKind) -> bool {
    matches!(
        kind,
        InputKind::Find | InputKind::ReplaceTerm | InputKind::ReplaceWith
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use tempfile::TempDir;

    fn app() -> App {
        App::with_session(Session::with_config(Config::default(), None))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let code = if c == '\n' {
                KeyCode::Enter
            } else {
                KeyCode::Char(c)
            };
            app.handle_key_event(key(code)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_replaces_placeholder() {
        let mut app = app();
        type_text(&mut app, "hi\nthere").await;
        assert_eq!(app.session.content(), "hi\nthere");
        assert!(app.session.is_modified());
    }

    #[tokio::test]
    async fn test_altgr_characters_are_typed() {
        let mut app = app();
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        type_text(&mut app, "a").await;
        for c in ['@', '{'] {
            app.handle_key_event(KeyEvent::new(KeyCode::Char(c), altgr))
                .await
                .unwrap();
        }
        assert_eq!(app.session.content(), "a@{");

        // Plain Alt or Ctrl chords without a binding still type nothing
        app.handle_key_event(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT))
            .await
            .unwrap();
        app.handle_key_event(ctrl('j')).await.unwrap();
        assert_eq!(app.session.content(), "a@{");
    }

    #[test]
    fn test_text_input_modifiers() {
        assert!(is_text_input(KeyModifiers::NONE));
        assert!(is_text_input(KeyModifiers::SHIFT));
        assert!(is_text_input(KeyModifiers::CONTROL | KeyModifiers::ALT));
        assert!(!is_text_input(KeyModifiers::CONTROL));
        assert!(!is_text_input(KeyModifiers::ALT | KeyModifiers::SHIFT));
    }

    #[tokio::test]
    async fn test_release_events_are_ignored() {
        let mut app = app();
        let mut event = key(KeyCode::Char('x'));
        event.kind = KeyEventKind::Release;
        event.state = KeyEventState::NONE;
        app.handle_key_event(event).await.unwrap();
        assert!(app.session.has_default_text());
    }

    #[tokio::test]
    async fn test_shift_arrows_select() {
        let mut app = app();
        type_text(&mut app, "abc").await;
        app.handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT))
            .await
            .unwrap();
        app.handle_key_event(KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT))
            .await
            .unwrap();
        assert_eq!(app.session.editor().selected_text().as_deref(), Some("bc"));

        app.handle_key_event(key(KeyCode::Left)).await.unwrap();
        assert!(app.session.editor().selection().is_none());
    }

    #[tokio::test]
    async fn test_find_prompt_flow() {
        let mut app = app();
        type_text(&mut app, "one two one").await;

        app.handle_key_event(ctrl('f')).await.unwrap();
        assert_eq!(app.mode(), Mode::Input(InputKind::Find));
        type_text(&mut app, "ONE").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.mode(), Mode::Editing);
        assert_eq!(app.session.highlights().len(), 2);
        // Prompt text did not leak into the document
        assert_eq!(app.session.content(), "one two one");
    }

    #[tokio::test]
    async fn test_replace_prompt_flow() {
        let mut app = app();
        type_text(&mut app, "one two one").await;

        app.handle_key_event(ctrl('r')).await.unwrap();
        type_text(&mut app, "one").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.mode(), Mode::Input(InputKind::ReplaceWith));
        type_text(&mut app, "1").await;
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.session.content(), "1 two 1");
        assert_eq!(app.mode(), Mode::Editing);
    }

    #[tokio::test]
    async fn test_quit_prompt_cancel() {
        let mut app = app();
        type_text(&mut app, "dirty").await;

        app.handle_key_event(ctrl('q')).await.unwrap();
        assert_eq!(app.mode(), Mode::SavePrompt);

        app.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.mode(), Mode::Editing);
        assert!(!app.should_quit());
        assert_eq!(app.session.content(), "dirty");
    }

    #[tokio::test]
    async fn test_quit_prompt_save_asks_for_path() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.txt");
        let mut app = app();
        type_text(&mut app, "keep").await;

        app.handle_key_event(ctrl('q')).await.unwrap();
        app.handle_key_event(key(KeyCode::Char('y'))).await.unwrap();
        assert_eq!(app.mode(), Mode::Input(InputKind::SavePath));

        app.ui_state.input = target.display().to_string();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert!(app.should_quit());
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_open_error_shows_dialog() {
        let dir = TempDir::new().unwrap();
        let mut app = app();

        app.handle_key_event(ctrl('o')).await.unwrap();
        assert_eq!(app.mode(), Mode::Input(InputKind::OpenPath));
        app.ui_state.input = dir.path().join("missing.txt").display().to_string();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.mode(), Mode::Dialog);
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.mode(), Mode::Editing);
        assert!(app.session.dialog().is_none());
    }

    #[tokio::test]
    async fn test_word_count_dialog() {
        let mut app = app();
        type_text(&mut app, "a b c").await;
        app.handle_key_event(ctrl('w')).await.unwrap();
        assert_eq!(app.mode(), Mode::Dialog);
        assert!(app.session.dialog().unwrap().message.contains("Words: 3"));
    }

    #[tokio::test]
    async fn test_recent_files_empty() {
        let mut app = app();
        app.handle_key_event(ctrl('e')).await.unwrap();
        assert_eq!(app.mode(), Mode::Editing);
        assert_eq!(app.session.status().text(), "No recent files");
    }

    #[tokio::test]
    async fn test_recent_files_picker_opens() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        std::fs::write(&first, "first").unwrap();
        std::fs::write(&second, "second").unwrap();

        let mut app = app();
        app.open_initial(&first).await;
        app.open_initial(&second).await;

        app.handle_key_event(ctrl('e')).await.unwrap();
        assert_eq!(app.mode(), Mode::RecentFiles);
        app.handle_key_event(key(KeyCode::Down)).await.unwrap();
        app.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.session.content(), "first");
        assert_eq!(app.mode(), Mode::Editing);
    }

    #[tokio::test]
    async fn test_dispatch_named() {
        let mut app = app();
        app.dispatch_named("zoom-in").await.unwrap();
        assert_eq!(
            app.session.font_size(),
            crate::session::default_font_size() + 2
        );
        assert!(app.dispatch_named("nonsense").await.is_err());
    }

    #[test]
    fn test_mouse_click_places_cursor() {
        let mut app = app();
        app.session.dismiss_placeholder();
        app.session.insert_char('a');
        app.session.insert_newline();
        for c in "hello".chars() {
            app.session.insert_char(c);
        }
        app.text_area = Rect::new(0, 1, 80, 20);

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 2,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.session.editor().cursor_position(), (1, 3));

        // Outside the text area does nothing
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.session.editor().cursor_position(), (1, 3));
    }

    #[tokio::test]
    async fn test_startup_missing_path_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut app = app();
        app.open_initial(&dir.path().join("nope.txt")).await;
        assert!(app.session.has_default_text());
        assert!(app.session.dialog().is_none());
    }
}
