/// What keystrokes currently drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Input(InputKind),
    SavePrompt,
    RecentFiles,
    Dialog,
}

/// Single-line prompts shown in the status area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    OpenPath,
    SavePath,
    Find,
    ReplaceTerm,
    ReplaceWith,
}

impl InputKind {
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::OpenPath => "Open file: ",
            InputKind::SavePath => "Save as: ",
            InputKind::Find => "Find: ",
            InputKind::ReplaceTerm => "Find what: ",
            InputKind::ReplaceWith => "Replace with: ",
        }
    }
}

const MAX_HISTORY: usize = 50;

/// Front-end state that is not part of the document session.
#[derive(Debug, Clone)]
pub struct UIState {
    pub mode: Mode,
    pub input: String,
    /// Term collected by the first replace prompt.
    pub replace_term: String,
    pub recent_index: usize,
    // Previously submitted find/replace terms, oldest first
    search_history: Vec<String>,
    history_index: Option<usize>,
}

impl UIState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Editing,
            input: String::new(),
            replace_term: String::new(),
            recent_index: 0,
            search_history: Vec::new(),
            history_index: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn enter_editing(&mut self) {
        self.mode = Mode::Editing;
        self.input.clear();
        self.history_index = None;
    }

    /// Open a prompt, optionally with text already filled in.
    pub fn enter_input(&mut self, kind: InputKind, initial: impl Into<String>) {
        self.mode = Mode::Input(kind);
        self.input = initial.into();
        self.history_index = None;
    }

    pub fn enter_save_prompt(&mut self) {
        self.mode = Mode::SavePrompt;
    }

    pub fn enter_recent_files(&mut self) {
        self.mode = Mode::RecentFiles;
        self.recent_index = 0;
    }

    pub fn enter_dialog(&mut self) {
        self.mode = Mode::Dialog;
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Take the prompt text, leaving the buffer empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn recent_up(&mut self) {
        self.recent_index = self.recent_index.saturating_sub(1);
    }

    pub fn recent_down(&mut self, count: usize) {
        if self.recent_index + 1 < count {
            self.recent_index += 1;
        }
    }

    pub fn add_to_history(&mut self, term: &str) {
        if !term.is_empty() && self.search_history.last().map(String::as_str) != Some(term) {
            self.search_history.push(term.to_string());
            if self.search_history.len() > MAX_HISTORY {
                self.search_history.remove(0);
            }
        }
        self.history_index = None;
    }

    pub fn history_up(&mut self) {
        if self.search_history.is_empty() {
            return;
        }

        let index = match self.history_index {
            None => self.search_history.len() - 1,
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.history_index = Some(index);
        self.input = self.search_history[index].clone();
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            None => {}
            Some(i) if i + 1 >= self.search_history.len() => {
                self.history_index = None;
                self.input.clear();
            }
            Some(i) => {
                self.history_index = Some(i + 1);
                self.input = self.search_history[i + 1].clone();
            }
        }
    }
}

impl Default for UIState {
    fn default() -> Self {
        Self::new()
    }
}
