use prefs_store::PrefsStore;

/// Snippet seeded into the source buffer on first launch.
pub const DEFAULT_SOURCE_SNIPPET: &str = "exibir(\"Olá, Mundo!\")";

pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const FONT_SIZE_STEP: u32 = 2;
pub const MIN_FONT_SIZE: u32 = 8;

/// Width used when expanding tabs on file import.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Editor-facing state: the source buffer and the cosmetic preferences.
///
/// The session lifecycle lives in [`crate::session::SessionController`];
/// this struct only answers affordance questions about what the user can
/// currently do with the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub source: String,
    pub font_size: u32,
    pub theme: Theme,
    pub should_exit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: DEFAULT_SOURCE_SNIPPET.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            theme: Theme::default(),
            should_exit: false,
        }
    }

    /// Restores the last-edited source and cosmetic preferences, falling
    /// back to defaults for anything never saved.
    #[must_use]
    pub fn from_prefs(store: &PrefsStore) -> Self {
        Self {
            source: store
                .source_text()
                .map(ToString::to_string)
                .unwrap_or_else(|| DEFAULT_SOURCE_SNIPPET.to_string()),
            font_size: store.font_size().unwrap_or(DEFAULT_FONT_SIZE),
            theme: store
                .theme()
                .and_then(Theme::parse)
                .unwrap_or_default(),
            should_exit: false,
        }
    }

    /// The start affordance is available only for non-blank source text.
    #[must_use]
    pub fn run_enabled(&self) -> bool {
        !self.source.trim().is_empty()
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn clear_source(&mut self) {
        self.source.clear();
    }

    pub fn increase_font(&mut self) -> u32 {
        self.font_size += FONT_SIZE_STEP;
        self.font_size
    }

    pub fn decrease_font(&mut self) -> u32 {
        if self.font_size > MIN_FONT_SIZE {
            self.font_size -= FONT_SIZE_STEP;
        }
        self.font_size
    }

    pub fn cycle_theme(&mut self) -> Theme {
        self.theme = self.theme.cycled();
        self.theme
    }
}

/// Replaces each tab character with spaces, for file imports.
#[must_use]
pub fn expand_tabs(text: &str, width: usize) -> String {
    text.replace('\t', &" ".repeat(width))
}
