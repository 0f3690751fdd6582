use crate::completer::TickerCompleter;
use crate::core::types::SearchCommit;
use crate::tickers::TickerIndex;
use crate::typeahead::navigator;
use once_cell::sync::Lazy;
use rustyline::history::FileHistory;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor, Result};
use std::env;
use std::path::PathBuf;

static HISTORY_PATH: Lazy<PathBuf> = Lazy::new(|| {
    let home_dir = env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home_dir).join(".stocksearch.history")
});

/// Turns an entered line into the search it commits, using the same rules as Enter in the
/// dropdown with nothing highlighted.
pub fn resolve_line(line: &str, index: &TickerIndex) -> Option<SearchCommit> {
    navigator::resolve_submission(line, index)
        .map(|symbol| SearchCommit::new(&symbol, index.exchange()))
}

pub fn create_editor(index: TickerIndex, max_suggestions: usize) -> Result<EditorWithHistory> {
    log::debug!("Creating rustyline editor configuration");
    let rustyline_config = RustylineConfig::builder()
        .completion_type(CompletionType::List)
        .edit_mode(EditMode::Emacs)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<TickerCompleter, FileHistory>::with_config(rustyline_config)?;

    if rl.load_history(HISTORY_PATH.as_path()).is_err() {
        log::debug!("No previous history file found");
    } else {
        log::debug!("History loaded successfully");
    }

    log::debug!("Completer backed by {} tickers", index.len());
    rl.set_helper(Some(TickerCompleter::new(index, max_suggestions)));
    Ok(EditorWithHistory::new(rl))
}

pub struct EditorWithHistory {
    inner: Editor<TickerCompleter, FileHistory>,
}

impl EditorWithHistory {
    fn new(editor: Editor<TickerCompleter, FileHistory>) -> Self {
        EditorWithHistory { inner: editor }
    }

    pub fn readline(&mut self, prompt: &str) -> Result<String> {
        let line = self.inner.readline(prompt)?;
        if !line.trim().is_empty() {
            let _ = self.inner.add_history_entry(line.as_str());
        }
        Ok(line)
    }
}

impl std::ops::Deref for EditorWithHistory {
    type Target = Editor<TickerCompleter, FileHistory>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl std::ops::DerefMut for EditorWithHistory {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

pub fn save_history(rl: &mut Editor<TickerCompleter, FileHistory>) -> Result<()> {
    rl.save_history(HISTORY_PATH.as_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ExchangeScope, TickerItem};

    #[test]
    fn lines_resolve_like_enter_without_highlight() {
        let index = TickerIndex::new(ExchangeScope::Bse, vec![TickerItem::new("TCS", "TCS.BO")]);
        let commit = resolve_line("tcs", &index).unwrap();
        assert_eq!(commit.symbol, "TCS");
        assert_eq!(commit.exchange, ExchangeScope::Bse);

        assert_eq!(resolve_line("zomato", &index).unwrap().symbol, "ZOMATO");
        assert!(resolve_line("   ", &index).is_none());
    }
}
