use crate::core::types::TickerItem;
use crate::tickers::TickerIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Highlight moved (or nothing to do).
    Stay,
    /// Commit this symbol.
    Commit(String),
    /// Close the list, keep the query.
    Close,
}

/// Which suggestion is highlighted. `None` is "no highlight".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardNavigator {
    highlight: Option<usize>,
}

impl KeyboardNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlight(&self) -> Option<usize> {
        self.highlight
    }

    /// The highlight in the `-1 ..= len-1` encoding used by the DOM layer.
    pub fn as_index(&self) -> isize {
        self.highlight.map_or(-1, |i| i as isize)
    }

    pub fn reset(&mut self) {
        self.highlight = None;
    }

    /// Pointer hover; out-of-range indices clear the highlight.
    pub fn hover(&mut self, index: usize, len: usize) {
        self.highlight = (index < len).then_some(index);
    }

    pub fn handle(
        &mut self,
        key: NavKey,
        suggestions: &[TickerItem],
        raw_query: &str,
        index: &TickerIndex,
    ) -> NavAction {
        let len = suggestions.len();
        match key {
            NavKey::ArrowDown => {
                if len > 0 {
                    self.highlight = Some(self.highlight.map_or(0, |i| (i + 1).min(len - 1)));
                }
                NavAction::Stay
            }
            NavKey::ArrowUp => {
                if len > 0 {
                    self.highlight = Some(self.highlight.map_or(0, |i| i.saturating_sub(1)));
                }
                NavAction::Stay
            }
            NavKey::Enter => match self.highlight.and_then(|i| suggestions.get(i)) {
                Some(item) => NavAction::Commit(item.display.clone()),
                None => resolve_submission(raw_query, index)
                    .map(NavAction::Commit)
                    .unwrap_or(NavAction::Stay),
            },
            NavKey::Escape => NavAction::Close,
        }
    }
}

/// What a submission without a highlighted suggestion commits: the indexed symbol when the
/// raw query names one exactly, the raw query otherwise. Blank queries commit nothing.
pub fn resolve_submission(raw_query: &str, index: &TickerIndex) -> Option<String> {
    let raw = raw_query.trim();
    if raw.is_empty() {
        return None;
    }
    match index.find_exact(raw) {
        Some(item) => Some(item.display.clone()),
        None => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ExchangeScope;

    fn list(displays: &[&str]) -> Vec<TickerItem> {
        displays.iter().map(|d| TickerItem::new(*d, *d)).collect()
    }

    #[test]
    fn arrows_clamp_at_both_ends() {
        let suggestions = list(&["RELIANCE", "RELIANCEPOWER"]);
        let index = TickerIndex::empty(ExchangeScope::Nse);
        let mut nav = KeyboardNavigator::new();
        assert_eq!(nav.as_index(), -1);

        for _ in 0..5 {
            nav.handle(NavKey::ArrowDown, &suggestions, "REL", &index);
        }
        assert_eq!(nav.highlight(), Some(1));

        for _ in 0..5 {
            nav.handle(NavKey::ArrowUp, &suggestions, "REL", &index);
        }
        assert_eq!(nav.highlight(), Some(0));
    }

    #[test]
    fn arrow_up_without_highlight_lands_on_first() {
        let suggestions = list(&["A", "B"]);
        let index = TickerIndex::empty(ExchangeScope::Nse);
        let mut nav = KeyboardNavigator::new();
        nav.handle(NavKey::ArrowUp, &suggestions, "A", &index);
        assert_eq!(nav.highlight(), Some(0));
    }

    #[test]
    fn arrows_on_empty_list_keep_no_highlight() {
        let index = TickerIndex::empty(ExchangeScope::Nse);
        let mut nav = KeyboardNavigator::new();
        nav.handle(NavKey::ArrowDown, &[], "X", &index);
        nav.handle(NavKey::ArrowUp, &[], "X", &index);
        assert_eq!(nav.as_index(), -1);
    }

    #[test]
    fn enter_commits_highlighted_item() {
        let suggestions = list(&["RELIANCE", "RELIANCEPOWER"]);
        let index = TickerIndex::empty(ExchangeScope::Nse);
        let mut nav = KeyboardNavigator::new();
        nav.handle(NavKey::ArrowDown, &suggestions, "rel", &index);
        nav.handle(NavKey::ArrowDown, &suggestions, "rel", &index);
        assert_eq!(
            nav.handle(NavKey::Enter, &suggestions, "rel", &index),
            NavAction::Commit("RELIANCEPOWER".to_string())
        );
    }

    #[test]
    fn enter_without_highlight_prefers_exact_index_match() {
        let index = TickerIndex::new(ExchangeScope::Nse, list(&["SBIN", "SBICARD"]));
        let mut nav = KeyboardNavigator::new();
        assert_eq!(
            nav.handle(NavKey::Enter, &[], "sbin", &index),
            NavAction::Commit("SBIN".to_string())
        );
        assert_eq!(
            nav.handle(NavKey::Enter, &[], " unknownco ", &index),
            NavAction::Commit("unknownco".to_string())
        );
        assert_eq!(nav.handle(NavKey::Enter, &[], "  ", &index), NavAction::Stay);
    }

    #[test]
    fn escape_closes() {
        let index = TickerIndex::empty(ExchangeScope::Nse);
        let mut nav = KeyboardNavigator::new();
        assert_eq!(nav.handle(NavKey::Escape, &[], "x", &index), NavAction::Close);
    }

    #[test]
    fn hover_out_of_range_clears() {
        let mut nav = KeyboardNavigator::new();
        nav.hover(1, 3);
        assert_eq!(nav.highlight(), Some(1));
        nav.hover(3, 3);
        assert_eq!(nav.highlight(), None);
    }
}
