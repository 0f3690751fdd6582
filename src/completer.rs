use crate::tickers::TickerIndex;
use crate::typeahead::ranker;
use rustyline::completion::{Completer, Pair};
use rustyline::Context;
use rustyline::Result;
use rustyline_derive::{Helper, Highlighter, Hinter, Validator};

/// Line-editor completion over a loaded ticker index, ranked like the dropdown.
#[derive(Helper, Highlighter, Hinter, Validator)]
pub struct TickerCompleter {
    index: TickerIndex,
    max_suggestions: usize,
}

impl TickerCompleter {
    pub fn new(index: TickerIndex, max_suggestions: usize) -> Self {
        Self {
            index,
            max_suggestions,
        }
    }
}

impl Completer for TickerCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_ascii_whitespace())
            .map_or(0, |i| i + 1);
        let word = &line[start..pos];

        let candidates: Vec<Pair> = ranker::rank(word, self.index.items(), self.max_suggestions)
            .into_iter()
            .map(|item| Pair {
                display: format!("{} ({})", item.display, item.file),
                replacement: item.display,
            })
            .collect();
        Ok((start, candidates))
    }
}
