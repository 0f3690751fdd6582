use colored::*;
use rustyline::error::ReadlineError;
use std::str::FromStr;
use std::sync::Arc;
use stocksearch::{
    core::{config::TypeaheadConfig, init, types::ExchangeScope},
    fetch::{self, HttpTickerSource, TickerSource},
    repl,
    tickers::TickerIndex,
    typeahead::{
        document::{DocumentEvents, FormHost, NodeId},
        navigator::NavKey,
        position::{Rect, ScrollOffset},
        ranker, view, FormEvent, SearchForm,
    },
    SearchCommit,
};
use structopt::StructOpt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use url::Url;

#[derive(StructOpt, Debug)]
#[structopt(name = "stocksearch", about = "Ticker symbol search against the dashboard backend")]
struct Opt {
    /// Backend base url, overrides STOCKSEARCH_API_BASE
    #[structopt(long)]
    base_url: Option<Url>,

    /// Exchange to search (NSE or BSE)
    #[structopt(short, long, default_value = "NSE")]
    exchange: ExchangeScope,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Print the ranked suggestions for one query
    Search { query: String },
    /// Line editor with ticker completion
    Repl,
    /// Drive a live search form from stdin (:down :up :enter :esc :submit :pick N :exchange X :quit)
    Session,
}

/// A one-line terminal "page": the form is the whole page.
struct TerminalHost;

impl FormHost for TerminalHost {
    fn form_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, 40.0, 1.0)
    }

    fn scroll_offset(&self) -> ScrollOffset {
        ScrollOffset::default()
    }

    fn form_contains(&self, _target: NodeId) -> bool {
        true
    }
}

fn print_commit(commit: &SearchCommit) {
    println!(
        "{} {} on {}",
        "search:".green().bold(),
        commit.symbol.bold(),
        commit.exchange
    );
}

async fn search(
    source: &dyn TickerSource,
    config: &TypeaheadConfig,
    exchange: ExchangeScope,
    query: &str,
) -> anyhow::Result<()> {
    let items = fetch::load_or_empty(source, exchange).await;
    if items.is_empty() {
        println!("{}", "No tickers available".yellow());
        return Ok(());
    }
    let ranked = ranker::rank(query, &items, config.max_suggestions);
    if ranked.is_empty() {
        println!("No suggestions for {:?}", query);
    }
    for item in ranked {
        println!("{:<20} {}", item.display.bold(), item.file.dimmed());
    }
    Ok(())
}

async fn run_repl(
    source: &dyn TickerSource,
    config: &TypeaheadConfig,
    exchange: ExchangeScope,
) -> anyhow::Result<()> {
    let index = TickerIndex::new(exchange, fetch::load_or_empty(source, exchange).await);
    println!(
        "{} tickers loaded for {}. Press Tab to complete, 'quit' to exit",
        index.len(),
        exchange
    );
    let mut rl = repl::create_editor(index.clone(), config.max_suggestions)?;
    let prompt = format!("{}> ", exchange);

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().eq_ignore_ascii_case("quit") {
                    break;
                }
                if let Some(commit) = repl::resolve_line(&line, &index) {
                    print_commit(&commit);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    repl::save_history(&mut rl)?;
    Ok(())
}

fn parse_session_line(line: &str) -> Option<FormEvent> {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Some(FormEvent::Input(line.to_string()));
    };
    let mut parts = command.split_whitespace();
    let event = match (parts.next(), parts.next()) {
        (Some("down"), _) => FormEvent::Key(NavKey::ArrowDown),
        (Some("up"), _) => FormEvent::Key(NavKey::ArrowUp),
        (Some("enter"), _) => FormEvent::Key(NavKey::Enter),
        (Some("esc"), _) => FormEvent::Key(NavKey::Escape),
        (Some("submit"), _) => FormEvent::Submit,
        (Some("quit"), _) => FormEvent::Unmount,
        (Some("pick"), Some(n)) => FormEvent::SuggestionPressed(n.parse().ok()?),
        (Some("exchange"), Some(name)) => {
            FormEvent::ExchangeChanged(ExchangeScope::from_str(name).ok()?)
        }
        _ => return None,
    };
    Some(event)
}

async fn run_session(
    config: TypeaheadConfig,
    source: Arc<dyn TickerSource>,
    exchange: ExchangeScope,
) -> anyhow::Result<()> {
    let document = DocumentEvents::new();
    let (commits_tx, mut commits) = mpsc::unbounded_channel();
    let (mut form, mut events) = SearchForm::mount(
        config,
        exchange,
        source,
        Box::new(TerminalHost),
        &document,
        commits_tx,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_view = view::render(&form);

    while form.is_mounted() {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => match parse_session_line(&line) {
                    Some(event) => form.dispatch(event),
                    None => eprintln!("{} {}", "unknown command:".red(), line.trim()),
                },
                None => form.dispatch(FormEvent::Unmount),
            },
            Some(event) = events.recv() => form.dispatch(event),
            Some(commit) = commits.recv() => print_commit(&commit),
        }

        let current = view::render(&form);
        if current != last_view {
            let drawn = view::render_terminal(&current);
            if drawn.is_empty() {
                println!("{}", "(suggestions closed)".dimmed());
            } else {
                println!("{}", drawn);
            }
            last_view = current;
        }
    }

    while let Ok(commit) = commits.try_recv() {
        print_commit(&commit);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init::init_logging("warn");

    let opt = Opt::from_args();
    let mut config = TypeaheadConfig::from_env()?;
    if let Some(base) = opt.base_url {
        config.api_base = base;
    }
    let source = HttpTickerSource::new(config.api_base.clone());

    match opt.cmd {
        Command::Search { query } => search(&source, &config, opt.exchange, &query).await,
        Command::Repl => run_repl(&source, &config, opt.exchange).await,
        Command::Session => run_session(config, Arc::new(source), opt.exchange).await,
    }
}
