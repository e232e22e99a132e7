use std::collections::HashSet;
use std::env;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use latent_search::corpus::{self, CorpusStore};
use latent_search::{IndexBuilder, QueryService, SearchResponse};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ---- argument loop ----
    // --corpus FILE     : JSON corpus ([{"text": ..., "category": ...}])
    // --stopwords FILE  : newline-delimited stopword list
    // --query "TEXT"    : answer one query and exit; otherwise interactive
    // --top-k N         : result count per query (default 5)
    let mut args = env::args().skip(1);
    let mut corpus_path: Option<String> = None;
    let mut stopwords_path: Option<String> = None;
    let mut query_opt: Option<String> = None;
    let mut top_k: Option<usize> = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--corpus" => {
                corpus_path = Some(args.next().context("--corpus requires a path")?);
            }
            "--stopwords" => {
                stopwords_path = Some(args.next().context("--stopwords requires a path")?);
            }
            "--query" => {
                query_opt = Some(args.next().context("--query requires a string")?);
            }
            "--top-k" => {
                let value = args.next().context("--top-k requires a number")?;
                let parsed: usize = value
                    .parse()
                    .with_context(|| format!("--top-k needs a positive integer, got {value}"))?;
                if parsed == 0 {
                    bail!("--top-k needs a positive integer");
                }
                top_k = Some(parsed);
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            other => {
                // first positional argument doubles as the query
                if query_opt.is_none() {
                    query_opt = Some(other.to_string());
                } else {
                    bail!("unexpected argument: {other}");
                }
            }
        }
    }

    let corpus_path = corpus_path.context("--corpus FILE is required (see --help)")?;
    let store = CorpusStore::from_json_path(&corpus_path)?;
    let stopwords = match stopwords_path {
        Some(path) => corpus::load_stopwords(&path)?,
        None => HashSet::new(),
    };

    let started = Instant::now();
    let index = IndexBuilder::new().stopwords(stopwords).build(store);
    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "index ready"
    );

    let service = QueryService::new(Arc::new(index));
    let top_k = top_k.unwrap_or(latent_search::service::TOP_K);
    match query_opt {
        Some(query) => print_response(&service.search_with_k(&query, top_k)),
        None => run_interactive(&service, top_k)?,
    }
    Ok(())
}

fn print_usage() {
    eprintln!(
        "Usage: latent-search --corpus FILE [--stopwords FILE] [--top-k N] [--query \"TEXT\"]"
    );
    eprintln!("A bare positional argument is taken as the query.");
    eprintln!("Without a query an interactive prompt is started.");
    eprintln!("Output format: <score>\t<index>\t<snippet>");
}

fn run_interactive(service: &QueryService, top_k: usize) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("Query> ");
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        let started = Instant::now();
        let response = service.search_with_k(trimmed, top_k);
        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "query answered"
        );
        print_response(&response);
    }
    Ok(())
}

fn print_response(response: &SearchResponse) {
    if response.indices.is_empty() {
        println!("(no results)");
        return;
    }
    for ((score, index), text) in response
        .similarities
        .iter()
        .zip(&response.indices)
        .zip(&response.documents)
    {
        println!("{score:.4}\t{index}\t{}", snippet(text, 96));
    }
}

/// First `max_chars` characters with line breaks flattened.
fn snippet(text: &str, max_chars: usize) -> String {
    let mut out: String = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max_chars)
        .collect();
    if text.chars().count() > max_chars {
        out.push('…');
    }
    out
}
