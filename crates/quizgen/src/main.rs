use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;
use wordnet_db::LoadMode;

use quizgen::handlers::MAX_QUESTIONS;
use quizgen::{AppState, GeneratorConfig, PhraseScan, SubjectCatalog, Toolkit, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CORPUS_DIR: &str = "corpus";
const DEFAULT_WORDNET_DIR: &str = "wordnet";
const DEFAULT_TOKENIZER_BIN: &str = "data/en_tokenizer.bin";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!("using corpus directory {}", config.corpus_dir.display());
    info!(
        "using wordnet at {} (mode: {:?})",
        config.wordnet_dir.display(),
        config.wordnet_mode
    );
    info!("using nlprule tokenizer {}", config.tokenizer_bin.display());
    info!(
        "phrase scan: {}, max draws: {}",
        config.generator.phrase_scan, config.generator.max_draws
    );

    let load_start = Instant::now();
    let toolkit = Toolkit::load(
        &config.wordnet_dir,
        config.wordnet_mode,
        &config.tokenizer_bin,
    )?;
    info!(
        "wordnet and tagger loaded in {} ms",
        load_start.elapsed().as_millis()
    );

    let start = Instant::now();
    let catalog = SubjectCatalog::load_dir(&config.corpus_dir, &toolkit, &config.generator);
    for (name, subject) in catalog.iter() {
        let (records, keywords) = subject.prepare();
        info!(subject = name, records, keywords, "subject prepared");
    }
    if catalog.is_empty() {
        warn!("no subjects loaded; only POST /v1/objective will produce tests");
    }
    info!(
        "{} subjects prepared in {} ms",
        catalog.len(),
        start.elapsed().as_millis()
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        toolkit,
        config: config.generator,
        max_questions: MAX_QUESTIONS,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    corpus_dir: PathBuf,
    wordnet_dir: PathBuf,
    wordnet_mode: LoadMode,
    tokenizer_bin: PathBuf,
    generator: GeneratorConfig,
}

fn load_config() -> Config {
    let mut cli_corpus_dir: Option<PathBuf> = None;
    let mut cli_wordnet_dir: Option<PathBuf> = None;
    let mut cli_wordnet_mode: Option<LoadMode> = None;
    let mut cli_tokenizer_bin: Option<PathBuf> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--corpus-dir" => {
                if let Some(path) = args.next() {
                    cli_corpus_dir = Some(PathBuf::from(path));
                }
            }
            "--wordnet-dir" => {
                if let Some(path) = args.next() {
                    cli_wordnet_dir = Some(PathBuf::from(path));
                }
            }
            "--tokenizer" => {
                if let Some(path) = args.next() {
                    cli_tokenizer_bin = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--corpus-dir=") {
                    cli_corpus_dir = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--wordnet-dir=") {
                    cli_wordnet_dir = Some(PathBuf::from(path));
                } else if let Some(path) = arg.strip_prefix("--tokenizer=") {
                    cli_tokenizer_bin = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--wordnet-mode=") {
                    cli_wordnet_mode = parse_load_mode(mode);
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let corpus_dir = cli_corpus_dir
        .or_else(|| env::var("CORPUS_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CORPUS_DIR));
    let wordnet_dir = cli_wordnet_dir
        .or_else(|| env::var("WORDNET_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORDNET_DIR));
    let wordnet_mode = cli_wordnet_mode
        .or_else(|| {
            env::var("WORDNET_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);
    let tokenizer_bin = cli_tokenizer_bin
        .or_else(|| env::var("NLPRULE_TOKENIZER").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKENIZER_BIN));

    let mut generator = GeneratorConfig::default();
    if let Some(max_draws) = env::var("MAX_DRAWS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
    {
        generator.max_draws = max_draws;
    }
    if let Some(scan) = env::var("PHRASE_SCAN")
        .ok()
        .as_deref()
        .and_then(parse_phrase_scan)
    {
        generator.phrase_scan = scan;
    }

    Config {
        host,
        port,
        corpus_dir,
        wordnet_dir,
        wordnet_mode,
        tokenizer_bin,
        generator,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

fn parse_phrase_scan(raw: &str) -> Option<PhraseScan> {
    match raw.parse() {
        Ok(scan) => Some(scan),
        Err(err) => {
            warn!("ignoring PHRASE_SCAN: {err}");
            None
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
