use std::env;
use std::path::Path;

use indicatif::ProgressBar;

use lexdb_core::config::{expand_path, Config};
use lexdb_core::loader::load_directory;
use lexdb_hybrid::{default_engine, DefaultEngine};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} search [data_dir] \"<query>\" [k]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "search" => {
            let (dir, query, k) = match args.len() {
                0 => {
                    eprintln!("Usage: lexdb search [data_dir] \"<query>\" [k]");
                    std::process::exit(1);
                }
                1 => {
                    let dir: String = config
                        .get("data.judgments_dir")
                        .unwrap_or_else(|_| "./data/judgments".to_string());
                    (expand_path(dir), args[0].clone(), None)
                }
                _ => {
                    let k = args.get(2).and_then(|s| s.parse::<usize>().ok());
                    (expand_path(&args[0]), args[1].clone(), k)
                }
            };
            let retrieval = config.retrieval();
            let k = k.unwrap_or(retrieval.default_k);
            let engine = default_engine(retrieval);
            tokio::runtime::Runtime::new()?.block_on(run_search(&engine, &dir, &query, k))
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
}

async fn run_search(engine: &DefaultEngine, dir: &Path, query: &str, k: usize) -> anyhow::Result<()> {
    let docs = load_directory(dir)?;
    anyhow::ensure!(!docs.is_empty(), "no .txt judgments found under {}", dir.display());

    println!("Ingesting {} judgments from {}", docs.len(), dir.display());
    let bar = ProgressBar::new(docs.len() as u64);
    let mut total_chunks = 0;
    for doc in docs {
        let report = engine.ingest(doc).await?;
        total_chunks += report.chunks_indexed;
        bar.inc(1);
    }
    bar.finish_and_clear();
    println!("Indexed into {} chunks", total_chunks);

    println!("\nQuery: {}", query);
    let results = engine.query(query, k).await?;
    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }
    for result in &results {
        let sources = match (result.sources.keyword, result.sources.semantic) {
            (true, true) => "kw+sem",
            (true, false) => "kw",
            (false, true) => "sem",
            (false, false) => "-",
        };
        println!("\n#{}  score {:.5}  [{}]", result.rank, result.fused_score, sources);
        match engine.resolve(&result.chunk_id)? {
            Some(resolved) => {
                println!("{}  ({:?})", resolved.meta.title, resolved.chunk.section);
                let preview: String = resolved.chunk.text.chars().take(200).collect();
                println!("{}…", preview);
            }
            None => println!("{} (text unavailable)", result.chunk_id),
        }
    }
    Ok(())
}
