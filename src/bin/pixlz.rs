use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use pixlz::{observer_fn, verify_round_trip, CompressConfig, Compressor, MatchStrategy, Progress};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixlz")]
#[command(about = "LZ77-compress a flattened pixel symbol stream")]
#[command(version)]
struct Args {
    /// Input file of raw symbols, one byte each (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Write the token sequence as JSON (use - for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sliding window size in symbols
    #[arg(short = 'w', long, default_value = "255")]
    window: usize,

    /// Lookahead buffer size (longest match considered)
    #[arg(short = 'b', long, default_value = "255")]
    buffer: usize,

    /// Match search strategy
    #[arg(long, value_enum, default_value = "brute-force")]
    strategy: Strategy,

    /// Replay the tokens and check they reproduce the input
    #[arg(long)]
    verify: bool,

    /// Log progress every N tokens
    #[arg(long, value_name = "N")]
    progress_every: Option<usize>,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    BruteForce,
    HashChain,
}

impl From<Strategy> for MatchStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BruteForce => MatchStrategy::BruteForce,
            Strategy::HashChain => MatchStrategy::HashChain,
        }
    }
}

const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(default_log_level(&args));

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// `info` when verbose output or progress events were asked for
fn default_log_level(args: &Args) -> &'static str {
    if args.verbose || args.progress_every.is_some_and(|n| n > 0) {
        "info"
    } else {
        "warn"
    }
}

fn init_logging(default: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = CompressConfig {
        window_size: args.window,
        buffer_size: args.buffer,
        strategy: args.strategy.into(),
    };
    let compressor = Compressor::new(config)?;

    let mut symbols = Vec::new();
    if args.input.to_str() == Some("-") {
        io::stdin().lock().read_to_end(&mut symbols)?;
    } else {
        File::open(&args.input)?.read_to_end(&mut symbols)?;
    }

    let every = args.progress_every.filter(|&n| n > 0);
    let mut observer = observer_fn(|p: &Progress<'_, u8>| {
        if let Some(n) = every {
            if p.tokens.len() % n == 0 {
                info!(
                    tokens = p.tokens.len(),
                    symbols = p.reconstructed.len(),
                    total = p.total,
                    "{:.1}% compressed",
                    p.fraction() * 100.0
                );
            }
        }
        Ok(())
    });

    let start = std::time::Instant::now();
    let outcome = compressor.compress_observed(&symbols, &mut observer, None);
    let elapsed = start.elapsed();

    if args.verify {
        verify_round_trip(&symbols, &outcome.tokens)?;
        if args.verbose {
            eprintln!("Round-trip verified");
        }
    }

    if let Some(path) = &args.output {
        let mut writer: Box<dyn Write> = if path.to_str() == Some("-") {
            Box::new(io::stdout().lock())
        } else {
            Box::new(BufWriter::new(File::create(path)?))
        };
        serde_json::to_writer_pretty(&mut writer, &outcome.tokens)?;
        writeln!(writer)?;
        writer.flush()?;
    }

    if args.verbose {
        let stats = outcome.stats();
        let config = compressor.config();
        eprintln!("Compression complete:");
        eprintln!("  Window size:      {}", config.window_size);
        eprintln!("  Buffer size:      {}", config.buffer_size);
        eprintln!("  Strategy:         {:?}", config.strategy);
        eprintln!("  Original size:    {} bytes", stats.original_size());
        eprintln!("  Compressed size:  {} bytes", stats.compressed_size());
        eprintln!("  Ratio:            {:.3}", stats.ratio());
        eprintln!("  Tokens:           {}", stats.tokens);
        eprintln!("  Literal tokens:   {}", stats.literal_tokens);
        eprintln!("  Match tokens:     {}", stats.match_tokens);
        eprintln!("  Matched symbols:  {}", stats.matched_symbols);
        eprintln!("  Time:             {:.2?}", elapsed);
    }

    Ok(())
}
