//! CLI front-end: option parsing, line I/O, and pipeline execution.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use ngram_tally::config::JobSpec;
use ngram_tally::error::NGramError;
use ngram_tally::io::{read_lines, read_lines_stdin, write_lines};
use ngram_tally::pipeline::observer::StageTimingObserver;
use ngram_tally::pipeline::NGramPipeline;
use ngram_tally::topk::TieBreak;

/// Count n-grams across a corpus of text lines and keep the most frequent.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Window width in tokens.
    #[arg(short, long, default_value_t = 2)]
    n: i64,

    /// Number of highest-count n-grams to return.
    #[arg(short, long, default_value_t = 100)]
    top: i64,

    /// Path of the file to read; stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path of the file to write.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory used to derive `<staging>/counts.txt` when --output is omitted.
    #[arg(long)]
    staging_location: Option<PathBuf>,

    /// Ordering among equal-count n-grams: arbitrary | lexicographic.
    #[arg(long, default_value = "arbitrary")]
    tie_break: TieBreak,
}

fn run(cli: Cli) -> Result<(), NGramError> {
    let spec = JobSpec {
        n: cli.n,
        top: cli.top,
        input: cli.input,
        output: cli.output,
        staging_location: cli.staging_location,
        tie_break: cli.tie_break,
        ..JobSpec::default()
    };
    let job = spec.resolve()?;

    let lines = match &job.input {
        Some(path) => {
            info!(path = %path.display(), "reading corpus");
            read_lines(path)?
        }
        None => {
            info!("reading corpus from stdin");
            read_lines_stdin()?
        }
    };

    let pipeline = NGramPipeline::new(job.pipeline);
    let mut observer = StageTimingObserver::new();
    let output = pipeline.run(&lines, &mut observer);

    write_lines(&job.output, &output)?;

    for (stage, report) in observer.reports() {
        info!(
            stage = %stage,
            elapsed_ms = report.elapsed().as_millis() as u64,
            "stage complete"
        );
    }
    info!(
        lines = lines.len(),
        ngrams = pipeline.ngrams_emitted(),
        selected = output.len(),
        output = %job.output.display(),
        "done"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{err}");
        process::exit(1);
    }
}
