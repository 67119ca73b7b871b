//! Command-line interface for treelister.
//!
//! Takes the root from the command line, runs the walk in the background and
//! prints every path as it arrives while a spinner on stderr shows the walk is
//! still busy.

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use treelister::output;
use treelister::{
    LineSink, TraversalOutcome, TreelisterError, WalkOptions, WalkOptionsBuilder, start_traversal,
};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// treelister — recursive directory lister
#[derive(Parser)]
#[command(name = "treelister", version, about, long_about = None)]
struct Cli {
    /// Root directory (default current dir)
    root: Option<PathBuf>,

    /// JSON file with walk options (flags override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Indent JSON records
    #[arg(short, long)]
    pretty: bool,

    /// List symlinks as entries instead of following them
    #[arg(long)]
    no_follow_links: bool,

    /// Sort siblings by name
    #[arg(long)]
    sort: bool,

    /// Cancel the walk after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Hide the busy spinner
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => output::OutputFormat::Text,
            OutputFormat::Json => output::OutputFormat::Json,
        }
    }
}

impl Cli {
    fn walk_options(&self) -> Result<WalkOptions, TreelisterError> {
        let base = match &self.config {
            Some(path) => WalkOptions::from_json_file(path)?,
            None => WalkOptions::default(),
        };
        let mut builder = WalkOptionsBuilder::from_options(base);
        if let Some(root) = &self.root {
            builder = builder.root(root.clone());
        }
        if self.no_follow_links {
            builder = builder.follow_links(false);
        }
        if self.sort {
            builder = builder.sort_entries(true);
        }
        Ok(builder.build())
    }
}

/// Everything the front end owns for one run.
struct App {
    format: output::OutputFormat,
    pretty: bool,
    spinner: Option<ProgressBar>,
    out: BufWriter<Stdout>,
    seen: u64,
    summary: Option<String>,
    write_error: Option<TreelisterError>,
}

impl App {
    fn new(format: output::OutputFormat, pretty: bool, spinner: Option<ProgressBar>) -> Self {
        Self {
            format,
            pretty,
            spinner,
            out: BufWriter::new(io::stdout()),
            seen: 0,
            summary: None,
            write_error: None,
        }
    }

    fn emit(&mut self, record: &str) -> Result<(), TreelisterError> {
        let out = &mut self.out;
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| writeln!(out, "{}", record))?,
            None => writeln!(out, "{}", record)?,
        }
        Ok(())
    }

    /// Flushes this turn's lines and refreshes the spinner.
    fn end_turn(&mut self) {
        let out = &mut self.out;
        let flushed = match &self.spinner {
            Some(spinner) => {
                spinner.set_message(format!(
                    "Listing files, please wait... ({} found)",
                    self.seen
                ));
                spinner.suspend(|| out.flush())
            }
            None => out.flush(),
        };
        if let Err(e) = flushed {
            self.record_error(e.into());
        }
    }

    fn record_error(&mut self, error: TreelisterError) {
        if self.write_error.is_none() {
            self.write_error = Some(error);
        }
    }

    /// Prints the text report once stdout has been flushed for the last time.
    /// A closed stdout ends the run quietly.
    fn finish(&mut self, outcome: TraversalOutcome) -> Result<TraversalOutcome, TreelisterError> {
        match self.write_error.take() {
            Some(e) if e.is_broken_pipe() => Ok(outcome),
            Some(e) => Err(e),
            None => {
                if let Some(summary) = self.summary.take() {
                    eprintln!("{}", summary);
                }
                Ok(outcome)
            }
        }
    }
}

impl LineSink for App {
    fn on_line(&mut self, line: &str) {
        if self.write_error.is_some() {
            return;
        }
        self.seen += 1;
        let result =
            output::format_line(line, self.format, self.pretty).and_then(|r| self.emit(&r));
        if let Err(e) = result {
            self.record_error(e);
        }
    }

    fn on_complete(&mut self, outcome: &TraversalOutcome) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        if self.write_error.is_some() {
            return;
        }
        let report = output::format_outcome(outcome, self.format, self.pretty);
        let result = match self.format {
            output::OutputFormat::Text => report.map(|text| self.summary = Some(text)),
            output::OutputFormat::Json => report.and_then(|json| self.emit(&json)),
        };
        if let Err(e) = result {
            self.record_error(e);
        }
    }
}

fn busy_spinner(root: &Path) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    bar.set_style(style);
    bar.set_message(format!("Listing {}, please wait...", root.display()));
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("treelister=debug,warn")
        } else {
            EnvFilter::new("treelister=error,warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<TraversalOutcome, TreelisterError> {
    let options = cli.walk_options()?;
    let spinner = (!cli.quiet).then(|| busy_spinner(&options.root));
    let mut app = App::new(cli.format.into(), cli.pretty, spinner);
    let deadline = cli
        .timeout
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let mut handle = start_traversal(options)?;
    let outcome = loop {
        let drained = handle.try_drain_into(&mut app)?;
        app.end_turn();
        if let Some(outcome) = drained {
            break outcome;
        }
        if app.write_error.is_some() || deadline.is_some_and(|d| Instant::now() >= d) {
            handle.cancel();
        }
        thread::sleep(POLL_INTERVAL);
    };
    handle.join()?;
    app.finish(outcome)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(outcome) => ExitCode::from(outcome.exit_status()),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}
