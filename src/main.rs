//! Lifeweeks CLI
//!
//! Command-line host for the visualization:
//! - Visualize a life from gender, birth date and country
//! - List the countries with data
//! - Generate a default config file

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use lifeweeks::{
    format_long_date, Accepted, AppStore, CaptionLines, ChartConfig, Clock, Config,
    DerivedMetrics, DonutLayout, FixedClock, InputCollector, LoggingConfig, MessageBoard,
    RawSubmission, RenderOutcome, StaticTable, SystemClock, TextGrid, Visualization,
    YearStatistics,
};

/// Terminal rows kept free for the text printed around the chart
const RESERVED_ROWS: usize = 12;

#[derive(Parser)]
#[command(name = "lifeweeks")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Visualize your life in weeks")]
#[command(long_about = "Lifeweeks looks up a life expectancy for your country and gender\nand shows how much of it you have lived, in percent and in weeks.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the visualization for one person
    Visualize {
        /// male or female
        #[arg(short, long)]
        gender: String,
        /// Birth date in MM/DD/YYYY format
        #[arg(short, long)]
        birth_date: String,
        /// Three-letter country code (see `lifeweeks countries`)
        #[arg(short = 'C', long)]
        country: String,
        /// Pretend today is this date (MM/DD/YYYY)
        #[arg(long)]
        today: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Keep running and alternate the chart caption until Ctrl-C
        #[arg(long)]
        follow: bool,
    },

    /// List countries with life expectancy data
    Countries,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// JSON output of `visualize`
#[derive(Serialize)]
struct Report<'a> {
    accepted: &'a Accepted,
    birth_date: String,
    metrics: DerivedMetrics,
    statistics: Option<YearStatistics>,
    message: &'static str,
}

type TerminalVisualization = Visualization<TextGrid, CaptionLines>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Visualize {
            gender,
            birth_date,
            country,
            today,
            format,
            follow,
        } => {
            let raw = RawSubmission::new(gender, birth_date, country);
            visualize(&config, raw, today.as_deref(), format, follow).await?;
        }

        Commands::Countries => {
            let table = StaticTable::new();
            println!("{:<6} {:<16} {:>6} {:>7}", "CODE", "COUNTRY", "MALE", "FEMALE");
            for entry in table.countries() {
                println!(
                    "{:<6} {:<16} {:>6.1} {:>7.1}",
                    entry.code, entry.name, entry.male, entry.female
                );
            }
        }

        Commands::Config { output } => {
            let content = lifeweeks::config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, &content)
                        .with_context(|| format!("Failed to write config to {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

async fn visualize(
    config: &Config,
    raw: RawSubmission,
    today: Option<&str>,
    format: OutputFormat,
    follow: bool,
) -> anyhow::Result<()> {
    let (today, clock): (NaiveDate, Arc<dyn Clock>) = match today {
        Some(s) => {
            let date = NaiveDate::parse_from_str(s, "%m/%d/%Y")
                .with_context(|| format!("Invalid --today date: {}", s))?;
            (date, Arc::new(FixedClock(date.and_time(NaiveTime::MIN))))
        }
        None => (chrono::Local::now().date_naive(), Arc::new(SystemClock)),
    };

    let store = AppStore::empty();
    let _log_sub = store.subscribe(|state| tracing::debug!(?state, "State updated"));

    let vis: Arc<Mutex<TerminalVisualization>> = Arc::new(Mutex::new(Visualization::new(
        store.clone(),
        TextGrid::new(config.chart.width, config.chart.height),
        CaptionLines::default(),
        Arc::clone(&clock),
        DonutLayout::from_config(&config.chart),
    )));
    Visualization::attach(&vis);

    let board = Arc::new(MessageBoard::new());
    let _board_sub = board.attach(&store);

    let collector = InputCollector::new(Arc::new(StaticTable::new()), store.clone());
    let accepted = collector.submit(&raw, today).await?;

    {
        let mut vis = lock(&vis);
        if vis.has_pending_frame() {
            vis.on_frame();
        }
        if vis.has_pending_frame() {
            tracing::warn!("Chart surface is empty; check chart.width and chart.height");
        }
    }

    let state = store.get_state();
    let metrics = DerivedMetrics::from_state(&state, clock.now())
        .context("store is missing inputs after a successful submission")?;

    match format {
        OutputFormat::Json => {
            let report = Report {
                accepted: &accepted,
                birth_date: format_long_date(accepted.submission.birthdate),
                metrics,
                statistics: YearStatistics::compute(&state, today),
                message: board.message(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print_text(&lock(&vis), &accepted, &board, &state, today);

            if follow {
                follow_captions(config, &vis, &accepted, &board, &state, today).await;
            }
        }
    }

    lock(&vis).detach();
    Ok(())
}

/// Alternate the caption on a timer until Ctrl-C, redrawing on terminal resize
async fn follow_captions(
    config: &Config,
    vis: &Mutex<TerminalVisualization>,
    accepted: &Accepted,
    board: &MessageBoard,
    state: &lifeweeks::AppState,
    today: NaiveDate,
) {
    let period = Duration::from_millis(config.display.alternate_interval_ms);
    let fade = Duration::from_millis(config.display.fade_ms);
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    let mut resizes = ResizeEvents::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                tokio::time::sleep(fade).await;
                let mut vis = lock(vis);
                if vis.tick_caption() {
                    print!("\x1b[2J\x1b[H");
                    print_text(&vis, accepted, board, state, today);
                }
            }
            _ = resizes.recv() => {
                let (columns, rows) = match crossterm::terminal::size() {
                    Ok((columns, rows)) => grid_size_for(&config.chart, columns, rows),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not read terminal size");
                        continue;
                    }
                };
                tracing::debug!(columns, rows, "Terminal resized");

                let mut vis = lock(vis);
                vis.surface_mut().resize(columns, rows);
                let mut outcome = vis.on_resize();
                if vis.has_pending_frame() {
                    outcome = vis.on_frame().unwrap_or(outcome);
                }
                if outcome != RenderOutcome::Skipped {
                    print!("\x1b[2J\x1b[H");
                    print_text(&vis, accepted, board, state, today);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping");
                break;
            }
        }
    }
}

/// Grid that fits the terminal, never larger than configured
fn grid_size_for(chart: &ChartConfig, columns: u16, rows: u16) -> (usize, usize) {
    let columns = usize::from(columns).min(chart.width);
    let rows = usize::from(rows)
        .saturating_sub(RESERVED_ROWS)
        .min(chart.height);
    (columns, rows)
}

/// Terminal window-change notifications; never fires where unsupported
struct ResizeEvents {
    #[cfg(unix)]
    signal: Option<tokio::signal::unix::Signal>,
}

impl ResizeEvents {
    #[cfg(unix)]
    fn new() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        let signal = signal(SignalKind::window_change())
            .map_err(|e| tracing::warn!(error = %e, "Resize events unavailable"))
            .ok();
        Self { signal }
    }

    #[cfg(not(unix))]
    fn new() -> Self {
        Self {}
    }

    async fn recv(&mut self) {
        #[cfg(unix)]
        if let Some(signal) = self.signal.as_mut() {
            if signal.recv().await.is_some() {
                return;
            }
            self.signal = None;
        }
        std::future::pending::<()>().await
    }
}

fn print_text(
    vis: &TerminalVisualization,
    accepted: &Accepted,
    board: &MessageBoard,
    state: &lifeweeks::AppState,
    today: NaiveDate,
) {
    let submission = &accepted.submission;
    println!(
        "Born {} ({}, {}), life expectancy {:.1} years",
        format_long_date(submission.birthdate),
        submission.gender,
        submission.country,
        accepted.life_expectancy
    );
    println!();

    if let Some(weeks) = &vis.panel().weeks {
        println!("{}", weeks);
    }
    println!("{}", vis.surface().render());
    if let Some(journey) = &vis.panel().journey {
        println!("{}", journey);
    }

    if let Some(stats) = YearStatistics::compute(state, today) {
        println!();
        println!("{}", stats);
    }

    println!();
    println!("{}", board);
}

fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("lifeweeks={}", config.level)));

    let (writer, ansi) = match &config.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(ansi).with_writer(writer))
            .init();
    }

    Ok(())
}

fn lock<V>(shared: &Mutex<V>) -> std::sync::MutexGuard<'_, V> {
    shared
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_size_fits_terminal() {
        let chart = ChartConfig::default();
        assert_eq!(grid_size_for(&chart, 200, 100), (chart.width, chart.height));
        assert_eq!(grid_size_for(&chart, 30, 22), (30, 10));
        assert_eq!(grid_size_for(&chart, 80, 5), (chart.width, 0));
    }

    #[test]
    fn test_cli_parses_visualize() {
        let cli = Cli::try_parse_from([
            "lifeweeks",
            "visualize",
            "--gender",
            "female",
            "--birth-date",
            "01/01/1990",
            "--country",
            "USA",
            "--follow",
        ])
        .unwrap();
        match cli.command {
            Commands::Visualize { country, follow, format, .. } => {
                assert_eq!(country, "USA");
                assert!(follow);
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("expected visualize"),
        }
    }
}
