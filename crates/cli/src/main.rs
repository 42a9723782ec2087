//! LecTrack CLI - honest lecture progress.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lectrack_core::{format_duration, LectureId, ProgressKey, ProgressRecord, UserId};
use lectrack_progress::{
    run_recorder, PlaybackObserver, PlaybackSampler, ProgressService, ProgressTracker,
    SamplerConfig, TrackerConfig, MERGE_TOLERANCE,
};
use lectrack_storage::{JsonStorage, MemoryStorage, ProgressStore, StaticCatalog};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lectrack")]
#[command(about = "Lecture progress that rewatching cannot inflate", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".lectrack")]
    data_dir: std::path::PathBuf,

    /// Viewer id
    #[arg(long, global = true, default_value = "local")]
    user: String,

    /// Keep progress in memory only
    #[arg(long, global = true)]
    memory: bool,

    /// Merge gap tolerance in seconds
    #[arg(long, global = true, default_value_t = MERGE_TOLERANCE)]
    tolerance: f64,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List lectures with progress
    Lectures,
    /// Show progress on a lecture
    Show {
        /// Lecture ID
        lecture: LectureId,
    },
    /// Record one watched interval
    Record {
        /// Lecture ID
        lecture: LectureId,
        /// Start, in seconds
        start: f64,
        /// End, in seconds
        end: f64,
    },
    /// Feed sampled playback positions through the observer
    Replay {
        /// Lecture ID
        lecture: LectureId,
        /// Positions in seconds; `seek=<pos>` marks a user seek, `reset` drops the anchor
        #[arg(required = true)]
        positions: Vec<String>,
        /// Largest step between samples counted as playback
        #[arg(long, default_value = "1")]
        max_step: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if cli.memory {
        run(cli, MemoryStorage::new()).await
    } else {
        let storage = JsonStorage::new(&cli.data_dir).await?;
        info!("Using data directory {}", storage.root().display());
        run(cli, storage).await
    }
}

async fn run<S: ProgressStore + 'static>(cli: Cli, storage: S) -> Result<()> {
    let tracker = ProgressTracker::new().with_config(TrackerConfig {
        merge_tolerance: cli.tolerance,
    });
    let mut service =
        ProgressService::new(storage, StaticCatalog::builtin()).with_tracker(tracker);
    let user = UserId::new(cli.user);

    match cli.command {
        Commands::Lectures => {
            let overview = service.overview(&user).await?;

            println!("Lectures ({})", overview.len());
            for entry in overview {
                println!(
                    "  {:>3} | {:>6} | {:>3}% | {}",
                    entry.lecture.id,
                    entry.lecture.formatted_duration(),
                    entry.record.percent(),
                    entry.lecture.title,
                );
            }
        }
        Commands::Show { lecture } => {
            let key = ProgressKey::new(user, lecture);
            let Some(record) = service.progress(&key).await? else {
                println!("No progress on lecture {}", lecture);
                return Ok(());
            };
            print_record(&key, &record);
        }
        Commands::Record { lecture, start, end } => {
            let key = ProgressKey::new(user, lecture);
            let record = service.record(&key, start, end).await?;
            print_record(&key, &record);
        }
        Commands::Replay { lecture, positions, max_step } => {
            let key = ProgressKey::new(user, lecture);
            let sampler = PlaybackSampler::new().with_config(SamplerConfig { max_step });

            let (tx, rx) = mpsc::channel(64);
            let recorder = tokio::spawn(run_recorder(rx, service));

            let mut observer = PlaybackObserver::new(key.clone(), tx).with_sampler(sampler);
            let mut sent = 0usize;
            for position in &positions {
                if position.eq_ignore_ascii_case("reset") {
                    observer.on_reset();
                    continue;
                }
                if let Some(target) = position.strip_prefix("seek=") {
                    let target: f64 = target
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid seek target: {}", target))?;
                    observer.on_seek(target);
                    continue;
                }
                let position: f64 = position
                    .parse()
                    .map_err(|_| anyhow::anyhow!("Invalid position: {}", position))?;
                if observer.on_position(position).await? {
                    sent += 1;
                }
            }
            drop(observer);

            service = recorder.await?;
            info!("Replayed {} samples into {} intervals", positions.len(), sent);

            match service.progress(&key).await? {
                Some(record) => print_record(&key, &record),
                None => println!("No playback detected"),
            }
        }
    }

    Ok(())
}

fn print_record(key: &ProgressKey, record: &ProgressRecord) {
    println!("Progress: {}", key);
    println!("  Complete: {}% ({:.4})", record.percent(), record.fraction);
    println!("  Resume at: {}", format_duration(record.last_position));
    println!("  Watched ({}):", record.watched_intervals.len());
    for interval in &record.watched_intervals {
        println!(
            "    {} - {}",
            format_duration(interval.start()),
            format_duration(interval.end()),
        );
    }
}
