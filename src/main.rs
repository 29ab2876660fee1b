use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuesync::config::{Config, OutputFormat, TrackKind};
use cuesync::loader::{self, LoadedTrack};
use cuesync::subtitle::{create_formatter, json::JsonFormatter, CaptionFormat, SubtitleFormatter};
use cuesync::timeline::Transition;
use cuesync::timestamp::{format_timestamp, parse_position, TimeMs};
use cuesync::{active_caption, active_transcript, print_summary, SyncSession, TickUpdate};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "cuesync")]
#[command(version, about = "Subtitle and transcript synchronization")]
#[command(long_about = "Parse SRT/WebVTT captions and bracket-timestamped transcripts, and resolve which entry is active at a playback position.")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List every entry of a caption or transcript file
    Inspect {
        file: PathBuf,

        /// Track kind: captions, transcript (defaults to the file extension)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show the entry active at a playback position
    At {
        file: PathBuf,

        /// Position in milliseconds or as a timestamp (00:01:30.250)
        position: String,

        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Convert a caption file to another format
    Convert {
        file: PathBuf,

        /// Output format: srt, vtt, json
        #[arg(short, long)]
        format: Option<String>,

        /// Output file (defaults to input name with the format's extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Drive a simulated playback clock over a file and log every change
    Play {
        file: PathBuf,

        #[arg(short, long)]
        kind: Option<String>,

        /// Start position
        #[arg(long, default_value = "0")]
        from: String,

        /// End position (defaults to the end of the track)
        #[arg(long)]
        to: Option<String>,

        /// Clock period in milliseconds (defaults to the configured tick)
        #[arg(long)]
        tick: Option<u64>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn derive_output_path(input: &Path, format: &OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut output = input.to_path_buf();
    output.set_file_name(format!("{}.{}", stem.to_string_lossy(), format.extension()));
    output
}

fn parse_kind(kind: Option<&str>) -> Result<Option<TrackKind>> {
    kind.map(|k| k.parse::<TrackKind>().map_err(|e: String| anyhow::anyhow!(e)))
        .transpose()
}

fn parse_position_arg(text: &str) -> Result<TimeMs> {
    parse_position(text).with_context(|| format!("Invalid position: {}", text))
}

fn load(file: &Path, kind: Option<&str>) -> Result<LoadedTrack> {
    let kind = parse_kind(kind)?;
    loader::load(file, kind).with_context(|| format!("Failed to load {}", file.display()))
}

fn inspect(file: &Path, kind: Option<&str>) -> Result<()> {
    match load(file, kind)? {
        LoadedTrack::Captions(track) => {
            for entry in &track {
                println!(
                    "#{:<5} {} --> {}  {}",
                    entry.sequence_index,
                    format_timestamp(entry.start),
                    format_timestamp(entry.end),
                    entry.text.replace('\n', " / ")
                );
            }
            info!("{} captions", track.len());
        }
        LoadedTrack::Transcript(track) => {
            for entry in &track {
                println!(
                    "{:>12}  (line {:>4})  {}",
                    format_timestamp(entry.timestamp),
                    entry.line_number,
                    entry.text
                );
            }
            info!("{} transcript entries", track.len());
        }
    }
    Ok(())
}

fn show_active(file: &Path, position: &str, kind: Option<&str>) -> Result<()> {
    let position = parse_position_arg(position)?;

    match load(file, kind)? {
        LoadedTrack::Captions(track) => match active_caption(&track, position) {
            Some(entry) => println!(
                "#{} [{} --> {}]\n{}",
                entry.sequence_index,
                format_timestamp(entry.start),
                format_timestamp(entry.end),
                entry.text
            ),
            None => println!("No caption at {}", format_timestamp(position)),
        },
        LoadedTrack::Transcript(track) => match active_transcript(&track, position) {
            Some((index, entry)) => println!(
                "[{}] entry {} (line {})\n{}",
                format_timestamp(entry.timestamp),
                index,
                entry.line_number,
                entry.text
            ),
            None => println!("No transcript entry at {}", format_timestamp(position)),
        },
    }
    Ok(())
}

fn convert(
    file: &Path,
    format: Option<&str>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let format: OutputFormat = match format {
        Some(f) => f.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.default_format,
    };

    let output = output.unwrap_or_else(|| derive_output_path(file, &format));
    if output == file {
        anyhow::bail!(
            "Refusing to overwrite the input file {}; pass --output",
            file.display()
        );
    }

    let text = loader::read_text(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let source_format = CaptionFormat::detect(&text);
    let track = cuesync::parse_captions(&text);
    if track.is_empty() {
        warn!("No captions recognized in {}", file.display());
    }

    let formatter: Box<dyn SubtitleFormatter> = match format {
        OutputFormat::Json => Box::new(JsonFormatter {
            source_file: file.file_name().map(|n| n.to_string_lossy().into_owned()),
            source_format: Some(source_format.to_string()),
        }),
        OutputFormat::Srt | OutputFormat::Vtt => create_formatter(format),
    };

    std::fs::write(&output, formatter.format(track.entries()))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Input:    {} ({})", file.display(), source_format);
    info!("Output:   {} ({})", output.display(), formatter.extension());
    info!("Captions: {}", track.len());
    Ok(())
}

fn play(
    file: &Path,
    kind: Option<&str>,
    from: &str,
    to: Option<&str>,
    tick: Option<u64>,
    config: &Config,
) -> Result<()> {
    let from = parse_position_arg(from)?;
    let mut session = SyncSession::with_track(load(file, kind)?);

    let to = match to {
        Some(to) => parse_position_arg(to)?,
        None => session.end_time().unwrap_or(from),
    };
    let tick = tick.unwrap_or(config.tick_interval_ms).max(1);

    info!(
        "Playing {} from {} to {} every {}ms",
        file.display(),
        format_timestamp(from),
        format_timestamp(to),
        tick
    );

    let mut position = from;
    loop {
        let update = session.tick(position);
        report(&session, update);

        if position >= to {
            break;
        }
        position = position.saturating_add(tick).min(to);
    }

    print_summary(&session);
    Ok(())
}

fn report(session: &SyncSession, update: TickUpdate) {
    let at = format_timestamp(session.position());

    match update.caption {
        Some(Transition::Entered(_)) => {
            if let Some(entry) = session.current_caption() {
                println!(
                    "{:>12}  caption #{}: {}",
                    at,
                    entry.sequence_index,
                    entry.text.replace('\n', " / ")
                );
            }
        }
        Some(Transition::Cleared) => println!("{:>12}  caption cleared", at),
        None => {}
    }

    match update.transcript {
        Some(Transition::Entered(_)) => {
            if let Some((index, entry)) = session.current_transcript() {
                println!("{:>12}  transcript [{}]: {}", at, index, entry.text);
            }
        }
        Some(Transition::Cleared) => println!("{:>12}  transcript cleared", at),
        None => {}
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    match cli.command {
        Command::Inspect { file, kind } => inspect(&file, kind.as_deref()),
        Command::At {
            file,
            position,
            kind,
        } => show_active(&file, &position, kind.as_deref()),
        Command::Convert {
            file,
            format,
            output,
        } => convert(&file, format.as_deref(), output, &config),
        Command::Play {
            file,
            kind,
            from,
            to,
            tick,
        } => play(&file, kind.as_deref(), &from, to.as_deref(), tick, &config),
    }
}
