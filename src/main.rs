//! Terminal host for the subtitle synchronization engine.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Load the subtitle track and an optional glossary next to it.
//! - Pump frames into the player until the media ends or Ctrl-C.

mod audio_clock;
mod cancellation;
mod host_clock;
mod input;
mod terminal;

use crate::audio_clock::RodioClock;
use crate::cancellation::CancellationToken;
use crate::host_clock::HostClock;
use crate::input::{HELP, HostInput};
use crate::terminal::TerminalRows;
use anyhow::{Result, anyhow};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc::TryRecvError;
use std::thread;
use std::time::Instant;
use subsync_core::clock::{ClockEvent, ManualClock};
use subsync_core::frame::FrameLoop;
use subsync_core::lookup::Glossary;
use subsync_core::player::Player;
use subsync_core::subtitle::SubtitleTrack;
use subsync_core::{TickOutcome, load_config};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Tail appended to a silent clock so the last subtitle can finish.
const SILENT_TAIL_SECS: f64 = 1.0;

struct Args {
    subtitles: PathBuf,
    audio: Option<PathBuf>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(
        path = %args.subtitles.display(),
        level = %config.log_level,
        "Starting subsync"
    );

    let track = SubtitleTrack::load(&args.subtitles)?;
    info!(count = track.len(), "Loaded subtitle track");
    let glossary = load_glossary(&args.subtitles, &track);

    let clock = match &args.audio {
        Some(path) => HostClock::Audio(RodioClock::open(path)?),
        None => {
            let end = track
                .intervals()
                .last()
                .map(|last| last.end_time)
                .unwrap_or(0.0);
            info!(duration = end + SILENT_TAIL_SECS, "No audio file; using a silent clock");
            HostClock::Silent(ManualClock::new(end + SILENT_TAIL_SECS))
        }
    };

    let rows = TerminalRows::new(&track, &config.policy(), &glossary);
    let mut player = Player::new(track, rows, FrameLoop::new(), &config);
    player.attach_clock(clock);

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C; stopping playback");
        handler_token.cancel();
    }) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }

    println!("{HELP}");
    let inputs = input::spawn_stdin_reader();
    let mut stdin_open = true;
    let frame_interval = config.frame_interval();
    let mut last_frame = Instant::now();
    player.play();

    while !cancel.is_cancelled() {
        while stdin_open {
            match inputs.try_recv() {
                Ok(HostInput::Quit) => cancel.cancel(),
                Ok(HostInput::Command(command)) => {
                    let event = player.apply_command(command);
                    debug!(
                        action = event.action,
                        time = event.snapshot.current_time,
                        playing = event.snapshot.is_playing,
                        "Applied command"
                    );
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => stdin_open = false,
            }
        }

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(last_frame);
        last_frame = now;
        let events = player
            .clock_mut()
            .map(|clock| clock.poll(elapsed))
            .unwrap_or_default();

        match player.pump(now) {
            Some(TickOutcome::Stopped) => info!("Segment finished"),
            Some(TickOutcome::Halted) => info!("Sentence loop finished; paused"),
            _ => {}
        }

        let mut ended = false;
        for event in events {
            ended |= event == ClockEvent::Ended;
            player.handle_event(event);
        }
        if ended && !player.is_playing() {
            info!("Playback finished");
            break;
        }
        if !stdin_open && !player.is_playing() {
            info!("Input closed while paused; exiting");
            break;
        }

        thread::sleep(frame_interval);
    }

    player.pause();
    Ok(())
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let subtitles = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("Usage: subsync <subtitles.json> [audio-file]"))?;
    if !subtitles.exists() {
        return Err(anyhow!("File not found: {}", subtitles.display()));
    }
    let audio = args.next().map(PathBuf::from);
    if let Some(audio) = &audio {
        if !audio.exists() {
            return Err(anyhow!("File not found: {}", audio.display()));
        }
    }
    Ok(Args { subtitles, audio })
}

/// `<stem>.glossary.json` next to the subtitle file, plus any inline
/// clickable-word entries from the track itself.
fn load_glossary(subtitles: &Path, track: &SubtitleTrack) -> Glossary {
    let mut glossary = glossary_path(subtitles)
        .filter(|path| path.exists())
        .and_then(|path| match Glossary::load(&path) {
            Ok(glossary) => Some(glossary),
            Err(err) => {
                warn!("Ignoring glossary: {err:#}");
                None
            }
        })
        .unwrap_or_default();
    glossary.extend_from_track(track);
    debug!(entries = glossary.len(), "Glossary ready");
    glossary
}

fn glossary_path(subtitles: &Path) -> Option<PathBuf> {
    let stem = subtitles.file_stem()?.to_str()?;
    Some(subtitles.with_file_name(format!("{stem}.glossary.json")))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
