//! Line-based keyboard commands read from stdin on a helper thread.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use subsync_core::player::{PLAYBACK_RATE_OPTIONS, PlayerCommand};
use subsync_core::policy::{LOOP_COUNT_OPTIONS, PolicyPatch, SentenceMode};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub enum HostInput {
    Command(PlayerCommand),
    Quit,
}

pub const HELP: &str = "commands: p (play/pause), s <secs> (seek), j <secs> (jump+play), \
seg <start> <end> (play segment), loop <1-5|0> (sentence loop, 0 = forever), \
cont (continuous), rate <0.5|0.75|1|1.25|1.5|2>, m (mute), r (reset), q (quit)";

/// Spawn the stdin reader. The channel closes when stdin does.
pub fn spawn_stdin_reader() -> mpsc::Receiver<HostInput> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("Failed to read stdin: {err}");
                    break;
                }
            };
            match parse_input(&line) {
                Some(input) => {
                    if tx.send(input).is_err() {
                        break;
                    }
                }
                None if line.trim().is_empty() => {}
                None => println!("{HELP}"),
            }
        }
        debug!("Stdin reader finished");
    });
    rx
}

pub fn parse_input(line: &str) -> Option<HostInput> {
    let mut parts = line.split_whitespace();
    let head = parts.next()?;
    let args: Vec<&str> = parts.collect();
    let arg_f64 = |idx: usize| args.get(idx).and_then(|value| value.parse::<f64>().ok());
    let command = match head {
        "q" | "quit" => return Some(HostInput::Quit),
        "p" | "play" | "pause" => PlayerCommand::TogglePlayPause,
        "s" | "seek" => PlayerCommand::Seek { time: arg_f64(0)? },
        "j" | "jump" => PlayerCommand::JumpTo { time: arg_f64(0)? },
        "seg" => {
            let start = arg_f64(0)?;
            let end = arg_f64(1)?;
            PlayerCommand::PlaySegment { start, end }
        }
        "loop" => {
            let count = args.first()?.parse::<u32>().ok()?;
            if !LOOP_COUNT_OPTIONS.contains(&count) {
                return None;
            }
            PlayerCommand::ApplyPolicy {
                patch: PolicyPatch {
                    sentence_mode: Some(SentenceMode::LoopSentence),
                    loop_count: Some(count),
                    ..PolicyPatch::default()
                },
            }
        }
        "cont" => PlayerCommand::ApplyPolicy {
            patch: PolicyPatch {
                sentence_mode: Some(SentenceMode::Continuous),
                ..PolicyPatch::default()
            },
        },
        "rate" => {
            let rate = arg_f64(0)? as f32;
            if !PLAYBACK_RATE_OPTIONS.contains(&rate) {
                return None;
            }
            PlayerCommand::SetPlaybackRate { rate }
        }
        "m" | "mute" => PlayerCommand::ToggleMute,
        "r" | "reset" => PlayerCommand::Reset,
        _ => return None,
    };
    Some(HostInput::Command(command))
}
