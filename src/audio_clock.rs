//! Media clock backed by a rodio sink.
//!
//! rodio does not report a playback position, so the clock keeps its own:
//! the media position at the last play/seek/rate change plus the wall time
//! elapsed since then, scaled by the playback rate.

use anyhow::{Context, Result};
use rodio::{Decoder, OutputStream, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use subsync_core::clock::{ClockEvent, MediaClock, clamp_seek};
use tracing::{debug, info, warn};

pub struct RodioClock {
    _stream: OutputStream,
    sink: Sink,
    path: PathBuf,
    duration: Option<Duration>,
    anchor_secs: f64,
    started_at: Option<Instant>,
    rate: f32,
    muted: bool,
    pending: Vec<ClockEvent>,
}

impl RodioClock {
    pub fn open(path: &Path) -> Result<Self> {
        let (_stream, handle) = OutputStream::try_default().context("Opening audio output")?;
        let sink = Sink::try_new(&handle).context("Creating sink")?;
        sink.pause();
        let source = decode(path)?;
        let duration = source.total_duration();
        sink.append(source);
        info!(
            path = %path.display(),
            duration_secs = duration.map(|d| d.as_secs_f64()),
            "Opened audio track"
        );
        Ok(Self {
            _stream,
            sink,
            path: path.to_path_buf(),
            duration,
            anchor_secs: 0.0,
            started_at: None,
            rate: 1.0,
            muted: false,
            pending: Vec::new(),
        })
    }

    /// Collect edge events since the last poll.
    pub fn poll_events(&mut self) -> Vec<ClockEvent> {
        if self.started_at.is_some() && self.sink.empty() {
            debug!("Audio sink drained");
            let duration = self.duration();
            self.anchor_secs = if duration.is_finite() {
                duration
            } else {
                self.current_time()
            };
            self.started_at = None;
            self.pending.push(ClockEvent::Ended);
        }
        std::mem::take(&mut self.pending)
    }

    fn elapsed_secs(&self) -> f64 {
        self.started_at
            .map(|started| started.elapsed().as_secs_f64() * f64::from(self.rate))
            .unwrap_or(0.0)
    }

    /// Fold the running timer into the anchor.
    fn settle(&mut self) {
        self.anchor_secs = self.current_time();
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Re-queue the track after the sink ran dry.
    fn reload(&mut self) -> Result<()> {
        let source = decode(&self.path)?;
        self.sink.append(source);
        self.anchor_secs = 0.0;
        Ok(())
    }
}

fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
    Decoder::new(BufReader::new(file)).with_context(|| format!("Decoding {}", path.display()))
}

impl MediaClock for RodioClock {
    fn current_time(&self) -> f64 {
        let t = self.anchor_secs + self.elapsed_secs();
        let duration = self.duration();
        if duration.is_finite() { t.min(duration) } else { t }
    }

    fn duration(&self) -> f64 {
        self.duration
            .map(|d| d.as_secs_f64())
            .unwrap_or(f64::INFINITY)
    }

    fn is_paused(&self) -> bool {
        self.started_at.is_none()
    }

    fn play(&mut self) -> Result<()> {
        if self.sink.empty() {
            self.reload()?;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.anchor_secs = self.current_time();
        self.started_at = None;
        self.sink.pause();
    }

    fn seek(&mut self, t: f64) {
        let target = clamp_seek(t, self.duration());
        if self.sink.empty() {
            if let Err(err) = self.reload() {
                warn!("Failed to reload audio before seeking: {err:#}");
                return;
            }
        }
        if let Err(err) = self.sink.try_seek(Duration::from_secs_f64(target)) {
            warn!(target, "Audio seek failed: {err}");
            return;
        }
        self.anchor_secs = target;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
        self.pending.push(ClockEvent::SeekCompleted);
    }

    fn playback_rate(&self) -> f32 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.settle();
        self.rate = rate;
        self.sink.set_speed(rate);
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.sink.set_volume(if muted { 0.0 } else { 1.0 });
    }
}
