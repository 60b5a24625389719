use anyhow::{Context, Result};
use rodio::Source;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
#[cfg(unix)]
use std::ffi::CString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::time::Instant;

const MAX_VOLUME: f32 = 1.0;

pub trait MediaEngine {
    fn set_source(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_position(&mut self, position: Duration) -> Result<()>;
    fn set_volume(&mut self, ratio: f32);
    fn volume(&self) -> f32;
    fn is_paused(&self) -> bool;
    fn current_source(&self) -> Option<&Path>;
    fn position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
    fn is_finished(&self) -> bool;
}

pub struct RodioEngine {
    stream: OutputStream,
    sink: Sink,
    current: Option<PathBuf>,
    track_duration: Option<Duration>,
    volume: f32,
}

impl RodioEngine {
    pub fn new() -> Result<Self> {
        let (stream, sink) = Self::open_output_stream()?;
        Ok(Self {
            stream,
            sink,
            current: None,
            track_duration: None,
            volume: 0.5,
        })
    }

    fn open_output_stream() -> Result<(OutputStream, Sink)> {
        let mut stream = with_silenced_stderr(|| {
            OutputStreamBuilder::from_default_device()
                .context("failed to open default system output device")?
                .with_error_callback(|_| {})
                .open_stream_or_fallback()
                .context("failed to start output stream")
        })?;
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());
        Ok((stream, sink))
    }

    fn append_decoded(&mut self, path: &Path) -> Result<Option<Duration>> {
        let file =
            File::open(path).with_context(|| format!("failed to open track {}", path.display()))?;
        let source = Decoder::try_from(file)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        let duration = source.total_duration();
        self.sink.append(source);
        Ok(duration)
    }
}

impl MediaEngine for RodioEngine {
    fn set_source(&mut self, path: &Path) -> Result<()> {
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());
        self.sink.pause();

        self.track_duration = self.append_decoded(path)?;
        self.sink.set_volume(self.volume);
        self.current = Some(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn stop(&mut self) {
        self.sink.stop();
        self.current = None;
        self.track_duration = None;
    }

    fn set_position(&mut self, position: Duration) -> Result<()> {
        let Some(path) = self.current.clone() else {
            return Err(anyhow::anyhow!("no active track"));
        };

        // A drained sink has nothing left to seek in; reload the source
        // first so seeking after end-of-media restarts the track.
        if self.sink.empty() {
            self.track_duration = self.append_decoded(&path)?;
            self.sink.set_volume(self.volume);
        }

        self.sink
            .try_seek(position)
            .map_err(|err| anyhow::anyhow!("failed to seek current track: {err:?}"))
    }

    fn set_volume(&mut self, ratio: f32) {
        self.volume = ratio.clamp(0.0, MAX_VOLUME);
        self.sink.set_volume(self.volume);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_paused(&self) -> bool {
        self.sink.is_paused()
    }

    fn current_source(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    fn position(&self) -> Option<Duration> {
        self.current.as_ref()?;
        Some(self.sink.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.track_duration
    }

    fn is_finished(&self) -> bool {
        self.current.is_some() && !self.sink.is_paused() && self.sink.empty()
    }
}

#[cfg(unix)]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    let saved = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved < 0 {
        return operation();
    }

    let devnull = CString::new("/dev/null")
        .ok()
        .map(|path| unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) })
        .unwrap_or(-1);

    if devnull >= 0 {
        unsafe {
            libc::dup2(devnull, libc::STDERR_FILENO);
            libc::close(devnull);
        }
    }

    let result = operation();

    unsafe {
        libc::dup2(saved, libc::STDERR_FILENO);
        libc::close(saved);
    }

    result
}

#[cfg(not(unix))]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    operation()
}

pub struct NullEngine {
    paused: bool,
    current: Option<PathBuf>,
    volume: f32,
    started_at: Option<Instant>,
    position_offset: Duration,
    track_duration: Option<Duration>,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            paused: true,
            current: None,
            volume: 0.5,
            started_at: None,
            position_offset: Duration::ZERO,
            track_duration: None,
        }
    }

    fn estimate_duration(path: &Path) -> Option<Duration> {
        let file = File::open(path).ok()?;
        let source = Decoder::try_from(file).ok()?;
        source
            .total_duration()
            .filter(|duration| !duration.is_zero())
    }

    fn current_position(&self) -> Duration {
        let mut position = self.position_offset;
        if !self.paused
            && self.current.is_some()
            && let Some(started_at) = self.started_at
        {
            position = position.saturating_add(started_at.elapsed());
        }
        if let Some(duration) = self.track_duration {
            return position.min(duration);
        }
        position
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for NullEngine {
    fn set_source(&mut self, path: &Path) -> Result<()> {
        self.paused = true;
        self.current = Some(path.to_path_buf());
        self.started_at = None;
        self.position_offset = Duration::ZERO;
        self.track_duration = Self::estimate_duration(path);
        Ok(())
    }

    fn play(&mut self) {
        if self.current.is_some() {
            self.started_at = Some(Instant::now());
        }
        self.paused = false;
    }

    fn pause(&mut self) {
        self.position_offset = self.current_position();
        self.started_at = None;
        self.paused = true;
    }

    fn stop(&mut self) {
        self.current = None;
        self.paused = true;
        self.started_at = None;
        self.position_offset = Duration::ZERO;
        self.track_duration = None;
    }

    fn set_position(&mut self, position: Duration) -> Result<()> {
        if self.current.is_none() {
            return Err(anyhow::anyhow!("no active track"));
        }

        self.position_offset = self
            .track_duration
            .map_or(position, |duration| position.min(duration));
        self.started_at = if self.paused {
            None
        } else {
            Some(Instant::now())
        };
        Ok(())
    }

    fn set_volume(&mut self, ratio: f32) {
        self.volume = ratio.clamp(0.0, MAX_VOLUME);
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_source(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    fn position(&self) -> Option<Duration> {
        self.current.as_ref()?;
        Some(self.current_position())
    }

    fn duration(&self) -> Option<Duration> {
        self.track_duration
    }

    fn is_finished(&self) -> bool {
        let Some(duration) = self.track_duration else {
            return false;
        };
        self.current.is_some() && !self.paused && self.current_position() >= duration
    }
}
