use crate::audio::MediaEngine;
use anyhow::Result;
use rand::RngExt;
use rand::rngs::SmallRng;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug)]
pub struct PlaybackSession {
    queue: Vec<PathBuf>,
    current: Option<usize>,
    shuffle: bool,
    repeat_one: bool,
    seeking: bool,
    duration_ms: u64,
    progress: f64,
    rng: SmallRng,
}

impl PlaybackSession {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            current: None,
            shuffle: false,
            repeat_one: false,
            seeking: false,
            duration_ms: 0,
            progress: 0.0,
            rng: rand::make_rng::<SmallRng>(),
        }
    }

    pub fn load_queue(
        &mut self,
        tracks: Vec<PathBuf>,
        start: usize,
        engine: &mut dyn MediaEngine,
    ) -> Result<()> {
        self.current = (start < tracks.len()).then_some(start);
        self.queue = tracks;
        self.play_current(engine)
    }

    pub fn play_current(&mut self, engine: &mut dyn MediaEngine) -> Result<()> {
        let Some(path) = self.current_path().map(Path::to_path_buf) else {
            return Ok(());
        };
        engine.set_source(&path)?;
        engine.play();
        Ok(())
    }

    pub fn advance(&mut self, direction: Direction, engine: &mut dyn MediaEngine) -> Result<()> {
        let len = self.queue.len();
        if len == 0 {
            return Ok(());
        }

        // Shuffle ignores direction and may land on the current index again.
        let idx = if self.shuffle {
            self.rng.random_range(0..len)
        } else {
            match (direction, self.current) {
                (Direction::Next, Some(current)) => (current + 1) % len,
                (Direction::Next, None) => 0,
                (Direction::Previous, Some(current)) => (current + len - 1) % len,
                (Direction::Previous, None) => len - 1,
            }
        };

        self.current = Some(idx);
        self.play_current(engine)
    }

    pub fn on_media_finished(&mut self, engine: &mut dyn MediaEngine) -> Result<()> {
        if self.repeat_one {
            if self.current.is_none() {
                return Ok(());
            }
            engine.set_position(Duration::ZERO)?;
            engine.play();
            return Ok(());
        }
        self.advance(Direction::Next, engine)
    }

    pub fn on_position_changed(&mut self, position_ms: u64) {
        if self.seeking || self.duration_ms == 0 {
            return;
        }
        self.progress = (position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0);
    }

    pub fn on_duration_changed(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    pub fn seek_to(&mut self, ratio: f64, engine: &mut dyn MediaEngine) -> Result<()> {
        if self.duration_ms == 0 {
            return Ok(());
        }
        let ratio = ratio.clamp(0.0, 1.0);
        let target_ms = (ratio * self.duration_ms as f64).round() as u64;
        engine.set_position(Duration::from_millis(target_ms))?;
        self.progress = ratio;
        Ok(())
    }

    pub fn begin_seek(&mut self) {
        self.seeking = true;
    }

    pub fn end_seek(&mut self) {
        self.seeking = false;
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
    }

    pub fn set_repeat_one(&mut self, enabled: bool) {
        self.repeat_one = enabled;
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat_one(&self) -> bool {
        self.repeat_one
    }

    pub fn shuffle_label(&self) -> &'static str {
        if self.shuffle { "Shuffle On" } else { "Shuffle Off" }
    }

    pub fn repeat_label(&self) -> &'static str {
        if self.repeat_one { "Repeat On" } else { "Repeat Off" }
    }

    pub fn queue(&self) -> &[PathBuf] {
        &self.queue
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.queue.get(self.current?).map(PathBuf::as_path)
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}
