use crate::error::{ConvertError, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

/// Decodes every frame of the animation at `path`, fully composited.
pub fn decode_frames(path: &Path) -> Result<Vec<RgbaImage>> {
    let decode_failure = |e| ConvertError::DecodeFailure {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::open(path).map_err(|e| decode_failure(image::ImageError::IoError(e)))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(decode_failure)?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(decode_failure)?;

    Ok(frames.into_iter().map(|frame| frame.into_buffer()).collect())
}

/// Endless cycle over a fixed list of frames, advanced at most once per
/// interval by whoever drives it.
pub struct PreviewLoop<T> {
    frames: Vec<T>,
    index: usize,
    interval: Duration,
    next_due: Instant,
}

impl<T> PreviewLoop<T> {
    /// Returns `None` when there is nothing to show.
    pub fn new(frames: Vec<T>, interval: Duration, now: Instant) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            index: 0,
            interval,
            next_due: now + interval,
        })
    }

    /// Moves to the next frame if its time has come, rescheduling from `now`
    /// like a timer re-armed at the end of its callback.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.index = (self.index + 1) % self.frames.len();
        self.next_due = now + self.interval;
        true
    }

    /// Time left until the next frame change.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> &T {
        &self.frames[self.index]
    }
}

/// Identifies one started preview. A token stays valid until the next start
/// or cancel on the same slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreviewToken(u64);

/// Holds at most one running preview. Starting a new one cancels the old one.
pub struct PreviewSlot<T> {
    active: Option<PreviewLoop<T>>,
    generation: u64,
}

impl<T> Default for PreviewSlot<T> {
    fn default() -> Self {
        Self {
            active: None,
            generation: 0,
        }
    }
}

impl<T> PreviewSlot<T> {
    pub fn start(&mut self, frames: Vec<T>, interval: Duration, now: Instant) -> Option<PreviewToken> {
        self.cancel();
        let preview = PreviewLoop::new(frames, interval, now)?;
        log::debug!(
            "Starting preview #{} with {} frame(s)",
            self.generation,
            preview.frame_count()
        );
        self.active = Some(preview);
        Some(PreviewToken(self.generation))
    }

    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Cancelled preview #{}", self.generation);
        }
        self.generation += 1;
    }

    pub fn is_running(&self, token: PreviewToken) -> bool {
        self.active.is_some() && token.0 == self.generation
    }

    pub fn active(&self) -> Option<&PreviewLoop<T>> {
        self.active.as_ref()
    }

    /// Advances the running preview and returns how long the caller may wait
    /// before driving it again. Stale tokens drive nothing.
    pub fn tick(&mut self, token: PreviewToken, now: Instant) -> Option<Duration> {
        if token.0 != self.generation {
            return None;
        }
        let preview = self.active.as_mut()?;
        preview.tick(now);
        Some(preview.until_next(now))
    }
}
