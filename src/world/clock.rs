use std::time::Instant;

use crate::config::{DEFAULT_FIRST_FRAME_DT, DEFAULT_MAX_FRAME_DT};

/// Play/pause state and clamped frame deltas for a driving loop.
///
/// The engine never reads the wall clock itself; a host loop owns a
/// `FrameClock` and feeds the deltas it yields into
/// [`LinkageWorld::step_frame`](crate::world::LinkageWorld::step_frame).
#[derive(Debug, Clone)]
pub struct FrameClock {
    playing: bool,
    last_tick: Option<Instant>,
    max_dt: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f64) -> Self {
        Self {
            playing: false,
            last_tick: None,
            max_dt,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.last_tick = None;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
        self.playing
    }

    /// Delta to simulate for a tick at `now`, or `None` while paused.
    pub fn tick(&mut self, now: Instant) -> Option<f64> {
        if !self.playing {
            return None;
        }
        let dt = match self.last_tick {
            None => DEFAULT_FIRST_FRAME_DT,
            Some(last) => now
                .saturating_duration_since(last)
                .as_secs_f64()
                .min(self.max_dt),
        };
        self.last_tick = Some(now);
        Some(dt)
    }
}
