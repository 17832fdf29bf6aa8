//! Checkpoint-aware playback
//!
//! [`PlaybackController`] holds the playback state the frame loop needs:
//! the direction, whether to keep playing on its own, the requested step and
//! the single move currently being animated. Each frame the driver calls
//! [`PlaybackController::update`] with the elapsed time.
//!
//! Without auto-animation a step plays one checkpoint group: forward playback
//! stops once the next queued move opens a new group, backward playback stops
//! after undoing the move that opened one.

use crate::moves::{ModuleId, Move};
use crate::registry::ModuleRegistry;
use crate::sequence::MoveSequence;

/// Which way the sequence is being played
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// What happened during one [`PlaybackController::update`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackEvent {
    /// Nothing to do: no step requested and auto-animation off
    Idle,
    /// A move is in flight at the given (linear) progress
    Animating { mover: ModuleId, progress: f32 },
    /// A move was committed. `stopped` is set when playback paused at a
    /// checkpoint boundary and waits for the next request.
    Finished { mover: ModuleId, stopped: bool },
    /// No move left in the requested direction
    Exhausted,
}

/// Playback state, driven once per frame
#[derive(Clone, Debug)]
pub struct PlaybackController {
    direction: Direction,
    auto_animate: bool,
    /// Moves per second
    anim_speed: f32,
    step_requested: bool,
    active: Option<Move>,
    /// Direction the active move was started in
    active_direction: Direction,
    progress: f32,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(1.0, false)
    }
}

impl PlaybackController {
    pub fn new(anim_speed: f32, auto_animate: bool) -> Self {
        Self {
            direction: Direction::Forward,
            auto_animate,
            anim_speed: anim_speed.max(0.0),
            step_requested: false,
            active: None,
            active_direction: Direction::Forward,
            progress: 0.0,
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn auto_animate(&self) -> bool {
        self.auto_animate
    }

    pub fn set_auto_animate(&mut self, auto_animate: bool) {
        self.auto_animate = auto_animate;
    }

    #[inline]
    pub fn anim_speed(&self) -> f32 {
        self.anim_speed
    }

    /// Set the animation speed in moves per second (negative values clamp to 0)
    pub fn set_anim_speed(&mut self, anim_speed: f32) {
        self.anim_speed = anim_speed.max(0.0);
    }

    /// The move currently being animated
    #[inline]
    pub fn active_move(&self) -> Option<&Move> {
        self.active.as_ref()
    }

    /// Linear progress of the active move in `[0, 1)`
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Check whether a step is waiting to be played
    #[inline]
    pub fn step_requested(&self) -> bool {
        self.step_requested
    }

    /// Play forward (one checkpoint group unless auto-animating)
    ///
    /// A move already in flight finishes in its own direction first.
    pub fn request_forward(&mut self) {
        self.direction = Direction::Forward;
        self.step_requested = true;
    }

    /// Play backward (one checkpoint group unless auto-animating)
    pub fn request_backward(&mut self) {
        self.direction = Direction::Backward;
        self.step_requested = true;
    }

    /// Drop the active move and any pending request
    ///
    /// The module keeps whatever interpolated transform it was last given;
    /// callers replacing the scenario destroy the modules anyway.
    pub fn cancel(&mut self) {
        self.active = None;
        self.progress = 0.0;
        self.step_requested = false;
    }

    /// Advance playback by `dt` seconds
    pub fn update(&mut self, dt: f32, sequence: &mut MoveSequence, registry: &mut ModuleRegistry) -> PlaybackEvent {
        if self.active.is_none() {
            if !self.auto_animate && !self.step_requested {
                return PlaybackEvent::Idle;
            }

            let next = match self.direction {
                Direction::Forward => sequence.pop(),
                Direction::Backward => sequence.undo(),
            };

            match next {
                Some(mv) => {
                    self.active = Some(mv);
                    self.active_direction = self.direction;
                    self.progress = 0.0;
                }
                None => {
                    self.step_requested = false;
                    return PlaybackEvent::Exhausted;
                }
            }
        }

        let Some(mv) = self.active.take() else {
            return PlaybackEvent::Idle;
        };

        self.progress += dt.max(0.0) * self.anim_speed;

        if self.progress < 1.0 {
            registry.animate(&mv, self.progress);
            let event = PlaybackEvent::Animating { mover: mv.mover_id(), progress: self.progress };
            self.active = Some(mv);
            return event;
        }

        registry.finish(&mv);
        self.progress = 0.0;

        let stopped = !self.auto_animate && self.at_group_boundary(&mv, sequence);
        if stopped {
            self.step_requested = false;
        }

        PlaybackEvent::Finished { mover: mv.mover_id(), stopped }
    }

    fn at_group_boundary(&self, finished: &Move, sequence: &MoveSequence) -> bool {
        match self.active_direction {
            Direction::Forward => sequence.peek_next().map_or(true, Move::is_checkpoint),
            Direction::Backward => finished.is_checkpoint() || sequence.is_at_start(),
        }
    }
}
