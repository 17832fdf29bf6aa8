//! Playback frame system
//!
//! Drives a [`Session`] one frame at a time:
//! - Delta time calculation (fixed frame clock or wall clock)
//! - Checkpoint stops and re-requests when stepping manually
//! - Collecting instance data for anything that moved

use std::time::Instant;
use modbot_core::{ModuleInstance, PlaybackEvent, Session};

/// Largest time step fed to playback in one frame
const MAX_DT: f32 = 0.25;

/// Where frame times come from
#[derive(Clone, Copy, Debug, PartialEq)]
enum FrameClock {
    /// Every frame advances by the same amount
    Fixed(f32),
    /// Measured between calls
    RealTime(Instant),
}

/// Result of a playback frame
pub struct FrameResult {
    /// What playback did this frame
    pub event: PlaybackEvent,
    /// Instance data, present when any module changed
    pub instances: Option<Vec<ModuleInstance>>,
}

/// Manages the playback frame loop
pub struct PlaybackSystem {
    clock: FrameClock,
    frames: u64,
}

impl PlaybackSystem {
    /// Create a playback system ticking at `frame_rate` Hz
    ///
    /// A frame rate of 0 measures real elapsed time instead.
    pub fn new(frame_rate: u32) -> Self {
        let clock = if frame_rate == 0 {
            FrameClock::RealTime(Instant::now())
        } else {
            FrameClock::Fixed(1.0 / frame_rate as f32)
        };
        Self { clock, frames: 0 }
    }

    /// Number of frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn next_dt(&mut self) -> f32 {
        match &mut self.clock {
            FrameClock::Fixed(dt) => (*dt).min(MAX_DT),
            FrameClock::RealTime(last_frame) => {
                let now = Instant::now();
                // Cap dt so a stall does not skip whole moves
                let dt = (now - *last_frame).as_secs_f32().min(MAX_DT);
                *last_frame = now;
                dt
            }
        }
    }

    /// Run one playback frame
    pub fn update(&mut self, session: &mut Session) -> FrameResult {
        let dt = self.next_dt();
        self.frames += 1;

        let event = session.update(dt);
        if let PlaybackEvent::Finished { mover, stopped: true } = event {
            log::info!(
                "Checkpoint reached after module {}: {}",
                mover,
                session.sequence().progress_label()
            );
        }

        FrameResult {
            event,
            instances: session.take_dirty_instances(),
        }
    }

    /// Play until the sequence is complete or `max_frames` have run
    ///
    /// When playback stops at a checkpoint the next group is requested
    /// straight away, so every group plays in order. Returns the number of
    /// frames run.
    pub fn run_to_end(&mut self, session: &mut Session, max_frames: u64) -> u64 {
        let start = self.frames;
        session.playback.request_forward();

        while self.frames - start < max_frames {
            match self.update(session).event {
                PlaybackEvent::Finished { stopped: true, .. } => session.playback.request_forward(),
                PlaybackEvent::Exhausted => break,
                PlaybackEvent::Idle if session.is_complete() => break,
                _ => {}
            }
        }

        if !session.is_complete() {
            log::warn!(
                "Stopped after {} frames with moves remaining: {}",
                self.frames - start,
                session.sequence().progress_label()
            );
        }
        self.frames - start
    }
}

impl Default for PlaybackSystem {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modbot_core::{PlaybackController, Scenario};

    const EPSILON: f32 = 0.0001;

    const GROUPS: &str = "\
Groups
Two checkpoint groups
CUBE

0, 1, 1, 1, 100

0, 0, 0, 0, 0
1, 0, 0, -1, 0
2, 0, 1, -1, 0

0, 5, 1, 0, 0

0, 5, 1, 0, 0
";

    fn session(auto_animate: bool) -> Session {
        let mut session = Session::new(PlaybackController::new(2.0, auto_animate));
        session.install(Scenario::parse(GROUPS).unwrap());
        session
    }

    #[test]
    fn test_fixed_clock() {
        let mut system = PlaybackSystem::new(50);
        assert!((system.next_dt() - 0.02).abs() < EPSILON);
        assert!((system.next_dt() - 0.02).abs() < EPSILON);
    }

    #[test]
    fn test_slow_fixed_clock_capped() {
        let mut system = PlaybackSystem::new(1);
        assert!((system.next_dt() - MAX_DT).abs() < EPSILON);
    }

    #[test]
    fn test_real_time_clock_capped() {
        let mut system = PlaybackSystem::new(0);
        std::thread::sleep(std::time::Duration::from_millis(300));
        assert!(system.next_dt() <= MAX_DT);
    }

    #[test]
    fn test_first_frame_reports_instances() {
        let mut session = session(true);
        let mut system = PlaybackSystem::default();
        let result = system.update(&mut session);
        assert_eq!(result.instances.map(|i| i.len()), Some(3));
        assert_eq!(system.frames(), 1);
    }

    #[test]
    fn test_run_to_end_through_checkpoints() {
        let mut session = session(false);
        let mut system = PlaybackSystem::new(60);
        let frames = system.run_to_end(&mut session, 10_000);
        assert!(session.is_complete());
        assert!(frames > 0 && frames < 10_000);
        assert_eq!(session.registry().get(0).unwrap().lattice_position(), [2, 0, 0]);
    }

    #[test]
    fn test_run_to_end_frame_limit() {
        let mut session = session(true);
        let mut system = PlaybackSystem::new(60);
        assert_eq!(system.run_to_end(&mut session, 3), 3);
        assert!(!session.is_complete());
    }
}
