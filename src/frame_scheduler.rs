//! Frame scheduling for the output stream.
//!
//! The caller is responsible for sleeping between frames and for supplying
//! the time; nothing here reads a clock.

use embassy_time::{Duration, Instant};

use crate::DmxOutput;
use crate::queue::CommandReceiver;
use crate::universe::Universe;

/// Result of a frame tick
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// Deadline for the next frame
    pub next_deadline: Instant,
    /// How long to wait until the next frame (zero if behind schedule)
    pub sleep_duration: Duration,
    /// Commands taken from the queue this frame
    pub applied: usize,
}

/// Drives one universe: drains queued commands, renders and writes frames
///
/// Falling more than two frames behind drops the backlog instead of
/// catching up.
pub struct FrameScheduler<'a, O: DmxOutput, const N: usize, const QUEUE: usize> {
    output: O,
    universe: Universe<'a, N>,
    commands: Option<CommandReceiver<'a, QUEUE>>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'a, O: DmxOutput, const N: usize, const QUEUE: usize> FrameScheduler<'a, O, N, QUEUE> {
    /// Create a scheduler running at the universe's configured refresh rate
    pub fn new(universe: Universe<'a, N>, output: O) -> Self {
        let refresh_rate_hz = universe.refresh_rate_hz();
        Self::with_refresh_rate(universe, output, refresh_rate_hz)
    }

    /// Create a scheduler emitting `refresh_rate_hz` frames per second
    pub fn with_refresh_rate(universe: Universe<'a, N>, output: O, refresh_rate_hz: u32) -> Self {
        let frame_duration = Duration::from_micros(1_000_000 / u64::from(refresh_rate_hz.max(1)));
        Self::with_frame_duration(universe, output, frame_duration)
    }

    pub fn with_frame_duration(universe: Universe<'a, N>, output: O, frame_duration: Duration) -> Self {
        Self {
            output,
            universe,
            commands: None,
            next_frame: Instant::from_ticks(0),
            frame_duration,
        }
    }

    /// Apply commands from this queue at the start of every frame
    #[must_use]
    pub fn with_commands(mut self, commands: CommandReceiver<'a, QUEUE>) -> Self {
        self.commands = Some(commands);
        self
    }

    /// Process one frame
    ///
    /// Queued commands that address a channel outside the universe are
    /// dropped with a warning.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let mut applied = 0;
        if let Some(commands) = &self.commands {
            while let Some(command) = commands.try_receive() {
                match self.universe.apply(&command) {
                    Ok(_) => applied += 1,
                    Err(error) => log::warn!("dropping queued command: {}", error),
                }
            }
        }

        self.universe.tick(now, &mut self.output);

        self.next_frame += self.frame_duration;
        let sleep_duration = self
            .next_frame
            .checked_duration_since(now)
            .unwrap_or(Duration::from_ticks(0));

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            applied,
        }
    }

    pub fn universe(&self) -> &Universe<'a, N> {
        &self.universe
    }

    pub fn universe_mut(&mut self) -> &mut Universe<'a, N> {
        &mut self.universe
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
