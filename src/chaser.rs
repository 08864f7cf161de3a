//! Chaser: a looping sequence of fade/hold steps over a channel group.
//!
//! The chaser is driven by an external clock through [`Chaser::advance`].
//! Every phase boundary is computed from the previous boundary rather than
//! from the polling instant, so the rendered values do not depend on how
//! often `advance` is called.

use core::str::FromStr;

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::MAX_GROUP_CHANNELS;
use crate::address::{ChannelList, ChannelSpec};
use crate::error::{Error, Result};
use crate::fade::{ChannelValues, FadeCommand, fade_all};
use crate::universe::Universe;

/// Hold time value in step strings meaning "hold forever"
pub const INFINITE_HOLD: i64 = -1;

/// How long a step holds its value after fading in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    For(Duration),
    Infinite,
}

/// One chaser step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub fade: Duration,
    pub values: ChannelValues,
    pub hold: Hold,
}

impl Step {
    fn parse(s: &str, step: usize) -> Result<Self> {
        let malformed = Error::MalformedStepString { step };
        let mut parts = s.split(':');
        let (Some(fade), Some(values), Some(hold), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed);
        };

        let fade = parse_millis(fade, step)?;
        if fade < 0 {
            return Err(Error::InvalidDuration { step, millis: fade });
        }
        let values = values.parse::<ChannelValues>().map_err(|_| malformed)?;
        let hold = match parse_millis(hold, step)? {
            INFINITE_HOLD => Hold::Infinite,
            millis if millis < 0 => return Err(Error::InvalidDuration { step, millis }),
            millis => Hold::For(Duration::from_millis(millis.unsigned_abs())),
        };

        Ok(Self {
            fade: Duration::from_millis(fade.unsigned_abs()),
            values,
            hold,
        })
    }

    fn takes_time(&self) -> bool {
        self.fade.as_ticks() > 0 || self.hold != Hold::For(Duration::from_ticks(0))
    }
}

fn parse_millis(s: &str, step: usize) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| Error::MalformedStepString { step })
}

/// Ordered step list
///
/// Parsed from `fadeMs ':' values ':' holdMs ('|' ...)*` where `holdMs = -1`
/// holds forever and `values` is a comma list applied cyclically across the
/// chaser's channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Steps<const N: usize>(Vec<Step, N>);

impl<const N: usize> Steps<N> {
    pub fn as_slice(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> FromStr for Steps<N> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut steps = Vec::new();
        for (index, part) in s.trim().split('|').enumerate() {
            let step = Step::parse(part, index)?;
            steps
                .push(step)
                .map_err(|_| Error::MalformedStepString { step: index })?;
        }
        Ok(Self(steps))
    }
}

/// Chaser options
#[derive(Debug, Clone)]
pub struct ChaserConfig {
    /// Restore the pre-chase values when stopped or finished
    pub resume_after: bool,
    /// Loop back to the first step after the last finite hold
    pub repeat: bool,
}

impl Default for ChaserConfig {
    fn default() -> Self {
        Self {
            resume_after: false,
            repeat: true,
        }
    }
}

/// Chaser phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Fading,
    Holding,
}

/// Step sequencer driving fades on a channel group
///
/// `STEPS` is the step capacity.
#[derive(Debug, Clone)]
pub struct Chaser<const STEPS: usize> {
    channels: ChannelList,
    steps: Steps<STEPS>,
    config: ChaserConfig,

    phase: Phase,
    index: usize,
    phase_start: Instant,
    /// Pre-chase values, captured on start with `resume_after`
    saved: Option<ChannelValues>,
    /// Channel revisions produced by the last applied step
    revisions: Vec<u32, MAX_GROUP_CHANNELS>,
}

impl<const STEPS: usize> Chaser<STEPS> {
    pub fn new(spec: &ChannelSpec, steps: Steps<STEPS>, config: ChaserConfig) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::ChannelGrouping { group: 1, actual: 0 });
        }
        validate_steps(&steps, &config)?;

        Ok(Self {
            channels: spec.channels().iter().copied().collect(),
            steps,
            config,
            phase: Phase::Idle,
            index: 0,
            phase_start: Instant::from_ticks(0),
            saved: None,
            revisions: Vec::new(),
        })
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Index of the active step, `None` while idle
    pub fn current_step(&self) -> Option<usize> {
        self.is_running().then_some(self.index)
    }

    pub fn steps(&self) -> &Steps<STEPS> {
        &self.steps
    }

    /// Start the sequence at step 0
    ///
    /// With `resume_after` the current values are captured first. Starting a
    /// running chaser restarts it and keeps the values captured originally,
    /// unless another command has taken over a channel since.
    pub fn start<const N: usize>(&mut self, now: Instant, universe: &Universe<'_, N>) -> Result<()> {
        self.drop_if_superseded(universe)?;
        if self.config.resume_after && (!self.is_running() || self.saved.is_none()) {
            let values = self
                .channels
                .iter()
                .map(|&channel| universe.value_at(channel, now))
                .collect::<Result<Vec<u8, MAX_GROUP_CHANNELS>>>()?;
            self.saved = Some(ChannelValues::from_slice(&values)?);
        }

        log::debug!("chaser on {:?} started", self.channels.first());
        self.enter_step(0, now, universe)
    }

    /// Run every phase transition due at or before `now`
    pub fn advance<const N: usize>(&mut self, now: Instant, universe: &Universe<'_, N>) -> Result<()> {
        if self.drop_if_superseded(universe)? || !self.is_running() {
            return Ok(());
        }

        loop {
            let step = &self.steps.0[self.index];
            match self.phase {
                Phase::Idle => return Ok(()),
                Phase::Fading => {
                    let boundary = self.phase_start + step.fade;
                    if now < boundary {
                        return Ok(());
                    }
                    self.phase = Phase::Holding;
                    self.phase_start = boundary;
                }
                Phase::Holding => {
                    let Hold::For(hold) = step.hold else {
                        return Ok(());
                    };
                    let boundary = self.phase_start + hold;
                    if now < boundary {
                        return Ok(());
                    }

                    let next = self.index + 1;
                    if next < self.steps.len() {
                        self.enter_step(next, boundary, universe)?;
                    } else if self.config.repeat {
                        self.enter_step(0, boundary, universe)?;
                    } else {
                        log::debug!("chaser on {:?} finished", self.channels.first());
                        return self.finish(boundary, universe);
                    }
                }
            }
        }
    }

    /// Stop the sequence
    ///
    /// With `resume_after` the captured values snap back, otherwise the
    /// channels keep their current fades. Nothing is restored once another
    /// command has taken over a channel.
    pub fn stop<const N: usize>(&mut self, now: Instant, universe: &Universe<'_, N>) -> Result<()> {
        if self.drop_if_superseded(universe)? || !self.is_running() {
            return Ok(());
        }
        log::debug!("chaser on {:?} stopped", self.channels.first());
        self.finish(now, universe)
    }

    /// Replace the step list
    ///
    /// A running chaser restarts at the first new step from `now`.
    pub fn set_steps<const N: usize>(
        &mut self,
        steps: Steps<STEPS>,
        now: Instant,
        universe: &Universe<'_, N>,
    ) -> Result<()> {
        validate_steps(&steps, &self.config)?;
        self.steps = steps;
        if self.is_running() {
            self.enter_step(0, now, universe)?;
        } else {
            self.index = 0;
        }
        Ok(())
    }

    fn enter_step<const N: usize>(
        &mut self,
        index: usize,
        at: Instant,
        universe: &Universe<'_, N>,
    ) -> Result<()> {
        let step = &self.steps.0[index];
        let batch = fade_all(&self.channels, &step.values, step.fade, at);
        self.apply(&batch, universe)?;

        log::debug!(
            "chaser on {:?} entered step {} at {} ms",
            self.channels.first(),
            index,
            at.as_millis()
        );
        self.index = index;
        self.phase = Phase::Fading;
        self.phase_start = at;
        Ok(())
    }

    fn finish<const N: usize>(&mut self, at: Instant, universe: &Universe<'_, N>) -> Result<()> {
        if let Some(saved) = self.saved.take() {
            let restore = self
                .channels
                .iter()
                .enumerate()
                .map(|(i, &channel)| FadeCommand::snap(channel, saved.get(i), at))
                .collect::<Vec<_, MAX_GROUP_CHANNELS>>();
            universe.apply_all(&restore)?;
        }
        self.phase = Phase::Idle;
        self.revisions.clear();
        Ok(())
    }

    fn apply<const N: usize>(&mut self, batch: &[FadeCommand], universe: &Universe<'_, N>) -> Result<()> {
        universe.apply_all(batch)?;
        self.revisions = batch
            .iter()
            .map(|command| universe.revision(command.channel))
            .collect::<Result<_>>()?;
        Ok(())
    }

    /// Go idle without restoring if another writer touched a channel
    fn drop_if_superseded<const N: usize>(&mut self, universe: &Universe<'_, N>) -> Result<bool> {
        if !self.is_running() || !self.is_superseded(universe)? {
            return Ok(false);
        }
        log::warn!("chaser on {:?} superseded by another command", self.channels.first());
        self.phase = Phase::Idle;
        self.saved = None;
        self.revisions.clear();
        Ok(true)
    }

    fn is_superseded<const N: usize>(&self, universe: &Universe<'_, N>) -> Result<bool> {
        for (&channel, &revision) in self.channels.iter().zip(&self.revisions) {
            if universe.revision(channel)? != revision {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn validate_steps<const STEPS: usize>(steps: &Steps<STEPS>, config: &ChaserConfig) -> Result<()> {
    if steps.is_empty() {
        return Err(Error::MalformedStepString { step: 0 });
    }
    if config.repeat && !steps.as_slice().iter().any(Step::takes_time) {
        return Err(Error::ZeroLengthCycle);
    }
    Ok(())
}
