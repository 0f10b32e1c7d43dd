#![forbid(unsafe_code)]

//! Host-driven program runner.
//!
//! [`StepProgram`] owns a [`Model`] and everything around it that would
//! normally be a runtime loop: a [`DeterministicClock`], an input event
//! queue, the last rendered [`Frame`] and the outputs the host collects
//! after each step (DOM patches, host effects, log lines).
//!
//! The host drives it explicitly:
//!
//! 1. push events (`push_event`) and move the clock (`advance_time`/`set_time`),
//! 2. call [`StepProgram::step`],
//! 3. drain `take_patches`, `take_effects`, `take_logs`.
//!
//! Each step drains the queue into `update`, then delivers one
//! [`Event::Tick`] if the clock moved since the previous tick, then renders
//! if anything changed. No wall-clock reads happen inside, so a recorded
//! sequence of host calls replays identically.

use std::collections::VecDeque;

use kp_core::Event;
use thiserror::Error;
use tracing::{debug, trace, trace_span, warn};
use web_time::Duration;

use crate::clock::DeterministicClock;
use crate::frame::{DomPatch, Frame};
use crate::program::{Cmd, HostEffect, Model};

/// Upper bound on messages processed from one `Cmd` tree. Guards against a
/// model that keeps sending itself messages.
const MAX_CMD_MESSAGES: usize = 1024;

/// Errors surfaced by [`StepProgram`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("program already initialized")]
    AlreadyInitialized,
    #[error("program not initialized")]
    NotInitialized,
    #[error("command message limit ({limit}) exceeded")]
    MessageLimit { limit: usize },
}

/// Summary of one [`StepProgram::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepResult {
    /// Queued events delivered to the model.
    pub events_processed: u32,
    /// Whether a tick was delivered.
    pub ticked: bool,
    /// Whether a new frame was rendered.
    pub rendered: bool,
    /// Index of the latest rendered frame.
    pub frame_idx: u64,
}

/// Host-driven runner for a [`Model`].
pub struct StepProgram<M: Model> {
    model: M,
    clock: DeterministicClock,
    events: VecDeque<Event>,
    frame: Frame,
    patches: Vec<DomPatch>,
    effects: Vec<HostEffect>,
    logs: Vec<String>,
    initialized: bool,
    dirty: bool,
    last_tick: Duration,
    frame_idx: u64,
}

impl<M: Model> StepProgram<M> {
    /// Wrap a model. Nothing runs until [`StepProgram::init`].
    pub fn new(model: M) -> Self {
        Self {
            model,
            clock: DeterministicClock::new(),
            events: VecDeque::new(),
            frame: Frame::new(),
            patches: Vec::new(),
            effects: Vec::new(),
            logs: Vec::new(),
            initialized: false,
            dirty: true,
            last_tick: Duration::ZERO,
            frame_idx: 0,
        }
    }

    /// Run `Model::init` and render the first frame.
    pub fn init(&mut self) -> Result<(), StepError> {
        if self.initialized {
            return Err(StepError::AlreadyInitialized);
        }
        self.initialized = true;
        let now = self.clock.now();
        self.last_tick = now;
        let cmd = self.model.init(now);
        self.execute(cmd)?;
        self.render();
        Ok(())
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Queue an event for the next step.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Advance the deterministic clock.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time (never backwards).
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Process queued events, deliver a tick if time moved, render if dirty.
    pub fn step(&mut self) -> Result<StepResult, StepError> {
        if !self.initialized {
            return Err(StepError::NotInitialized);
        }
        let _span = trace_span!("step_program.step", frame_idx = self.frame_idx).entered();
        let mut result = StepResult::default();

        while let Some(event) = self.events.pop_front() {
            let now = self.clock.now();
            let cmd = self.model.update(M::Message::from(event), now);
            self.dirty = true;
            result.events_processed += 1;
            self.execute(cmd)?;
        }

        let now = self.clock.now();
        if now > self.last_tick {
            self.last_tick = now;
            let cmd = self.model.update(M::Message::from(Event::Tick), now);
            self.dirty = true;
            result.ticked = true;
            self.execute(cmd)?;
        }

        if self.dirty {
            self.render();
            result.rendered = true;
        }
        result.frame_idx = self.frame_idx;
        trace!(
            events = result.events_processed,
            ticked = result.ticked,
            rendered = result.rendered,
            "step complete"
        );
        Ok(result)
    }

    /// Force the next step to re-render.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Render now and queue the diff against the previous frame.
    fn render(&mut self) {
        let mut next = Frame::new();
        self.model.view(&mut next);
        let patches = self.frame.diff(&next);
        if !patches.is_empty() {
            debug!(count = patches.len(), frame_idx = self.frame_idx + 1, "frame patches");
        }
        self.patches.extend(patches);
        self.frame = next;
        self.frame_idx += 1;
        self.dirty = false;
    }

    fn execute(&mut self, cmd: Cmd<M::Message>) -> Result<(), StepError> {
        let mut budget = MAX_CMD_MESSAGES;
        let mut stack = vec![cmd];
        while let Some(cmd) = stack.pop() {
            match cmd {
                Cmd::None => {}
                Cmd::Batch(cmds) | Cmd::Sequence(cmds) => {
                    // Reverse so the first command pops first.
                    stack.extend(cmds.into_iter().rev());
                }
                Cmd::Msg(msg) => {
                    if budget == 0 {
                        warn!(limit = MAX_CMD_MESSAGES, "command message limit exceeded");
                        return Err(StepError::MessageLimit {
                            limit: MAX_CMD_MESSAGES,
                        });
                    }
                    budget -= 1;
                    let now = self.clock.now();
                    let next = self.model.update(msg, now);
                    self.dirty = true;
                    stack.push(next);
                }
                Cmd::Log(line) => self.logs.push(line),
                Cmd::Effect(effect) => {
                    debug!(?effect, "host effect");
                    self.effects.push(effect);
                }
            }
        }
        Ok(())
    }

    /// The model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model. Marks the program dirty.
    pub fn model_mut(&mut self) -> &mut M {
        self.dirty = true;
        &mut self.model
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    /// Number of events waiting for the next step.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Drain accumulated DOM patches.
    pub fn take_patches(&mut self) -> Vec<DomPatch> {
        std::mem::take(&mut self.patches)
    }

    /// Drain accumulated host effects.
    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Drain accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    /// Push a log line from outside the model (host adapters use this).
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }
}
