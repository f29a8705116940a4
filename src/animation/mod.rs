//! Animation engine.
//!
//! Animations are cooperative, time-stepped effects driven from the UI loop's
//! tick. Between two steps control returns to the event loop, so gestures can
//! arrive mid-animation; the stores guard entities that are mid-transition.
//! Effects own private copies of the handles they animate and signal a
//! `Completion` once finished, which the board turns into the real state
//! change (task removal, note placement, theme flip).
//!
//! Animations cannot be cancelled. `finish_all` fast-forwards every running
//! effect to its end for callers that need a quiescent board.

mod effects;

pub use effects::{
    BOUNCE, CRUMB_CHANCE, CRUMB_FALL_EVERY, CRUMB_LIFETIME, DROP_HEIGHT, DROP_STEPS, FADE_STEP,
    SLIDE_STEPS,
};

use crate::canvas::{HandleId, PostitSeed, Renderer, TaskId};
use effects::{DropBounce, Effect, FadeErase, Progress, Slide};
use log::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Duration of a single animation step (~60fps).
pub const STEP_INTERVAL: Duration = Duration::from_millis(16);
/// Cells the theme toggle knob travels.
pub const TRACK_LENGTH: i32 = 4;
/// Steps a single `advance` may run before dropping the backlog.
const MAX_STEPS_PER_ADVANCE: u32 = 8;
/// Upper bound on steps `finish_all` runs.
const MAX_FINISH_STEPS: u32 = 100_000;

/// Signal emitted when an effect finishes.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Every glyph of the task is erased; the task may be removed.
    TaskErased(TaskId),
    /// A dropped note has settled; it may become a live note.
    PostitLanded(PostitSeed),
    /// The theme knob reached the end of its track.
    SlideFinished { on: bool },
}

/// Runs effects step by step on the UI thread.
///
#[derive(Debug)]
pub struct AnimationEngine {
    effects: Vec<Effect>,
    rng: StdRng,
    carry: Duration,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        AnimationEngine::new()
    }
}

impl AnimationEngine {
    /// Return a new engine with an entropy-seeded particle generator.
    ///
    pub fn new() -> Self {
        AnimationEngine {
            effects: vec![],
            rng: StdRng::from_entropy(),
            carry: Duration::ZERO,
        }
    }

    /// Return a new engine with a deterministic particle generator.
    ///
    pub fn with_seed(seed: u64) -> Self {
        AnimationEngine {
            effects: vec![],
            rng: StdRng::seed_from_u64(seed),
            carry: Duration::ZERO,
        }
    }

    pub fn fade_erase(&mut self, task: TaskId, glyphs: Vec<HandleId>) {
        self.effects.push(Effect::FadeErase(FadeErase::new(task, glyphs)));
    }

    /// Draw a falling copy of the note and schedule its drop and bounce.
    ///
    pub fn drop_in(&mut self, renderer: &mut Renderer, seed: PostitSeed) {
        debug!("Dropping post-it at ({}, {}).", seed.x, seed.y);
        self.effects
            .push(Effect::DropBounce(DropBounce::spawn(renderer, seed)));
    }

    /// Slide `knob` from `from` to `to`, both relative to the track's origin.
    ///
    pub fn slide(&mut self, track: HandleId, knob: HandleId, from: i32, to: i32, on: bool) {
        self.effects
            .push(Effect::Slide(Slide::new(track, knob, from, to, on)));
    }

    pub fn is_idle(&self) -> bool {
        self.effects.is_empty()
    }

    /// Number of running effects, particles included.
    ///
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Advance every effect by one step. Effects spawned during the step
    /// start on the next one.
    ///
    pub fn step(&mut self, renderer: &mut Renderer) -> Vec<Completion> {
        let mut completions = vec![];
        let mut spawned = vec![];
        let mut running = Vec::with_capacity(self.effects.len());
        for mut effect in std::mem::take(&mut self.effects) {
            match effect.step(renderer, &mut self.rng, &mut spawned) {
                Progress::Running => running.push(effect),
                Progress::Done(Some(completion)) => completions.push(completion),
                Progress::Done(None) => {}
            }
        }
        running.extend(spawned);
        self.effects = running;
        completions
    }

    /// Advance by wall-clock time, running one step per `STEP_INTERVAL`.
    ///
    pub fn advance(&mut self, renderer: &mut Renderer, elapsed: Duration) -> Vec<Completion> {
        if self.is_idle() {
            self.carry = Duration::ZERO;
            return vec![];
        }
        self.carry += elapsed;
        let mut completions = vec![];
        let mut steps = 0;
        while self.carry >= STEP_INTERVAL {
            self.carry -= STEP_INTERVAL;
            completions.extend(self.step(renderer));
            steps += 1;
            if steps >= MAX_STEPS_PER_ADVANCE {
                self.carry = Duration::ZERO;
                break;
            }
        }
        completions
    }

    /// Run every effect to completion.
    ///
    pub fn finish_all(&mut self, renderer: &mut Renderer) -> Vec<Completion> {
        let mut completions = vec![];
        let mut steps = 0;
        while !self.is_idle() && steps < MAX_FINISH_STEPS {
            completions.extend(self.step(renderer));
            steps += 1;
        }
        if !self.is_idle() {
            error!("Animations still running after {} steps; abandoning them.", steps);
            self.effects.clear();
        }
        self.carry = Duration::ZERO;
        completions
    }
}
