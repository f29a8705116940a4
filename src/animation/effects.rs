//! Individual time-stepped effects.
//!
//! Each effect owns the handles it animates and advances by one step per
//! call. Effects never touch the stores; they report a `Completion` when done
//! and the board applies it.

use super::Completion;
use crate::canvas::{
    draw_note, HandleId, Item, ItemKind, NoteStyle, Paint, PostitSeed, Renderer, Role, TaskId,
    LAYER_EFFECTS,
};
use rand::rngs::StdRng;
use rand::Rng;

/// Luminance removed from a glyph per step.
pub const FADE_STEP: u8 = 51;
/// Probability that a fade step sheds a crumb.
pub const CRUMB_CHANCE: f64 = 0.35;
/// Steps a crumb lives before it is removed.
pub const CRUMB_LIFETIME: u32 = 12;
/// A crumb falls one row every this many steps.
pub const CRUMB_FALL_EVERY: u32 = 3;
const CRUMB_LEVEL: u8 = 200;
const CRUMB_GLYPHS: [&str; 3] = ["·", "˙", ","];

/// Rows above its target a dropped note starts from.
pub const DROP_HEIGHT: i32 = 6;
pub const DROP_STEPS: i32 = 6;
/// Rows a dropped note overshoots before settling.
pub const BOUNCE: i32 = 1;

pub const SLIDE_STEPS: i32 = 6;

/// Result of advancing an effect by one step.
///
#[derive(Debug, PartialEq)]
pub enum Progress {
    Running,
    Done(Option<Completion>),
}

/// Specifying the different effect kinds.
///
#[derive(Debug)]
pub enum Effect {
    FadeErase(FadeErase),
    Crumb(Crumb),
    DropBounce(DropBounce),
    Slide(Slide),
}

impl Effect {
    pub fn step(&mut self, renderer: &mut Renderer, rng: &mut StdRng, spawned: &mut Vec<Effect>) -> Progress {
        match self {
            Effect::FadeErase(effect) => effect.step(renderer, rng, spawned),
            Effect::Crumb(effect) => effect.step(renderer),
            Effect::DropBounce(effect) => effect.step(renderer),
            Effect::Slide(effect) => effect.step(renderer),
        }
    }
}

/// Fades each glyph of a task in sequence from ink to paper, shedding
/// crumbs, then clears the glyph.
///
#[derive(Debug)]
pub struct FadeErase {
    task: TaskId,
    glyphs: Vec<HandleId>,
    index: usize,
    level: u8,
}

impl FadeErase {
    pub fn new(task: TaskId, glyphs: Vec<HandleId>) -> Self {
        FadeErase {
            task,
            glyphs,
            index: 0,
            level: u8::MAX,
        }
    }

    fn step(&mut self, renderer: &mut Renderer, rng: &mut StdRng, spawned: &mut Vec<Effect>) -> Progress {
        let Some(glyph) = self.glyphs.get(self.index).copied() else {
            return Progress::Done(Some(Completion::TaskErased(self.task)));
        };
        self.level = self.level.saturating_sub(FADE_STEP);
        renderer.set_paint(
            glyph,
            Paint::Faded {
                role: Role::Ink,
                level: self.level,
            },
        );
        if rng.gen_bool(CRUMB_CHANCE) {
            if let Some((x, y)) = renderer.item(glyph).map(|item| (item.x, item.y)) {
                spawned.push(Effect::Crumb(Crumb::spawn(renderer, rng, x, y)));
            }
        }
        if self.level == 0 {
            renderer.set_content(glyph, "");
            self.index += 1;
            self.level = u8::MAX;
        }
        Progress::Running
    }
}

/// A particle that falls and fades over a fixed lifetime.
///
#[derive(Debug)]
pub struct Crumb {
    handle: HandleId,
    age: u32,
}

impl Crumb {
    pub fn spawn(renderer: &mut Renderer, rng: &mut StdRng, x: i32, y: i32) -> Self {
        let glyph = CRUMB_GLYPHS[rng.gen_range(0..CRUMB_GLYPHS.len())];
        let handle = renderer.spawn(Item::text(
            ItemKind::Crumb,
            glyph,
            x,
            y,
            Paint::Faded {
                role: Role::Ink,
                level: CRUMB_LEVEL,
            },
            LAYER_EFFECTS,
        ));
        Crumb { handle, age: 0 }
    }

    fn step(&mut self, renderer: &mut Renderer) -> Progress {
        self.age += 1;
        if self.age >= CRUMB_LIFETIME {
            renderer.delete(self.handle);
            return Progress::Done(None);
        }
        if self.age % CRUMB_FALL_EVERY == 0 {
            renderer.translate(self.handle, 0, 1);
        }
        let level = CRUMB_LEVEL as u32 * (CRUMB_LIFETIME - self.age) / CRUMB_LIFETIME;
        renderer.set_paint(
            self.handle,
            Paint::Faded {
                role: Role::Ink,
                level: level as u8,
            },
        );
        Progress::Running
    }
}

/// Drops a note's visual group onto its target, overshoots and settles.
///
#[derive(Debug)]
pub struct DropBounce {
    handles: Vec<HandleId>,
    seed: PostitSeed,
    offsets: Vec<i32>,
    frame: usize,
}

impl DropBounce {
    /// Draw the falling note above its target and plan its path.
    ///
    pub fn spawn(renderer: &mut Renderer, seed: PostitSeed) -> Self {
        let handles = draw_note(
            renderer,
            seed.x,
            seed.y - DROP_HEIGHT,
            &seed.text,
            seed.color,
            false,
            NoteStyle::Falling,
        )
        .all();
        let mut offsets: Vec<i32> = (1..=DROP_STEPS)
            .map(|i| -DROP_HEIGHT + DROP_HEIGHT * i / DROP_STEPS)
            .collect();
        offsets.push(BOUNCE);
        offsets.push(0);
        DropBounce {
            handles,
            seed,
            offsets,
            frame: 0,
        }
    }

    fn step(&mut self, renderer: &mut Renderer) -> Progress {
        let Some(offset) = self.offsets.get(self.frame).copied() else {
            renderer.delete_all(&self.handles);
            return Progress::Done(Some(Completion::PostitLanded(self.seed.clone())));
        };
        let previous = match self.frame {
            0 => -DROP_HEIGHT,
            frame => self.offsets[frame - 1],
        };
        renderer.translate_all(&self.handles, 0, offset - previous);
        self.frame += 1;
        Progress::Running
    }
}

/// Slides a knob along its track, positions relative to the track's origin.
///
#[derive(Debug)]
pub struct Slide {
    track: HandleId,
    knob: HandleId,
    from: i32,
    to: i32,
    frame: i32,
    on: bool,
}

impl Slide {
    pub fn new(track: HandleId, knob: HandleId, from: i32, to: i32, on: bool) -> Self {
        Slide {
            track,
            knob,
            from,
            to,
            frame: 0,
            on,
        }
    }

    fn step(&mut self, renderer: &mut Renderer) -> Progress {
        self.frame += 1;
        let offset = self.from + (self.to - self.from) * self.frame / SLIDE_STEPS;
        if let Some((x, y)) = renderer.item(self.track).map(|track| (track.x, track.y)) {
            renderer.move_to(self.knob, x + offset, y);
        }
        if self.frame >= SLIDE_STEPS {
            Progress::Done(Some(Completion::SlideFinished { on: self.on }))
        } else {
            Progress::Running
        }
    }
}
