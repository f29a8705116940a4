use super::postit_store::{PinOutcome, PostitSnapshot, PostitStore};
use super::renderer::{Item, ItemKind, Paint, Renderer, Role, LAYER_CONTROLS, LAYER_RULES};
use super::task_store::{TaskSnapshot, TaskStore, Toggle};
use super::{
    Binding, CanvasError, HandleId, PostitId, TaskId, LINE_HEIGHT, LINE_START_Y, POSTIT_HEIGHT,
    POSTIT_WIDTH,
};
use crate::animation::{AnimationEngine, Completion, TRACK_LENGTH};
use log::*;
use std::time::Duration;

/// Size of the drawable canvas in cells.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 80,
            height: 24,
        }
    }
}

impl Viewport {
    /// Clamp a note's top-left corner so its whole box stays visible.
    ///
    pub fn clamp_note(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(0, (self.width - POSTIT_WIDTH).max(0)),
            y.clamp(0, (self.height - POSTIT_HEIGHT).max(0)),
        )
    }
}

/// Immutable record of a finished task.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedEntry {
    pub text: String,
    pub priority: u8,
}

/// Plain-data copy of everything a tab holds.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub tasks: Vec<TaskSnapshot>,
    pub completed: Vec<CompletedEntry>,
    pub postits: Vec<PostitSnapshot>,
}

#[derive(Debug)]
struct ThemeToggle {
    track: HandleId,
    knob: HandleId,
    on: bool,
    sliding: bool,
}

/// The notepad surface: renderer, stores, completed list and the animations
/// running over them. All mutation happens through this type on the UI
/// thread; animations only report completions which are applied here.
///
#[derive(Debug)]
pub struct Board {
    renderer: Renderer,
    tasks: TaskStore,
    postits: PostitStore,
    completed: Vec<CompletedEntry>,
    engine: AnimationEngine,
    viewport: Viewport,
    rules: Vec<HandleId>,
    toggle: ThemeToggle,
}

impl Board {
    /// Return a new empty board for the viewport.
    ///
    pub fn new(viewport: Viewport, dark: bool) -> Self {
        Board::with_engine(viewport, dark, AnimationEngine::new())
    }

    /// Return a new empty board driven by the given engine.
    ///
    pub fn with_engine(viewport: Viewport, dark: bool, engine: AnimationEngine) -> Self {
        let mut renderer = Renderer::new();
        let track_x = track_x(viewport);
        let track = renderer.spawn(
            Item::text(ItemKind::Track, &"─".repeat(TRACK_LENGTH as usize), track_x, 0, Paint::Solid(Role::Muted), LAYER_CONTROLS)
                .bound(Binding::ThemeToggle),
        );
        let knob_x = if dark { track_x + TRACK_LENGTH - 1 } else { track_x };
        let knob = renderer.spawn(
            Item::text(ItemKind::Knob, "●", knob_x, 0, Paint::Solid(Role::Accent), LAYER_CONTROLS)
                .bound(Binding::ThemeToggle),
        );
        let mut board = Board {
            renderer,
            tasks: TaskStore::new(),
            postits: PostitStore::new(),
            completed: vec![],
            engine,
            viewport,
            rules: vec![],
            toggle: ThemeToggle {
                track,
                knob,
                on: dark,
                sliding: false,
            },
        };
        board.redraw_rules();
        board
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn postits(&self) -> &PostitStore {
        &self.postits
    }

    pub fn completed(&self) -> &[CompletedEntry] {
        &self.completed
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the dark theme is selected.
    ///
    pub fn dark_mode(&self) -> bool {
        self.toggle.on
    }

    pub fn is_animating(&self) -> bool {
        !self.engine.is_idle()
    }

    /// Slot a newly typed task would occupy.
    ///
    pub fn next_slot(&self) -> usize {
        self.tasks.len()
    }

    pub fn hit_test(&self, x: i32, y: i32) -> Option<Binding> {
        self.renderer.hit_test(x, y)
    }

    pub fn append_task(&mut self, text: &str, done: bool, priority: u8) -> TaskId {
        self.tasks.append(&mut self.renderer, text, done, priority).id
    }

    /// Toggle a task; checking it starts the erase animation.
    ///
    pub fn toggle_task(&mut self, id: TaskId) -> Result<Toggle, CanvasError> {
        let toggle = self.tasks.toggle_done(&mut self.renderer, id)?;
        if let Toggle::Completing { glyphs } = &toggle {
            debug!("Scheduling erase of task {:?}.", id);
            self.engine.fade_erase(id, glyphs.clone());
        }
        Ok(toggle)
    }

    pub fn cycle_priority(&mut self, id: TaskId) -> Result<u8, CanvasError> {
        self.tasks.cycle_priority(&mut self.renderer, id)
    }

    /// Remove a task, unpin notes anchored to it and move the notes pinned to
    /// later tasks along with their anchors.
    ///
    pub fn remove_task(&mut self, id: TaskId) -> Result<TaskSnapshot, CanvasError> {
        let removed = self.tasks.remove(&mut self.renderer, id)?;
        let released = self.postits.release_task(&mut self.renderer, id);
        if !released.is_empty() {
            debug!("Unpinned {} post-it(s) from removed task {:?}.", released.len(), id);
        }
        self.postits.reflow(&mut self.renderer, &self.tasks);
        Ok(removed)
    }

    pub fn create_preview(&mut self, text: &str, color: u8) {
        self.postits.create_preview(&mut self.renderer, text, color, self.viewport);
    }

    pub fn move_ghost_to(&mut self, x: i32, y: i32) {
        self.postits.move_ghost_to(&mut self.renderer, x, y, self.viewport);
    }

    pub fn cancel_preview(&mut self) {
        self.postits.cancel_preview(&mut self.renderer);
    }

    pub fn is_placing(&self) -> bool {
        self.postits.is_placing()
    }

    /// Finish placement with the ghost moved to `(x, y)` and start the drop.
    /// Returns false when no placement is in progress.
    ///
    pub fn commit_placement(&mut self, x: i32, y: i32) -> bool {
        self.move_ghost_to(x, y);
        let Some((text, color, x, y)) = self
            .postits
            .ghost()
            .map(|ghost| (ghost.text.clone(), ghost.color, ghost.x, ghost.y))
        else {
            return false;
        };
        let seed = self.postits.commit_placement(&mut self.renderer, x, y, &text, color);
        self.engine.drop_in(&mut self.renderer, seed);
        true
    }

    pub fn start_drag(&mut self, id: PostitId, pointer: (i32, i32)) -> Result<bool, CanvasError> {
        self.postits.start_drag(id, pointer)
    }

    pub fn drag_to(&mut self, pointer: (i32, i32)) -> bool {
        self.postits.drag_to(&mut self.renderer, pointer)
    }

    pub fn end_drag(&mut self) -> Option<PostitId> {
        self.postits.end_drag()
    }

    pub fn is_dragging(&self) -> bool {
        self.postits.is_dragging()
    }

    pub fn toggle_pin(&mut self, id: PostitId) -> Result<PinOutcome, CanvasError> {
        self.postits.toggle_pin(&mut self.renderer, id, &self.tasks)
    }

    pub fn delete_postit(&mut self, id: PostitId) -> Result<(), CanvasError> {
        self.postits.delete(&mut self.renderer, id)
    }

    /// Slide the theme knob to the other end of its track. The theme flips
    /// when the slide completes. Ignored while a slide is running.
    ///
    pub fn toggle_theme(&mut self) -> bool {
        if self.toggle.sliding {
            return false;
        }
        let target = !self.toggle.on;
        let (from, to) = if target {
            (0, TRACK_LENGTH - 1)
        } else {
            (TRACK_LENGTH - 1, 0)
        };
        self.engine.slide(self.toggle.track, self.toggle.knob, from, to, target);
        self.toggle.sliding = true;
        true
    }

    /// Advance animations by the elapsed time and apply their completions.
    ///
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Completion> {
        let completions = self.engine.advance(&mut self.renderer, elapsed);
        self.apply(&completions);
        completions
    }

    /// Advance animations by exactly one step.
    ///
    pub fn step(&mut self) -> Vec<Completion> {
        let completions = self.engine.step(&mut self.renderer);
        self.apply(&completions);
        completions
    }

    /// Run every in-flight animation to completion right now.
    ///
    pub fn settle(&mut self) -> Vec<Completion> {
        let completions = self.engine.finish_all(&mut self.renderer);
        self.apply(&completions);
        completions
    }

    fn apply(&mut self, completions: &[Completion]) {
        for completion in completions {
            match completion {
                Completion::TaskErased(id) => {
                    let entry = self.tasks.get(*id).map(|task| CompletedEntry {
                        text: task.text.clone(),
                        priority: task.priority,
                    });
                    match self.remove_task(*id) {
                        Ok(_) => {
                            if let Some(entry) = entry {
                                info!("Completed task '{}'.", entry.text);
                                self.completed.push(entry);
                            }
                        }
                        Err(e) => warn!("Dropping erase completion: {}", e),
                    }
                }
                Completion::PostitLanded(seed) => {
                    self.postits.insert(&mut self.renderer, seed.clone());
                }
                Completion::SlideFinished { on } => {
                    self.toggle.on = *on;
                    self.toggle.sliding = false;
                }
            }
        }
    }

    /// Adopt a new viewport: redraw guide rules, move the toggle and reflow
    /// every task and pinned note.
    ///
    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport = Viewport { width, height };
        self.redraw_rules();
        let track_x = track_x(self.viewport);
        let offset = self
            .renderer
            .item(self.toggle.knob)
            .zip(self.renderer.item(self.toggle.track))
            .map(|(knob, track)| knob.x - track.x)
            .unwrap_or(0);
        self.renderer.move_to(self.toggle.track, track_x, 0);
        self.renderer.move_to(self.toggle.knob, track_x + offset, 0);
        self.tasks.reflow(&mut self.renderer);
        self.postits.reflow(&mut self.renderer, &self.tasks);
        self.postits.clamp_ghost(&mut self.renderer, self.viewport);
    }

    fn redraw_rules(&mut self) {
        self.renderer.delete_all(&self.rules);
        let width = self.viewport.width.max(0) as usize;
        let mut y = LINE_START_Y + 1;
        let mut rules = vec![];
        while y < self.viewport.height {
            rules.push(self.renderer.spawn(Item::text(
                ItemKind::Rule,
                &"─".repeat(width),
                0,
                y,
                Paint::Solid(Role::Rule),
                LAYER_RULES,
            )));
            y += LINE_HEIGHT;
        }
        self.rules = rules;
    }

    /// Delete every task, note and completed entry.
    ///
    pub fn clear(&mut self) {
        self.postits.clear(&mut self.renderer);
        self.tasks.clear(&mut self.renderer);
        self.completed.clear();
    }

    /// Return plain data for the current content.
    ///
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tasks: self.tasks.snapshot(),
            completed: self.completed.clone(),
            postits: self.postits.snapshot(&self.tasks),
        }
    }

    /// Recreate content from a snapshot, on top of whatever is present.
    ///
    pub fn restore(&mut self, snapshot: &BoardSnapshot) {
        for task in &snapshot.tasks {
            self.tasks.append(&mut self.renderer, &task.text, task.done, task.priority);
        }
        self.completed.extend(snapshot.completed.iter().cloned());
        self.postits.restore(&mut self.renderer, &snapshot.postits, &self.tasks);
    }

    /// Replace all tasks with the given texts and clear the completed list.
    /// Notes pinned to the old tasks become free.
    ///
    pub fn replace_tasks(&mut self, texts: &[String]) {
        self.settle();
        let ids: Vec<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        for id in ids {
            self.postits.release_task(&mut self.renderer, id);
        }
        self.tasks.clear(&mut self.renderer);
        for text in texts {
            self.tasks.append(&mut self.renderer, text, false, 0);
        }
        self.completed.clear();
    }

    /// Task texts in slot order, used as context for the assistant.
    ///
    pub fn task_lines(&self) -> Vec<String> {
        self.tasks.iter().map(|task| task.text.clone()).collect()
    }
}

fn track_x(viewport: Viewport) -> i32 {
    (viewport.width - TRACK_LENGTH - 1).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{slot_y, Anchor, TaskPhase, PIN_OFFSET};

    fn board() -> Board {
        Board::with_engine(Viewport { width: 80, height: 30 }, false, AnimationEngine::with_seed(7))
    }

    fn drain(board: &mut Board) -> Vec<Completion> {
        let mut all = vec![];
        for _ in 0..10_000 {
            all.extend(board.step());
            if !board.is_animating() {
                break;
            }
        }
        all
    }

    #[test]
    fn erase_completion_moves_task_to_completed() {
        let mut board = board();
        let id = board.append_task("Buy milk", false, 0);
        board.toggle_task(id).unwrap();
        assert!(board.tasks().contains(id));
        assert_eq!(board.tasks().get(id).unwrap().phase, TaskPhase::Erasing);
        let completions = drain(&mut board);
        assert!(completions.contains(&Completion::TaskErased(id)));
        assert!(board.tasks().is_empty());
        assert_eq!(
            board.completed(),
            &[CompletedEntry {
                text: "Buy milk".to_string(),
                priority: 0
            }]
        );
    }

    #[test]
    fn reflow_moves_notes_pinned_to_later_tasks() {
        let mut board = board();
        let first = board.append_task("first", false, 0);
        board.append_task("second", false, 0);
        let third = board.append_task("third", false, 0);
        board.create_preview("pinned", 0);
        board.commit_placement(40, slot_y(2) - 1);
        board.settle();
        let note = board.postits().iter().next().unwrap().id;
        assert_eq!(board.toggle_pin(note).unwrap(), PinOutcome::Pinned(third));

        board.remove_task(first).unwrap();
        let task_y = board.tasks().get(third).unwrap().y();
        assert_eq!(task_y, slot_y(1));
        assert_eq!(board.postits().get(note).unwrap().y, task_y - PIN_OFFSET);
    }

    #[test]
    fn removing_anchor_unpins_note() {
        let mut board = board();
        let task = board.append_task("anchor", false, 0);
        board.create_preview("n", 1);
        board.commit_placement(30, 10);
        board.settle();
        let note = board.postits().iter().next().unwrap().id;
        board.toggle_pin(note).unwrap();
        board.remove_task(task).unwrap();
        let note = board.postits().get(note).unwrap();
        assert_eq!(note.anchor, Anchor::Free);
        assert_eq!(board.renderer().item(note.pin_handle()).unwrap().content, "○");
    }

    #[test]
    fn dropped_note_is_inert_until_it_lands() {
        let mut board = board();
        board.create_preview("drop", 0);
        assert!(board.commit_placement(10, 10));
        assert!(!board.is_placing());
        assert!(board.postits().is_empty());
        assert_eq!(board.hit_test(12, 12), None);
        drain(&mut board);
        assert_eq!(board.postits().len(), 1);
        let note = board.postits().iter().next().unwrap();
        assert_eq!((note.x, note.y), (10, 10));
        assert!(board.hit_test(12, 12).is_some());
    }

    #[test]
    fn commit_without_preview_does_nothing() {
        let mut board = board();
        assert!(!board.commit_placement(1, 1));
        assert!(!board.is_animating());
    }

    #[test]
    fn theme_flips_when_slide_finishes() {
        let mut board = board();
        assert!(board.toggle_theme());
        assert!(!board.toggle_theme());
        assert!(!board.dark_mode());
        drain(&mut board);
        assert!(board.dark_mode());
        assert!(board.toggle_theme());
    }

    #[test]
    fn resize_redraws_rules_and_clamps_ghost() {
        let mut board = board();
        board.create_preview("g", 0);
        board.move_ghost_to(60, 25);
        board.resize(40, 12);
        let ghost = board.postits().ghost().unwrap();
        assert!(ghost.x + POSTIT_WIDTH <= 40);
        assert!(ghost.y + POSTIT_HEIGHT <= 12);
        let rules = board
            .renderer()
            .paint_order()
            .into_iter()
            .filter(|item| item.kind == ItemKind::Rule)
            .count();
        assert_eq!(rules, 5);
    }

    #[test]
    fn snapshot_restore_keeps_pins_by_slot() {
        let mut board = board();
        board.append_task("a", false, 1);
        let b = board.append_task("b", true, 3);
        board.create_preview("note", 2);
        board.commit_placement(30, slot_y(1));
        board.settle();
        let note = board.postits().iter().next().unwrap().id;
        assert_eq!(board.toggle_pin(note).unwrap(), PinOutcome::Pinned(b));

        let snapshot = board.snapshot();
        board.clear();
        assert!(board.tasks().is_empty());
        assert!(board.postits().is_empty());
        board.restore(&snapshot);
        assert_eq!(board.snapshot(), snapshot);
        let restored = board.postits().iter().next().unwrap();
        let anchor = board.tasks().at_slot(1).unwrap().id;
        assert_eq!(restored.anchor, Anchor::Pinned(anchor));
    }

    #[test]
    fn replace_tasks_clears_completed_and_unpins() {
        let mut board = board();
        let id = board.append_task("done soon", false, 0);
        board.append_task("stays", false, 0);
        board.toggle_task(id).unwrap();
        board.settle();
        assert_eq!(board.completed().len(), 1);
        board.replace_tasks(&["x".to_string(), "y".to_string()]);
        assert_eq!(board.task_lines(), vec!["x", "y"]);
        assert!(board.completed().is_empty());
    }
}
