use super::renderer::{Item, ItemKind, Paint, Renderer, Role, LAYER_TASKS};
use super::{
    slot_y, Binding, CanvasError, HandleId, TaskId, TaskPart, CHECKBOX_X, CHECKMARK_X,
    MAX_PRIORITY, PRIORITY_X, TEXT_START_X,
};
use log::*;

const STAR_FILLED: &str = "★";
const STAR_EMPTY: &str = "☆";

/// Lifecycle of a task with respect to animations.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskPhase {
    Settled,
    /// Marked done and fading out; removed once the animation finishes.
    Erasing,
}

/// Outcome of toggling a task's completion.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// Task was marked done; its glyphs must be erased before removal.
    Completing { glyphs: Vec<HandleId> },
    /// Task was unchecked and its text restored.
    Restored,
    /// Task is mid-transition and ignored the gesture.
    Busy,
}

#[derive(Debug)]
struct TaskHandles {
    checkbox: HandleId,
    checkmark: HandleId,
    stars: Vec<HandleId>,
    glyphs: Vec<HandleId>,
}

impl TaskHandles {
    fn all(&self) -> Vec<HandleId> {
        let mut handles = vec![self.checkbox, self.checkmark];
        handles.extend(&self.stars);
        handles.extend(&self.glyphs);
        handles
    }
}

/// Defines task data structure.
///
#[derive(Debug)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub priority: u8,
    pub slot: usize,
    pub phase: TaskPhase,
    handles: TaskHandles,
}

impl Task {
    /// Row the task is drawn on.
    ///
    pub fn y(&self) -> i32 {
        slot_y(self.slot)
    }

    pub fn glyphs(&self) -> &[HandleId] {
        &self.handles.glyphs
    }

    pub fn checkmark(&self) -> HandleId {
        self.handles.checkmark
    }

    pub fn stars(&self) -> &[HandleId] {
        &self.handles.stars
    }

    /// Return plain data describing this task.
    ///
    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            text: self.text.clone(),
            done: self.done,
            priority: self.priority,
        }
    }
}

/// Plain-data copy of a task, free of render handles.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub text: String,
    pub done: bool,
    pub priority: u8,
}

/// Ordered collection of tasks laid out on dense slots `0..n-1`.
///
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskStore {
    /// Return a new empty instance.
    ///
    pub fn new() -> Self {
        TaskStore::default()
    }

    /// Append a task on the next dense slot, drawing its checkbox, checkmark,
    /// priority stars and one glyph per character.
    ///
    pub fn append(&mut self, renderer: &mut Renderer, text: &str, done: bool, priority: u8) -> &Task {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let slot = self.tasks.len();
        let y = slot_y(slot);
        let priority = priority.min(MAX_PRIORITY);
        let toggle = Binding::Task(id, TaskPart::Toggle);

        let checkbox = renderer.spawn(
            Item::text(ItemKind::Checkbox, "[ ]", CHECKBOX_X, y, Paint::Solid(Role::Ink), LAYER_TASKS)
                .bound(toggle),
        );
        let mut mark = Item::text(ItemKind::Checkmark, "✔", CHECKMARK_X, y, Paint::Solid(Role::Accent), LAYER_TASKS)
            .bound(toggle);
        mark.visible = done;
        let checkmark = renderer.spawn(mark);
        let stars = (0..MAX_PRIORITY)
            .map(|i| {
                renderer.spawn(
                    Item::text(ItemKind::Star, star_glyph(i, priority), PRIORITY_X + i as i32, y, Paint::Solid(Role::Star), LAYER_TASKS)
                        .bound(Binding::Task(id, TaskPart::Priority)),
                )
            })
            .collect();
        let glyphs = renderer.draw_text(text, TEXT_START_X, y, Paint::Solid(Role::Ink), LAYER_TASKS, Some(toggle));

        debug!("Appended task {:?} on slot {}.", id, slot);
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            done,
            priority,
            slot,
            phase: TaskPhase::Settled,
            handles: TaskHandles {
                checkbox,
                checkmark,
                stars,
                glyphs,
            },
        });
        &self.tasks[slot]
    }

    /// Toggle completion. Checking a task marks it erasing and hands back its
    /// glyph handles for the erase animation; unchecking restores the text.
    ///
    pub fn toggle_done(&mut self, renderer: &mut Renderer, id: TaskId) -> Result<Toggle, CanvasError> {
        let task = self.get_mut(id)?;
        if task.phase == TaskPhase::Erasing {
            debug!("Ignoring toggle on erasing task {:?}.", id);
            return Ok(Toggle::Busy);
        }
        if !task.done {
            task.done = true;
            task.phase = TaskPhase::Erasing;
            renderer.set_visible(task.handles.checkmark, true);
            Ok(Toggle::Completing {
                glyphs: task.handles.glyphs.clone(),
            })
        } else {
            task.done = false;
            renderer.set_visible(task.handles.checkmark, false);
            for (glyph, ch) in task.handles.glyphs.iter().zip(task.text.chars()) {
                renderer.set_content(*glyph, &ch.to_string());
                renderer.set_paint(*glyph, Paint::Solid(Role::Ink));
            }
            Ok(Toggle::Restored)
        }
    }

    /// Cycle priority `0 → 1 → 2 → 3 → 0` and redraw the stars. Returns the
    /// new priority; erasing tasks keep their priority.
    ///
    pub fn cycle_priority(&mut self, renderer: &mut Renderer, id: TaskId) -> Result<u8, CanvasError> {
        let task = self.get_mut(id)?;
        if task.phase == TaskPhase::Erasing {
            return Ok(task.priority);
        }
        task.priority = (task.priority + 1) % (MAX_PRIORITY + 1);
        for (i, star) in task.handles.stars.iter().enumerate() {
            renderer.set_content(*star, star_glyph(i as u8, task.priority));
        }
        Ok(task.priority)
    }

    /// Remove a task and its handles, then close the gap it leaves.
    ///
    pub fn remove(&mut self, renderer: &mut Renderer, id: TaskId) -> Result<TaskSnapshot, CanvasError> {
        let index = self.position(id).ok_or(CanvasError::UnknownTask(id))?;
        let task = self.tasks.remove(index);
        renderer.delete_all(&task.handles.all());
        self.reflow(renderer);
        debug!("Removed task {:?} from slot {}.", id, index);
        Ok(task.snapshot())
    }

    /// Reassign dense slots in sequence order and move every row that shifted.
    ///
    pub fn reflow(&mut self, renderer: &mut Renderer) {
        for (index, task) in self.tasks.iter_mut().enumerate() {
            if task.slot != index {
                let dy = slot_y(index) - slot_y(task.slot);
                renderer.translate_all(&task.handles.all(), 0, dy);
                task.slot = index;
            }
        }
    }

    /// Return the task whose row is vertically nearest to `y`. Equidistant
    /// tasks resolve to the lower slot index.
    ///
    pub fn nearest(&self, y: i32) -> Option<TaskId> {
        self.tasks
            .iter()
            .min_by_key(|task| ((task.y() - y).abs(), task.slot))
            .map(|task| task.id)
    }

    /// Remove every task and its handles.
    ///
    pub fn clear(&mut self, renderer: &mut Renderer) {
        for task in self.tasks.drain(..) {
            renderer.delete_all(&task.handles.all());
        }
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Result<&mut Task, CanvasError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(CanvasError::UnknownTask(id))
    }

    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn at_slot(&self, slot: usize) -> Option<&Task> {
        self.tasks.get(slot)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.position(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn snapshot(&self) -> Vec<TaskSnapshot> {
        self.tasks.iter().map(Task::snapshot).collect()
    }
}

fn star_glyph(index: u8, priority: u8) -> &'static str {
    if index < priority {
        STAR_FILLED
    } else {
        STAR_EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{slot_at, LINE_HEIGHT, LINE_START_Y};
    use fake::faker::lorem::en::Words;
    use fake::Fake;

    fn store_with(texts: &[&str]) -> (TaskStore, Renderer) {
        let mut renderer = Renderer::new();
        let mut store = TaskStore::new();
        for text in texts {
            store.append(&mut renderer, text, false, 0);
        }
        (store, renderer)
    }

    fn assert_dense(store: &TaskStore, renderer: &Renderer) {
        for (index, task) in store.iter().enumerate() {
            assert_eq!(task.slot, index);
            assert_eq!(task.y(), LINE_START_Y + index as i32 * LINE_HEIGHT);
            for glyph in task.glyphs() {
                assert_eq!(renderer.item(*glyph).unwrap().y, task.y());
            }
            assert_eq!(renderer.item(task.checkmark()).unwrap().y, task.y());
        }
    }

    #[test]
    fn append_assigns_dense_slots() {
        let (store, renderer) = store_with(&["one", "two", "three"]);
        assert_eq!(store.len(), 3);
        assert_dense(&store, &renderer);
        let task = store.at_slot(1).unwrap();
        assert_eq!(task.glyphs().len(), 3);
        assert_eq!(slot_at(task.y()), Some(1));
    }

    #[test]
    fn append_draws_checkbox_stars_and_glyphs() {
        let mut renderer = Renderer::new();
        let mut store = TaskStore::new();
        let task = store.append(&mut renderer, "Hi", true, 2);
        let stars: Vec<String> = task
            .stars()
            .iter()
            .map(|s| renderer.item(*s).unwrap().content.clone())
            .collect();
        assert_eq!(stars, vec!["★", "★", "☆"]);
        assert!(renderer.item(task.checkmark()).unwrap().visible);
        // checkbox + checkmark + 3 stars + 2 glyphs
        assert_eq!(renderer.len(), 7);
    }

    #[test]
    fn dense_slots_survive_random_removals() {
        let texts: Vec<String> = (0..8)
            .map(|_| Words(1..4).fake::<Vec<String>>().join(" "))
            .collect();
        let refs: Vec<&str> = texts.iter().map(|s| s.as_str()).collect();
        let (mut store, mut renderer) = store_with(&refs);
        for slot in [5usize, 0, 3, 1] {
            let id = store.at_slot(slot).unwrap().id;
            store.remove(&mut renderer, id).unwrap();
            assert_dense(&store, &renderer);
        }
        store.append(&mut renderer, "late", false, 0);
        assert_dense(&store, &renderer);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn remove_deletes_all_handles() {
        let (mut store, mut renderer) = store_with(&["abc"]);
        let id = store.at_slot(0).unwrap().id;
        let removed = store.remove(&mut renderer, id).unwrap();
        assert_eq!(removed.text, "abc");
        assert!(renderer.is_empty());
    }

    #[test]
    fn remove_unknown_task_is_invalid_reference() {
        let (mut store, mut renderer) = store_with(&["a", "b"]);
        let id = store.at_slot(0).unwrap().id;
        store.remove(&mut renderer, id).unwrap();
        assert_eq!(store.remove(&mut renderer, id), Err(CanvasError::UnknownTask(id)));
        assert_eq!(store.len(), 1);
        assert_dense(&store, &renderer);
    }

    #[test]
    fn toggle_done_marks_erasing_and_gates_reentry() {
        let (mut store, mut renderer) = store_with(&["milk"]);
        let id = store.at_slot(0).unwrap().id;
        match store.toggle_done(&mut renderer, id).unwrap() {
            Toggle::Completing { glyphs } => assert_eq!(glyphs.len(), 4),
            other => panic!("unexpected toggle outcome {:?}", other),
        }
        let task = store.get(id).unwrap();
        assert!(task.done);
        assert_eq!(task.phase, TaskPhase::Erasing);
        assert!(renderer.item(task.checkmark()).unwrap().visible);
        assert_eq!(store.toggle_done(&mut renderer, id).unwrap(), Toggle::Busy);
        assert_eq!(store.cycle_priority(&mut renderer, id).unwrap(), 0);
    }

    #[test]
    fn untoggle_restores_text_and_colour() {
        let mut renderer = Renderer::new();
        let mut store = TaskStore::new();
        let id = store.append(&mut renderer, "ab", true, 0).id;
        let glyphs = store.get(id).unwrap().glyphs().to_vec();
        renderer.set_content(glyphs[0], "");
        renderer.set_paint(glyphs[1], Paint::Faded { role: Role::Ink, level: 10 });
        assert_eq!(store.toggle_done(&mut renderer, id).unwrap(), Toggle::Restored);
        let task = store.get(id).unwrap();
        assert!(!task.done);
        assert_eq!(task.phase, TaskPhase::Settled);
        assert!(!renderer.item(task.checkmark()).unwrap().visible);
        assert_eq!(renderer.item(glyphs[0]).unwrap().content, "a");
        assert_eq!(renderer.item(glyphs[1]).unwrap().fg, Paint::Solid(Role::Ink));
    }

    #[test]
    fn four_priority_cycles_return_to_start() {
        let mut renderer = Renderer::new();
        let mut store = TaskStore::new();
        let id = store.append(&mut renderer, "x", false, 2).id;
        let seen: Vec<u8> = (0..4)
            .map(|_| store.cycle_priority(&mut renderer, id).unwrap())
            .collect();
        assert_eq!(seen, vec![3, 0, 1, 2]);
        let star = store.get(id).unwrap().stars()[1];
        assert_eq!(renderer.item(star).unwrap().content, "★");
    }

    #[test]
    fn nearest_breaks_ties_towards_lower_slot() {
        let (store, _) = store_with(&["a", "b", "c"]);
        let midway = (slot_y(0) + slot_y(1)) / 2;
        assert_eq!(store.nearest(midway), Some(store.at_slot(0).unwrap().id));
        assert_eq!(store.nearest(slot_y(2) + 10), Some(store.at_slot(2).unwrap().id));
        assert_eq!(TaskStore::new().nearest(4), None);
    }

    #[test]
    fn append_clamps_priority() {
        let mut renderer = Renderer::new();
        let mut store = TaskStore::new();
        assert_eq!(store.append(&mut renderer, "x", false, 9).priority, MAX_PRIORITY);
    }
}
