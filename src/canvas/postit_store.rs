use super::board::Viewport;
use super::renderer::{
    Item, ItemKind, Paint, Renderer, Role, LAYER_EFFECTS, LAYER_GHOST, LAYER_NOTES,
};
use super::task_store::TaskStore;
use super::{
    Binding, CanvasError, HandleId, PostitId, PostitPart, TaskId, PIN_OFFSET, POSTIT_HEIGHT,
    POSTIT_WIDTH,
};
use log::*;

const PIN_ACTIVE: &str = "●";
const PIN_INACTIVE: &str = "○";
const DELETE_GLYPH: &str = "×";
const GHOST_LEVEL: u8 = 140;

/// Whether a note is placed freely or follows a task.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// Position is authoritative; the note can be dragged.
    Free,
    /// Position is derived from the task's row on every reflow. The task is
    /// referenced, not owned.
    Pinned(TaskId),
}

/// Outcome of toggling a note's pin.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned(TaskId),
    Unpinned,
    /// No task to pin to; nothing changed.
    NoTasks,
}

/// How a note's visual group is drawn.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NoteStyle {
    Live(PostitId),
    Ghost,
    Falling,
}

#[derive(Debug)]
pub(crate) struct NoteHandles {
    body: HandleId,
    pin: HandleId,
    delete: HandleId,
    lines: Vec<HandleId>,
}

impl NoteHandles {
    pub(crate) fn all(&self) -> Vec<HandleId> {
        let mut handles = vec![self.body, self.pin, self.delete];
        handles.extend(&self.lines);
        handles
    }
}

/// Draw the visual group of a note with its top-left corner at `(x, y)`.
///
pub(crate) fn draw_note(
    renderer: &mut Renderer,
    x: i32,
    y: i32,
    text: &str,
    color: u8,
    pinned: bool,
    style: NoteStyle,
) -> NoteHandles {
    let (layer, fill, ink) = match style {
        NoteStyle::Live(_) => (
            LAYER_NOTES,
            Paint::Solid(Role::Note(color)),
            Paint::Solid(Role::Ink),
        ),
        NoteStyle::Falling => (
            LAYER_EFFECTS,
            Paint::Solid(Role::Note(color)),
            Paint::Solid(Role::Ink),
        ),
        NoteStyle::Ghost => (
            LAYER_GHOST,
            Paint::Faded { role: Role::Note(color), level: GHOST_LEVEL },
            Paint::Faded { role: Role::Ink, level: GHOST_LEVEL },
        ),
    };
    let binding = |part| match style {
        NoteStyle::Live(id) => Some(Binding::Postit(id, part)),
        _ => None,
    };

    let mut body = Item::filled(ItemKind::NoteBody, x, y, POSTIT_WIDTH, POSTIT_HEIGHT, fill, layer);
    body.binding = binding(PostitPart::Body);
    let body = renderer.spawn(body);

    let mut pin = Item::text(
        ItemKind::PinIndicator,
        if pinned { PIN_ACTIVE } else { PIN_INACTIVE },
        x + 1,
        y,
        ink,
        layer,
    );
    pin.bg = Some(fill);
    pin.binding = binding(PostitPart::Pin);
    let pin = renderer.spawn(pin);

    let mut delete = Item::text(ItemKind::DeleteControl, DELETE_GLYPH, x + POSTIT_WIDTH - 2, y, ink, layer);
    delete.bg = Some(fill);
    delete.binding = binding(PostitPart::Delete);
    let delete = renderer.spawn(delete);

    let lines = textwrap::wrap(text, (POSTIT_WIDTH - 2) as usize)
        .into_iter()
        .take((POSTIT_HEIGHT - 2) as usize)
        .enumerate()
        .map(|(row, line)| {
            let mut item = Item::text(ItemKind::NoteText, &line, x + 1, y + 1 + row as i32, ink, layer);
            item.bg = Some(fill);
            item.binding = binding(PostitPart::Body);
            renderer.spawn(item)
        })
        .collect();

    NoteHandles {
        body,
        pin,
        delete,
        lines,
    }
}

/// Plain data a drop animation lands with.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostitSeed {
    pub text: String,
    pub color: u8,
    pub x: i32,
    pub y: i32,
}

/// Defines post-it data structure.
///
#[derive(Debug)]
pub struct Postit {
    pub id: PostitId,
    pub text: String,
    pub color: u8,
    pub x: i32,
    pub y: i32,
    pub anchor: Anchor,
    handles: NoteHandles,
}

impl Postit {
    pub fn center_y(&self) -> i32 {
        self.y + POSTIT_HEIGHT / 2
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self.anchor, Anchor::Pinned(_))
    }

    pub fn pin_handle(&self) -> HandleId {
        self.handles.pin
    }

    pub fn body_handle(&self) -> HandleId {
        self.handles.body
    }

    fn translate(&mut self, renderer: &mut Renderer, dx: i32, dy: i32) {
        renderer.translate_all(&self.handles.all(), dx, dy);
        self.x += dx;
        self.y += dy;
    }

    fn set_anchor(&mut self, renderer: &mut Renderer, anchor: Anchor) {
        self.anchor = anchor;
        let glyph = if self.is_pinned() { PIN_ACTIVE } else { PIN_INACTIVE };
        renderer.set_content(self.handles.pin, glyph);
    }
}

/// Plain-data copy of a note. A pin is recorded as the anchor task's slot.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostitSnapshot {
    pub text: String,
    pub color: u8,
    pub x: i32,
    pub y: i32,
    pub pinned_slot: Option<usize>,
}

/// The note being placed, not yet part of the store.
///
#[derive(Debug)]
pub struct Ghost {
    pub text: String,
    pub color: u8,
    pub x: i32,
    pub y: i32,
    handles: NoteHandles,
}

#[derive(Debug)]
struct Drag {
    id: PostitId,
    last: (i32, i32),
}

/// Collection of post-its plus the single placement ghost.
///
#[derive(Debug, Default)]
pub struct PostitStore {
    notes: Vec<Postit>,
    ghost: Option<Ghost>,
    drag: Option<Drag>,
    next_id: u64,
}

impl PostitStore {
    /// Return a new empty instance.
    ///
    pub fn new() -> Self {
        PostitStore::default()
    }

    /// Replace any existing ghost with a new one centred in the viewport.
    ///
    pub fn create_preview(&mut self, renderer: &mut Renderer, text: &str, color: u8, viewport: Viewport) {
        self.cancel_preview(renderer);
        let (x, y) = viewport.clamp_note(
            (viewport.width - POSTIT_WIDTH) / 2,
            (viewport.height - POSTIT_HEIGHT) / 2,
        );
        let handles = draw_note(renderer, x, y, text, color, false, NoteStyle::Ghost);
        self.ghost = Some(Ghost {
            text: text.to_string(),
            color,
            x,
            y,
            handles,
        });
    }

    /// Move the ghost, keeping its whole box inside the viewport.
    ///
    pub fn move_ghost_to(&mut self, renderer: &mut Renderer, x: i32, y: i32, viewport: Viewport) {
        if let Some(ghost) = self.ghost.as_mut() {
            let (x, y) = viewport.clamp_note(x, y);
            renderer.translate_all(&ghost.handles.all(), x - ghost.x, y - ghost.y);
            ghost.x = x;
            ghost.y = y;
        }
    }

    /// Re-clamp the ghost after the viewport changed.
    ///
    pub fn clamp_ghost(&mut self, renderer: &mut Renderer, viewport: Viewport) {
        if let Some((x, y)) = self.ghost.as_ref().map(|g| (g.x, g.y)) {
            self.move_ghost_to(renderer, x, y, viewport);
        }
    }

    /// Discard the ghost without placing anything.
    ///
    pub fn cancel_preview(&mut self, renderer: &mut Renderer) {
        if let Some(ghost) = self.ghost.take() {
            renderer.delete_all(&ghost.handles.all());
        }
    }

    pub fn is_placing(&self) -> bool {
        self.ghost.is_some()
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        self.ghost.as_ref()
    }

    /// End placement mode and discard the ghost. The returned seed is what the
    /// drop animation lands as a new note.
    ///
    pub fn commit_placement(
        &mut self,
        renderer: &mut Renderer,
        x: i32,
        y: i32,
        text: &str,
        color: u8,
    ) -> PostitSeed {
        self.cancel_preview(renderer);
        PostitSeed {
            text: text.to_string(),
            color,
            x,
            y,
        }
    }

    /// Add a free note from a landed seed.
    ///
    pub fn insert(&mut self, renderer: &mut Renderer, seed: PostitSeed) -> PostitId {
        let id = PostitId(self.next_id);
        self.next_id += 1;
        let handles = draw_note(renderer, seed.x, seed.y, &seed.text, seed.color, false, NoteStyle::Live(id));
        self.notes.push(Postit {
            id,
            text: seed.text,
            color: seed.color,
            x: seed.x,
            y: seed.y,
            anchor: Anchor::Free,
            handles,
        });
        debug!("Placed post-it {:?}.", id);
        id
    }

    /// Begin dragging a free note. Returns false for pinned notes.
    ///
    pub fn start_drag(&mut self, id: PostitId, pointer: (i32, i32)) -> Result<bool, CanvasError> {
        let note = self.get(id).ok_or(CanvasError::UnknownPostit(id))?;
        if note.is_pinned() {
            return Ok(false);
        }
        self.drag = Some(Drag { id, last: pointer });
        Ok(true)
    }

    /// Translate the dragged note by the pointer delta. Not clamped.
    ///
    pub fn drag_to(&mut self, renderer: &mut Renderer, pointer: (i32, i32)) -> bool {
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let (dx, dy) = (pointer.0 - drag.last.0, pointer.1 - drag.last.1);
        drag.last = pointer;
        let id = drag.id;
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.translate(renderer, dx, dy);
                true
            }
            None => {
                self.drag = None;
                false
            }
        }
    }

    /// Finish the drag; the note's current position stays authoritative.
    ///
    pub fn end_drag(&mut self) -> Option<PostitId> {
        self.drag.take().map(|drag| drag.id)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pin a free note to the nearest task by row, or unpin a pinned one.
    /// Unpinning leaves the note where it is.
    ///
    pub fn toggle_pin(
        &mut self,
        renderer: &mut Renderer,
        id: PostitId,
        tasks: &TaskStore,
    ) -> Result<PinOutcome, CanvasError> {
        let note = self
            .notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or(CanvasError::UnknownPostit(id))?;
        if note.is_pinned() {
            note.set_anchor(renderer, Anchor::Free);
            return Ok(PinOutcome::Unpinned);
        }
        let Some(task_id) = tasks.nearest(note.center_y()) else {
            return Ok(PinOutcome::NoTasks);
        };
        let task_y = tasks.get(task_id).map(|task| task.y()).unwrap_or(note.y + PIN_OFFSET);
        note.set_anchor(renderer, Anchor::Pinned(task_id));
        let dy = task_y - PIN_OFFSET - note.y;
        note.translate(renderer, 0, dy);
        if self.drag.as_ref().map(|d| d.id) == Some(id) {
            self.drag = None;
        }
        Ok(PinOutcome::Pinned(task_id))
    }

    /// Unpin every note anchored to the task. Returns the affected notes.
    ///
    pub fn release_task(&mut self, renderer: &mut Renderer, task: TaskId) -> Vec<PostitId> {
        self.notes
            .iter_mut()
            .filter(|note| note.anchor == Anchor::Pinned(task))
            .map(|note| {
                note.set_anchor(renderer, Anchor::Free);
                note.id
            })
            .collect()
    }

    /// Move every pinned note to follow its anchor task's current row.
    ///
    pub fn reflow(&mut self, renderer: &mut Renderer, tasks: &TaskStore) {
        for note in self.notes.iter_mut() {
            if let Anchor::Pinned(task_id) = note.anchor {
                match tasks.get(task_id) {
                    Some(task) => {
                        let dy = task.y() - PIN_OFFSET - note.y;
                        if dy != 0 {
                            note.translate(renderer, 0, dy);
                        }
                    }
                    None => note.set_anchor(renderer, Anchor::Free),
                }
            }
        }
    }

    /// Remove a note and its handles.
    ///
    pub fn delete(&mut self, renderer: &mut Renderer, id: PostitId) -> Result<(), CanvasError> {
        let index = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(CanvasError::UnknownPostit(id))?;
        let note = self.notes.remove(index);
        renderer.delete_all(&note.handles.all());
        if self.drag.as_ref().map(|d| d.id) == Some(id) {
            self.drag = None;
        }
        debug!("Deleted post-it {:?}.", id);
        Ok(())
    }

    /// Remove every note, the ghost and any drag in progress.
    ///
    pub fn clear(&mut self, renderer: &mut Renderer) {
        self.cancel_preview(renderer);
        self.drag = None;
        for note in self.notes.drain(..) {
            renderer.delete_all(&note.handles.all());
        }
    }

    /// Return plain data for every note, recording pins by anchor slot.
    ///
    pub fn snapshot(&self, tasks: &TaskStore) -> Vec<PostitSnapshot> {
        self.notes
            .iter()
            .map(|note| PostitSnapshot {
                text: note.text.clone(),
                color: note.color,
                x: note.x,
                y: note.y,
                pinned_slot: match note.anchor {
                    Anchor::Pinned(task) => tasks.position(task),
                    Anchor::Free => None,
                },
            })
            .collect()
    }

    /// Recreate notes from snapshots, re-pinning against the given tasks.
    ///
    pub fn restore(&mut self, renderer: &mut Renderer, snapshots: &[PostitSnapshot], tasks: &TaskStore) {
        for snapshot in snapshots {
            let id = self.insert(
                renderer,
                PostitSeed {
                    text: snapshot.text.clone(),
                    color: snapshot.color,
                    x: snapshot.x,
                    y: snapshot.y,
                },
            );
            let anchor = snapshot.pinned_slot.and_then(|slot| tasks.at_slot(slot)).map(|task| task.id);
            if let (Some(task), Some(note)) = (anchor, self.notes.iter_mut().find(|n| n.id == id)) {
                note.set_anchor(renderer, Anchor::Pinned(task));
            }
        }
        self.reflow(renderer, tasks);
    }

    pub fn get(&self, id: PostitId) -> Option<&Postit> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Postit> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::slot_y;

    const VIEW: Viewport = Viewport { width: 80, height: 30 };

    fn seed(x: i32, y: i32) -> PostitSeed {
        PostitSeed {
            text: "remember".to_string(),
            color: 0,
            x,
            y,
        }
    }

    fn tasks(count: usize, renderer: &mut Renderer) -> TaskStore {
        let mut store = TaskStore::new();
        for i in 0..count {
            store.append(renderer, &format!("task {}", i), false, 0);
        }
        store
    }

    #[test]
    fn preview_replaces_existing_ghost() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        notes.create_preview(&mut renderer, "a", 0, VIEW);
        let first = renderer.len();
        notes.create_preview(&mut renderer, "b", 1, VIEW);
        assert_eq!(renderer.len(), first);
        assert_eq!(notes.ghost().unwrap().text, "b");
        assert!(notes.is_placing());
        assert!(notes.is_empty());
    }

    #[test]
    fn ghost_is_clamped_inside_viewport() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        notes.create_preview(&mut renderer, "a", 0, VIEW);
        notes.move_ghost_to(&mut renderer, 500, -20, VIEW);
        let ghost = notes.ghost().unwrap();
        assert_eq!((ghost.x, ghost.y), (VIEW.width - POSTIT_WIDTH, 0));
        let body = renderer.item(ghost.handles.body).unwrap();
        assert_eq!((body.x, body.y), (ghost.x, ghost.y));
    }

    #[test]
    fn ghost_is_not_hittable() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        notes.create_preview(&mut renderer, "a", 0, VIEW);
        let ghost = notes.ghost().unwrap();
        assert_eq!(renderer.hit_test(ghost.x + 2, ghost.y + 2), None);
    }

    #[test]
    fn commit_placement_discards_ghost() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        notes.create_preview(&mut renderer, "a", 2, VIEW);
        let landed = notes.commit_placement(&mut renderer, 3, 4, "a", 2);
        assert_eq!(landed, PostitSeed { text: "a".to_string(), color: 2, x: 3, y: 4 });
        assert!(!notes.is_placing());
        assert!(renderer.is_empty());
    }

    #[test]
    fn drag_translates_whole_group_without_clamping() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(10, 10));
        assert!(notes.start_drag(id, (12, 11)).unwrap());
        assert!(notes.drag_to(&mut renderer, (2, 1)));
        assert!(notes.drag_to(&mut renderer, (-40, 1)));
        assert_eq!(notes.end_drag(), Some(id));
        let note = notes.get(id).unwrap();
        assert_eq!((note.x, note.y), (-42, 0));
        let pin = renderer.item(note.pin_handle()).unwrap();
        assert_eq!((pin.x, pin.y), (-41, 0));
        assert!(!notes.drag_to(&mut renderer, (0, 0)));
    }

    #[test]
    fn pinned_notes_are_not_draggable() {
        let mut renderer = Renderer::new();
        let store = tasks(2, &mut renderer);
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(30, 8));
        notes.toggle_pin(&mut renderer, id, &store).unwrap();
        assert!(!notes.start_drag(id, (31, 9)).unwrap());
        assert!(!notes.is_dragging());
    }

    #[test]
    fn toggle_pin_snaps_to_nearest_task() {
        let mut renderer = Renderer::new();
        let store = tasks(3, &mut renderer);
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(30, slot_y(2) - POSTIT_HEIGHT / 2 + 1));
        let target = store.at_slot(2).unwrap().id;
        assert_eq!(notes.toggle_pin(&mut renderer, id, &store).unwrap(), PinOutcome::Pinned(target));
        let note = notes.get(id).unwrap();
        assert_eq!(note.anchor, Anchor::Pinned(target));
        assert_eq!((note.x, note.y), (30, slot_y(2) - PIN_OFFSET));
        assert_eq!(renderer.item(note.pin_handle()).unwrap().content, PIN_ACTIVE);
    }

    #[test]
    fn unpin_leaves_note_in_place() {
        let mut renderer = Renderer::new();
        let store = tasks(1, &mut renderer);
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(30, 20));
        notes.toggle_pin(&mut renderer, id, &store).unwrap();
        let pinned_y = notes.get(id).unwrap().y;
        assert_eq!(notes.toggle_pin(&mut renderer, id, &store).unwrap(), PinOutcome::Unpinned);
        let note = notes.get(id).unwrap();
        assert_eq!(note.y, pinned_y);
        assert_eq!(note.anchor, Anchor::Free);
        assert_eq!(renderer.item(note.pin_handle()).unwrap().content, PIN_INACTIVE);
    }

    #[test]
    fn toggle_pin_without_tasks_is_noop() {
        let mut renderer = Renderer::new();
        let store = TaskStore::new();
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(5, 5));
        assert_eq!(notes.toggle_pin(&mut renderer, id, &store).unwrap(), PinOutcome::NoTasks);
        assert_eq!(notes.get(id).unwrap().anchor, Anchor::Free);
    }

    #[test]
    fn delete_removes_handles() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(5, 5));
        notes.delete(&mut renderer, id).unwrap();
        assert!(renderer.is_empty());
        assert_eq!(notes.delete(&mut renderer, id), Err(CanvasError::UnknownPostit(id)));
    }

    #[test]
    fn live_note_parts_are_bound() {
        let mut renderer = Renderer::new();
        let mut notes = PostitStore::new();
        let id = notes.insert(&mut renderer, seed(10, 10));
        assert_eq!(renderer.hit_test(11, 10), Some(Binding::Postit(id, PostitPart::Pin)));
        assert_eq!(
            renderer.hit_test(10 + POSTIT_WIDTH - 2, 10),
            Some(Binding::Postit(id, PostitPart::Delete))
        );
        assert_eq!(renderer.hit_test(15, 13), Some(Binding::Postit(id, PostitPart::Body)));
    }
}
