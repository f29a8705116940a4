use super::{Binding, HandleId, CHAR_WIDTH};
use std::collections::BTreeMap;

pub const LAYER_RULES: u8 = 0;
pub const LAYER_TASKS: u8 = 1;
pub const LAYER_NOTES: u8 = 2;
pub const LAYER_EFFECTS: u8 = 3;
pub const LAYER_GHOST: u8 = 4;
pub const LAYER_CONTROLS: u8 = 5;

/// Semantic colour slot, resolved against the active theme at paint time.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Ink,
    Muted,
    Paper,
    Rule,
    Accent,
    Star,
    Caret,
    Note(u8),
}

/// Colour of an item. `Faded` blends the role colour towards the paper
/// colour, `level` 255 being the full role colour and 0 the background.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Paint {
    Solid(Role),
    Faded { role: Role, level: u8 },
}

impl Paint {
    /// Return the luminance level of this paint.
    ///
    pub fn level(&self) -> u8 {
        match self {
            Paint::Solid(_) => u8::MAX,
            Paint::Faded { level, .. } => *level,
        }
    }

    /// Return the underlying role.
    ///
    pub fn role(&self) -> Role {
        match self {
            Paint::Solid(role) | Paint::Faded { role, .. } => *role,
        }
    }
}

/// Specifying the different kinds of canvas items.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Glyph,
    Checkbox,
    Checkmark,
    Star,
    Caret,
    NoteBody,
    NoteText,
    PinIndicator,
    DeleteControl,
    Crumb,
    Rule,
    Track,
    Knob,
}

/// A single addressable visual object.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub content: String,
    pub fg: Paint,
    pub bg: Option<Paint>,
    pub layer: u8,
    pub visible: bool,
    pub binding: Option<Binding>,
}

impl Item {
    /// Return a new single-row item sized to its content.
    ///
    pub fn text(kind: ItemKind, content: &str, x: i32, y: i32, fg: Paint, layer: u8) -> Self {
        Item {
            kind,
            x,
            y,
            width: content.chars().count() as i32 * CHAR_WIDTH,
            height: 1,
            content: content.to_string(),
            fg,
            bg: None,
            layer,
            visible: true,
            binding: None,
        }
    }

    /// Return a new filled rectangle.
    ///
    pub fn filled(kind: ItemKind, x: i32, y: i32, width: i32, height: i32, bg: Paint, layer: u8) -> Self {
        Item {
            kind,
            x,
            y,
            width,
            height,
            content: String::new(),
            fg: bg,
            bg: Some(bg),
            layer,
            visible: true,
            binding: None,
        }
    }

    /// Attach a gesture binding.
    ///
    pub fn bound(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Whether the cell lies within this item's extent.
    ///
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Registry of render handles. Every visual on the canvas is an item owned by
/// the renderer and addressed by its `HandleId`; mutating a handle that has
/// already been deleted is a no-op reported through the boolean return.
///
#[derive(Debug, Default)]
pub struct Renderer {
    items: BTreeMap<HandleId, Item>,
    next_id: u64,
}

impl Renderer {
    /// Return a new empty instance.
    ///
    pub fn new() -> Self {
        Renderer::default()
    }

    /// Register an item and return its handle.
    ///
    pub fn spawn(&mut self, item: Item) -> HandleId {
        let id = HandleId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, item);
        id
    }

    /// Draw a string as one handle per character at a fixed advance width.
    ///
    pub fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        fg: Paint,
        layer: u8,
        binding: Option<Binding>,
    ) -> Vec<HandleId> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let mut item = Item::text(
                    ItemKind::Glyph,
                    &ch.to_string(),
                    x + i as i32 * CHAR_WIDTH,
                    y,
                    fg,
                    layer,
                );
                item.binding = binding;
                self.spawn(item)
            })
            .collect()
    }

    /// Return the item for the handle, if it still exists.
    ///
    pub fn item(&self, handle: HandleId) -> Option<&Item> {
        self.items.get(&handle)
    }

    /// Return the number of live handles.
    ///
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_paint(&mut self, handle: HandleId, paint: Paint) -> bool {
        self.update(handle, |item| item.fg = paint)
    }

    /// Replace the content of a text item, resizing its extent to match.
    ///
    pub fn set_content(&mut self, handle: HandleId, content: &str) -> bool {
        self.update(handle, |item| {
            item.width = content.chars().count() as i32 * CHAR_WIDTH;
            item.content = content.to_string();
        })
    }

    pub fn set_visible(&mut self, handle: HandleId, visible: bool) -> bool {
        self.update(handle, |item| item.visible = visible)
    }

    pub fn move_to(&mut self, handle: HandleId, x: i32, y: i32) -> bool {
        self.update(handle, |item| {
            item.x = x;
            item.y = y;
        })
    }

    pub fn translate(&mut self, handle: HandleId, dx: i32, dy: i32) -> bool {
        self.update(handle, |item| {
            item.x += dx;
            item.y += dy;
        })
    }

    /// Translate a group of handles, returning how many were still alive.
    ///
    pub fn translate_all(&mut self, handles: &[HandleId], dx: i32, dy: i32) -> usize {
        handles
            .iter()
            .filter(|handle| self.translate(**handle, dx, dy))
            .count()
    }

    pub fn delete(&mut self, handle: HandleId) -> bool {
        self.items.remove(&handle).is_some()
    }

    pub fn delete_all(&mut self, handles: &[HandleId]) {
        for handle in handles {
            self.items.remove(handle);
        }
    }

    /// Delete every handle.
    ///
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Return the binding of the topmost visible bound item covering the
    /// cell. Higher layers win, then the most recently created handle.
    ///
    pub fn hit_test(&self, x: i32, y: i32) -> Option<Binding> {
        self.items
            .iter()
            .filter(|(_, item)| item.visible && item.binding.is_some() && item.contains(x, y))
            .max_by_key(|(id, item)| (item.layer, **id))
            .and_then(|(_, item)| item.binding)
    }

    /// Return the visible items in paint order.
    ///
    pub fn paint_order(&self) -> Vec<&Item> {
        let mut ordered: Vec<(&HandleId, &Item)> =
            self.items.iter().filter(|(_, item)| item.visible).collect();
        ordered.sort_by_key(|(id, item)| (item.layer, **id));
        ordered.into_iter().map(|(_, item)| item).collect()
    }

    fn update<F: FnOnce(&mut Item)>(&mut self, handle: HandleId, apply: F) -> bool {
        match self.items.get_mut(&handle) {
            Some(item) => {
                apply(item);
                true
            }
            None => false,
        }
    }
}
