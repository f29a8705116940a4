//! Named pages, each a plain-data snapshot of a board.

use super::StateError;
use crate::canvas::{Board, BoardSnapshot};
use log::*;

const NAME_PREFIX: &str = "Page";

/// Defines tab data structure.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tab {
    pub name: String,
    pub snapshot: BoardSnapshot,
}

/// Ordered tabs with exactly one current. The current tab's live content is
/// on the board; its stored snapshot is refreshed when it is left.
///
#[derive(Debug)]
pub struct TabModel {
    tabs: Vec<Tab>,
    current: usize,
    generated: usize,
}

impl Default for TabModel {
    fn default() -> Self {
        TabModel::new()
    }
}

impl TabModel {
    /// Return a new model holding a single empty tab.
    ///
    pub fn new() -> Self {
        let mut model = TabModel {
            tabs: vec![],
            current: 0,
            generated: 0,
        };
        let name = model.generate_name();
        model.tabs.push(Tab {
            name,
            snapshot: BoardSnapshot::default(),
        });
        model
    }

    pub fn names(&self) -> Vec<&str> {
        self.tabs.iter().map(|tab| tab.name.as_str()).collect()
    }

    pub fn current_name(&self) -> &str {
        &self.tabs[self.current].name
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Return the stored snapshot of a tab. For the current tab this is the
    /// content it had when it was last left.
    ///
    pub fn get(&self, name: &str) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.name == name)
    }

    /// Snapshot the current tab, clear the board and load the target tab.
    /// In-flight animations are run to completion first so no effect
    /// outlives its tab. Returns false when `name` is already current.
    ///
    pub fn switch_to(&mut self, name: &str, board: &mut Board) -> Result<bool, StateError> {
        let target = self
            .tabs
            .iter()
            .position(|tab| tab.name == name)
            .ok_or_else(|| StateError::TabNotFound {
                name: name.to_string(),
            })?;
        if target == self.current {
            return Ok(false);
        }
        board.settle();
        self.tabs[self.current].snapshot = board.snapshot();
        board.clear();
        board.restore(&self.tabs[target].snapshot);
        info!("Switched from tab '{}' to '{}'.", self.tabs[self.current].name, name);
        self.current = target;
        Ok(true)
    }

    /// Switch by a relative offset, wrapping around at both ends.
    ///
    pub fn switch_by(&mut self, offset: isize, board: &mut Board) -> Result<bool, StateError> {
        let count = self.tabs.len() as isize;
        let target = (self.current as isize + offset).rem_euclid(count) as usize;
        let name = self.tabs[target].name.clone();
        self.switch_to(&name, board)
    }

    /// Allocate a new empty tab with a generated name and switch to it.
    /// Returns the new tab's name.
    ///
    pub fn create_new(&mut self, board: &mut Board) -> Result<String, StateError> {
        let name = self.generate_name();
        self.tabs.push(Tab {
            name: name.clone(),
            snapshot: BoardSnapshot::default(),
        });
        self.switch_to(&name, board)?;
        Ok(name)
    }

    fn generate_name(&mut self) -> String {
        loop {
            self.generated += 1;
            let name = format!("{} {}", NAME_PREFIX, self.generated);
            if self.tabs.iter().all(|tab| tab.name != name) {
                return name;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationEngine;
    use crate::canvas::{slot_y, Viewport};

    fn board() -> Board {
        Board::with_engine(Viewport::default(), false, AnimationEngine::with_seed(2))
    }

    #[test]
    fn starts_with_one_current_tab() {
        let model = TabModel::new();
        assert_eq!(model.names(), vec!["Page 1"]);
        assert_eq!(model.current_name(), "Page 1");
    }

    #[test]
    fn switching_round_trips_content() {
        let mut board = board();
        let mut model = TabModel::new();
        board.append_task("one", false, 2);
        board.append_task("two", false, 0);
        board.create_preview("note", 1);
        board.commit_placement(40, slot_y(1));
        let first = board.snapshot();

        let second = model.create_new(&mut board).unwrap();
        assert_eq!(second, "Page 2");
        assert!(board.tasks().is_empty());
        // the drop was settled before leaving, so the note was kept
        assert_eq!(model.get("Page 1").unwrap().snapshot.postits.len(), 1);
        board.append_task("other", false, 0);

        assert!(model.switch_to("Page 1", &mut board).unwrap());
        assert_eq!(board.task_lines(), vec!["one", "two"]);
        assert_eq!(board.snapshot().tasks, first.tasks);
        assert_eq!(board.postits().len(), 1);

        model.switch_to("Page 2", &mut board).unwrap();
        assert_eq!(board.task_lines(), vec!["other"]);
    }

    #[test]
    fn switching_settles_pending_erase() {
        let mut board = board();
        let mut model = TabModel::new();
        let id = board.append_task("finish me", false, 0);
        board.toggle_task(id).unwrap();
        model.create_new(&mut board).unwrap();
        let stored = &model.get("Page 1").unwrap().snapshot;
        assert!(stored.tasks.is_empty());
        assert_eq!(stored.completed.len(), 1);
    }

    #[test]
    fn unknown_tab_is_an_error() {
        let mut board = board();
        let mut model = TabModel::new();
        let result = model.switch_to("Nope", &mut board);
        assert!(matches!(result, Err(StateError::TabNotFound { .. })));
    }

    #[test]
    fn switch_by_wraps_around() {
        let mut board = board();
        let mut model = TabModel::new();
        model.create_new(&mut board).unwrap();
        model.create_new(&mut board).unwrap();
        assert_eq!(model.current_name(), "Page 3");
        model.switch_by(1, &mut board).unwrap();
        assert_eq!(model.current_name(), "Page 1");
        model.switch_by(-1, &mut board).unwrap();
        assert_eq!(model.current_name(), "Page 3");
    }
}
