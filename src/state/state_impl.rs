use super::error::StateError;
use super::navigation::{AssistKind, Flow, Gesture, Mode};
use super::tabs::TabModel;
use super::typing::TypingSession;
use crate::app::AssistEventSender;
use crate::assist::{AssistError, AssistReply, Assistant};
use crate::canvas::{
    slot_at, Binding, Board, PinOutcome, PostitPart, TaskPart, Toggle, POSTIT_HEIGHT,
    POSTIT_WIDTH,
};
use crate::events::assist::Event as AssistEvent;
use crate::persistence::{PersistenceError, TaskFile, TaskRecord};
use crate::ui::Areas;
use crate::utils::text_processing::{parse_task_lines, sanitize_task_text};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::*;
use ratatui::layout::Rect;
use std::time::Duration;
use tui_textarea::{CursorMove, TextArea};

/// Number of post-it colours cycled through when composing.
///
pub const NOTE_COLORS: u8 = 4;

/// Assistant output shown in the side panel.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssistPanel {
    /// Request currently awaiting an answer.
    pub pending: Option<AssistKind>,
    /// Last reply or error, shown verbatim.
    pub reply: Option<String>,
    /// Task lines of a cleanup reply awaiting apply or discard.
    pub proposal: Option<Vec<String>>,
}

/// Houses data representative of application state. Every mutation of the
/// board happens through this type on the UI thread; the assist worker only
/// hands results in through `set_assist_result`.
///
pub struct State {
    board: Board,
    typing: TypingSession,
    tabs: TabModel,
    task_file: Option<TaskFile>,
    assist_sender: Option<AssistEventSender>,
    mode: Mode,
    prompt: TextArea<'static>,
    next_note_color: u8,
    assist: AssistPanel,
    status: Option<String>,
    show_log: bool,
    terminal_size: Rect,
    areas: Areas,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State::new(Board::new(Default::default(), false), None, None)
    }
}

impl State {
    /// Return new state around the board, persisting to `task_file` and
    /// sending assistant requests over `assist_sender` when given.
    ///
    pub fn new(board: Board, task_file: Option<TaskFile>, assist_sender: Option<AssistEventSender>) -> Self {
        State {
            board,
            typing: TypingSession::new(),
            tabs: TabModel::new(),
            task_file,
            assist_sender,
            mode: Mode::Canvas,
            prompt: TextArea::default(),
            next_note_color: 0,
            assist: AssistPanel::default(),
            status: None,
            show_log: false,
            terminal_size: Rect::default(),
            areas: Areas::default(),
        }
    }

    /// Load the task file into the current tab. Returns the number of tasks.
    ///
    pub fn load_tasks(&mut self) -> Result<usize, PersistenceError> {
        let Some(file) = &self.task_file else {
            return Ok(0);
        };
        let records = file.load()?;
        for record in &records {
            self.board.append_task(&record.text, record.done, record.priority);
        }
        Ok(records.len())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn typing(&self) -> &TypingSession {
        &self.typing
    }

    pub fn tabs(&self) -> &TabModel {
        &self.tabs
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn prompt_mut(&mut self) -> &mut TextArea<'static> {
        &mut self.prompt
    }

    pub fn assist(&self) -> &AssistPanel {
        &self.assist
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_log_shown(&self) -> bool {
        self.show_log
    }

    pub fn areas(&self) -> &Areas {
        &self.areas
    }

    pub fn dark_mode(&self) -> bool {
        self.board.dark_mode()
    }

    /// Adopt the terminal size and resize the canvas when its area changed.
    ///
    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self.refresh_areas();
        self
    }

    fn refresh_areas(&mut self) {
        let names = self.tabs.names();
        let areas = Areas::compute(self.terminal_size, &names, self.show_log, self.mode != Mode::Canvas);
        let resized = areas.canvas.width != self.areas.canvas.width
            || areas.canvas.height != self.areas.canvas.height;
        self.areas = areas;
        if resized {
            self.board
                .resize(self.areas.canvas.width as i32, self.areas.canvas.height as i32);
            self.relocate_typing();
        }
    }

    /// Route one gesture. Returns whether the event loop should go on.
    ///
    pub fn handle_gesture(&mut self, gesture: Gesture) -> Flow {
        if matches!(gesture, Gesture::Key(_) | Gesture::PrimaryDown { .. }) {
            self.status = None;
        }
        match gesture {
            Gesture::PrimaryDown { x, y } => self.primary_down(x, y),
            Gesture::PrimaryDrag { x, y } => {
                if self.board.is_dragging() {
                    self.board.drag_to(self.areas.relative(x, y));
                }
            }
            Gesture::PrimaryUp { .. } => {
                if let Some(id) = self.board.end_drag() {
                    debug!("Dropped post-it {:?}.", id);
                }
            }
            Gesture::SecondaryClick { x, y } => {
                if self.board.is_placing() {
                    let (gx, gy) = ghost_origin(self.areas.relative(x, y));
                    self.board.commit_placement(gx, gy);
                }
            }
            Gesture::PointerMove { x, y } => {
                if self.board.is_placing() {
                    let (gx, gy) = ghost_origin(self.areas.relative(x, y));
                    self.board.move_ghost_to(gx, gy);
                }
            }
            Gesture::Resize { width, height } => {
                self.set_terminal_size(Rect::new(0, 0, width, height));
            }
            Gesture::Key(key) => {
                return match self.mode {
                    Mode::Canvas => self.canvas_key(key),
                    Mode::Compose | Mode::Ask => {
                        self.prompt_key(key);
                        Flow::Continue
                    }
                };
            }
        }
        Flow::Continue
    }

    /// Advance animations and the caret by the elapsed time, apply animation
    /// completions and pick up new log lines.
    ///
    pub fn on_tick(&mut self, elapsed: Duration) {
        let mut removed = false;
        for completion in self.board.advance(elapsed) {
            match completion {
                crate::animation::Completion::TaskErased(_) => removed = true,
                crate::animation::Completion::SlideFinished { on } => {
                    info!("Switched to the {} theme.", if on { "dark" } else { "light" });
                }
                crate::animation::Completion::PostitLanded(_) => {}
            }
        }
        if removed {
            self.save();
            self.relocate_typing();
        }
        self.typing.advance(self.board.renderer_mut(), elapsed);
        crate::logger::collect();
    }

    fn primary_down(&mut self, x: u16, y: u16) {
        if let Some(name) = self.areas.tab_at(x, y).map(str::to_owned) {
            self.switch_tab(&name);
            return;
        }
        let Some((cx, cy)) = self.areas.canvas_point(x, y) else {
            self.cancel_typing();
            return;
        };
        match self.board.hit_test(cx, cy) {
            Some(binding) => {
                self.cancel_typing();
                self.apply_binding(binding, (cx, cy));
            }
            None => self.start_typing_at(cy),
        }
    }

    fn apply_binding(&mut self, binding: Binding, point: (i32, i32)) {
        match binding {
            Binding::Task(id, TaskPart::Toggle) => match self.board.toggle_task(id) {
                Ok(Toggle::Busy) => {}
                Ok(_) => self.save(),
                Err(e) => self.report(StateError::from(e)),
            },
            Binding::Task(id, TaskPart::Priority) => match self.board.cycle_priority(id) {
                Ok(_) => self.save(),
                Err(e) => self.report(StateError::from(e)),
            },
            Binding::Postit(id, PostitPart::Pin) => match self.board.toggle_pin(id) {
                Ok(PinOutcome::NoTasks) => self.status = Some("No task to pin to".to_string()),
                Ok(outcome) => debug!("Pin toggled on {:?}: {:?}.", id, outcome),
                Err(e) => self.report(StateError::from(e)),
            },
            Binding::Postit(id, PostitPart::Delete) => {
                if let Err(e) = self.board.delete_postit(id) {
                    self.report(StateError::from(e));
                }
            }
            Binding::Postit(id, PostitPart::Body) => {
                if let Err(e) = self.board.start_drag(id, point) {
                    self.report(StateError::from(e));
                }
            }
            Binding::ThemeToggle => {
                self.board.toggle_theme();
            }
        }
    }

    fn start_typing_at(&mut self, y: i32) {
        let next = self.board.next_slot();
        if slot_at(y) != Some(next) {
            self.cancel_typing();
            return;
        }
        if self.typing.slot() != Some(next) {
            self.typing.start(self.board.renderer_mut(), next);
        }
    }

    fn cancel_typing(&mut self) {
        if self.typing.cancel(self.board.renderer_mut()) {
            debug!("Typing session cancelled.");
        }
    }

    fn relocate_typing(&mut self) {
        let next = self.board.next_slot();
        self.typing.relocate(self.board.renderer_mut(), next);
    }

    fn canvas_key(&mut self, key: KeyEvent) -> Flow {
        let plain = !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        if self.typing.is_active() {
            match key.code {
                KeyCode::Enter => self.confirm_typing(),
                KeyCode::Backspace => {
                    self.typing.delete_last(self.board.renderer_mut());
                }
                KeyCode::Esc => self.cancel_typing(),
                KeyCode::Char(c) if plain => {
                    self.typing.input_char(self.board.renderer_mut(), c);
                }
                _ => {}
            }
            return Flow::Continue;
        }
        if key.code == KeyCode::Esc && self.board.is_placing() {
            self.board.cancel_preview();
            return Flow::Continue;
        }
        if !plain {
            return Flow::Continue;
        }
        match key.code {
            KeyCode::Char('q') => return Flow::Exit,
            KeyCode::Char('n') => self.open_prompt(Mode::Compose),
            KeyCode::Char('a') => self.open_prompt(Mode::Ask),
            KeyCode::Char('t') => self.new_tab(),
            KeyCode::Char('[') => self.switch_tab_by(-1),
            KeyCode::Char(']') => self.switch_tab_by(1),
            KeyCode::Char('c') => self.request_cleanup(),
            KeyCode::Char('y') => self.apply_proposal(),
            KeyCode::Char('x') => self.discard_proposal(),
            KeyCode::Char('m') => {
                self.board.toggle_theme();
            }
            KeyCode::Char('l') => {
                self.show_log = !self.show_log;
                self.refresh_areas();
            }
            _ => {}
        }
        Flow::Continue
    }

    fn confirm_typing(&mut self) {
        if let Some(text) = self.typing.confirm(self.board.renderer_mut()) {
            let text = sanitize_task_text(&text);
            self.board.append_task(&text, false, 0);
            self.save();
        }
    }

    fn open_prompt(&mut self, mode: Mode) {
        self.cancel_typing();
        self.prompt = TextArea::default();
        self.mode = mode;
        self.refresh_areas();
    }

    fn close_prompt(&mut self) {
        self.mode = Mode::Canvas;
        self.refresh_areas();
    }

    fn prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let text = sanitize_task_text(&self.prompt.lines().join(" "));
                let mode = self.mode;
                self.close_prompt();
                if text.is_empty() {
                    return;
                }
                match mode {
                    Mode::Compose => self.compose_postit(&text),
                    Mode::Ask => self.ask(&text),
                    Mode::Canvas => {}
                }
            }
            KeyCode::Esc => self.close_prompt(),
            KeyCode::Backspace => {
                self.prompt.delete_char();
            }
            KeyCode::Left => self.prompt.move_cursor(CursorMove::Back),
            KeyCode::Right => self.prompt.move_cursor(CursorMove::Forward),
            KeyCode::Home => self.prompt.move_cursor(CursorMove::Head),
            KeyCode::End => self.prompt.move_cursor(CursorMove::End),
            KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.prompt.insert_char(c);
            }
            _ => {}
        }
    }

    fn compose_postit(&mut self, text: &str) {
        let color = self.next_note_color;
        self.next_note_color = (self.next_note_color + 1) % NOTE_COLORS;
        self.board.create_preview(text, color);
        self.status = Some("Move to place the note, right-click to drop it, Esc to discard".to_string());
    }

    fn new_tab(&mut self) {
        self.cancel_typing();
        match self.tabs.create_new(&mut self.board) {
            Ok(name) => {
                info!("Created tab '{}'.", name);
                self.after_tab_switch();
            }
            Err(e) => self.report(e),
        }
    }

    fn switch_tab(&mut self, name: &str) {
        self.cancel_typing();
        match self.tabs.switch_to(name, &mut self.board) {
            Ok(true) => self.after_tab_switch(),
            Ok(false) => {}
            Err(e) => self.report(e),
        }
    }

    fn switch_tab_by(&mut self, offset: isize) {
        self.cancel_typing();
        match self.tabs.switch_by(offset, &mut self.board) {
            Ok(true) => self.after_tab_switch(),
            Ok(false) => {}
            Err(e) => self.report(e),
        }
    }

    fn after_tab_switch(&mut self) {
        self.assist.proposal = None;
        self.refresh_areas();
        self.save();
    }

    fn ask(&mut self, message: &str) {
        let request = Assistant::chat_request(self.board.task_lines(), message);
        self.send_assist(AssistEvent::Chat(request));
    }

    fn request_cleanup(&mut self) {
        let request = Assistant::cleanup_request(self.board.task_lines());
        self.send_assist(AssistEvent::Cleanup(request));
    }

    fn send_assist(&mut self, event: AssistEvent) {
        if self.assist.pending.is_some() {
            self.status = Some("Assistant is still answering".to_string());
            return;
        }
        let kind = event.kind();
        let sent = match &self.assist_sender {
            Some(sender) => sender.send(event).map_err(|_| StateError::AssistOffline),
            None => Err(StateError::AssistOffline),
        };
        match sent {
            Ok(()) => {
                self.assist.pending = Some(kind);
                self.assist.reply = None;
            }
            Err(e) => {
                self.assist.reply = Some(e.to_string());
                self.report(e);
            }
        }
    }

    /// Store the assistant's answer. Cleanup replies become a proposal of task
    /// lines; errors are shown as text.
    ///
    pub fn set_assist_result(&mut self, kind: AssistKind, result: Result<AssistReply, AssistError>) {
        self.assist.pending = None;
        match result {
            Ok(AssistReply { reply }) => {
                if kind == AssistKind::Cleanup {
                    let lines = parse_task_lines(&reply);
                    self.assist.proposal = if lines.is_empty() { None } else { Some(lines) };
                }
                self.assist.reply = Some(reply);
            }
            Err(e) => {
                self.assist.reply = Some(e.to_string());
            }
        }
    }

    fn apply_proposal(&mut self) {
        let Some(lines) = self.assist.proposal.take() else {
            return;
        };
        self.cancel_typing();
        self.board.replace_tasks(&lines);
        info!("Applied cleanup proposal with {} task(s).", lines.len());
        self.save();
    }

    fn discard_proposal(&mut self) {
        if self.assist.proposal.take().is_some() {
            debug!("Discarded cleanup proposal.");
        }
    }

    /// Write the current tab's tasks to the task file. Failures are reported
    /// in the status line.
    ///
    fn save(&mut self) {
        let Some(file) = &self.task_file else {
            return;
        };
        let records: Vec<TaskRecord> = self.board.tasks().snapshot().iter().map(TaskRecord::from).collect();
        if let Err(e) = file.save(&records) {
            self.report(e);
        }
    }

    fn report<E: std::fmt::Display>(&mut self, error: E) {
        error!("{}", error);
        self.status = Some(error.to_string());
    }
}

/// Top-left corner of a note centred on the pointer.
///
fn ghost_origin((x, y): (i32, i32)) -> (i32, i32) {
    (x - POSTIT_WIDTH / 2, y - POSTIT_HEIGHT / 2)
}
