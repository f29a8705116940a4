use crate::assist::Assistant;
use crate::canvas::{Board, Viewport};
use crate::config::Config;
use crate::error::AppError;
use crate::events::assist::{Event as AssistEvent, Handler as AssistEventHandler};
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::logger;
use crate::persistence::TaskFile;
use crate::state::State;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type AssistEventSender = std::sync::mpsc::Sender<AssistEvent>;
type AssistEventReceiver = std::sync::mpsc::Receiver<AssistEvent>;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        logger::init(LevelFilter::Debug)?;

        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<AssistEvent>();
        let board = Board::new(Viewport::default(), config.dark_mode());
        let mut state = State::new(board, Some(TaskFile::new(&config.tasks_file)), Some(tx));
        match state.load_tasks() {
            Ok(count) => info!("Loaded {} task(s) from {}.", count, config.tasks_file.display()),
            Err(e) => error!("{}", e),
        }

        let mut app = App {
            state: Arc::new(Mutex::new(state)),
            config,
        };
        app.start_assist(rx)?;
        app.start_ui().await?;

        // Save theme on exit
        {
            let state = app.state.lock().await;
            app.config.set_dark_mode(state.dark_mode());
            if let Err(e) = app.config.save() {
                error!("Failed to save config on exit: {}", e);
            }
        }

        info!("Exiting application...");
        Ok(())
    }

    /// Start a separate thread answering assist requests.
    ///
    fn start_assist(&self, assist_receiver: AssistEventReceiver) -> Result<()> {
        debug!("Creating new thread for the assist worker...");
        let cloned_state = Arc::clone(&self.state);
        let settings = self.config.assist.clone();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| AppError::RuntimeCreation(e.to_string()))?;
        std::thread::spawn(move || {
            runtime.block_on(async {
                let mut assist_event_handler =
                    AssistEventHandler::new(&cloned_state, Assistant::new(&settings));
                while let Ok(assist_event) = assist_receiver.recv() {
                    assist_event_handler.handle(assist_event).await;
                }
            })
        });
        Ok(())
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let terminal_event_handler = TerminalEventHandler::new(self.config.tick_rate());
        let outcome = loop {
            let mut state = self.state.lock().await;
            if let Ok(size) = terminal.backend().size() {
                state.set_terminal_size(size);
            };
            if let Err(e) = terminal.draw(|frame| crate::ui::render(frame, &mut state)) {
                break Err(e.into());
            }
            match terminal_event_handler.handle_next(&mut state) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Received application exit request.");
                    break Ok(());
                }
                Err(e) => break Err(e),
            }
        };

        disable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;

        outcome
    }
}
