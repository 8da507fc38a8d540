//! personaquery-tui: Terminal UI for the PersonaQuery client
//!
//! This crate provides the interactive front end:
//! - Landing view with quick prompts
//! - Scrollable transcript with sources and a thinking indicator
//! - Multi-line question input

mod app;
mod conversation;
mod event;
#[cfg(test)]
pub mod test_utils;
mod text;
mod ui;

pub use app::App;
pub use event::{key_to_action, Action, Event, EventHandler};
pub use personaquery_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        KeyboardEnhancementFlags, MouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use personaquery_engine::{AnswerResult, Config, Conversation, RequestId};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// RAII guard for terminal state restoration.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(
            stdout(),
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen,
            ShowCursor
        );
    }
}

/// A request running on the runtime.
type ChatTask = (RequestId, JoinHandle<(RequestId, AnswerResult)>);

/// Run the TUI application.
///
/// Sets up the terminal, runs the event loop, and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    // Shift+Enter is only distinguishable with the enhanced keyboard protocol
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    let _guard = TerminalGuard { keyboard_enhanced };

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Conversation::from_config(config), config.api_url.clone());
    info!(api_url = %config.api_url, "Starting TUI");

    // 4 Hz tick rate drives the spinner
    let mut events = EventHandler::new(250);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chat_task: Option<ChatTask> = None;

    loop {
        terminal.draw(|frame| ui::render(app, frame.area(), frame.buffer_mut()))?;

        if let Some(event) = events.next().await {
            let action = match event {
                Event::Key(key) => key_to_action(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => Action::ScrollUp,
                    MouseEventKind::ScrollDown => Action::ScrollDown,
                    _ => Action::None,
                },
                Event::Paste(text) => {
                    app.paste(&text);
                    Action::None
                }
                Event::Tick => {
                    app.tick();
                    Action::None
                }
                // Terminal will handle resize automatically
                Event::Resize(_, _) => Action::None,
            };

            if let Some(request) = app.handle_action(action) {
                let id = request.id();
                debug!(request_id = id, "Spawning chat request");
                chat_task = Some((id, tokio::spawn(request.resolve())));
            }
        }

        // Collect a finished request (non-blocking)
        if chat_task
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_finished())
        {
            if let Some((id, handle)) = chat_task.take() {
                app.finish_request(id, handle.await);
            }
        }

        if app.should_quit {
            if let Some((id, handle)) = chat_task.take() {
                debug!(request_id = id, "Aborting chat request on quit");
                handle.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Get the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}


#[cfg(test)]
mod flow_tests {
    use super::*;
    use crate::test_utils::render_app_to_string;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(app: &mut App, code: KeyCode) -> Option<personaquery_engine::PendingRequest> {
        app.handle_action(key_to_action(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[tokio::test]
    async fn test_typed_question_round_trip() {
        let mut app = App::new_for_test();
        for ch in "Who are you?".chars() {
            assert!(press(&mut app, KeyCode::Char(ch)).is_none());
        }
        let request = press(&mut app, KeyCode::Enter).expect("request started");

        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains("Who are you?"));
        assert!(screen.contains("Thinking..."));

        // A second Enter while pending does nothing
        assert!(press(&mut app, KeyCode::Enter).is_none());

        let id = request.id();
        let handle = tokio::spawn(request.resolve());
        app.finish_request(id, handle.await);

        let screen = render_app_to_string(&app, 80, 24);
        assert!(screen.contains("Test answer"));
        assert!(!screen.contains("Thinking..."));
        assert_eq!(app.conversation.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_function_key_sends_quick_prompt() {
        let mut app = App::new_for_test();
        let request = press(&mut app, KeyCode::F(3)).expect("quick prompt sent");
        assert_eq!(request.question(), "Key strengths (ATS)");

        let id = request.id();
        app.finish_request(id, tokio::spawn(request.resolve()).await);
        assert_eq!(app.conversation.messages()[1].content, "Test answer");
    }
}
