//! Application state and update logic for the PersonaQuery TUI.

use std::cell::Cell;

use crate::event::Action;
use personaquery_engine::{AnswerResult, Conversation, IgnoreReason, PendingRequest, RequestId};
use tokio::task::JoinError;
use tracing::{debug, error};

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 1;

/// Lines moved per page step.
const PAGE_STEP: usize = 10;

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// The conversation being displayed.
    pub conversation: Conversation,

    /// Base address of the answer service, shown in the status bar.
    pub api_url: String,

    /// Tick counter for animations.
    pub tick: u64,

    /// Lines scrolled up from the newest transcript line. Zero follows the tail.
    pub transcript_scroll: usize,

    /// Largest useful scroll offset, refreshed whenever the transcript is drawn.
    pub(crate) scroll_limit: Cell<usize>,
}

impl App {
    /// Create a new app instance.
    pub fn new(conversation: Conversation, api_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            conversation,
            api_url: api_url.into(),
            tick: 0,
            transcript_scroll: 0,
            scroll_limit: Cell::new(0),
        }
    }

    /// Handle an action.
    ///
    /// Returns the request to dispatch when the action started one.
    pub fn handle_action(&mut self, action: Action) -> Option<PendingRequest> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => return self.begin(Conversation::begin_input),
            Action::QuickPrompt(index) => {
                // Quick prompts are only offered on the landing view
                if self.conversation.show_quick_prompts() {
                    return self.begin(|c| c.begin_quick_prompt(index));
                }
            }
            Action::Newline => self.conversation.input_mut().insert('\n'),
            Action::Insert(ch) => self.conversation.input_mut().insert(ch),
            Action::Backspace => self.conversation.input_mut().backspace(),
            Action::Delete => self.conversation.input_mut().delete(),
            Action::Left => self.conversation.input_mut().move_left(),
            Action::Right => self.conversation.input_mut().move_right(),
            Action::Home => self.conversation.input_mut().move_home(),
            Action::End => self.conversation.input_mut().move_end(),
            Action::ScrollUp => self.scroll_up(SCROLL_STEP),
            Action::ScrollDown => self.scroll_down(SCROLL_STEP),
            Action::PageUp => self.scroll_up(PAGE_STEP),
            Action::PageDown => self.scroll_down(PAGE_STEP),
            Action::None => {}
        }
        None
    }

    fn begin(
        &mut self,
        start: impl FnOnce(&mut Conversation) -> Result<PendingRequest, IgnoreReason>,
    ) -> Option<PendingRequest> {
        match start(&mut self.conversation) {
            Ok(request) => {
                self.transcript_scroll = 0;
                Some(request)
            }
            Err(reason) => {
                debug!(?reason, "Submission ignored");
                None
            }
        }
    }

    /// Insert pasted text into the input.
    pub fn paste(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.conversation.input_mut().insert_str(&normalized);
    }

    /// Apply the outcome of a finished request task.
    pub fn finish_request(
        &mut self,
        id: RequestId,
        joined: Result<(RequestId, AnswerResult), JoinError>,
    ) {
        match joined {
            Ok((id, result)) => {
                self.conversation.finish_submission(id, result);
            }
            Err(e) => {
                error!(request_id = id, error = %e, "Request task failed");
                self.conversation
                    .abandon_submission(id, &format!("request task failed: {e}"));
            }
        }
    }

    /// Scroll the transcript towards older messages.
    pub fn scroll_up(&mut self, lines: usize) {
        self.transcript_scroll = self
            .transcript_scroll
            .saturating_add(lines)
            .min(self.scroll_limit.get());
    }

    /// Scroll the transcript towards newer messages.
    pub fn scroll_down(&mut self, lines: usize) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }

    /// Increment tick counter.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Create an app backed by a gateway that always answers "Test answer".
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        use personaquery_engine::Config;
        use std::sync::Arc;

        let conversation = Conversation::new(
            Arc::new(crate::test_utils::StubGateway::default()),
            Config::default().quick_prompts,
        );
        Self::new(conversation, "http://127.0.0.1:8000")
    }
}
