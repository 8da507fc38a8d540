//! Conversation controller.
//!
//! [`Conversation`] owns everything that changes during a session: the
//! transcript, the input buffer, the in-flight request and the last error.
//! A question moves through `IDLE -> PENDING -> IDLE`; at most one request is
//! ever outstanding and submissions made while one is pending are absorbed.
//!
//! Two ways to drive it:
//! - [`Conversation::submit_question`] runs the whole lifecycle in one future.
//! - [`Conversation::begin_submission`] / [`Conversation::finish_submission`]
//!   split it around a [`PendingRequest`] so an event loop can keep drawing
//!   while the answer is awaited.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::gateway::{AnswerGateway, AnswerResult, HttpGateway};
use crate::input::InputBuffer;
use crate::message::{Message, Transcript};
use crate::view::{self, TranscriptView};

/// Assistant text used when the service replied without a usable answer.
pub const NO_ANSWER_NOTICE: &str =
    "I didn't get an answer back from the service. Check the backend logs for /chat.";

/// Assistant text used when the request failed. The details go to the status line.
pub const NETWORK_ERROR_NOTICE: &str =
    "⚠️ API error. Please check that the answer service is running and reachable, \
     and confirm PERSONAQUERY_API_URL.";

/// Identifier of one accepted submission.
pub type RequestId = u64;

/// How a question was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOrigin {
    /// Typed by the user.
    Manual,
    /// One of the pre-authored quick prompts.
    QuickPrompt,
}

/// Why a submission was absorbed without any effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing but whitespace to send.
    EmptyQuestion,
    /// Another request is still in flight.
    RequestPending,
    /// No quick prompt at the requested position.
    UnknownQuickPrompt,
}

/// How a resolved request was reconciled into the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The service's answer was appended.
    Answered,
    /// The service replied without answer text; the no-answer notice was appended.
    EmptyAnswer,
    /// The request failed; the error notice was appended and the status line set.
    Failed,
}

/// Result of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No state changed.
    Ignored(IgnoreReason),
    /// The question was sent and its outcome recorded.
    Resolved(Resolution),
}

/// An accepted question waiting for the gateway.
///
/// Owns everything it needs, so [`PendingRequest::resolve`] can run on a
/// spawned task while the conversation keeps rendering.
pub struct PendingRequest {
    id: RequestId,
    question: String,
    gateway: Arc<dyn AnswerGateway>,
}

impl PendingRequest {
    /// Identifier to hand back to [`Conversation::finish_submission`].
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// The trimmed question being asked.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Perform the remote call.
    pub async fn resolve(self) -> (RequestId, AnswerResult) {
        let result = self.gateway.ask(&self.question).await;
        (self.id, result)
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("id", &self.id)
            .field("question", &self.question)
            .finish_non_exhaustive()
    }
}

/// State of one conversation session.
pub struct Conversation {
    gateway: Arc<dyn AnswerGateway>,
    transcript: Transcript,
    input: InputBuffer,
    in_flight: Option<RequestId>,
    last_error: Option<String>,
    quick_prompts: Vec<String>,
    next_request_id: RequestId,
}

impl Conversation {
    /// Start an idle session with an empty transcript.
    pub fn new(gateway: Arc<dyn AnswerGateway>, quick_prompts: Vec<String>) -> Self {
        Self {
            gateway,
            transcript: Transcript::new(),
            input: InputBuffer::new(),
            in_flight: None,
            last_error: None,
            quick_prompts,
            next_request_id: 1,
        }
    }

    /// Start a session against the HTTP answer service described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(HttpGateway::new(config)),
            config.quick_prompts.clone(),
        )
    }

    /// Transcript messages in chronological order.
    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// The transcript itself.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether a request is in flight.
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Description of the most recent failure, if it has not been cleared.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The question being composed.
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// Edit the question being composed.
    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    /// Pre-authored questions.
    pub fn quick_prompts(&self) -> &[String] {
        &self.quick_prompts
    }

    /// Quick prompts are offered only before the first message.
    pub fn show_quick_prompts(&self) -> bool {
        self.transcript.is_empty() && !self.quick_prompts.is_empty()
    }

    /// Whether a manual submission would currently be accepted.
    pub fn can_send(&self) -> bool {
        !self.is_pending() && self.input.has_question()
    }

    /// Run one question through the full lifecycle.
    ///
    /// The pending flag is released on every exit path. If this future is
    /// dropped before the gateway resolves, the request is recorded as failed
    /// so the user turn still gets its paired assistant turn.
    pub async fn submit_question(&mut self, text: &str, origin: PromptOrigin) -> SubmitOutcome {
        let request = match self.begin_submission(text, origin) {
            Ok(request) => request,
            Err(reason) => return SubmitOutcome::Ignored(reason),
        };

        let mut guard = InFlightGuard {
            id: request.id(),
            conversation: self,
        };
        let (_, result) = request.resolve().await;
        SubmitOutcome::Resolved(guard.conversation.reconcile(result))
    }

    /// Submit the contents of the input buffer.
    pub async fn submit_input(&mut self) -> SubmitOutcome {
        let text = self.input.content().to_string();
        self.submit_question(&text, PromptOrigin::Manual).await
    }

    /// Submit the quick prompt at `index`.
    pub async fn submit_quick_prompt(&mut self, index: usize) -> SubmitOutcome {
        let Some(text) = self.quick_prompts.get(index).cloned() else {
            return SubmitOutcome::Ignored(IgnoreReason::UnknownQuickPrompt);
        };
        self.submit_question(&text, PromptOrigin::QuickPrompt).await
    }

    /// Accept a question and mark it pending, without calling the gateway.
    ///
    /// On success the user message is already in the transcript and the input
    /// buffer is cleared. Rejections leave every piece of state untouched.
    pub fn begin_submission(
        &mut self,
        text: &str,
        origin: PromptOrigin,
    ) -> Result<PendingRequest, IgnoreReason> {
        let question = text.trim();
        if question.is_empty() {
            debug!(?origin, "Ignoring empty question");
            return Err(IgnoreReason::EmptyQuestion);
        }
        if let Some(in_flight) = self.in_flight {
            debug!(?origin, in_flight, "Ignoring question while a request is pending");
            return Err(IgnoreReason::RequestPending);
        }

        let id = self.next_request_id;
        self.next_request_id += 1;

        self.last_error = None;
        self.in_flight = Some(id);
        self.transcript.push(Message::user(question));
        self.input.clear();

        info!(request_id = id, ?origin, "Dispatching question");
        Ok(PendingRequest {
            id,
            question: question.to_string(),
            gateway: Arc::clone(&self.gateway),
        })
    }

    /// [`Conversation::begin_submission`] for the input buffer.
    pub fn begin_input(&mut self) -> Result<PendingRequest, IgnoreReason> {
        let text = self.input.content().to_string();
        self.begin_submission(&text, PromptOrigin::Manual)
    }

    /// [`Conversation::begin_submission`] for the quick prompt at `index`.
    pub fn begin_quick_prompt(&mut self, index: usize) -> Result<PendingRequest, IgnoreReason> {
        let text = self
            .quick_prompts
            .get(index)
            .cloned()
            .ok_or(IgnoreReason::UnknownQuickPrompt)?;
        self.begin_submission(&text, PromptOrigin::QuickPrompt)
    }

    /// Record the outcome of the in-flight request and return to idle.
    ///
    /// Results for any other request id are discarded, so a submission never
    /// gets two assistant turns.
    pub fn finish_submission(&mut self, id: RequestId, result: AnswerResult) -> Option<Resolution> {
        if self.in_flight != Some(id) {
            warn!(
                request_id = id,
                in_flight = ?self.in_flight,
                "Discarding result for a request that is not in flight"
            );
            return None;
        }
        Some(self.reconcile(result))
    }

    /// Close out a request whose task ended without producing a result.
    pub fn abandon_submission(&mut self, id: RequestId, reason: &str) -> Option<Resolution> {
        self.finish_submission(id, AnswerResult::failed(reason))
    }

    /// Display list for the current state.
    pub fn render_transcript(&self) -> TranscriptView {
        view::project(
            self.transcript.messages(),
            self.is_pending(),
            self.last_error.as_deref(),
        )
    }

    fn reconcile(&mut self, result: AnswerResult) -> Resolution {
        let id = self.in_flight.take();

        match result {
            AnswerResult::Answered { text, sources } if text.trim().is_empty() => {
                info!(request_id = ?id, "Service returned no answer text");
                self.transcript
                    .push(Message::assistant(NO_ANSWER_NOTICE, sources));
                Resolution::EmptyAnswer
            }
            AnswerResult::Answered { text, sources } => {
                info!(
                    request_id = ?id,
                    sources = sources.as_ref().map_or(0, Vec::len),
                    "Answer received"
                );
                self.transcript.push(Message::assistant(text, sources));
                Resolution::Answered
            }
            AnswerResult::Failed { description } => {
                warn!(request_id = ?id, error = %description, "Question failed");
                self.last_error = Some(description);
                self.transcript
                    .push(Message::assistant(NETWORK_ERROR_NOTICE, None));
                Resolution::Failed
            }
        }
    }
}

impl std::fmt::Debug for Conversation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conversation")
            .field("transcript", &self.transcript)
            .field("input", &self.input)
            .field("in_flight", &self.in_flight)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

/// Releases the pending state if a [`Conversation::submit_question`] future
/// is dropped mid-request.
struct InFlightGuard<'a> {
    id: RequestId,
    conversation: &'a mut Conversation,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.conversation.in_flight == Some(self.id) {
            self.conversation
                .abandon_submission(self.id, "request cancelled before the service replied");
        }
    }
}
