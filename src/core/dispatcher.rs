//! Request dispatching for the conversation.
//!
//! A submission is split into two halves so the interactive loop never blocks
//! on the network: [`RequestDispatcher::begin`] validates the text, records
//! the user turn and marks the request in flight, and
//! [`RequestDispatcher::settle`] records the assistant turn once the outcome
//! arrives. [`RequestDispatcher::submit`] runs both halves around a single
//! awaited call for non-interactive callers.

use tracing::{debug, warn};

use super::constants::FALLBACK_MESSAGE;
use super::conversation::ConversationStore;
use super::generation::{GenerateError, TextGenerator};
use super::message::Turn;

/// Ephemeral state of the current request.
#[derive(Debug, Default)]
pub struct RequestState {
    in_flight: bool,
    last_error: Option<String>,
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// A request that has been recorded and now needs its network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: u64,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptyInput,
    InFlight,
}

#[derive(Debug, Default)]
pub struct RequestDispatcher {
    conversation: ConversationStore,
    state: RequestState,
    next_request_id: u64,
    current_request_id: Option<u64>,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation(&self) -> &ConversationStore {
        &self.conversation
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state.in_flight
    }

    pub fn current_request_id(&self) -> Option<u64> {
        self.current_request_id
    }

    /// Record the user turn for `text` and open a request for it.
    ///
    /// Blank input and submissions made while another request is in flight
    /// are rejected without touching the conversation.
    pub fn begin(&mut self, text: &str) -> Result<PendingRequest, SubmitRejection> {
        if text.trim().is_empty() {
            return Err(SubmitRejection::EmptyInput);
        }
        if self.state.in_flight {
            debug!("Submission rejected while a request is in flight");
            return Err(SubmitRejection::InFlight);
        }

        self.conversation.append(Turn::user(text));
        self.state.in_flight = true;
        self.state.last_error = None;

        self.next_request_id = self.next_request_id.wrapping_add(1);
        let id = self.next_request_id;
        self.current_request_id = Some(id);

        Ok(PendingRequest {
            id,
            prompt: text.to_string(),
        })
    }

    /// Resolve request `id` with its outcome.
    ///
    /// Returns the appended assistant turn, or `None` when `id` is not the
    /// request currently in flight (a stale or duplicate completion).
    pub fn settle(&mut self, id: u64, outcome: Result<String, GenerateError>) -> Option<&Turn> {
        if self.current_request_id != Some(id) {
            debug!(request_id = id, "Ignoring completion for unknown request");
            return None;
        }
        Some(self.record_outcome(id, outcome))
    }

    fn record_outcome(&mut self, id: u64, outcome: Result<String, GenerateError>) -> &Turn {
        let turn = match outcome {
            Ok(output) => Turn::assistant(output),
            Err(err) => {
                warn!(request_id = id, error = %err, "Text generation failed");
                self.state.last_error = Some(err.to_string());
                Turn::assistant(FALLBACK_MESSAGE)
            }
        };

        self.state.in_flight = false;
        self.current_request_id = None;
        self.conversation.append_and_get(turn)
    }

    /// Run a whole submission: record, await `generator`, record the answer.
    pub async fn submit(
        &mut self,
        generator: &dyn TextGenerator,
        text: &str,
    ) -> Result<&Turn, SubmitRejection> {
        let pending = self.begin(text)?;
        let outcome = generator.generate(&pending.prompt).await;
        Ok(self.record_outcome(pending.id, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use crate::utils::test_utils::FakeGenerator;

    #[test]
    fn blank_input_is_ignored() {
        let mut dispatcher = RequestDispatcher::new();
        for text in ["", "   ", "\n\t "] {
            assert_eq!(dispatcher.begin(text), Err(SubmitRejection::EmptyInput));
        }
        assert!(dispatcher.conversation().is_empty());
        assert!(!dispatcher.is_in_flight());
    }

    #[test]
    fn begin_appends_user_turn_and_marks_in_flight() {
        let mut dispatcher = RequestDispatcher::new();
        let pending = dispatcher.begin("hello").expect("accepted");

        assert_eq!(pending.prompt, "hello");
        assert_eq!(dispatcher.conversation().all(), &[Turn::user("hello")]);
        assert!(dispatcher.is_in_flight());
        assert_eq!(dispatcher.current_request_id(), Some(pending.id));
    }

    #[test]
    fn second_submission_while_in_flight_is_rejected() {
        let mut dispatcher = RequestDispatcher::new();
        dispatcher.begin("first").expect("accepted");
        assert_eq!(dispatcher.begin("second"), Err(SubmitRejection::InFlight));
        assert_eq!(dispatcher.conversation().len(), 1);
    }

    #[test]
    fn settle_success_appends_output() {
        let mut dispatcher = RequestDispatcher::new();
        let pending = dispatcher.begin("hello").unwrap();
        let turn = dispatcher
            .settle(pending.id, Ok("Hi there".into()))
            .expect("current request")
            .clone();

        assert_eq!(turn, Turn::assistant("Hi there"));
        assert!(!dispatcher.is_in_flight());
        assert!(dispatcher.state().last_error().is_none());
    }

    #[test]
    fn settle_failure_appends_fallback_and_records_error() {
        let mut dispatcher = RequestDispatcher::new();
        let pending = dispatcher.begin("hello").unwrap();
        dispatcher.settle(pending.id, Err(GenerateError::NoCandidates));

        let last = dispatcher.conversation().last().unwrap();
        assert_eq!(last.role(), Role::Assistant);
        assert_eq!(last.content(), FALLBACK_MESSAGE);
        assert!(!dispatcher.is_in_flight());
        assert_eq!(
            dispatcher.state().last_error(),
            Some("response contained no candidates")
        );
    }

    #[test]
    fn stale_completions_are_dropped() {
        let mut dispatcher = RequestDispatcher::new();
        let pending = dispatcher.begin("hello").unwrap();
        assert!(dispatcher.settle(pending.id + 1, Ok("wrong".into())).is_none());
        assert!(dispatcher.is_in_flight());

        dispatcher.settle(pending.id, Ok("right".into()));
        assert!(dispatcher.settle(pending.id, Ok("again".into())).is_none());
        assert_eq!(dispatcher.conversation().len(), 2);
    }

    #[test]
    fn new_submission_clears_previous_error() {
        let mut dispatcher = RequestDispatcher::new();
        let first = dispatcher.begin("one").unwrap();
        dispatcher.settle(first.id, Err(GenerateError::NoCandidates));
        assert!(dispatcher.state().last_error().is_some());

        dispatcher.begin("two").unwrap();
        assert!(dispatcher.state().last_error().is_none());
    }

    #[tokio::test]
    async fn submit_produces_exactly_one_answer_per_question() {
        let mut dispatcher = RequestDispatcher::new();
        let generator = FakeGenerator::replying("Hi there");

        let turn = dispatcher.submit(&generator, "hello").await.unwrap();
        assert_eq!(turn.content(), "Hi there");

        let roles: Vec<Role> = dispatcher.conversation().all().iter().map(Turn::role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
        assert!(!dispatcher.conversation().has_unanswered_user_turn());
        assert_eq!(generator.prompts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn submit_failure_falls_back() {
        let mut dispatcher = RequestDispatcher::new();
        let generator = FakeGenerator::failing();

        let turn = dispatcher.submit(&generator, "hello").await.unwrap();
        assert_eq!(turn.content(), FALLBACK_MESSAGE);
        assert!(!dispatcher.is_in_flight());
    }

    #[tokio::test]
    async fn blank_submit_never_reaches_generator() {
        let mut dispatcher = RequestDispatcher::new();
        let generator = FakeGenerator::replying("unused");

        assert_eq!(
            dispatcher.submit(&generator, "   ").await.unwrap_err(),
            SubmitRejection::EmptyInput
        );
        assert!(generator.prompts().is_empty());
    }
}
