use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::{
    constants::{self, messages},
    errors::AppResult,
    models::domain::{Answer, Attempt, Session, SessionState},
    repositories::{AttemptRecorder, QuestionRepository, SessionStore},
    services::{messenger::Messenger, scorer, selector},
};

/// Outcome of one pipeline step: either the message has been fully handled,
/// or the next step should run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Done,
    Continue,
}

/// Drives the per-participant conversation. Each inbound message runs the
/// same pipeline against the loaded session: start, record, then
/// dispatch-or-score. The session is persisted exactly once at the end and
/// the queued replies are delivered afterwards.
///
/// At-most-one-in-flight message per participant is assumed, not enforced;
/// concurrent deliveries for the same sender can lose an update.
pub struct ConversationService {
    sessions: Arc<dyn SessionStore>,
    questions: Arc<dyn QuestionRepository>,
    attempts: Arc<dyn AttemptRecorder>,
    messenger: Arc<dyn Messenger>,
    session_ttl: Duration,
}

impl ConversationService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        questions: Arc<dyn QuestionRepository>,
        attempts: Arc<dyn AttemptRecorder>,
        messenger: Arc<dyn Messenger>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sessions,
            questions,
            attempts,
            messenger,
            session_ttl,
        }
    }

    /// Processes one inbound message and returns the replies that were sent.
    pub async fn handle_message(&self, sender_id: &str, text: &str) -> AppResult<Vec<String>> {
        let mut session = self.sessions.get(sender_id).await?.unwrap_or_default();
        let mut replies = Vec::new();

        let mut flow = self.apply_start(&mut session, text, &mut replies);
        if flow == Flow::Continue {
            flow = self.record_answer(&mut session, sender_id, text, &mut replies);
        }
        if flow == Flow::Continue {
            self.dispatch_or_score(&mut session, &mut replies).await?;
        }

        self.sessions
            .set(sender_id, &session, self.session_ttl)
            .await?;
        self.deliver(sender_id, &replies).await;
        Ok(replies)
    }

    /// Step 1: a start command from the idle state begins a fresh run. Any
    /// other idle text gets a usage hint; outside idle this step never fires.
    fn apply_start(&self, session: &mut Session, text: &str, replies: &mut Vec<String>) -> Flow {
        if session.state != SessionState::Idle {
            return Flow::Continue;
        }

        let trimmed = text.trim();
        if constants::START_COMMANDS
            .iter()
            .any(|cmd| trimmed.eq_ignore_ascii_case(cmd))
        {
            *session = Session::default();
            session.state = SessionState::Asking;
            replies.push(messages::START_ACK.to_string());
        } else {
            replies.push(messages::IDLE_HINT.to_string());
        }
        Flow::Done
    }

    /// Step 2: grade the pending question. An unparsable or out-of-range
    /// reply leaves the session untouched and re-prompts; a valid reply
    /// appends the answer, hands the attempt to the recorder without waiting
    /// for it, and falls through to dispatch.
    fn record_answer(
        &self,
        session: &mut Session,
        sender_id: &str,
        text: &str,
        replies: &mut Vec<String>,
    ) -> Flow {
        if session.state != SessionState::WaitingAnswer {
            return Flow::Continue;
        }

        let Some(question) = session.current_question.clone() else {
            // A waiting session without a pending question is unrecoverable
            // state; fall back to dispatching.
            session.state = SessionState::Asking;
            return Flow::Continue;
        };

        let option_count = question.options.len();
        let selected = match text.trim().parse::<i16>() {
            Ok(n) if n >= 1 && (n as usize) <= option_count => n,
            _ => {
                replies.push(messages::validation_prompt(option_count));
                return Flow::Done;
            }
        };

        let latency_ms = session
            .question_started_at
            .map(|started| (Utc::now() - started).num_milliseconds().max(0))
            .unwrap_or(0);

        let answer = Answer {
            question_id: question.id.clone(),
            section: question.section.clone(),
            selected_index: selected,
            correct_index: question.correct,
            is_correct: selected == question.correct,
            latency_ms,
        };

        let attempt = Attempt::from_answer(sender_id, &answer);
        let recorder = Arc::clone(&self.attempts);
        tokio::spawn(async move {
            if let Err(err) = recorder.record(attempt).await {
                log::warn!("attempt recording failed (ignored): {}", err);
            }
        });

        session.answers.push(answer);
        session.current_question = None;
        session.question_started_at = None;
        session.state = SessionState::Asking;
        Flow::Continue
    }

    /// Step 3: either ask the next question, skip an exhausted section, or
    /// score the completed run. The section index is consumed eagerly at
    /// dispatch, so a section contributes at most one question per run.
    async fn dispatch_or_score(
        &self,
        session: &mut Session,
        replies: &mut Vec<String>,
    ) -> AppResult<()> {
        if session.state != SessionState::Asking {
            return Ok(());
        }

        let questions = self.questions.fetch_all().await?;

        if session.section_index >= constants::SECTIONS.len() {
            let report = scorer::score(&session.answers, &constants::SECTIONS, &questions);
            replies.push(messages::format_result(&report));
            *session = Session::default();
            return Ok(());
        }

        let section = constants::SECTIONS[session.section_index];
        let asked_ids = session.asked_ids(section);

        match selector::pick_next(&questions, section, &asked_ids) {
            None => {
                session.section_index += 1;
                replies.push(messages::skip_notice(section));
            }
            Some(question) => {
                replies.push(messages::format_question(
                    question,
                    session.section_index + 1,
                    constants::SECTIONS.len(),
                ));
                session.current_question = Some(question.clone());
                session.question_started_at = Some(Utc::now());
                session.state = SessionState::WaitingAnswer;
                session.section_index += 1;
            }
        }
        Ok(())
    }

    async fn deliver(&self, to: &str, replies: &[String]) {
        for text in replies {
            if let Err(err) = self.messenger.send(to, text).await {
                log::warn!("outbound send to '{}' failed: {}", to, err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use crate::models::domain::Question;
    use crate::repositories::question_repository::MockQuestionRepository;
    use crate::repositories::attempt_repository::MockAttemptRecorder;
    use crate::repositories::InMemorySessionStore;
    use crate::services::messenger::MockMessenger;
    use crate::test_utils::fixtures::test_question;

    struct RecordingRecorder {
        attempts: RwLock<Vec<Attempt>>,
    }

    impl RecordingRecorder {
        fn new() -> Self {
            Self {
                attempts: RwLock::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AttemptRecorder for RecordingRecorder {
        async fn record(&self, attempt: Attempt) -> AppResult<()> {
            self.attempts.write().await.push(attempt);
            Ok(())
        }
    }

    fn one_question_per_section() -> Vec<Question> {
        constants::SECTIONS
            .iter()
            .enumerate()
            .map(|(i, section)| test_question(&format!("q{}", i), section, &["a", "b", "c"], 1))
            .collect()
    }

    fn service(
        sessions: Arc<InMemorySessionStore>,
        questions: Vec<Question>,
        attempts: Arc<dyn AttemptRecorder>,
    ) -> ConversationService {
        let mut repo = MockQuestionRepository::new();
        repo.expect_fetch_all()
            .returning(move || Ok(questions.clone()));
        let mut messenger = MockMessenger::new();
        messenger.expect_send().returning(|_, _| Ok(()));
        ConversationService::new(
            sessions,
            Arc::new(repo),
            attempts,
            Arc::new(messenger),
            Duration::from_secs(3600),
        )
    }

    fn ok_attempt_recorder() -> Arc<dyn AttemptRecorder> {
        let mut recorder = MockAttemptRecorder::new();
        recorder.expect_record().returning(|_| Ok(()));
        Arc::new(recorder)
    }

    async fn waiting_session(
        sessions: &InMemorySessionStore,
        sender: &str,
        question: Question,
    ) -> Session {
        let mut session = Session::default();
        session.state = SessionState::WaitingAnswer;
        session.section_index = 1;
        session.current_question = Some(question);
        session.question_started_at = Some(Utc::now());
        sessions
            .set(sender, &session, Duration::from_secs(60))
            .await
            .expect("seed session");
        session
    }

    #[tokio::test]
    async fn idle_non_start_text_gets_hint_and_stays_idle() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let svc = service(sessions.clone(), vec![], ok_attempt_recorder());

        let replies = svc.handle_message("u1", "hello?").await.expect("handle");
        assert_eq!(replies, vec![messages::IDLE_HINT.to_string()]);

        let session = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(session.state, SessionState::Idle);
    }

    #[tokio::test]
    async fn start_command_is_case_insensitive_and_resets_the_run() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let svc = service(sessions.clone(), vec![], ok_attempt_recorder());

        let replies = svc.handle_message("u1", "  START ").await.expect("handle");
        assert_eq!(replies, vec![messages::START_ACK.to_string()]);

        let session = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(session.state, SessionState::Asking);
        assert_eq!(session.section_index, 0);
        assert!(session.answers.is_empty());
    }

    #[tokio::test]
    async fn start_does_not_dispatch_within_the_same_message() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let svc = service(
            sessions.clone(),
            one_question_per_section(),
            ok_attempt_recorder(),
        );

        let replies = svc.handle_message("u1", "start").await.expect("handle");
        assert_eq!(replies.len(), 1);

        // The next message, whatever it says, dispatches the first question.
        let replies = svc.handle_message("u1", "ok").await.expect("handle");
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("Grammar"));

        let session = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(session.state, SessionState::WaitingAnswer);
        assert_eq!(session.section_index, 1);
    }

    #[tokio::test]
    async fn invalid_answer_leaves_session_untouched() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let question = test_question("q1", "Grammar", &["a", "b", "c"], 2);

        let mut recorder = MockAttemptRecorder::new();
        recorder.expect_record().never();
        let svc = service(sessions.clone(), vec![], Arc::new(recorder));

        let before = waiting_session(&sessions, "u1", question).await;

        for text in ["0", "4", "-1", "banana", ""] {
            let replies = svc.handle_message("u1", text).await.expect("handle");
            assert_eq!(replies, vec![messages::validation_prompt(3)]);

            let after = sessions.get("u1").await.expect("get").expect("persisted");
            assert_eq!(after.state, before.state);
            assert_eq!(after.current_question, before.current_question);
            assert_eq!(after.answers, before.answers);
            assert_eq!(after.section_index, before.section_index);
        }
    }

    #[tokio::test]
    async fn valid_answer_is_recorded_and_next_question_dispatched() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let questions = one_question_per_section();
        let recorder = Arc::new(RecordingRecorder::new());
        let svc = service(sessions.clone(), questions.clone(), recorder.clone());

        waiting_session(&sessions, "u1", questions[0].clone()).await;

        let replies = svc.handle_message("u1", "1").await.expect("handle");
        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("Vocabulary"));

        let session = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(session.state, SessionState::WaitingAnswer);
        assert_eq!(session.answers.len(), 1);
        assert!(session.answers[0].is_correct);
        assert_eq!(session.section_index, 2);

        // Attempt logging is fire-and-forget, give the spawned task a beat.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let attempts = recorder.attempts.read().await;
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].user_id, "u1");
        assert_eq!(attempts[0].question_id, "q0");
        assert!(attempts[0].is_correct);
        assert!(attempts[0].latency_ms >= 0);
    }

    #[tokio::test]
    async fn answering_the_last_section_scores_and_resets() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let questions = one_question_per_section();

        let mut session = Session::default();
        session.state = SessionState::WaitingAnswer;
        session.section_index = constants::SECTIONS.len();
        session.current_question = Some(questions[4].clone());
        session.question_started_at = Some(Utc::now());
        for (i, q) in questions.iter().take(4).enumerate() {
            session.answers.push(Answer {
                question_id: q.id.clone(),
                section: constants::SECTIONS[i].to_string(),
                selected_index: 1,
                correct_index: 1,
                is_correct: true,
                latency_ms: 100,
            });
        }
        sessions
            .set("u1", &session, Duration::from_secs(60))
            .await
            .expect("seed");

        let svc = service(sessions.clone(), questions, ok_attempt_recorder());
        let replies = svc.handle_message("u1", "1").await.expect("handle");

        assert_eq!(replies.len(), 1);
        assert!(replies[0].contains("5/5 (100%)"));
        assert!(!replies[0].contains("Areas to review"));

        let after = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(after, Session::default());
    }

    #[tokio::test]
    async fn exhausted_section_is_skipped_without_auto_advancing() {
        let sessions = Arc::new(InMemorySessionStore::new());
        // No Grammar questions at all.
        let questions = vec![test_question("v1", "Vocabulary", &["a", "b"], 1)];

        let mut session = Session::default();
        session.state = SessionState::Asking;
        sessions
            .set("u1", &session, Duration::from_secs(60))
            .await
            .expect("seed");

        let svc = service(sessions.clone(), questions, ok_attempt_recorder());
        let replies = svc.handle_message("u1", "go").await.expect("handle");

        assert_eq!(replies, vec![messages::skip_notice("Grammar")]);

        let after = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(after.state, SessionState::Asking);
        assert_eq!(after.section_index, 1);
        assert!(after.current_question.is_none());
    }

    #[tokio::test]
    async fn start_command_mid_run_is_treated_as_plain_text() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let question = test_question("q1", "Grammar", &["a", "b"], 1);
        let svc = service(sessions.clone(), vec![], ok_attempt_recorder());

        waiting_session(&sessions, "u1", question).await;

        // "start" is not a number, so mid-run it is just an invalid answer.
        let replies = svc.handle_message("u1", "start").await.expect("handle");
        assert_eq!(replies, vec![messages::validation_prompt(2)]);

        let after = sessions.get("u1").await.expect("get").expect("persisted");
        assert_eq!(after.state, SessionState::WaitingAnswer);
    }
}
