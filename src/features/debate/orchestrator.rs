//! # Debate Orchestrator
//!
//! Drives one alternating debate between the optimist and pessimist threads:
//! seeding, N turns, then one advice call per persona. Individual turns and
//! advice calls never fail the run; they are replaced with placeholder content.
//! Only the global deadline in [`DebateEngine::run_with_deadline`] ends a run
//! early.
//!
//! - **Version**: 2.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.1.0: Optimist posts a notice after each failed turn
//! - 2.0.0: Two-thread alternation with opponent forwarding and concurrent advice
//! - 1.1.0: Per-turn timeout with best-effort cancellation
//! - 1.0.0: Initial implementation

use async_trait::async_trait;
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::line::{finalize, DebateLine};
use crate::core::{DebateTimedOut, TurnFailure};
use crate::features::backboard::{ThreadId, ThreadProvider};
use crate::features::buffer::BufferedMessage;
use crate::features::personas::Persona;
use crate::features::prompts::{PromptSet, NO_DEBATE_YET};
use crate::features::sessions::UserSession;

/// Timing and length of a debate run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Number of debate lines per run
    pub turns: usize,
    /// Deadline for each completion (turns and advice)
    pub turn_timeout: Duration,
    /// Deadline for the whole run, seeding through advice
    pub analysis_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            turns: 6,
            turn_timeout: Duration::from_secs(30),
            analysis_timeout: Duration::from_secs(300),
        }
    }
}

/// Whose messages are being debated
#[derive(Debug, Clone)]
pub struct DebateSubject {
    pub user_id: String,
    pub username: String,
    pub messages: Vec<BufferedMessage>,
}

/// Everything a completed run hands back to its caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateResult {
    pub transcript: Vec<DebateLine>,
    pub optimist_advice: String,
    pub pessimist_advice: String,
}

impl DebateResult {
    pub fn transcript_text(&self) -> String {
        join_lines(&self.transcript)
    }

    pub fn advice(&self, persona: Persona) -> &str {
        match persona {
            Persona::Optimist => &self.optimist_advice,
            Persona::Pessimist => &self.pessimist_advice,
        }
    }
}

/// Run state, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebatePhase {
    Idle,
    Seeding,
    Turn(usize),
    Advising,
    Done,
}

impl fmt::Display for DebatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebatePhase::Idle => f.write_str("idle"),
            DebatePhase::Seeding => f.write_str("seeding"),
            DebatePhase::Turn(i) => write!(f, "turn {i}"),
            DebatePhase::Advising => f.write_str("advising"),
            DebatePhase::Done => f.write_str("done"),
        }
    }
}

/// Where a run's output goes as soon as it exists
///
/// Implementations swallow their own delivery failures.
#[async_trait]
pub trait DebateSink: Send + Sync {
    /// A finalized debate line, posted as its speaker
    async fn line(&self, line: &DebateLine);

    /// Progress text posted as `persona`
    async fn notice(&self, persona: Persona, text: &str);

    /// A persona's final advice block
    async fn advice(&self, persona: Persona, text: &str);
}

pub struct DebateEngine {
    provider: Arc<dyn ThreadProvider>,
    prompts: PromptSet,
    settings: EngineSettings,
}

impl DebateEngine {
    pub fn new(provider: Arc<dyn ThreadProvider>, prompts: PromptSet, settings: EngineSettings) -> Self {
        Self {
            provider,
            prompts,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run a debate under the global deadline
    ///
    /// On expiry the run future is dropped; in-flight requests are abandoned
    /// and any partial transcript is discarded.
    pub async fn run_with_deadline(
        &self,
        session: &UserSession,
        subject: &DebateSubject,
        sink: &dyn DebateSink,
    ) -> Result<DebateResult, DebateTimedOut> {
        let deadline = self.settings.analysis_timeout;
        timeout(deadline, self.run(session, subject, sink))
            .await
            .map_err(|_| {
                error!(
                    "Debate for {} exceeded the {}s analysis timeout",
                    subject.username,
                    deadline.as_secs()
                );
                DebateTimedOut(deadline)
            })
    }

    /// Run a full debate to completion; always yields N lines and two advice blocks
    pub async fn run(
        &self,
        session: &UserSession,
        subject: &DebateSubject,
        sink: &dyn DebateSink,
    ) -> DebateResult {
        let mut phase = DebatePhase::Idle;
        info!(
            "Starting debate for {} ({} messages, {} turns)",
            subject.username,
            subject.messages.len(),
            self.settings.turns
        );

        self.advance(&mut phase, DebatePhase::Seeding, subject);
        self.seed(session, subject).await;

        let mut transcript: Vec<DebateLine> = Vec::with_capacity(self.settings.turns);
        for turn in 0..self.settings.turns {
            self.advance(&mut phase, DebatePhase::Turn(turn), subject);
            let (line, notice) = self.take_turn(session, turn, &transcript).await;

            self.forward(session, &line).await;
            sink.line(&line).await;
            if let Some(notice) = notice {
                sink.notice(Persona::Optimist, &notice).await;
            }
            transcript.push(line);
        }

        self.advance(&mut phase, DebatePhase::Advising, subject);
        let history = join_lines(&transcript);
        for persona in Persona::ALL {
            sink.notice(persona, &format!("💡 Generating {} advice...", persona.label()))
                .await;
        }
        let (optimist_advice, pessimist_advice) = tokio::join!(
            self.advise(session, Persona::Optimist, &history),
            self.advise(session, Persona::Pessimist, &history),
        );
        sink.advice(Persona::Optimist, &optimist_advice).await;
        sink.advice(Persona::Pessimist, &pessimist_advice).await;

        self.advance(&mut phase, DebatePhase::Done, subject);
        info!("Debate completed for {}", subject.username);

        DebateResult {
            transcript,
            optimist_advice,
            pessimist_advice,
        }
    }

    fn advance(&self, phase: &mut DebatePhase, next: DebatePhase, subject: &DebateSubject) {
        debug!("Debate for {}: {} -> {}", subject.username, phase, next);
        *phase = next;
    }

    /// Prime both threads with role framing and the subject's messages, no completion
    async fn seed(&self, session: &UserSession, subject: &DebateSubject) {
        let context = self.prompts.subject_context(&subject.messages, &subject.username);

        for persona in Persona::ALL {
            let seed = format!(
                "{}\n\n{}",
                self.prompts.setup_prompt(persona, &subject.username),
                context
            );
            if let Err(e) = self
                .provider
                .send(session.thread(persona), &seed, self.settings.turn_timeout, false)
                .await
            {
                warn!("Failed to seed {persona} thread {}: {e}", session.thread(persona));
            }
        }
    }

    async fn take_turn(
        &self,
        session: &UserSession,
        turn: usize,
        transcript: &[DebateLine],
    ) -> (DebateLine, Option<String>) {
        let speaker = Persona::for_turn(turn);
        let history = if transcript.is_empty() {
            NO_DEBATE_YET.to_string()
        } else {
            join_lines(transcript)
        };
        let prompt = self.prompts.turn_prompt(speaker, turn, &history);

        let outcome = self.complete(session.thread(speaker), &prompt).await;
        let notice = outcome.as_ref().err().map(|e| {
            error!("Turn {turn} ({speaker}) failed: {e}");
            turn_failure_notice(turn, e)
        });

        let line = DebateLine {
            speaker,
            text: finalize(outcome, speaker, self.prompts.rules.token_limit),
            turn_index: turn,
        };
        (line, notice)
    }

    /// Mirror a finalized line into the opponent's thread so both threads hold the full exchange
    async fn forward(&self, session: &UserSession, line: &DebateLine) {
        let other = session.thread(line.speaker.opponent());
        let text = format!("The other debater said: {}", line.text);

        if let Err(e) = self
            .provider
            .send(other, &text, self.settings.turn_timeout, false)
            .await
        {
            warn!("Failed to forward turn {} to thread {other}: {e}", line.turn_index);
        }
    }

    async fn advise(&self, session: &UserSession, persona: Persona, history: &str) -> String {
        let prompt = self.prompts.advice_prompt(persona, history);

        match self.complete(session.thread(persona), &prompt).await {
            Ok(advice) if !advice.trim().is_empty() => advice.trim().to_string(),
            Ok(_) => {
                warn!("{persona} advice came back empty, using fallback");
                self.prompts.fallback_advice(persona)
            }
            Err(e) => {
                error!("{persona} advice error: {e}");
                self.prompts.fallback_advice(persona)
            }
        }
    }

    /// One completion under the per-turn deadline; timeouts cancel best-effort
    async fn complete(&self, thread: &ThreadId, prompt: &str) -> Result<String, TurnFailure> {
        let turn_timeout = self.settings.turn_timeout;

        match timeout(turn_timeout, self.provider.send(thread, prompt, turn_timeout, true)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                let failure = TurnFailure::from(e);
                if matches!(failure, TurnFailure::Timeout) {
                    self.cancel(thread).await;
                }
                Err(failure)
            }
            Err(_) => {
                self.cancel(thread).await;
                Err(TurnFailure::Timeout)
            }
        }
    }

    async fn cancel(&self, thread: &ThreadId) {
        if let Err(e) = self.provider.cancel(thread).await {
            warn!("Failed to cancel outstanding request on thread {thread}: {e}");
        }
    }
}

/// Posted by the optimist after a failed turn's placeholder line
fn turn_failure_notice(turn: usize, failure: &TurnFailure) -> String {
    match failure {
        TurnFailure::Timeout => format!("⚠️ Turn {turn} timed out"),
        TurnFailure::Provider(e) => format!("⚠️ Turn {turn} error: {e}"),
    }
}

fn join_lines(lines: &[DebateLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProviderError;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const OPT: &str = "opt-thread";
    const PESS: &str = "pess-thread";

    /// What the scripted provider does for one completion request
    enum Step {
        Reply(&'static str),
        Fail,
        Hang,
    }

    type EventLog = Arc<Mutex<Vec<String>>>;

    struct ScriptedProvider {
        scripts: Mutex<HashMap<String, VecDeque<Step>>>,
        log: EventLog,
        cancels: AtomicUsize,
        fail_cancel: bool,
        fail_append: bool,
    }

    impl ScriptedProvider {
        fn new(log: EventLog) -> Self {
            Self {
                scripts: Mutex::new(HashMap::new()),
                log,
                cancels: AtomicUsize::new(0),
                fail_cancel: false,
                fail_append: false,
            }
        }

        fn script(self, thread: &str, steps: Vec<Step>) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .insert(thread.to_string(), steps.into());
            self
        }
    }

    #[async_trait]
    impl ThreadProvider for ScriptedProvider {
        async fn create_thread(&self, assistant_id: &str) -> Result<ThreadId, ProviderError> {
            Ok(ThreadId::new(assistant_id))
        }

        async fn send(
            &self,
            thread: &ThreadId,
            text: &str,
            _timeout: Duration,
            trigger_completion: bool,
        ) -> Result<String, ProviderError> {
            if !trigger_completion {
                self.log
                    .lock()
                    .unwrap()
                    .push(format!("append:{thread}:{text}"));
                if self.fail_append {
                    return Err(ProviderError::Api {
                        status: 503,
                        body: "unavailable".to_string(),
                    });
                }
                return Ok(String::new());
            }

            let step = {
                self.log.lock().unwrap().push(format!("complete:{thread}"));
                self.scripts
                    .lock()
                    .unwrap()
                    .get_mut(thread.as_str())
                    .and_then(|q| q.pop_front())
            };

            match step {
                Some(Step::Reply(text)) => Ok(text.to_string()),
                Some(Step::Fail) => Err(ProviderError::Api {
                    status: 500,
                    body: "internal".to_string(),
                }),
                Some(Step::Hang) => std::future::pending().await,
                None => Ok("A fair point about consistency.".to_string()),
            }
        }

        async fn cancel(&self, _thread: &ThreadId) -> Result<(), ProviderError> {
            self.cancels.fetch_add(1, Ordering::SeqCst);
            if self.fail_cancel {
                return Err(ProviderError::InvalidArgument("cannot cancel".to_string()));
            }
            Ok(())
        }
    }

    struct RecordingSink {
        log: EventLog,
    }

    #[async_trait]
    impl DebateSink for RecordingSink {
        async fn line(&self, line: &DebateLine) {
            self.log
                .lock()
                .unwrap()
                .push(format!("line:{}:{}", line.turn_index, line.text));
        }

        async fn notice(&self, persona: Persona, text: &str) {
            self.log.lock().unwrap().push(format!("notice:{persona}:{text}"));
        }

        async fn advice(&self, persona: Persona, _text: &str) {
            self.log.lock().unwrap().push(format!("advice:{persona}"));
        }
    }

    fn session() -> UserSession {
        UserSession {
            user_id: "42".to_string(),
            optimist_thread: ThreadId::new(OPT),
            pessimist_thread: ThreadId::new(PESS),
            optimist_assistant_id: "asst_opt".to_string(),
            pessimist_assistant_id: "asst_pess".to_string(),
        }
    }

    fn subject() -> DebateSubject {
        DebateSubject {
            user_id: "42".to_string(),
            username: "alice".to_string(),
            messages: vec![BufferedMessage::new(
                "shipping the feature tonight!",
                "alice",
                "42",
                chrono::Utc::now(),
            )],
        }
    }

    fn engine(provider: ScriptedProvider, turns: usize) -> DebateEngine {
        let settings = EngineSettings {
            turns,
            ..EngineSettings::default()
        };
        DebateEngine::new(Arc::new(provider), PromptSet::default(), settings)
    }

    fn new_log() -> EventLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_produces_n_alternating_lines_and_two_advice_blocks() {
        for turns in [0usize, 1, 4, 7] {
            let log = new_log();
            let provider = ScriptedProvider::new(log.clone());
            let engine = engine(provider, turns);
            let sink = RecordingSink { log: log.clone() };

            let result = engine.run(&session(), &subject(), &sink).await;

            assert_eq!(result.transcript.len(), turns);
            for (i, line) in result.transcript.iter().enumerate() {
                assert_eq!(line.turn_index, i);
                assert_eq!(line.speaker, Persona::for_turn(i));
                assert!(line.text.starts_with(line.speaker.prefix()));
                assert!(line.text.split_whitespace().count() <= 20);
            }
            assert!(!result.optimist_advice.is_empty());
            assert!(!result.pessimist_advice.is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_seeding_precedes_turns_without_completion() {
        let log = new_log();
        let engine = engine(ScriptedProvider::new(log.clone()), 2);
        let sink = RecordingSink { log: log.clone() };

        engine.run(&session(), &subject(), &sink).await;

        let events = log.lock().unwrap().clone();
        assert!(events[0].starts_with("append:opt-thread:You are the Optimist"));
        assert!(events[0].contains("1. shipping the feature tonight!"));
        assert!(events[1].starts_with("append:pess-thread:You are the Pessimist"));
        assert_eq!(events[2], "complete:opt-thread");
    }

    #[tokio::test(start_paused = true)]
    async fn test_forward_happens_before_post() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone())
            .script(OPT, vec![Step::Reply("Optimist: Great energy in chat.")]);
        let engine = engine(provider, 1);
        let sink = RecordingSink { log: log.clone() };

        engine.run(&session(), &subject(), &sink).await;

        let events = log.lock().unwrap().clone();
        let forward = events
            .iter()
            .position(|e| e == "append:pess-thread:The other debater said: Optimist: Great energy in chat.")
            .expect("line forwarded to opponent");
        let post = events
            .iter()
            .position(|e| e == "line:0:Optimist: Great energy in chat.")
            .expect("line posted");
        assert!(forward < post);
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_timeout_substitutes_placeholder_and_continues() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone()).script(
            OPT,
            vec![
                Step::Reply("Optimist: Helpful to newcomers."),
                Step::Hang,
                Step::Reply("Optimist: Consistent contributor."),
                Step::Reply("Optimist Advice:\n1) a\n2) b\n3) c"),
            ],
        );
        let engine = engine(provider, 6);
        let sink = RecordingSink { log: log.clone() };

        let result = engine.run(&session(), &subject(), &sink).await;

        assert_eq!(result.transcript.len(), 6);
        assert_eq!(result.transcript[2].text, "Optimist: [Timeout]");
        assert_eq!(result.transcript[4].text, "Optimist: Consistent contributor.");
        assert_eq!(result.optimist_advice, "Optimist Advice:\n1) a\n2) b\n3) c");

        let events = log.lock().unwrap().clone();
        assert!(events.contains(&"line:2:Optimist: [Timeout]".to_string()));
        assert!(events.contains(&"append:pess-thread:The other debater said: Optimist: [Timeout]".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_turn_posts_notice_after_placeholder() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone())
            .script(OPT, vec![Step::Hang])
            .script(PESS, vec![Step::Fail]);
        let engine = engine(provider, 3);
        let sink = RecordingSink { log: log.clone() };

        engine.run(&session(), &subject(), &sink).await;

        let events = log.lock().unwrap().clone();
        let position = |needle: &str| {
            events
                .iter()
                .position(|e| e == needle)
                .unwrap_or_else(|| panic!("missing event {needle}"))
        };
        let timeout_line = position("line:0:Optimist: [Timeout]");
        let timeout_notice = position("notice:Optimist:⚠️ Turn 0 timed out");
        assert_eq!(timeout_notice, timeout_line + 1);

        let error_line = position("line:1:Pessimist: [Error]");
        let error_notice = events
            .iter()
            .position(|e| e.starts_with("notice:Optimist:⚠️ Turn 1 error:"))
            .expect("error notice posted");
        assert_eq!(error_notice, error_line + 1);

        assert!(events.contains(&"line:2:Optimist: A fair point about consistency.".to_string()));
        assert!(!events.iter().any(|e| e.starts_with("notice:Optimist:⚠️ Turn 2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_appends_do_not_stop_the_run() {
        let log = new_log();
        let mut provider = ScriptedProvider::new(log.clone()).script(
            OPT,
            vec![
                Step::Reply("Optimist: Always first to help."),
                Step::Reply("Optimist: Welcomes every newcomer."),
            ],
        );
        provider.fail_append = true;
        let engine = engine(provider, 3);
        let sink = RecordingSink { log: log.clone() };

        let result = engine.run(&session(), &subject(), &sink).await;

        assert_eq!(result.transcript.len(), 3);
        assert_eq!(result.transcript[0].text, "Optimist: Always first to help.");
        assert_eq!(result.transcript[2].text, "Optimist: Welcomes every newcomer.");
        for line in &result.transcript {
            assert!(!line.text.contains("[Timeout]"));
            assert!(!line.text.contains("[Error]"));
        }
        assert!(!result.optimist_advice.is_empty());
        assert!(!result.pessimist_advice.is_empty());

        let events = log.lock().unwrap().clone();
        let appends = events.iter().filter(|e| e.starts_with("append:")).count();
        assert_eq!(appends, 2 + 3);
        assert!(events.contains(&"advice:Optimist".to_string()));
        assert!(events.contains(&"advice:Pessimist".to_string()));
        assert!(!events.iter().any(|e| e.contains("⚠️")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_cancels_and_swallows_cancel_failure() {
        let log = new_log();
        let mut provider = ScriptedProvider::new(log.clone()).script(PESS, vec![Step::Hang]);
        provider.fail_cancel = true;
        let provider = Arc::new(provider);
        let engine = DebateEngine::new(
            provider.clone(),
            PromptSet::default(),
            EngineSettings {
                turns: 2,
                ..EngineSettings::default()
            },
        );
        let sink = RecordingSink { log: log.clone() };

        let result = engine.run(&session(), &subject(), &sink).await;

        assert_eq!(result.transcript[1].text, "Pessimist: [Timeout]");
        assert_eq!(provider.cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_error_becomes_error_line() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone()).script(PESS, vec![Step::Fail]);
        let engine = engine(provider, 2);
        let sink = RecordingSink { log };

        let result = engine.run(&session(), &subject(), &sink).await;
        assert_eq!(result.transcript[1].text, "Pessimist: [Error]");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_completion_becomes_no_response() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone()).script(OPT, vec![Step::Reply("   \n")]);
        let engine = engine(provider, 1);
        let sink = RecordingSink { log };

        let result = engine.run(&session(), &subject(), &sink).await;
        assert_eq!(result.transcript[0].text, "Optimist: [No response]");
    }

    #[tokio::test(start_paused = true)]
    async fn test_optimist_advice_failure_uses_fallback_only_for_optimist() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone())
            .script(OPT, vec![Step::Reply("Optimist: Good vibes."), Step::Fail])
            .script(
                PESS,
                vec![
                    Step::Reply("Pessimist: Too many all-nighters."),
                    Step::Reply("  Pessimist Advice:\n1) Sleep\n2) Hydrate\n3) Log off  \n"),
                ],
            );
        let engine = engine(provider, 2);
        let sink = RecordingSink { log: log.clone() };

        let result = engine.run(&session(), &subject(), &sink).await;

        assert_eq!(
            result.optimist_advice,
            "Optimist Advice:\n1) Unable to generate\n2) Please try again\n3) Error occurred"
        );
        assert_eq!(
            result.pessimist_advice,
            "Pessimist Advice:\n1) Sleep\n2) Hydrate\n3) Log off"
        );

        let events = log.lock().unwrap().clone();
        let opt_advice = events.iter().position(|e| e == "advice:Optimist").unwrap();
        let pess_advice = events.iter().position(|e| e == "advice:Pessimist").unwrap();
        assert!(opt_advice < pess_advice);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_timeout_discards_partial_transcript() {
        let log = new_log();
        let provider = ScriptedProvider::new(log.clone())
            .script(OPT, vec![Step::Reply("Optimist: Opening."), Step::Hang, Step::Hang]);
        let engine = DebateEngine::new(
            Arc::new(provider),
            PromptSet::default(),
            EngineSettings {
                turns: 6,
                turn_timeout: Duration::from_secs(30),
                analysis_timeout: Duration::from_secs(45),
            },
        );
        let sink = RecordingSink { log: log.clone() };

        let outcome = engine.run_with_deadline(&session(), &subject(), &sink).await;

        assert_eq!(outcome, Err(DebateTimedOut(Duration::from_secs(45))));
        let events = log.lock().unwrap().clone();
        assert!(!events.iter().any(|e| e.starts_with("advice:")));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(DebatePhase::Turn(3).to_string(), "turn 3");
        assert_eq!(DebatePhase::Advising.to_string(), "advising");
    }
}
