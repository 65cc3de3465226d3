use std::sync::Arc;

use quiz_core::model::{
    QuestionBank, ResultRecord, SessionState, SpecialtyCatalog, UserId, UserProfile,
};
use quiz_core::{Clock, QuizEngine, QuizError, QuizEvent, QuizPhase, RankingService, Step};
use storage::repository::ResultSink;
use tracing::{debug, error, info, warn};

use super::store::SessionStore;
use crate::directive::{Directive, ErrorNotice, Intro, NoticeKind, Welcome};
use crate::error::ServiceError;
use crate::report::Report;

//
// ─── QUIZ SERVICE ──────────────────────────────────────────────────────────────
//

/// Drives the quiz for many users at once.
///
/// Every event is applied under the user's own lock. A completed session is
/// ranked, written to the result sink once, and removed before the report is
/// returned.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    engine: QuizEngine,
    ranking: RankingService,
    sink: Arc<dyn ResultSink>,
    sessions: SessionStore,
}

impl QuizService {
    /// Create a service over a loaded question bank and catalog.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Quiz(QuizError::NoQuestions)` if the bank is empty.
    pub fn new(
        clock: Clock,
        bank: Arc<QuestionBank>,
        catalog: Arc<SpecialtyCatalog>,
        sink: Arc<dyn ResultSink>,
    ) -> Result<Self, ServiceError> {
        if bank.is_empty() {
            return Err(QuizError::NoQuestions.into());
        }
        Ok(Self {
            clock,
            engine: QuizEngine::new(bank),
            ranking: RankingService::new(catalog),
            sink,
            sessions: SessionStore::new(),
        })
    }

    /// Number of categories shown in a report.
    #[must_use]
    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.ranking = self.ranking.with_limit(limit);
        self
    }

    #[must_use]
    pub fn welcome(&self) -> Welcome {
        Welcome {
            question_count: self.engine.question_count(),
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Where the user currently stands.
    pub async fn phase(&self, user: UserId) -> QuizPhase {
        let session = self.sessions.snapshot(user).await;
        self.engine.phase(session.as_ref())
    }

    /// Apply one event for one user and say what to show next.
    pub async fn handle(&self, user: &UserProfile, event: QuizEvent) -> Directive {
        let user_id = user.id();
        let slot = self.sessions.slot(user_id);
        let directive = {
            let mut guard = slot.lock().await;
            let transition = self
                .engine
                .apply(guard.take(), event, self.clock.now());

            match transition.step {
                Ok(Step::Prompt(prompt)) => {
                    *guard = transition.session;
                    let intro = (event == QuizEvent::Start).then(|| {
                        info!(user_id = %user_id, "session started");
                        Intro {
                            question_count: prompt.question_count,
                        }
                    });
                    debug!(user_id = %user_id, ?event, question = prompt.question_index, "showing question");
                    Directive::ShowPrompt { prompt, intro }
                }
                Ok(Step::Duplicate(prompt)) => {
                    *guard = transition.session;
                    debug!(user_id = %user_id, question = prompt.question_index, "duplicate answer ignored");
                    Directive::ShowPrompt {
                        prompt,
                        intro: None,
                    }
                }
                Ok(Step::Cancelled) => {
                    *guard = None;
                    info!(user_id = %user_id, "session cancelled");
                    Directive::Cancelled
                }
                Ok(Step::Completed) => {
                    *guard = None;
                    match transition.session {
                        Some(finished) => Directive::ShowReport(self.complete(user, &finished).await),
                        None => restart(user_id, &QuizError::NoSession),
                    }
                }
                Err(QuizError::NoPreviousQuestion) => {
                    *guard = transition.session;
                    Directive::Error(ErrorNotice {
                        kind: NoticeKind::AlreadyAtFirstQuestion,
                        session_kept: true,
                    })
                }
                Err(QuizError::NoSession) => {
                    *guard = None;
                    debug!(user_id = %user_id, ?event, "event without an active session");
                    Directive::Error(ErrorNotice {
                        kind: NoticeKind::NoActiveSession,
                        session_kept: false,
                    })
                }
                Err(err) => {
                    *guard = None;
                    restart(user_id, &err)
                }
            }
        };
        drop(slot);
        self.sessions.prune(user_id);
        directive
    }

    async fn complete(&self, user: &UserProfile, session: &SessionState) -> Report {
        let scores = session.scores().clone();
        let entries = self.ranking.rank(&scores);
        let had_scores = !scores.is_empty();
        let record = ResultRecord::new(user, self.clock.now(), entries.clone(), scores);

        let recorded = match self.sink.persist(&record).await {
            Ok(()) => {
                info!(
                    user_id = %user.id(),
                    ranked = entries.len(),
                    "session completed and recorded"
                );
                true
            }
            Err(err) => {
                error!(user_id = %user.id(), error = %err, "failed to record result");
                false
            }
        };

        Report {
            entries,
            had_scores,
            recorded,
        }
    }
}

fn restart(user_id: UserId, err: &QuizError) -> Directive {
    warn!(user_id = %user_id, error = %err, "session terminated");
    Directive::Error(ErrorNotice {
        kind: NoticeKind::Restart,
        session_kept: false,
    })
}
