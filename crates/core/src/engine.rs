//! Question/answer state machine.
//!
//! The engine owns no per-user data: callers hand it a `SessionState` (or
//! none) together with an event and get back the next state plus what the
//! transport should show. Everything here is synchronous and free of I/O.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::QuizError;
use crate::model::{QuestionBank, SessionState};

/// Where a user stands in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    NoSession,
    AwaitingAnswer(usize),
    Completed,
}

/// Events the transport delivers for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    Start,
    SelectAnswer { question: usize, option: usize },
    GoBack,
    Cancel,
}

/// Rendering-ready view of a question and its option labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub question_index: usize,
    pub question_count: usize,
    pub text: String,
    pub options: Vec<String>,
    pub can_go_back: bool,
}

impl Prompt {
    /// 1-based position of the question, for display.
    #[must_use]
    pub fn number(&self) -> usize {
        self.question_index + 1
    }
}

/// Result of a successful answer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The answer was recorded; show the next question.
    Next(Prompt),
    /// The same answer was already recorded for the previous question.
    /// Nothing changed; show the current question again.
    Duplicate(Prompt),
    /// The last question was answered.
    Completed,
}

/// What a transition asks the caller to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Prompt(Prompt),
    Duplicate(Prompt),
    Completed,
    Cancelled,
}

/// Output of [`QuizEngine::apply`]: the state to keep and the step to act on.
///
/// On error the session is returned exactly as it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Option<SessionState>,
    pub step: Result<Step, QuizError>,
}

#[derive(Debug, Clone)]
pub struct QuizEngine {
    bank: Arc<QuestionBank>,
}

impl QuizEngine {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        Self { bank }
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.bank.question_count()
    }

    #[must_use]
    pub fn phase(&self, session: Option<&SessionState>) -> QuizPhase {
        match session {
            None => QuizPhase::NoSession,
            Some(s) if s.current_question() >= self.bank.question_count() => QuizPhase::Completed,
            Some(s) => QuizPhase::AwaitingAnswer(s.current_question()),
        }
    }

    /// Build the prompt for a question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OutOfRange` for an index outside the bank.
    pub fn prompt_for(&self, index: usize) -> Result<Prompt, QuizError> {
        let question = self.bank.question_at(index)?;
        Ok(Prompt {
            question_index: index,
            question_count: self.bank.question_count(),
            text: question.prompt().to_string(),
            options: question
                .options()
                .iter()
                .map(|o| o.label().to_string())
                .collect(),
            can_go_back: index > 0,
        })
    }

    /// Reset a session to the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if the bank is empty; the session is left untouched.
    pub fn start(
        &self,
        session: &mut SessionState,
        now: DateTime<Utc>,
    ) -> Result<Prompt, QuizError> {
        if self.bank.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        let prompt = self.prompt_for(0)?;
        session.reset(now);
        Ok(prompt)
    }

    /// Create a fresh session positioned at the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if the bank is empty.
    pub fn begin(&self, now: DateTime<Utc>) -> Result<(SessionState, Prompt), QuizError> {
        let mut session = SessionState::new(now);
        let prompt = self.start(&mut session, now)?;
        Ok((session, prompt))
    }

    /// Record the chosen option for the current question and advance.
    ///
    /// Re-delivery of the answer just recorded for the previous question is
    /// reported as [`Advance::Duplicate`] and leaves the session unchanged.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidSelection` if `question` is not the current
    /// question, the option index is out of range, or the session is complete.
    pub fn submit_answer(
        &self,
        session: &mut SessionState,
        question: usize,
        option: usize,
    ) -> Result<Advance, QuizError> {
        let current = session.current_question();
        let invalid = QuizError::InvalidSelection { question, option };

        if current > 0
            && question == current - 1
            && session
                .answer_for(question)
                .is_some_and(|recorded| recorded.option_index == option)
            && current < self.bank.question_count()
        {
            return Ok(Advance::Duplicate(self.prompt_for(current)?));
        }

        if question != current || current >= self.bank.question_count() {
            return Err(invalid);
        }

        let chosen = self
            .bank
            .question_at(question)?
            .option(option)
            .cloned()
            .ok_or(invalid)?;

        session.record_current(option, chosen);

        if session.current_question() == self.bank.question_count() {
            Ok(Advance::Completed)
        } else {
            Ok(Advance::Next(self.prompt_for(session.current_question())?))
        }
    }

    /// Step back one question, reversing the answer recorded there.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoPreviousQuestion` when already at the first question.
    pub fn rewind(&self, session: &mut SessionState) -> Result<Prompt, QuizError> {
        if session.current_question() == 0 {
            return Err(QuizError::NoPreviousQuestion);
        }
        let target = session.current_question() - 1;
        let prompt = self.prompt_for(target)?;
        session.step_back();
        Ok(prompt)
    }

    /// Discard a session. Always succeeds, with or without one.
    pub fn cancel(&self, session: &mut Option<SessionState>) {
        session.take();
    }

    /// Pure transition: `(state, event) -> (state, step)`.
    #[must_use]
    pub fn apply(
        &self,
        session: Option<SessionState>,
        event: QuizEvent,
        now: DateTime<Utc>,
    ) -> Transition {
        match event {
            QuizEvent::Cancel => {
                let mut session = session;
                self.cancel(&mut session);
                Transition {
                    session,
                    step: Ok(Step::Cancelled),
                }
            }
            QuizEvent::Start => match self.begin(now) {
                Ok((fresh, prompt)) => Transition {
                    session: Some(fresh),
                    step: Ok(Step::Prompt(prompt)),
                },
                Err(err) => Transition {
                    session,
                    step: Err(err),
                },
            },
            QuizEvent::SelectAnswer { question, option } => {
                self.with_active(session, |engine, active| {
                    engine
                        .submit_answer(active, question, option)
                        .map(|advance| match advance {
                            Advance::Next(prompt) => Step::Prompt(prompt),
                            Advance::Duplicate(prompt) => Step::Duplicate(prompt),
                            Advance::Completed => Step::Completed,
                        })
                })
            }
            QuizEvent::GoBack => self.with_active(session, |engine, active| {
                engine.rewind(active).map(Step::Prompt)
            }),
        }
    }

    fn with_active(
        &self,
        session: Option<SessionState>,
        op: impl FnOnce(&Self, &mut SessionState) -> Result<Step, QuizError>,
    ) -> Transition {
        let Some(mut active) = session else {
            return Transition {
                session: None,
                step: Err(QuizError::NoSession),
            };
        };
        if self.phase(Some(&active)) == QuizPhase::Completed {
            return Transition {
                session: Some(active),
                step: Err(QuizError::NoSession),
            };
        }
        let step = op(self, &mut active);
        Transition {
            session: Some(active),
            step,
        }
    }
}
