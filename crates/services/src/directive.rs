//! What the transport should show after an event, plus the fixed texts.

use std::fmt::Write as _;

use quiz_core::Prompt;

use crate::report::Report;

/// Greeting shown before the first `/test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Welcome {
    pub question_count: usize,
}

impl Welcome {
    #[must_use]
    pub fn render_text(&self) -> String {
        format!(
            "Hello!\n\n\
             This bot helps you find specialties that suit your interests and abilities.\n\n\
             About the test:\n\
             - {} questions\n\
             - about 10 minutes\n\
             - at the end you get the specialties that fit you best\n\n\
             Commands:\n\
             /test - start the career test\n\
             /cancel - cancel the current test",
            self.question_count
        )
    }
}

/// Shown once, right before the first question of a fresh session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intro {
    pub question_count: usize,
}

impl Intro {
    #[must_use]
    pub fn render_text(&self) -> String {
        format!(
            "Great! You are about to answer {} questions that will help you choose a suitable specialty.\n\
             Pick the answers that reflect your preferences best.",
            self.question_count
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The event could not be applied; the session was dropped.
    Restart,
    /// Back was requested on the first question; the session is unchanged.
    AlreadyAtFirstQuestion,
    /// Answer or back arrived without an active session.
    NoActiveSession,
}

/// A user-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorNotice {
    pub kind: NoticeKind,
    pub session_kept: bool,
}

impl ErrorNotice {
    #[must_use]
    pub fn render_text(&self) -> String {
        match self.kind {
            NoticeKind::Restart => {
                "Something went wrong with that answer. Please start the test again with /test."
                    .to_string()
            }
            NoticeKind::AlreadyAtFirstQuestion => {
                "You are already at the first question.".to_string()
            }
            NoticeKind::NoActiveSession => {
                "There is no test in progress. Send /test to start one.".to_string()
            }
        }
    }
}

/// Instruction for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    ShowPrompt {
        prompt: Prompt,
        intro: Option<Intro>,
    },
    ShowReport(Report),
    Cancelled,
    Error(ErrorNotice),
}

impl Directive {
    /// Plain-text rendering, used by the console transport.
    #[must_use]
    pub fn render_text(&self) -> String {
        match self {
            Self::ShowPrompt { prompt, intro } => {
                let mut out = String::new();
                if let Some(intro) = intro {
                    out.push_str(&intro.render_text());
                    out.push_str("\n\n");
                }
                out.push_str(&render_prompt(prompt));
                out
            }
            Self::ShowReport(report) => report.render_text(),
            Self::Cancelled => "The test was cancelled. Send /test to start again.".to_string(),
            Self::Error(notice) => notice.render_text(),
        }
    }
}

/// `Question N of M`, the question text, then numbered options.
#[must_use]
pub fn render_prompt(prompt: &Prompt) -> String {
    let mut out = format!(
        "Question {} of {}\n\n{}\n",
        prompt.number(),
        prompt.question_count,
        prompt.text
    );
    for (i, label) in prompt.options.iter().enumerate() {
        let _ = write!(out, "\n{}. {label}", i + 1);
    }
    if prompt.can_go_back {
        out.push_str("\n\n< back");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(index: usize) -> Prompt {
        Prompt {
            question_index: index,
            question_count: 3,
            text: "What do you enjoy?".into(),
            options: vec!["Building".into(), "Drawing".into()],
            can_go_back: index > 0,
        }
    }

    #[test]
    fn first_prompt_has_no_back_affordance() {
        let text = render_prompt(&prompt(0));
        assert!(text.starts_with("Question 1 of 3\n\nWhat do you enjoy?\n"));
        assert!(text.contains("\n1. Building\n2. Drawing"));
        assert!(!text.contains("back"));
    }

    #[test]
    fn later_prompt_offers_back() {
        let text = render_prompt(&prompt(1));
        assert!(text.starts_with("Question 2 of 3"));
        assert!(text.ends_with("< back"));
    }

    #[test]
    fn intro_precedes_first_prompt() {
        let directive = Directive::ShowPrompt {
            prompt: prompt(0),
            intro: Some(Intro { question_count: 3 }),
        };
        let text = directive.render_text();
        assert!(text.starts_with("Great! You are about to answer 3 questions"));
        assert!(text.contains("Question 1 of 3"));
    }

    #[test]
    fn welcome_mentions_count_and_commands() {
        let text = Welcome { question_count: 12 }.render_text();
        assert!(text.contains("12 questions"));
        assert!(text.contains("/test"));
        assert!(text.contains("/cancel"));
    }
}
