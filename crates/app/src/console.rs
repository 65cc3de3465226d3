//! Line-based transport: maps typed commands to quiz events.

use quiz_core::QuizEvent;

pub const HINT: &str = "Type /test to start, an option number to answer, \"back\" to return, /cancel to stop, or /quit to exit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Welcome,
    Event(QuizEvent),
    Quit,
    Blank,
    Unrecognized,
}

/// Parse one line. Option numbers are 1-based and answer `current_question`.
#[must_use]
pub fn parse_input(line: &str, current_question: Option<usize>) -> Input {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Input::Blank,
        "/start" => Input::Welcome,
        "/test" => Input::Event(QuizEvent::Start),
        "/cancel" => Input::Event(QuizEvent::Cancel),
        "back" | "/back" => Input::Event(QuizEvent::GoBack),
        "/quit" | "/exit" => Input::Quit,
        other => match other.parse::<usize>() {
            Ok(number) if number > 0 => Input::Event(QuizEvent::SelectAnswer {
                question: current_question.unwrap_or(0),
                option: number - 1,
            }),
            _ => Input::Unrecognized,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse_input("/test", None), Input::Event(QuizEvent::Start));
        assert_eq!(parse_input(" /CANCEL ", None), Input::Event(QuizEvent::Cancel));
        assert_eq!(parse_input("back", Some(2)), Input::Event(QuizEvent::GoBack));
        assert_eq!(parse_input("/start", None), Input::Welcome);
        assert_eq!(parse_input("/quit", None), Input::Quit);
        assert_eq!(parse_input("   ", None), Input::Blank);
    }

    #[test]
    fn numbers_answer_the_shown_question() {
        assert_eq!(
            parse_input("2", Some(4)),
            Input::Event(QuizEvent::SelectAnswer {
                question: 4,
                option: 1
            })
        );
        assert_eq!(
            parse_input("1", None),
            Input::Event(QuizEvent::SelectAnswer {
                question: 0,
                option: 0
            })
        );
    }

    #[test]
    fn zero_and_text_are_unrecognized() {
        assert_eq!(parse_input("0", Some(1)), Input::Unrecognized);
        assert_eq!(parse_input("hello", Some(1)), Input::Unrecognized);
    }
}
