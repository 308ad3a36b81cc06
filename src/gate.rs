use crate::catalog::Question;
use crate::engine::Engine;
use tracing::debug;

/// Outcome of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The brew was resumed.
    Correct { selected: String },
    /// `selected` is the option the token resolved to, if any.
    Incorrect {
        selected: Option<String>,
        correct: String,
    },
    NoActiveQuestion,
}

/// Resolve a token to an option: a 1-based index or the option text itself.
pub fn resolve<'q>(question: &'q Question, token: &str) -> Option<&'q str> {
    let token = token.trim();
    if let Ok(index) = token.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| question.options.get(i))
            .map(String::as_str);
    }
    let token = token.to_lowercase();
    question
        .options
        .iter()
        .find(|option| option.to_lowercase() == token)
        .map(String::as_str)
}

/// Judge `token` against the engine's active question and resume on a correct answer.
///
/// Unresolvable tokens are `Incorrect`; there is no retry limit.
pub fn submit(engine: &mut Engine, token: &str) -> Verdict {
    let Some(question) = engine.active_question() else {
        return Verdict::NoActiveQuestion;
    };
    let selected = resolve(question, token).map(str::to_string);
    debug!(token, ?selected, "answer submitted");

    match selected {
        Some(selected) if selected == question.correct => {
            engine.resume();
            Verdict::Correct { selected }
        }
        selected => Verdict::Incorrect {
            selected,
            correct: question.correct.clone(),
        },
    }
}
