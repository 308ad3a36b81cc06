//! TAB completion and inline hints for the interactive shell.

use crate::builtin::COMMANDS;
use crate::catalog::Catalog;
use crate::engine::Mode;
use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

/// Actions whose argument is a recipe name.
const RECIPE_ACTIONS: &[&str] = &["view", "make"];

/// Candidates for the word being typed at the end of `line`.
///
/// Returns the byte offset where that word starts and the matching words: command names
/// for the first word, recipe names after `view`/`make`.
pub fn suggest(line: &str, recipes: &[String]) -> (usize, Vec<String>) {
    let Some(split) = line.find(char::is_whitespace) else {
        let typed = line.to_lowercase();
        let commands = COMMANDS
            .iter()
            .map(|(name, _)| name.to_string())
            .filter(|name| name.starts_with(&typed))
            .collect();
        return (0, commands);
    };

    let action = line[..split].to_lowercase();
    let rest = &line[split..];
    let start = split + (rest.len() - rest.trim_start().len());
    if !RECIPE_ACTIONS.contains(&action.as_str()) {
        return (start, Vec::new());
    }
    let fragment = line[start..].to_lowercase();
    let names = recipes
        .iter()
        .filter(|name| name.starts_with(&fragment))
        .cloned()
        .collect();
    (start, names)
}

/// rustyline helper offering [`suggest`] as completion and hint.
///
/// Silent while an answer is expected.
pub struct StationHelper {
    recipes: Vec<String>,
    mode: Mode,
}

impl StationHelper {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            recipes: catalog.names(),
            mode: Mode::Normal,
        }
    }

    /// Mode of the line about to be read.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn suggestions(&self, line: &str) -> (usize, Vec<String>) {
        match self.mode {
            Mode::Normal => suggest(line, &self.recipes),
            Mode::Answering => (line.len(), Vec::new()),
        }
    }
}

impl Completer for StationHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.suggestions(&line[..pos]))
    }
}

impl Hinter for StationHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if line.trim().is_empty() || pos < line.len() {
            return None;
        }
        let (start, candidates) = self.suggestions(line);
        let typed_len = line.len() - start;
        candidates
            .first()
            .and_then(|candidate| candidate.get(typed_len..))
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Highlighter for StationHelper {}

impl Validator for StationHelper {}

impl Helper for StationHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipes() -> Vec<String> {
        Catalog::builtin().names()
    }

    #[test]
    fn test_empty_line_suggests_every_command() {
        let (start, words) = suggest("", &recipes());
        assert_eq!(start, 0);
        assert_eq!(words.len(), COMMANDS.len());
    }

    #[test]
    fn test_first_word_completes_commands() {
        assert_eq!(suggest("m", &recipes()), (0, vec!["make".to_string()]));
        assert_eq!(suggest("S", &recipes()), (0, vec!["status".to_string()]));
        assert_eq!(suggest("x", &recipes()), (0, Vec::new()));
    }

    #[test]
    fn test_recipe_argument_completes_names() {
        assert_eq!(
            suggest("make ho", &recipes()),
            (5, vec!["hot chocolate".to_string()])
        );
        assert_eq!(
            suggest("view  ", &recipes()),
            (6, vec!["americano".to_string(), "hot chocolate".to_string()])
        );
    }

    #[test]
    fn test_answer_mode_suggests_nothing() {
        let mut helper = StationHelper::new(&Catalog::builtin());
        assert_eq!(helper.suggestions("m"), (0, vec!["make".to_string()]));

        helper.set_mode(Mode::Answering);
        assert_eq!(helper.suggestions("m"), (1, Vec::new()));
        assert_eq!(helper.suggestions(""), (0, Vec::new()));

        helper.set_mode(Mode::Normal);
        assert_eq!(helper.suggestions("view a").1, ["americano"]);
    }

    #[test]
    fn test_other_commands_have_no_argument_completion() {
        assert_eq!(suggest("status a", &recipes()), (7, Vec::new()));
    }
}
