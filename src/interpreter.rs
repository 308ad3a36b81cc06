use crate::catalog::{Catalog, Question, Recipe};
use crate::command::CommandFactory;
use crate::config::Config;
use crate::engine::{BrewStatus, Mode, TickOutcome};
use crate::error::BrewError;
use crate::gate::{self, Verdict};
use crate::parser;
use crate::station::Station;
use crate::tracker::CompletionSnapshot;
use crate::transcript::Transcript;
use tracing::{debug, warn};

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate, see `BuiltinCommand`.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Everything a UI needs to draw the brewing progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub is_brewing: bool,
    pub recipe_name: Option<String>,
    pub elapsed_secs: u32,
    pub total_secs: u32,
    pub paused: bool,
    pub active_question: Option<Question>,
}

/// The barista terminal's command interpreter.
///
/// Owns the [`Station`] state and the [`Transcript`]. Lines submitted in
/// [`Mode::Normal`] are parsed and dispatched to the first [`CommandFactory`] that
/// recognizes the action word; while a brew waits on its question every line is an answer.
///
/// Example
/// ```
/// use barista_terminal::Interpreter;
/// let mut barista = Interpreter::default();
/// barista.submit_line("list");
/// assert_eq!(barista.transcript().lines()[1], "Available Recipes:");
/// ```
pub struct Interpreter {
    station: Station,
    transcript: Transcript,
    commands: Vec<Box<dyn CommandFactory>>,
    all_complete_pending: bool,
}

impl Interpreter {
    /// Create an interpreter with a custom station and set of command factories.
    pub fn new(station: Station, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            station,
            transcript: Transcript::new(),
            commands,
            all_complete_pending: false,
        }
    }

    /// The built-in catalog and commands, completion target taken from `config`.
    pub fn with_config(config: &Config) -> Self {
        Self::new(
            Station::new(Catalog::builtin(), config.target),
            default_commands(),
        )
    }

    /// Feed one raw input line.
    pub fn submit_line(&mut self, raw: &str) {
        self.transcript.line(format!("> {}", raw));
        match self.station.engine.mode() {
            Mode::Answering => self.answer(raw),
            Mode::Normal => self.dispatch(raw),
        }
    }

    /// Deliver a tick stamped with `generation`.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let outcome = self.station.engine.tick(generation);
        match &outcome {
            TickOutcome::Stale | TickOutcome::Advanced { .. } => {}
            TickOutcome::QuestionAsked(question) => self.ask(question),
            TickOutcome::Completed(recipe) => self.complete(recipe),
        }
        outcome
    }

    fn dispatch(&mut self, raw: &str) {
        let parsed = parser::parse(raw);
        if parsed.is_empty() {
            return;
        }
        debug!(action = %parsed.action, argument = %parsed.argument, "dispatching command");

        // "--" keeps argh from reading a leading dash in the argument as a flag
        let args: Vec<&str> = match parsed.argument.as_str() {
            "" => Vec::new(),
            "--help" => vec!["--help"],
            argument => vec!["--", argument],
        };
        let cmd = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&parsed.action, &args));

        match cmd {
            Some(cmd) => {
                if let Err(e) = cmd.execute(&mut self.transcript, &mut self.station) {
                    warn!(action = %parsed.action, "command output failed: {e:#}");
                }
            }
            None => {
                debug!(action = %parsed.action, "unknown command");
                self.report(&BrewError::UnknownCommand)
            }
        }

        if std::mem::take(&mut self.station.clear_requested) {
            self.transcript.clear();
        }
    }

    fn answer(&mut self, raw: &str) {
        let choices = self
            .station
            .engine
            .active_question()
            .map(|q| choice_list(q.options.len()))
            .unwrap_or_default();

        match gate::submit(&mut self.station.engine, raw) {
            Verdict::Correct { selected } => {
                self.transcript
                    .line(format!("✅ CORRECT! {} is the right answer.", selected));
                self.transcript.line("🚀 Continuing brewing process...");
            }
            Verdict::Incorrect { selected, correct } => {
                match selected {
                    Some(selected) => self
                        .transcript
                        .line(format!("❌ WRONG! You selected {}", selected)),
                    None => self.transcript.line(format!(
                        "❌ WRONG! \"{}\" is not one of the options",
                        raw.trim()
                    )),
                }
                self.transcript
                    .line(format!("💡 The correct answer was: {}", correct));
                self.transcript.line(format!("💬 Try again ({}):", choices));
            }
            Verdict::NoActiveQuestion => debug!("answer submitted without a question"),
        }
    }

    fn ask(&mut self, question: &Question) {
        self.transcript.line("");
        self.transcript
            .line(format!("❓ QUESTION: {}", question.prompt));
        self.transcript.line(format!("💡 HINT: {}", question.hint));
        self.transcript.line("📝 OPTIONS:");
        for (i, option) in question.options.iter().enumerate() {
            self.transcript.line(format!("  {}. {}", i + 1, option));
        }
        self.transcript.line(format!(
            "💬 Type your answer ({}):",
            choice_list(question.options.len())
        ));
    }

    fn complete(&mut self, recipe: &Recipe) {
        let Some(recorded) = self.station.tracker.record_completion(&recipe.name) else {
            return;
        };
        self.transcript
            .line(format!("✅ COMPLETE: {} is ready!", recipe.name));
        self.transcript
            .line(format!("🎉 {} added to completed drinks", recipe.name));
        self.transcript.line(format!(
            "📊 Progress: {}/{} drinks completed",
            recorded.count,
            self.station.tracker.target()
        ));
        if recorded.all_complete {
            self.transcript
                .line("🎊 ALL DRINKS COMPLETED! Transitioning to surprise...");
            self.all_complete_pending = true;
        }
    }

    fn report(&mut self, err: &BrewError) {
        self.transcript.line(err.to_string());
        if let Some(hint) = err.hint() {
            self.transcript.line(hint);
        }
    }

    /// Write the welcome banner.
    pub fn welcome(&mut self) {
        for line in [
            "╔══════════════════════════════════════════════════════════════╗",
            "║                    GOTHIC BARISTA TERMINAL                   ║",
            "║                                                              ║",
            "║  Welcome to the Cyberpunk Coffee Station!                    ║",
            "║  Type \"help\" to see available commands.                      ║",
            "║  Type \"list\" to view available recipes.                      ║",
            "║  Type \"view [recipe]\" to see recipe details.                 ║",
            "║  Type \"make [recipe]\" to start brewing.                      ║",
            "║                                                              ║",
            "║  🎯 TIP: Commands are case-insensitive!                      ║",
            "║  🎯 TIP: Use TAB to auto-complete recipe names!              ║",
            "║  🎯 TIP: During brewing, you'll need to answer one question! ║",
            "╚══════════════════════════════════════════════════════════════╝",
        ] {
            self.transcript.line(line);
        }
    }

    /// Write the surprise shown once every drink is done.
    pub fn finale(&mut self) {
        for line in [
            "",
            "🎉 Happy Birthday! 🎉",
            "Wishing you a wonderful year ahead!",
            "",
            "╔══════════════════════════════╗",
            "║  🎂  HAPPY BIRTHDAY!  🎂     ║",
            "║  May your day be filled      ║",
            "║  with joy, love, and         ║",
            "║  delicious coffee!           ║",
            "╚══════════════════════════════╝",
            "",
            "💬 Press Enter to leave the café.",
        ] {
            self.transcript.line(line);
        }
    }

    /// One-shot: true once after the completion target is reached.
    pub fn take_all_complete(&mut self) -> bool {
        std::mem::take(&mut self.all_complete_pending)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn mode(&self) -> Mode {
        self.station.engine.mode()
    }

    /// Generation the tick source must be running for, if any.
    pub fn armed_tick(&self) -> Option<u64> {
        self.station.engine.armed_tick()
    }

    pub fn should_exit(&self) -> bool {
        self.station.should_exit
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        let engine = &self.station.engine;
        match engine.status() {
            BrewStatus::Idle => StatusSnapshot {
                is_brewing: false,
                recipe_name: None,
                elapsed_secs: 0,
                total_secs: 0,
                paused: false,
                active_question: None,
            },
            BrewStatus::Brewing {
                recipe_name,
                elapsed_secs,
                total_secs,
                paused,
            } => StatusSnapshot {
                is_brewing: true,
                recipe_name: Some(recipe_name),
                elapsed_secs,
                total_secs,
                paused,
                active_question: engine.active_question().cloned(),
            },
        }
    }

    pub fn completion_snapshot(&self) -> CompletionSnapshot {
        self.station.tracker.snapshot()
    }
}

impl Default for Interpreter {
    /// The built-in catalog and commands with default settings.
    fn default() -> Self {
        Self::with_config(&Config::default())
    }
}

/// Built-ins: `help`, `list`, `view`, `make`, `status`, `clear`, `exit`.
fn default_commands() -> Vec<Box<dyn CommandFactory>> {
    use crate::builtin::*;
    vec![
        Box::new(Factory::<Help>::default()),
        Box::new(Factory::<List>::default()),
        Box::new(Factory::<View>::default()),
        Box::new(Factory::<Make>::default()),
        Box::new(Factory::<Status>::default()),
        Box::new(Factory::<Clear>::default()),
        Box::new(Factory::<Exit>::default()),
    ]
}

/// "1, 2, 3, or 4" for four options.
fn choice_list(n: usize) -> String {
    let numbers: Vec<String> = (1..=n).map(|i| i.to_string()).collect();
    match numbers.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick_armed(interp: &mut Interpreter, n: u32) {
        for _ in 0..n {
            let generation = interp.armed_tick().unwrap_or(0);
            interp.tick(generation);
        }
    }

    #[test]
    fn test_choice_list() {
        assert_eq!(choice_list(4), "1, 2, 3, or 4");
        assert_eq!(choice_list(2), "1 or 2");
        assert_eq!(choice_list(1), "1");
    }

    #[test]
    fn test_every_line_is_echoed() {
        let mut interp = Interpreter::default();
        interp.submit_line("HELP");
        interp.submit_line("   ");
        let lines = interp.transcript().lines();
        assert_eq!(lines[0], "> HELP");
        assert_eq!(lines.last().unwrap(), ">    ");
    }

    #[test]
    fn test_empty_line_is_silent() {
        let mut interp = Interpreter::default();
        interp.submit_line("");
        assert_eq!(interp.transcript().lines(), ["> "]);
    }

    #[test]
    fn test_unknown_command() {
        let mut interp = Interpreter::default();
        interp.submit_line("brew latte");
        assert_eq!(
            interp.transcript().lines(),
            [
                "> brew latte",
                "❌ ERROR: Unknown command",
                "💡 Type \"help\" for available commands"
            ]
        );
    }

    #[test]
    fn test_clear_empties_transcript() {
        let mut interp = Interpreter::default();
        interp.welcome();
        interp.submit_line("list");
        interp.submit_line("clear");
        assert!(interp.transcript().is_empty());
        assert!(!interp.station().clear_requested);
    }

    #[test]
    fn test_question_switches_to_answering_mode() {
        let mut interp = Interpreter::default();
        interp.submit_line("make americano");
        tick_armed(&mut interp, 30);
        assert_eq!(interp.mode(), Mode::Answering);
        assert_eq!(interp.armed_tick(), None);
        let lines = interp.transcript().lines();
        assert!(lines.contains(&"  2. 120ml".to_string()));
        assert_eq!(lines.last().unwrap(), "💬 Type your answer (1, 2, 3, or 4):");

        // commands are answers while paused
        interp.submit_line("status");
        assert_eq!(interp.mode(), Mode::Answering);
        assert!(interp
            .transcript()
            .lines()
            .contains(&"❌ WRONG! \"status\" is not one of the options".to_string()));

        interp.submit_line("2");
        assert_eq!(interp.mode(), Mode::Normal);
        assert!(interp.armed_tick().is_some());
    }

    #[test]
    fn test_completion_lines_and_signal() {
        let mut interp = Interpreter::default();
        for query in ["americano", "hot chocolate"] {
            interp.submit_line(&format!("make {}", query));
            tick_armed(&mut interp, 30);
            interp.submit_line("2");
            tick_armed(&mut interp, 30);
        }
        let lines = interp.transcript().lines();
        assert!(lines.contains(&"📊 Progress: 1/2 drinks completed".to_string()));
        assert!(lines.contains(&"📊 Progress: 2/2 drinks completed".to_string()));
        assert_eq!(
            lines.last().unwrap(),
            "🎊 ALL DRINKS COMPLETED! Transitioning to surprise..."
        );
        assert!(interp.take_all_complete());
        assert!(!interp.take_all_complete());
    }

    #[test]
    fn test_status_snapshot_while_paused() {
        let mut interp = Interpreter::default();
        assert!(!interp.status_snapshot().is_brewing);
        interp.submit_line("make hot");
        tick_armed(&mut interp, 30);
        let snapshot = interp.status_snapshot();
        assert!(snapshot.is_brewing && snapshot.paused);
        assert_eq!(snapshot.recipe_name.as_deref(), Some("HOT CHOCOLATE"));
        assert_eq!((snapshot.elapsed_secs, snapshot.total_secs), (30, 60));
        assert_eq!(snapshot.active_question.unwrap().correct, "70°C");
    }

    #[test]
    fn test_finale_and_welcome_write_banners() {
        let mut interp = Interpreter::default();
        interp.welcome();
        assert!(interp.transcript().lines()[1].contains("GOTHIC BARISTA TERMINAL"));
        interp.finale();
        assert!(interp
            .transcript()
            .lines()
            .contains(&"🎉 Happy Birthday! 🎉".to_string()));
    }
}
