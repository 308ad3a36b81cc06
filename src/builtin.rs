use crate::command::{CommandFactory, ExecutableCommand};
use crate::engine::BrewStatus;
use crate::error::BrewError;
use crate::interpreter::Factory;
use crate::station::Station;
use crate::transcript::Transcript;
use anyhow::Result;
use argh::{EarlyExit, FromArgs};
use std::io::Write;
use tracing::debug;

/// Command summaries shown by `help`, in display order.
pub(crate) const COMMANDS: &[(&str, &str)] = &[
    ("help", "Type \"help\" to see available commands"),
    ("list", "Type \"list\" to see all recipes"),
    ("view", "Type \"view [recipe]\" to see recipe details"),
    ("make", "Type \"make [recipe]\" to start brewing"),
    ("status", "Type \"status\" to check brewing progress"),
    ("clear", "Type \"clear\" to clear terminal"),
    ("exit", "Type \"exit\" to leave the terminal"),
];

/// Station commands known at compile time.
///
/// Arguments are parsed with [`argh`] (`FromArgs`), so every builtin also answers
/// `--help` with its usage.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Action word, e.g. "make".
    fn name() -> &'static str;

    /// Executes the command; a returned error is rendered into the transcript.
    fn execute(self, out: &mut dyn Write, station: &mut Station) -> Result<()>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, out: &mut Transcript, station: &mut Station) -> Result<()> {
        if let Err(e) = <T as BuiltinCommand>::execute(*self, out, station) {
            writeln!(out, "{}", e)?;
            if let Some(hint) = e.downcast_ref::<BrewError>().and_then(BrewError::hint) {
                writeln!(out, "{}", hint)?;
            }
        }
        Ok(())
    }
}

/// Usage text or argument error produced by argh instead of a command.
struct InvalidArgs {
    output: String,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, out: &mut Transcript, _station: &mut Station) -> Result<()> {
        writeln!(out, "{}", self.output.trim_end())?;
        Ok(())
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, .. }) => Box::new(InvalidArgs { output }),
            })
        } else {
            None
        }
    }
}

fn recipe_query(
    query: Option<String>,
    command: &str,
    station: &Station,
) -> std::result::Result<String, BrewError> {
    match query {
        Some(q) if !q.trim().is_empty() => Ok(q),
        _ => Err(BrewError::MissingArgument {
            command: command.to_string(),
            available: station.catalog.names(),
        }),
    }
}

fn not_found(query: &str, station: &Station) -> BrewError {
    debug!(query, "no recipe matches");
    BrewError::RecipeNotFound {
        available: station.catalog.names(),
    }
}

#[derive(FromArgs)]
/// List the available commands.
pub struct Help {
    #[argh(positional, greedy)]
    /// ignored
    pub _rest: Vec<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn execute(self, out: &mut dyn Write, _station: &mut Station) -> Result<()> {
        writeln!(out, "Available Commands:")?;
        for (cmd, desc) in COMMANDS {
            writeln!(out, "  {}: {}", cmd, desc)?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// List every recipe with its brewing time.
pub struct List {
    #[argh(positional, greedy)]
    /// ignored
    pub _rest: Vec<String>,
}

impl BuiltinCommand for List {
    fn name() -> &'static str {
        "list"
    }

    fn execute(self, out: &mut dyn Write, station: &mut Station) -> Result<()> {
        writeln!(out, "Available Recipes:")?;
        for recipe in station.catalog.recipes() {
            writeln!(out, "  • {} ({}s)", recipe.name, recipe.duration_secs)?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Show ingredients, steps and artwork for a recipe.
pub struct View {
    #[argh(positional)]
    /// recipe name or any part of it
    pub query: Option<String>,
}

impl BuiltinCommand for View {
    fn name() -> &'static str {
        "view"
    }

    fn execute(self, out: &mut dyn Write, station: &mut Station) -> Result<()> {
        let query = recipe_query(self.query, Self::name(), station)?;
        let recipe = station
            .catalog
            .find(&query)
            .ok_or_else(|| not_found(&query, station))?;

        writeln!(out)?;
        writeln!(out, "📖 RECIPE: {}", recipe.name)?;
        writeln!(out, "⏱️  TIME: {} seconds", recipe.duration_secs)?;
        writeln!(out, "🔧 MACHINE: {}", recipe.machine)?;
        writeln!(out)?;
        writeln!(out, "📋 INGREDIENTS:")?;
        for ingredient in &recipe.ingredients {
            writeln!(out, "  • {}", ingredient)?;
        }
        writeln!(out)?;
        writeln!(out, "📝 STEPS:")?;
        for (i, step) in recipe.steps.iter().enumerate() {
            writeln!(out, "  {}. {}", i + 1, step)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", recipe.artwork)?;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Start brewing a recipe.
pub struct Make {
    #[argh(positional)]
    /// recipe name or any part of it
    pub query: Option<String>,
}

impl BuiltinCommand for Make {
    fn name() -> &'static str {
        "make"
    }

    fn execute(self, out: &mut dyn Write, station: &mut Station) -> Result<()> {
        let query = recipe_query(self.query, Self::name(), station)?;
        let recipe = station
            .catalog
            .find(&query)
            .ok_or_else(|| not_found(&query, station))?;

        station.engine.start(recipe, station.tracker.completed())?;

        writeln!(out, "🚀 STARTING: {} brewing process", recipe.name)?;
        writeln!(out, "⏱️  ESTIMATED TIME: {} seconds", recipe.duration_secs)?;
        if recipe.question_threshold().is_some() {
            writeln!(out, "🎯 TIP: You'll need to answer one question during brewing!")?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Report progress of the current brew.
pub struct Status {
    #[argh(positional, greedy)]
    /// ignored
    pub _rest: Vec<String>,
}

impl BuiltinCommand for Status {
    fn name() -> &'static str {
        "status"
    }

    fn execute(self, out: &mut dyn Write, station: &mut Station) -> Result<()> {
        let status = station.engine.status();
        match &status {
            BrewStatus::Idle => writeln!(out, "💤 No active brewing process")?,
            BrewStatus::Brewing {
                recipe_name,
                elapsed_secs,
                total_secs,
                paused,
            } => {
                writeln!(out, "🔄 BREWING: {}", recipe_name)?;
                writeln!(
                    out,
                    "📊 PROGRESS: {}% ({}s/{}s)",
                    status.percent(),
                    elapsed_secs,
                    total_secs
                )?;
                if *paused {
                    writeln!(out, "⏸️  PAUSED: Waiting for question answer")?;
                }
            }
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// Clear the terminal.
pub struct Clear {
    #[argh(positional, greedy)]
    /// ignored
    pub _rest: Vec<String>,
}

impl BuiltinCommand for Clear {
    fn name() -> &'static str {
        "clear"
    }

    fn execute(self, _out: &mut dyn Write, station: &mut Station) -> Result<()> {
        station.clear_requested = true;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Leave the terminal.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored
    pub _rest: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, out: &mut dyn Write, station: &mut Station) -> Result<()> {
        writeln!(out, "👋 Leaving the café...")?;
        station.should_exit = true;
        Ok(())
    }
}
