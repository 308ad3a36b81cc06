//! A gothic barista terminal: a text-command interpreter that brews drinks in timed steps.
//!
//! Recipes come from a fixed [`catalog`]. `make` starts a brew that advances one brewing
//! second per tick; halfway through it pauses on a multiple-choice question and only resumes
//! after the correct answer. Once every distinct drink of the session target is finished the
//! interpreter raises a one-time all-complete signal, which the interactive [`shell`] turns
//! into a surprise finale.
//!
//! The main entry point is [`Interpreter`]: feed it lines with
//! [`Interpreter::submit_line`] and ticks with [`Interpreter::tick`], then read the
//! [`Transcript`]. The [`command`] module exposes the traits for plugging in extra commands.

mod builtin;
pub mod catalog;
pub mod command;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
mod interpreter;
pub mod parser;
pub mod shell;
pub mod station;
pub mod ticker;
pub mod tracker;
pub mod transcript;

/// Just a convenient re-export of the command interpreter.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::{Interpreter, StatusSnapshot};

pub use config::Config;
pub use engine::{Mode, TickOutcome};
pub use error::BrewError;
pub use transcript::Transcript;
