use crate::station::Station;
use crate::transcript::Transcript;
use anyhow::Result;

/// Object-safe trait for any command the station can execute.
///
/// Implemented by built-ins via a blanket impl and by the argument-error adapter.
pub trait ExecutableCommand {
    /// Executes the command, writing its output into the transcript.
    fn execute(self: Box<Self>, out: &mut Transcript, station: &mut Station) -> Result<()>;
}

/// Factory that tries to create a command from an action word and its argument.
///
/// Returns `None` when the factory doesn't recognize `name`.
pub trait CommandFactory {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
