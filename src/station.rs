use crate::catalog::Catalog;
use crate::engine::Engine;
use crate::tracker::SessionTracker;

/// Mutable state shared by every station command.
///
/// The request flags are set by commands and consumed by the interpreter after the command
/// returns, the same way a REPL loop checks an exit flag.
#[derive(Debug)]
pub struct Station {
    pub catalog: Catalog,
    pub engine: Engine,
    pub tracker: SessionTracker,
    /// Set by `clear`; the interpreter empties the transcript.
    pub clear_requested: bool,
    /// Set by `exit`; the shell loop should terminate.
    pub should_exit: bool,
}

impl Station {
    pub fn new(catalog: Catalog, target: usize) -> Self {
        Self {
            catalog,
            engine: Engine::new(),
            tracker: SessionTracker::new(target),
            clear_requested: false,
            should_exit: false,
        }
    }
}
