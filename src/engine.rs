//! The timed brewing state machine.
//!
//! At most one [`BrewSession`] is live. The engine never owns a timer itself: it publishes
//! the generation the tick source should be running for through [`Engine::armed_tick`], and
//! every tick carries the generation it was armed with. A tick from a superseded generation
//! (the session paused, resumed or finished in the meantime) is rejected untouched.

use crate::catalog::{Question, Recipe};
use crate::error::BrewError;
use crate::tracker::CompletionSet;
use tracing::{debug, info};

/// A recipe being brewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewSession {
    recipe: Recipe,
    elapsed_secs: u32,
    /// Sticky for the lifetime of the session.
    question_asked: bool,
}

impl BrewSession {
    fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            elapsed_secs: 0,
            question_asked: false,
        }
    }

    fn gate_crossed(&self) -> bool {
        !self.question_asked
            && self
                .recipe
                .question_threshold()
                .is_some_and(|threshold| self.elapsed_secs >= threshold)
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn question_asked(&self) -> bool {
        self.question_asked
    }
}

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Idle,
    Brewing(BrewSession),
    /// Waiting for the answer to the session recipe's question.
    Paused(BrewSession),
}

/// How submitted lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Answering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrewStatus {
    Idle,
    Brewing {
        recipe_name: String,
        elapsed_secs: u32,
        total_secs: u32,
        paused: bool,
    },
}

impl BrewStatus {
    /// Rounded completion percentage; 0 when idle.
    pub fn percent(&self) -> u32 {
        match self {
            BrewStatus::Idle => 0,
            BrewStatus::Brewing {
                elapsed_secs,
                total_secs,
                ..
            } => (f64::from(*elapsed_secs) / f64::from(*total_secs) * 100.0).round() as u32,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Wrong generation or no running session; nothing changed.
    Stale,
    Advanced { elapsed_secs: u32 },
    /// The session paused on its question.
    QuestionAsked(Question),
    /// The session finished and was cleared.
    Completed(Recipe),
}

#[derive(Debug, Default)]
pub struct Engine {
    phase: Phase,
    generation: u64,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin brewing `recipe`.
    ///
    /// Completed recipes are refused before the live-session check, so a finished drink
    /// always reports `AlreadyCompleted`.
    pub fn start(&mut self, recipe: &Recipe, completed: &CompletionSet) -> Result<(), BrewError> {
        if completed.contains(&recipe.name) {
            return Err(BrewError::AlreadyCompleted {
                name: recipe.name.clone(),
            });
        }
        if let Some(session) = self.session() {
            debug!(current = %session.recipe.name, requested = %recipe.name, "brew refused");
            return Err(BrewError::AlreadyBrewing);
        }
        self.generation += 1;
        self.phase = Phase::Brewing(BrewSession::new(recipe.clone()));
        info!(recipe = %recipe.name, generation = self.generation, "brew started");
        Ok(())
    }

    /// Advance the running session by one second.
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let mut session = match std::mem::take(&mut self.phase) {
            Phase::Brewing(session) if generation == self.generation => session,
            other => {
                self.phase = other;
                debug!(generation, current = self.generation, "discarding stale tick");
                return TickOutcome::Stale;
            }
        };

        session.elapsed_secs += 1;

        if session.gate_crossed() {
            session.question_asked = true;
            let question = session.recipe.question.clone();
            info!(
                recipe = %session.recipe.name,
                elapsed = session.elapsed_secs,
                "brew paused for question"
            );
            self.phase = Phase::Paused(session);
            return TickOutcome::QuestionAsked(question);
        }

        if session.elapsed_secs >= session.recipe.duration_secs {
            info!(recipe = %session.recipe.name, "brew completed");
            return TickOutcome::Completed(session.recipe);
        }

        let elapsed_secs = session.elapsed_secs;
        self.phase = Phase::Brewing(session);
        TickOutcome::Advanced { elapsed_secs }
    }

    /// Continue a paused session from where it stopped. No-op unless paused.
    pub fn resume(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            Phase::Paused(session) => {
                self.generation += 1;
                info!(
                    recipe = %session.recipe.name,
                    elapsed = session.elapsed_secs,
                    generation = self.generation,
                    "brew resumed"
                );
                self.phase = Phase::Brewing(session);
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    pub fn status(&self) -> BrewStatus {
        match &self.phase {
            Phase::Idle => BrewStatus::Idle,
            Phase::Brewing(session) | Phase::Paused(session) => BrewStatus::Brewing {
                recipe_name: session.recipe.name.clone(),
                elapsed_secs: session.elapsed_secs,
                total_secs: session.recipe.duration_secs,
                paused: self.is_paused(),
            },
        }
    }

    /// Generation the tick source must run for; `None` means it must be stopped.
    pub fn armed_tick(&self) -> Option<u64> {
        match self.phase {
            Phase::Brewing(_) => Some(self.generation),
            Phase::Idle | Phase::Paused(_) => None,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.is_paused() {
            Mode::Answering
        } else {
            Mode::Normal
        }
    }

    pub fn active_question(&self) -> Option<&Question> {
        match &self.phase {
            Phase::Paused(session) => Some(&session.recipe.question),
            Phase::Idle | Phase::Brewing(_) => None,
        }
    }

    pub fn session(&self) -> Option<&BrewSession> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Brewing(session) | Phase::Paused(session) => Some(session),
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn americano() -> Recipe {
        Catalog::builtin().find("americano").unwrap().clone()
    }

    fn short(duration_secs: u32) -> Recipe {
        Recipe {
            name: "RISTRETTO".to_string(),
            duration_secs,
            ..americano()
        }
    }

    fn tick_n(engine: &mut Engine, n: u32) -> Vec<TickOutcome> {
        (0..n)
            .map(|_| {
                let generation = engine.armed_tick().unwrap_or(0);
                engine.tick(generation)
            })
            .collect()
    }

    #[test]
    fn test_start_arms_tick_source() {
        let mut engine = Engine::new();
        assert_eq!(engine.armed_tick(), None);
        engine.start(&americano(), &CompletionSet::default()).unwrap();
        assert!(engine.armed_tick().is_some());
        assert_eq!(engine.mode(), Mode::Normal);
        assert_eq!(
            engine.status(),
            BrewStatus::Brewing {
                recipe_name: "AMERICANO".to_string(),
                elapsed_secs: 0,
                total_secs: 60,
                paused: false
            }
        );
    }

    #[test]
    fn test_pauses_at_threshold_and_disarms() {
        let mut engine = Engine::new();
        engine.start(&americano(), &CompletionSet::default()).unwrap();
        let outcomes = tick_n(&mut engine, 29);
        assert_eq!(outcomes.last(), Some(&TickOutcome::Advanced { elapsed_secs: 29 }));
        assert!(!engine.is_paused());

        let generation = engine.armed_tick().unwrap();
        match engine.tick(generation) {
            TickOutcome::QuestionAsked(question) => assert_eq!(question.correct, "120ml"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(engine.is_paused());
        assert_eq!(engine.mode(), Mode::Answering);
        assert_eq!(engine.armed_tick(), None);
        assert_eq!(engine.active_question().unwrap().correct, "120ml");
    }

    #[test]
    fn test_ticks_while_paused_are_stale() {
        let mut engine = Engine::new();
        engine.start(&short(4), &CompletionSet::default()).unwrap();
        let generation = engine.armed_tick().unwrap();
        engine.tick(generation);
        engine.tick(generation);
        assert!(engine.is_paused());

        assert_eq!(engine.tick(generation), TickOutcome::Stale);
        assert_eq!(engine.session().unwrap().elapsed_secs(), 2);
    }

    #[test]
    fn test_resume_bumps_generation_and_rejects_old_ticks() {
        let mut engine = Engine::new();
        engine.start(&short(4), &CompletionSet::default()).unwrap();
        let first = engine.armed_tick().unwrap();
        tick_n(&mut engine, 2);
        assert!(engine.resume());

        let second = engine.armed_tick().unwrap();
        assert_ne!(first, second);
        assert_eq!(engine.tick(first), TickOutcome::Stale);
        assert_eq!(engine.tick(second), TickOutcome::Advanced { elapsed_secs: 3 });
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut engine = Engine::new();
        assert!(!engine.resume());
        engine.start(&americano(), &CompletionSet::default()).unwrap();
        let generation = engine.armed_tick();
        assert!(!engine.resume());
        assert_eq!(engine.armed_tick(), generation);
    }

    #[test]
    fn test_question_asked_once_per_session() {
        let mut engine = Engine::new();
        engine.start(&short(6), &CompletionSet::default()).unwrap();
        let mut asked = 0;
        for _ in 0..20 {
            if engine.is_paused() {
                engine.resume();
                continue;
            }
            let Some(generation) = engine.armed_tick() else {
                break;
            };
            if let TickOutcome::QuestionAsked(_) = engine.tick(generation) {
                asked += 1;
            }
        }
        assert_eq!(asked, 1);
        assert_eq!(engine.status(), BrewStatus::Idle);
    }

    #[test]
    fn test_completion_clears_session() {
        let mut engine = Engine::new();
        engine.start(&short(4), &CompletionSet::default()).unwrap();
        tick_n(&mut engine, 2);
        engine.resume();
        let outcomes = tick_n(&mut engine, 2);
        match outcomes.last() {
            Some(TickOutcome::Completed(recipe)) => assert_eq!(recipe.name, "RISTRETTO"),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(engine.status(), BrewStatus::Idle);
        assert_eq!(engine.armed_tick(), None);
        assert_eq!(tick_n(&mut engine, 3), vec![TickOutcome::Stale; 3]);
    }

    #[test]
    fn test_gateless_recipe_brews_straight_through() {
        let mut engine = Engine::new();
        engine.start(&short(1), &CompletionSet::default()).unwrap();
        assert!(matches!(tick_n(&mut engine, 1)[0], TickOutcome::Completed(_)));
    }

    #[test]
    fn test_start_rejects_live_session() {
        let mut engine = Engine::new();
        let catalog = Catalog::builtin();
        engine.start(&americano(), &CompletionSet::default()).unwrap();
        let err = engine
            .start(catalog.find("hot").unwrap(), &CompletionSet::default())
            .unwrap_err();
        assert_eq!(err, BrewError::AlreadyBrewing);

        tick_n(&mut engine, 30);
        assert!(engine.is_paused());
        assert!(matches!(
            engine.start(&americano(), &CompletionSet::default()),
            Err(BrewError::AlreadyBrewing)
        ));
    }

    #[test]
    fn test_percent_rounds() {
        let status = BrewStatus::Brewing {
            recipe_name: "AMERICANO".to_string(),
            elapsed_secs: 1,
            total_secs: 60,
            paused: false,
        };
        assert_eq!(status.percent(), 2);
        assert_eq!(BrewStatus::Idle.percent(), 0);
    }
}
