use thiserror::Error;

/// Recoverable, user-visible failures of station commands.
///
/// Every variant renders as a single transcript line through `Display`; [`BrewError::hint`]
/// supplies the optional follow-up line pointing toward a fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrewError {
    /// `view`/`make` query matched no recipe.
    #[error("❌ ERROR: Recipe not found")]
    RecipeNotFound { available: Vec<String> },
    /// `make` while another session is live, paused or not.
    #[error("❌ ERROR: Already brewing! Wait for current process to complete.")]
    AlreadyBrewing,
    /// `make` on a recipe that is already in the completion set.
    #[error("✅ {name} already completed!")]
    AlreadyCompleted { name: String },
    /// `view`/`make` without a target.
    #[error("❌ ERROR: Please specify a recipe name")]
    MissingArgument {
        command: String,
        available: Vec<String>,
    },
    #[error("❌ ERROR: Unknown command")]
    UnknownCommand,
}

impl BrewError {
    /// Second line shown under the error, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            BrewError::RecipeNotFound { available } => {
                Some(format!("💡 Available recipes: {}", available.join(", ")))
            }
            BrewError::MissingArgument { command, available } => {
                let tries: Vec<String> = available
                    .iter()
                    .map(|name| format!("{} {}", command, name))
                    .collect();
                Some(format!("💡 Try: {}", tries.join(" or ")))
            }
            BrewError::UnknownCommand => {
                Some("💡 Type \"help\" for available commands".to_string())
            }
            BrewError::AlreadyBrewing | BrewError::AlreadyCompleted { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_hint_lists_every_recipe() {
        let err = BrewError::MissingArgument {
            command: "view".to_string(),
            available: vec!["americano".to_string(), "hot chocolate".to_string()],
        };
        assert_eq!(err.to_string(), "❌ ERROR: Please specify a recipe name");
        assert_eq!(
            err.hint().unwrap(),
            "💡 Try: view americano or view hot chocolate"
        );
    }

    #[test]
    fn test_not_found_hint_lists_available() {
        let err = BrewError::RecipeNotFound {
            available: vec!["americano".to_string(), "hot chocolate".to_string()],
        };
        assert_eq!(err.to_string(), "❌ ERROR: Recipe not found");
        assert_eq!(
            err.hint().unwrap(),
            "💡 Available recipes: americano, hot chocolate"
        );
        assert!(BrewError::AlreadyBrewing.hint().is_none());
    }

    #[test]
    fn test_already_completed_has_no_hint() {
        let err = BrewError::AlreadyCompleted {
            name: "AMERICANO".to_string(),
        };
        assert_eq!(err.to_string(), "✅ AMERICANO already completed!");
        assert!(err.hint().is_none());
    }
}
