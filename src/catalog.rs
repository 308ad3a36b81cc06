//! Static registry of brewable recipes.

/// Multiple-choice checkpoint attached to a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    /// Options in display order; users refer to them by 1-based index.
    pub options: Vec<String>,
    /// Must be one of `options`.
    pub correct: String,
    pub hint: String,
}

impl Question {
    /// 1-based index of the correct option.
    pub fn correct_index(&self) -> Option<usize> {
        self.options
            .iter()
            .position(|option| *option == self.correct)
            .map(|i| i + 1)
    }
}

/// Immutable definition of a drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub machine: String,
    pub duration_secs: u32,
    pub artwork: String,
    pub question: Question,
}

impl Recipe {
    /// Elapsed second at which the question gate opens.
    ///
    /// `None` when `floor(duration / 2)` does not fall strictly inside the brew, in which
    /// case the recipe brews straight through.
    pub fn question_threshold(&self) -> Option<u32> {
        let threshold = self.duration_secs / 2;
        (threshold > 0 && threshold < self.duration_secs).then_some(threshold)
    }

    /// Brews for at least a second and its question's answer is one of the options.
    pub fn is_well_formed(&self) -> bool {
        self.duration_secs > 0 && self.question.correct_index().is_some()
    }
}

/// Read-only lookup over a fixed list of recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        debug_assert!(
            recipes.iter().all(Recipe::is_well_formed),
            "recipes need a non-zero duration and a correct option among their options"
        );
        Self { recipes }
    }

    /// The two drinks served at the station.
    pub fn builtin() -> Self {
        Self::new(vec![americano(), hot_chocolate()])
    }

    /// Case-insensitive substring lookup; the first recipe in catalog order wins.
    pub fn find(&self, query: &str) -> Option<&Recipe> {
        let needle = query.trim().to_lowercase();
        self.recipes
            .iter()
            .find(|recipe| recipe.name.to_lowercase().contains(&needle))
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Lowercase names, in catalog order, as users type them.
    pub fn names(&self) -> Vec<String> {
        self.recipes.iter().map(|r| r.name.to_lowercase()).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn artwork(title: &str) -> String {
    const INNER: usize = 40;
    let mut rows = vec![
        format!("    ╔{}╗", "═".repeat(INNER)),
        format!("    ║{:^40}║", title),
        format!("    ║{}║", " ".repeat(INNER)),
    ];
    let bar = format!("    ║    {}    ║", "█".repeat(INNER - 8));
    rows.extend(std::iter::repeat_n(bar, 6));
    rows.push(format!("    ╚{}╝", "═".repeat(INNER)));
    rows.join("\n")
}

fn americano() -> Recipe {
    Recipe {
        name: "AMERICANO".to_string(),
        ingredients: strings(&["FRESH COFFEE BEANS", "HOT WATER", "ESPRESSO MACHINE"]),
        steps: strings(&[
            "GRIND COFFEE BEANS TO FINE CONSISTENCY",
            "TAMP GROUNDS INTO PORTAFILTER",
            "EXTRACT 30ML ESPRESSO SHOT",
            "ADD 120ML HOT WATER TO DILUTE",
            "SERVE IMMEDIATELY",
        ]),
        machine: "ESPRESSO MACHINE".to_string(),
        duration_secs: 60,
        artwork: artwork("☕ AMERICANO ☕"),
        question: Question {
            prompt: "How many ml of hot water should you add to dilute the espresso?"
                .to_string(),
            options: strings(&["90ml", "120ml", "150ml", "180ml"]),
            correct: "120ml".to_string(),
            hint: "Check step 4 in the recipe: ADD 120ML HOT WATER TO DILUTE".to_string(),
        },
    }
}

fn hot_chocolate() -> Recipe {
    Recipe {
        name: "HOT CHOCOLATE".to_string(),
        ingredients: strings(&["COCOA POWDER", "MILK", "SUGAR", "WHISK"]),
        steps: strings(&[
            "HEAT MILK TO 70°C IN SAUCEPAN",
            "MIX COCOA POWDER WITH SUGAR",
            "ADD HOT MILK TO COCOA MIXTURE",
            "WHISK UNTIL SMOOTH AND FROTHY",
            "SERVE WITH MARSHMALLOWS",
        ]),
        machine: "STOVETOP".to_string(),
        duration_secs: 60,
        artwork: artwork("🍫 HOT CHOCOLATE 🍫"),
        question: Question {
            prompt: "What temperature should you heat the milk to?".to_string(),
            options: strings(&["60°C", "70°C", "80°C", "90°C"]),
            correct: "70°C".to_string(),
            hint: "Check step 1 in the recipe: HEAT MILK TO 70°C IN SAUCEPAN".to_string(),
        },
    }
}
