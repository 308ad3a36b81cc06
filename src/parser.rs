use regex::Regex;
use std::sync::LazyLock;

/// `action` is the first word, `argument` everything after the first whitespace run.
static COMMAND_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<action>\S+)(?:\s+(?P<argument>.*))?$").expect("command line pattern")
});

/// A tokenized input line.
///
/// Both parts are lowercase. An empty `action` means the line was blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLine {
    pub action: String,
    pub argument: String,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.action.is_empty()
    }
}

/// Split a raw line into action and argument.
pub fn parse(raw: &str) -> ParsedLine {
    let line = raw.trim().to_lowercase();
    match COMMAND_LINE.captures(&line) {
        Some(caps) => ParsedLine {
            action: caps["action"].to_string(),
            argument: caps
                .name("argument")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        },
        None => ParsedLine::default(),
    }
}
