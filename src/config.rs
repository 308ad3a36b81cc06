use argh::FromArgs;
use std::time::Duration;

#[derive(FromArgs, Debug, Clone, PartialEq, Eq)]
/// Gothic barista terminal: brew two drinks to reveal the surprise.
pub struct Config {
    #[argh(option, default = "1000")]
    /// milliseconds between brewing ticks (one tick is one brewing second)
    pub tick_ms: u64,

    #[argh(option, default = "2")]
    /// number of distinct drinks that completes the session
    pub target: usize,

    #[argh(option, default = "3")]
    /// seconds between the last completed drink and the finale
    pub finale_delay_secs: u64,

    #[argh(option, default = "String::from(\"warn\")")]
    /// log filter used when RUST_LOG is not set
    pub log_level: String,

    #[argh(switch)]
    /// do not print the welcome banner
    pub no_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            target: 2,
            finale_delay_secs: 3,
            log_level: "warn".to_string(),
            no_banner: false,
        }
    }
}

impl Config {
    /// Period of the tick source; never zero.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn finale_delay(&self) -> Duration {
        Duration::from_secs(self.finale_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_argh_defaults() {
        let parsed = Config::from_args(&["barista"], &[]).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let parsed = Config::from_args(
            &["barista"],
            &["--tick-ms", "50", "--target", "1", "--no-banner"],
        )
        .unwrap();
        assert_eq!(parsed.tick_period(), Duration::from_millis(50));
        assert_eq!(parsed.target, 1);
        assert!(parsed.no_banner);
    }

    #[test]
    fn test_zero_tick_period_is_clamped() {
        let config = Config {
            tick_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.tick_period(), Duration::from_millis(1));
    }
}
