use crate::log::LogLevel;
use crate::search::SearchMode;

/// Runtime settings, fixed at boot except for the search mode which the
/// `mode` program may switch.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub search_mode: SearchMode,
    pub prompt: &'static str,
    pub banner: &'static str,
    pub log_level: LogLevel,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            search_mode: if cfg!(feature = "boyer-moore") {
                SearchMode::BoyerMoore
            } else {
                SearchMode::Naive
            },
            prompt: "(> ",
            banner: "Welcome to TextOS!\n",
            log_level: LogLevel::Info,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
