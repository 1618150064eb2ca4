use core::fmt;

use crate::config::Config;
use crate::constants::programs::{ARGS_MAX, NAME_MAX, PROGRAM_MAX};
use crate::error::Error;
use crate::hal::Machine;
use crate::share::ShareArena;
use crate::terminal::Console;
use crate::text::{split_any, split_on};
use crate::{log_debug, log_info, log_warn};

const LOG_ORIGIN: &str = "shell";

/// Program entry point. The result is informational only; programs report
/// outcomes through the console.
pub type ProgramFn = fn(&mut Context<'_>, &Args<'_>) -> i32;

/// Command registry entry
#[derive(Clone, Copy)]
pub struct Program {
    pub name: &'static str,
    pub help: &'static str,
    pub main: ProgramFn,
}

/// Fixed-capacity, append-only program table, filled once at boot.
pub struct Registry {
    programs: [Option<Program>; PROGRAM_MAX],
    count: usize,
}

impl Registry {
    pub const fn new() -> Self {
        Registry {
            programs: [None; PROGRAM_MAX],
            count: 0,
        }
    }

    /// Appends a program. Duplicate names are accepted; lookups resolve to
    /// the earliest registration.
    pub fn register(&mut self, name: &'static str, help: &'static str, main: ProgramFn) -> Result<(), Error> {
        if name.is_empty() || name.len() > NAME_MAX {
            return Err(Error::InvalidName);
        }
        if self.count == PROGRAM_MAX {
            return Err(Error::RegistryFull);
        }
        self.programs[self.count] = Some(Program { name, help, main });
        self.count += 1;
        log_debug!(LOG_ORIGIN, "registered '{}'", name);
        Ok(())
    }

    /// Find program by name (exact, case-sensitive, first match wins)
    pub fn find(&self, name: &str) -> Option<&Program> {
        self.iter().find(|program| program.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Program> {
        self.programs[..self.count].iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens of one command line: the program name followed by at most
/// `ARGS_MAX - 1` arguments. Borrowed from the line, so it lives exactly
/// as long as the dispatch that parsed it.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    tokens: [&'a str; ARGS_MAX],
    len: usize,
}

impl<'a> Args<'a> {
    /// Splits on single spaces. Tokens past `ARGS_MAX` are dropped.
    pub fn parse(line: &'a str) -> Self {
        let mut tokens = [""; ARGS_MAX];
        let mut len = 0;
        for token in split_on(line, ' ') {
            if len == ARGS_MAX {
                log_debug!(LOG_ORIGIN, "dropping extra arguments");
                break;
            }
            tokens[len] = token;
            len += 1;
        }
        Args { tokens, len }
    }

    pub fn name(&self) -> &'a str {
        self.tokens[0]
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.as_slice().get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens[..self.len]
    }

    /// Everything after the program name.
    pub fn operands(&self) -> &[&'a str] {
        self.as_slice().get(1..).unwrap_or(&[])
    }
}

/// What a running program may touch.
pub struct Context<'k> {
    pub console: &'k mut dyn Console,
    pub programs: &'k Registry,
    pub share: &'k mut ShareArena,
    pub config: &'k mut Config,
    pub machine: &'k mut dyn Machine,
}

impl Context<'_> {
    /// Writes program output. Output that does not fit is truncated.
    pub fn print(&mut self, args: fmt::Arguments) {
        if self.console.write_fmt(args).is_err() {
            log_warn!(LOG_ORIGIN, "program output truncated");
        }
    }
}

#[macro_export]
macro_rules! out {
    ($ctx:expr, $($arg:tt)*) => ($ctx.print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! outln {
    ($ctx:expr) => ($crate::out!($ctx, "\n"));
    ($ctx:expr, $($arg:tt)*) => ($crate::out!($ctx, "{}\n", format_args!($($arg)*)));
}

/// Runs one command line. Blank lines do nothing; unknown names print a
/// message. Returns the program's result when one ran.
pub fn dispatch(ctx: &mut Context<'_>, line: &str) -> Option<i32> {
    if split_any(line, &[' ']).next().is_none() {
        return None;
    }

    let args = Args::parse(line);
    let main = match ctx.programs.find(args.name()) {
        Some(program) => program.main,
        None => {
            log_info!(LOG_ORIGIN, "unknown program '{}'", args.name());
            out!(ctx, "Program {} doesn't exist\n", args.name());
            return None;
        }
    };

    log_debug!(LOG_ORIGIN, "running '{}' with {} args", args.name(), args.len());
    Some(main(ctx, &args))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Session;

    fn ok(_: &mut Context<'_>, _: &Args<'_>) -> i32 {
        0
    }

    fn echo_count(ctx: &mut Context<'_>, args: &Args<'_>) -> i32 {
        outln!(ctx, "{}", args.len());
        args.len() as i32
    }

    #[test]
    fn args_take_at_most_four_tokens() {
        let args = Args::parse("upcase hi there");
        assert_eq!(args.as_slice(), ["upcase", "hi", "there"]);
        assert_eq!(args.operands(), ["hi", "there"]);

        let args = Args::parse("p a b c d e");
        assert_eq!(args.as_slice(), ["p", "a", "b", "c"]);
        assert_eq!(args.get(4), None);
    }

    #[test]
    fn args_of_a_bare_name() {
        let args = Args::parse("help");
        assert_eq!(args.name(), "help");
        assert!(args.operands().is_empty());
    }

    #[test]
    fn register_validates_and_caps() {
        let mut registry = Registry::new();
        assert_eq!(registry.register("", "", ok), Err(Error::InvalidName));
        assert_eq!(
            registry.register("a-name-that-is-way-too-long-to-fit", "", ok),
            Err(Error::InvalidName)
        );
        for _ in 0..PROGRAM_MAX {
            registry.register("p", "", ok).unwrap();
        }
        assert_eq!(registry.register("q", "", ok), Err(Error::RegistryFull));
        assert_eq!(registry.len(), PROGRAM_MAX);
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let mut registry = Registry::new();
        registry.register("Help", "", ok).unwrap();
        assert!(registry.find("help").is_none());
        assert!(registry.find("Hel").is_none());
        assert!(registry.find("Help").is_some());
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = Registry::new();
        registry.register("dup", "first", ok).unwrap();
        registry.register("dup", "second", ok).unwrap();
        assert_eq!(registry.find("dup").map(|p| p.help), Some("first"));
    }

    #[test]
    fn unknown_program_reports_and_leaves_registry_alone() {
        let mut session = Session::new();
        session.programs.register("known", "", ok).unwrap();
        assert_eq!(session.dispatch("zzz"), None);
        assert_eq!(session.console.text, "Program zzz doesn't exist\n");
        assert_eq!(session.programs.len(), 1);
    }

    #[test]
    fn empty_line_is_a_no_op() {
        let mut session = Session::new();
        assert_eq!(session.dispatch(""), None);
        assert_eq!(session.dispatch("   "), None);
        assert!(session.console.text.is_empty());
    }

    #[test]
    fn handler_receives_tokens_and_result_is_returned() {
        let mut session = Session::new();
        session.programs.register("count", "", echo_count).unwrap();
        assert_eq!(session.dispatch("count a b c d e"), Some(4));
        assert_eq!(session.console.text, "4\n");
    }
}
