//! The one top-level value that owns every console subsystem.

use crate::config::Config;
use crate::error::Error;
use crate::hal::{Display, Machine};
use crate::programs;
use crate::share::ShareArena;
use crate::shell::{self, Context, Registry};
use crate::terminal::{Stdin, Terminal};
use crate::{log_info, log_warn};

const LOG_ORIGIN: &str = "kernel";

pub struct Kernel<'a, D: Display, M: Machine> {
    terminal: Terminal<'a, D>,
    programs: Registry,
    share: ShareArena,
    config: Config,
    machine: M,
}

impl<'a, D: Display, M: Machine> Kernel<'a, D, M> {
    /// Clears the screen, installs the built-in programs and prints the
    /// welcome banner.
    pub fn new(display: D, stdin: &'a Stdin, machine: M, config: Config) -> Result<Self, Error> {
        crate::log::set_level(config.log_level);

        let mut programs = Registry::new();
        programs::install(&mut programs)?;

        let mut kernel = Kernel {
            terminal: Terminal::new(display, stdin, config.prompt),
            programs,
            share: ShareArena::new(),
            config,
            machine,
        };
        if kernel.terminal.print(config.banner).is_err() {
            log_warn!(LOG_ORIGIN, "banner did not fit");
        }
        log_info!(LOG_ORIGIN, "console ready, search mode {}", config.search_mode);
        Ok(kernel)
    }

    pub fn terminal(&self) -> &Terminal<'a, D> {
        &self.terminal
    }

    pub fn programs(&self) -> &Registry {
        &self.programs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a command line as if it had been typed.
    pub fn dispatch(&mut self, line: &str) -> Option<i32> {
        let mut ctx = Context {
            console: &mut self.terminal,
            programs: &self.programs,
            share: &mut self.share,
            config: &mut self.config,
            machine: &mut self.machine,
        };
        let result = shell::dispatch(&mut ctx, line);
        self.terminal.render();
        result
    }

    /// One prompt / read / dispatch cycle. `poll` runs between renders
    /// while waiting for the line.
    pub fn enter(&mut self, poll: impl FnMut()) -> Option<i32> {
        let prompt = self.terminal.prompt();
        if self.terminal.print(prompt).is_err() {
            log_warn!(LOG_ORIGIN, "prompt did not fit");
        }
        let line = self.terminal.read_line(poll);
        self.dispatch(line.as_str())
    }

    pub fn run(&mut self, mut poll: impl FnMut()) -> ! {
        loop {
            self.enter(&mut poll);
        }
    }
}
