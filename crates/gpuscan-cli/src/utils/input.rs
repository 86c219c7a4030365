//! Interactive prompts for the uninstall flow.
//!
//! [`PromptConfirmation`] implements the core `ConfirmationPort` over any
//! reader/writer pair so the menu loop can be exercised with in-memory
//! buffers.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use gpuscan_core::ports::{is_confirmation, parse_menu_choice};
use gpuscan_core::{ConfirmationPort, MenuChoice};

use crate::presentation::uninstall::{CONFIRM_PROMPT, EXIT_PROMPT, MENU, MENU_PROMPT};

struct Console<R, W> {
    input: R,
    output: W,
}

/// Confirmation port that asks on `output` and reads answers from `input`.
pub struct PromptConfirmation<R, W> {
    console: Mutex<Console<R, W>>,
}

/// Prompts on the terminal.
pub type ConsoleConfirmation = PromptConfirmation<BufReader<Stdin>, Stdout>;

impl ConsoleConfirmation {
    pub fn console() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> PromptConfirmation<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self {
            console: Mutex::new(Console { input, output }),
        }
    }

    /// Hand back the writer, e.g. to inspect what was prompted.
    pub fn into_output(self) -> W {
        self.console
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .output
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Print `prompt` and read one line. End of input is an error: the flow
    /// cannot continue without an answer.
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead + Send, W: Write + Send> ConfirmationPort for PromptConfirmation<R, W> {
    fn choose_action(&self) -> io::Result<MenuChoice> {
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        write!(console.output, "\n{MENU}")?;
        loop {
            let answer = console.ask(MENU_PROMPT)?;
            if let Some(choice) = parse_menu_choice(&answer) {
                return Ok(choice);
            }
            writeln!(console.output, "Invalid option, enter 1 or 2.")?;
        }
    }

    fn confirm_uninstall(&self) -> io::Result<bool> {
        let mut console = self.console.lock().unwrap_or_else(PoisonError::into_inner);
        let answer = console.ask(CONFIRM_PROMPT)?;
        Ok(is_confirmation(&answer))
    }
}

/// Answers "proceed" and "yes" without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl ConfirmationPort for AssumeYes {
    fn choose_action(&self) -> io::Result<MenuChoice> {
        Ok(MenuChoice::Proceed)
    }

    fn confirm_uninstall(&self) -> io::Result<bool> {
        Ok(true)
    }
}

/// Print [`EXIT_PROMPT`] and block until a line (or end of input) arrives.
pub fn wait_for_enter<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<()> {
    write!(output, "{EXIT_PROMPT}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
