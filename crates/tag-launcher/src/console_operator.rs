//! Console-backed [`Operator`].
//!
//! Lines typed at the terminal arrive through a bounded channel fed by the
//! keyboard forwarder. Between prompts they are parsed as commands; while a
//! prompt is open they are answers. Prompts never block on the channel: they
//! poll it, pumping the serial reader between polls. Typing `q` at a prompt
//! cancels it and the quit is delivered as the next command.

use std::{
    io::Write,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use tag_launcher_core::{Operator, OperatorCommand, Pump};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info};

/// Answer that abandons any prompt.
pub(crate) const CANCEL_WORD: &str = "cancel";

/// The human at the terminal.
pub struct ConsoleOperator<W> {
    lines: mpsc::Receiver<String>,
    out: W,
    poll_interval: Duration,
    input_closed: bool,
    quit_requested: bool,
}

impl<W: Write> ConsoleOperator<W> {
    /// Read answers from `lines`, write prompts to `out`.
    pub(crate) fn new(lines: mpsc::Receiver<String>, out: W, poll_interval: Duration) -> Self {
        Self {
            lines,
            out,
            poll_interval,
            input_closed: false,
            quit_requested: false,
        }
    }

    /// Where prompts were written.
    #[cfg(test)]
    pub(crate) fn output(&self) -> &W {
        &self.out
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn ask(&mut self, text: &str) {
        let _ = write!(self.out, "{} ", text);
        let _ = self.out.flush();
    }

    /// Wait for the next answer. `None` on `cancel`, `q` or end of input.
    fn read_answer(&mut self, pump: &mut dyn Pump) -> Option<String> {
        if self.quit_requested {
            return None;
        }
        loop {
            match self.lines.try_recv() {
                Ok(line) => {
                    let answer = line.trim();
                    if answer.eq_ignore_ascii_case(CANCEL_WORD) {
                        return None;
                    }
                    if OperatorCommand::parse(answer) == Some(OperatorCommand::Quit) {
                        info!("Quit typed at a prompt, cancelling it");
                        self.quit_requested = true;
                        return None;
                    }
                    return Some(answer.to_string());
                }
                Err(TryRecvError::Empty) => {
                    pump.pump();
                    thread::sleep(self.poll_interval);
                }
                Err(TryRecvError::Disconnected) => {
                    self.note_input_closed();
                    return None;
                }
            }
        }
    }

    fn note_input_closed(&mut self) {
        if !self.input_closed {
            self.input_closed = true;
            info!("Console input closed, prompts will be cancelled");
        }
    }

    fn list(&mut self, options: &[String], default: Option<usize>) {
        for (i, option) in options.iter().enumerate() {
            let marker = if Some(i) == default { " (default)" } else { "" };
            self.say(&format!("  {}) {}{}", i + 1, option, marker));
        }
    }
}

impl<W: Write> Operator for ConsoleOperator<W> {
    fn next_command(&mut self) -> Option<OperatorCommand> {
        if std::mem::take(&mut self.quit_requested) {
            return Some(OperatorCommand::Quit);
        }
        loop {
            match self.lines.try_recv() {
                Ok(line) => match OperatorCommand::parse(&line) {
                    Some(command) => return Some(command),
                    None if line.trim().is_empty() => {}
                    None => {
                        debug!(line = %line.trim(), "Ignoring unknown command");
                        self.say("Commands: a (add), d (delete), e (register emulator), done, q (quit)");
                    }
                },
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.note_input_closed();
                    return None;
                }
            }
        }
    }

    fn notify(&mut self, message: &str) {
        self.say(message);
    }

    fn confirm(&mut self, pump: &mut dyn Pump, question: &str) -> bool {
        loop {
            self.ask(&format!("{} [y/n]", question));
            let Some(answer) = self.read_answer(pump) else {
                return false;
            };
            match parse_yes_no(&answer) {
                Some(yes) => return yes,
                None => self.say("Please answer y or n."),
            }
        }
    }

    fn choose(
        &mut self,
        pump: &mut dyn Pump,
        title: &str,
        options: &[String],
        default: Option<usize>,
    ) -> Option<usize> {
        self.say(title);
        self.list(options, default);
        loop {
            self.ask("Number:");
            let answer = self.read_answer(pump)?;
            if answer.is_empty()
                && let Some(default) = default.filter(|d| *d < options.len())
            {
                return Some(default);
            }
            match parse_choice(&answer, options.len()) {
                Some(index) => return Some(index),
                None => self.say(&format!("Enter a number from 1 to {}.", options.len())),
            }
        }
    }

    fn choose_many(
        &mut self,
        pump: &mut dyn Pump,
        title: &str,
        options: &[String],
    ) -> Option<Vec<usize>> {
        self.say(title);
        self.list(options, None);
        loop {
            self.ask("Numbers separated by commas:");
            let answer = self.read_answer(pump)?;
            match parse_choices(&answer, options.len()) {
                Some(indices) => return Some(indices),
                None => self.say(&format!("Enter numbers from 1 to {}.", options.len())),
            }
        }
    }

    fn ask_text(
        &mut self,
        pump: &mut dyn Pump,
        label: &str,
        default: Option<&str>,
    ) -> Option<String> {
        match default {
            Some(default) => self.ask(&format!("{} [{}]:", label, default)),
            None => self.ask(&format!("{}:", label)),
        }
        let answer = self.read_answer(pump)?;
        if answer.is_empty() {
            return Some(default.unwrap_or_default().to_string());
        }
        Some(answer)
    }

    fn pick_file(
        &mut self,
        pump: &mut dyn Pump,
        title: &str,
        start_dir: Option<&Path>,
    ) -> Option<PathBuf> {
        self.say(title);
        if let Some(dir) = start_dir {
            self.say(&format!("  Relative paths start in {}", dir.display()));
        }
        loop {
            self.ask("Path:");
            let answer = self.read_answer(pump)?;
            match resolve_path(&answer, start_dir) {
                Some(path) => return Some(path),
                None => self.say("Enter a path, or cancel."),
            }
        }
    }
}

/// `y`/`yes` or `n`/`no`, any case.
pub(crate) fn parse_yes_no(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// One-based option number to zero-based index.
pub(crate) fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let number: usize = answer.trim().parse().ok()?;
    (1..=len).contains(&number).then(|| number - 1)
}

/// Comma or space separated option numbers, deduplicated in entry order.
/// An empty answer selects nothing.
pub(crate) fn parse_choices(answer: &str, len: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for part in answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        let index = parse_choice(part, len)?;
        if !indices.contains(&index) {
            indices.push(index);
        }
    }
    Some(indices)
}

/// Strip surrounding quotes and resolve relative paths against `start_dir`.
pub(crate) fn resolve_path(answer: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    let trimmed = answer.trim().trim_matches('"').trim_matches('\'');
    if trimmed.is_empty() {
        return None;
    }

    let path = PathBuf::from(trimmed);
    match start_dir {
        Some(dir) if path.is_relative() => Some(dir.join(path)),
        _ => Some(path),
    }
}
