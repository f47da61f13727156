use crate::emulator::{ArgValue, ArgumentType, EmulatorDefinition};

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
};

/// A fully resolved emulator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandLine {
    /// Executable to spawn.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Raw argument values, unquoted, in emission order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Display tokens: program first, each quoted when it contains whitespace.
    pub fn tokens(&self) -> Vec<String> {
        std::iter::once(quote(&self.program.to_string_lossy()))
            .chain(self.args.iter().map(|a| quote(a)))
            .collect()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

/// Build the invocation for `def` from a tag's argument values.
///
/// Arguments are visited in declared order. Absent values are skipped,
/// toggles emit only their flag and only when set, flagged arguments emit
/// `flag value`, and unflagged arguments emit the value positionally.
pub fn build_command_line(
    def: &EmulatorDefinition,
    config: &BTreeMap<String, ArgValue>,
) -> CommandLine {
    let mut args = Vec::with_capacity(def.arguments.len() * 2);

    for arg in &def.arguments {
        let Some(value) = config.get(&arg.name) else {
            continue;
        };

        match (arg.arg_type, arg.flag()) {
            (ArgumentType::Toggle, Some(flag)) => {
                if value.is_truthy() {
                    args.push(flag.to_string());
                }
            }
            (ArgumentType::Toggle, None) => {}
            (_, Some(flag)) => {
                args.push(flag.to_string());
                args.push(value.to_string());
            }
            (_, None) => args.push(value.to_string()),
        }
    }

    CommandLine {
        program: def.executable_path.clone(),
        args,
    }
}

/// Quote `token` as a single token when it is empty or contains whitespace or `"`.
///
/// Inner `"` is written as `\"`. Backslashes are literal except in a run that
/// ends at a `"` or at the closing quote, where the run is doubled.
pub fn quote(token: &str) -> String {
    if !token.is_empty() && !token.chars().any(|c| c.is_whitespace() || c == '"') {
        return token.to_string();
    }

    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('"');
    let mut backslashes = 0;
    for c in token.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                // Double the pending run, then escape the quote itself.
                quoted.extend(std::iter::repeat_n('\\', backslashes + 1));
                backslashes = 0;
            }
            _ => backslashes = 0,
        }
        quoted.push(c);
    }
    quoted.extend(std::iter::repeat_n('\\', backslashes));
    quoted.push('"');
    quoted
}

/// Split a command line into tokens, honouring double quotes.
///
/// Inverse of the quoting done by [`CommandLine::tokens`]: a quoted run is a
/// single token with the quotes removed and `""` is an empty token. A run of
/// backslashes before a `"` is halved, and an odd run makes that `"` literal.
/// Other backslashes are kept as written, so Windows paths survive.
pub fn split_command_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let mut run = 1;
                while chars.peek() == Some(&'\\') {
                    chars.next();
                    run += 1;
                }
                has_token = true;
                if chars.peek() == Some(&'"') {
                    current.extend(std::iter::repeat_n('\\', run / 2));
                    if run % 2 == 1 {
                        chars.next();
                        current.push('"');
                    }
                } else {
                    current.extend(std::iter::repeat_n('\\', run));
                }
            }
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if has_token {
        tokens.push(current);
    }

    tokens
}
