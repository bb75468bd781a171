//! Shell variables for pucsh
//!
//! Variables live in the shell process. An exported variable is also mirrored
//! into the process environment so that children inherit it.
//!
//! - `NAME=value` on a line of its own sets a variable
//! - `export NAME[=value]` marks it exported
//! - `$NAME` / `${NAME}` expand to the value, falling back to the environment
//! - `$?` expands to the exit status of the previous command

use std::collections::BTreeMap;
use std::env;

/// One stored variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub value: String,
    pub exported: bool,
}

/// Variable table, kept sorted by name so `set` lists it in order
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    vars: BTreeMap<String, Variable>,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, keeping its exported flag if it already had one
    pub fn set(&mut self, name: &str, value: &str) {
        let exported = self.vars.get(name).is_some_and(|v| v.exported);
        if exported {
            env::set_var(name, value);
        }
        self.vars.insert(
            name.to_string(),
            Variable {
                value: value.to_string(),
                exported,
            },
        );
    }

    /// Mark a variable exported, optionally assigning it first.
    ///
    /// Exporting an unknown name without a value adopts the environment's
    /// value, or the empty string.
    pub fn export(&mut self, name: &str, value: Option<&str>) {
        let value = match value {
            Some(v) => v.to_string(),
            None => self.lookup(name),
        };
        env::set_var(name, &value);
        self.vars.insert(
            name.to_string(),
            Variable {
                value,
                exported: true,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// Value of a shell variable, else of the environment, else empty
    pub fn lookup(&self, name: &str) -> String {
        match self.vars.get(name) {
            Some(var) => var.value.clone(),
            None => env::var(name).unwrap_or_default(),
        }
    }

    /// Remove a variable, and its environment entry if it was exported
    pub fn unset(&mut self, name: &str) -> bool {
        match self.vars.remove(name) {
            Some(var) => {
                if var.exported {
                    env::remove_var(name);
                }
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> + '_ {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Expand `$?`, `$NAME` and `${NAME}` inside a word.
    ///
    /// A `$` not followed by a name is kept literally.
    pub fn expand_word(&self, word: &str, last_status: i32) -> String {
        if !word.contains('$') {
            return word.to_string();
        }

        let mut out = String::with_capacity(word.len());
        let mut rest = word;
        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('?') {
                out.push_str(&last_status.to_string());
                rest = tail;
            } else if let Some(braced) = after.strip_prefix('{') {
                match braced.find('}') {
                    Some(end) if is_valid_name(&braced[..end]) => {
                        out.push_str(&self.lookup(&braced[..end]));
                        rest = &braced[end + 1..];
                    }
                    _ => {
                        out.push('$');
                        rest = after;
                    }
                }
            } else {
                let len = name_prefix_len(after);
                if len == 0 {
                    out.push('$');
                } else {
                    out.push_str(&self.lookup(&after[..len]));
                }
                rest = &after[len..];
            }
        }
        out.push_str(rest);
        out
    }
}

/// Length of the longest variable name at the start of `s`
fn name_prefix_len(s: &str) -> usize {
    let mut len = 0;
    for (i, c) in s.char_indices() {
        let ok = if i == 0 {
            c == '_' || c.is_ascii_alphabetic()
        } else {
            c == '_' || c.is_ascii_alphanumeric()
        };
        if !ok {
            break;
        }
        len = i + c.len_utf8();
    }
    len
}

/// Is this a legal variable name?
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name_prefix_len(name) == name.len()
}

/// Split `NAME=value` into its parts if the name is legal
pub fn parse_assignment(word: &str) -> Option<(&str, &str)> {
    let (name, value) = word.split_once('=')?;
    if is_valid_name(name) {
        Some((name, value))
    } else {
        None
    }
}
