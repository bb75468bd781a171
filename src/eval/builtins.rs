//! Builtins that run inside the shell process

use super::{flush_stdout, EvalError, Flow, Shell};
use crate::state::{is_valid_name, parse_assignment};
use std::env;
use std::path::PathBuf;

const HELP: &str = "\
pucsh - the PUCIT shell

Usage:
  command [args...] [< infile] [> outfile] [| command ...] [&]

  |          connect stdout of one command to stdin of the next
  < file     read standard input from file
  > file     write standard output to file (created or truncated)
  &          run the pipeline in the background (last word only)
  NAME=value set a shell variable; $NAME and $? expand in words
  !-1, !N    re-run the previous or the N-th history entry

Builtins:
  cd [dir]           change directory (default $HOME)
  exit [code]        leave the shell
  jobs               list background jobs
  kill <n>           kill background job n
  export [NAME[=v]]  export variables to child processes
  set                list shell variables
  unset NAME...      remove variables
  history            list recent commands
  help               show this message
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Exit,
    Jobs,
    Kill,
    Export,
    Set,
    Unset,
    History,
    Help,
}

impl Builtin {
    /// Recognize a builtin by its command word
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "cd" => Some(Builtin::Cd),
            "exit" => Some(Builtin::Exit),
            "jobs" => Some(Builtin::Jobs),
            "kill" => Some(Builtin::Kill),
            "export" => Some(Builtin::Export),
            "set" => Some(Builtin::Set),
            "unset" => Some(Builtin::Unset),
            "history" => Some(Builtin::History),
            "help" => Some(Builtin::Help),
            _ => None,
        }
    }
}

impl Shell {
    pub(crate) fn run_builtin(
        &mut self,
        builtin: Builtin,
        args: &[String],
    ) -> Result<Flow, EvalError> {
        tracing::debug!(?builtin, ?args, "running builtin");
        match builtin {
            Builtin::Cd => self.builtin_cd(args)?,
            Builtin::Exit => return self.builtin_exit(args),
            Builtin::Jobs => print!("{}", self.job_listing()),
            Builtin::Kill => self.builtin_kill(args)?,
            Builtin::Export => self.builtin_export(args)?,
            Builtin::Set => self.builtin_set(),
            Builtin::Unset => self.builtin_unset(args)?,
            Builtin::History => self.builtin_history(),
            Builtin::Help => print!("{}", HELP),
        }
        flush_stdout();
        Ok(Flow::Continue)
    }

    fn builtin_cd(&mut self, args: &[String]) -> Result<(), EvalError> {
        let dir = match args.first() {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = self.vars.lookup("HOME");
                if home.is_empty() {
                    return Err(EvalError::Builtin("cd: HOME not set".into()));
                }
                PathBuf::from(home)
            }
        };

        env::set_current_dir(&dir)
            .map_err(|e| EvalError::Builtin(format!("cd: {}: {}", dir.display(), e)))?;

        if let Ok(cwd) = env::current_dir() {
            env::set_var("PWD", cwd);
        }
        Ok(())
    }

    fn builtin_exit(&mut self, args: &[String]) -> Result<Flow, EvalError> {
        match args.first() {
            None => Ok(Flow::Exit(0)),
            Some(code) => code.parse::<i32>().map(Flow::Exit).map_err(|_| {
                EvalError::Builtin(format!("exit: {}: numeric argument required", code))
            }),
        }
    }

    fn builtin_kill(&mut self, args: &[String]) -> Result<(), EvalError> {
        let arg = match args {
            [arg] => arg,
            _ => return Err(EvalError::Builtin("kill: usage: kill <job number>".into())),
        };
        let number = arg
            .trim_start_matches('%')
            .parse::<usize>()
            .map_err(|_| EvalError::Builtin(format!("kill: {}: not a job number", arg)))?;

        let pid = self.supervisor.kill(number)?;
        println!("Killed job [{}] {}", number, pid);
        Ok(())
    }

    fn builtin_export(&mut self, args: &[String]) -> Result<(), EvalError> {
        if args.is_empty() {
            for (name, var) in self.vars.iter().filter(|(_, v)| v.exported) {
                println!("export {}={}", name, var.value);
            }
            return Ok(());
        }

        for arg in args {
            match parse_assignment(arg) {
                Some((name, value)) => self.vars.export(name, Some(value)),
                None if is_valid_name(arg) => self.vars.export(arg, None),
                None => {
                    return Err(EvalError::Builtin(format!(
                        "export: `{}': not a valid identifier",
                        arg
                    )))
                }
            }
        }
        Ok(())
    }

    fn builtin_set(&self) {
        for (name, var) in self.vars.iter() {
            println!("{}={}", name, var.value);
        }
    }

    fn builtin_unset(&mut self, args: &[String]) -> Result<(), EvalError> {
        for name in args {
            if !is_valid_name(name) {
                return Err(EvalError::Builtin(format!(
                    "unset: `{}': not a valid identifier",
                    name
                )));
            }
            if !self.vars.unset(name) {
                env::remove_var(name);
            }
        }
        Ok(())
    }

    fn builtin_history(&self) {
        for (n, line) in self.history.iter() {
            println!("{} {}", n, line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_names() {
        assert_eq!(Builtin::lookup("cd"), Some(Builtin::Cd));
        assert_eq!(Builtin::lookup("kill"), Some(Builtin::Kill));
        assert_eq!(Builtin::lookup("help"), Some(Builtin::Help));
        assert_eq!(Builtin::lookup("ls"), None);
        assert_eq!(Builtin::lookup("CD"), None);
    }

    #[test]
    fn help_mentions_every_builtin() {
        for name in ["cd", "exit", "jobs", "kill", "export", "set", "unset", "history", "help"] {
            assert!(HELP.contains(name), "help is missing {}", name);
            assert!(Builtin::lookup(name).is_some());
        }
    }
}
