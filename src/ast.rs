//! Parsed form of a command line

/// One program invocation within a pipeline.
///
/// `argv` is never empty: the parser rejects stages without a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Program name followed by its arguments
    pub argv: Vec<String>,
    /// File bound to standard input (`< file`)
    pub input: Option<String>,
    /// File bound to standard output (`> file`), created or truncated
    pub output: Option<String>,
    /// The stage as the user typed it, used as the job's display text
    pub text: String,
}

impl Stage {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// Stages connected by pipes, run as a unit in the foreground or background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub stages: Vec<Stage>,
    pub background: bool,
}

impl Pipeline {
    /// Number of inter-stage pipes the pipeline needs
    pub fn pipe_count(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// The terminal stage, whose process represents the whole pipeline
    pub fn last(&self) -> &Stage {
        &self.stages[self.stages.len() - 1]
    }
}
