//! Pipeline parser for pucsh
//!
//! Splits a command line on `|`, then pulls the redirections and the
//! background marker out of each stage's words. The whole line is parsed
//! before anything runs, so a malformed stage anywhere aborts the pipeline
//! without creating a single process.

use crate::ast::{Pipeline, Stage};
use crate::lexer::{is_structural, tokenize, BACKGROUND, PIPE, REDIRECT_IN, REDIRECT_OUT};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error: missing file name after '{0}'")]
    MissingRedirectTarget(String),
    #[error("syntax error: empty command in pipeline")]
    EmptyCommand,
}

/// Parse a full command line into a pipeline
pub fn parse(line: &str) -> Result<Pipeline, ParseError> {
    let texts: Vec<&str> = line.split(PIPE).collect();
    let last = texts.len() - 1;

    let mut stages = Vec::with_capacity(texts.len());
    let mut background = false;

    for (i, text) in texts.into_iter().enumerate() {
        let (stage, marked) = parse_stage(text)?;
        if marked {
            if i == last {
                background = true;
            } else {
                // The pipeline backgrounds as a unit; an interior '&' is dropped.
                tracing::debug!(stage = i, "ignoring '&' on interior pipeline stage");
            }
        }
        stages.push(stage);
    }

    Ok(Pipeline { stages, background })
}

/// Parse one stage, returning it and whether it carried a trailing `&`
fn parse_stage(text: &str) -> Result<(Stage, bool), ParseError> {
    let mut words = tokenize(text);

    let marked = words.last().is_some_and(|w| w == BACKGROUND);
    if marked {
        words.pop();
    }

    let mut argv = Vec::with_capacity(words.len());
    let mut input = None;
    let mut output = None;

    let mut words = words.into_iter();
    while let Some(word) = words.next() {
        if word != REDIRECT_IN && word != REDIRECT_OUT {
            argv.push(word);
            continue;
        }

        let target = match words.next() {
            Some(t) if !is_structural(&t) => t,
            _ => return Err(ParseError::MissingRedirectTarget(word)),
        };

        if word == REDIRECT_IN {
            input = Some(target);
        } else {
            output = Some(target);
        }
    }

    if argv.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    let stage = Stage {
        argv,
        input,
        output,
        text: text.trim().to_string(),
    };
    Ok((stage, marked))
}
