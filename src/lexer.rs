//! Tokenization for pucsh
//!
//! A stage of a pipeline is split into words on spaces and tabs. There is no
//! quoting and no escaping, so `ls>out` is a single word: the structural
//! markers below are only recognized when they stand alone.

use nom::{
    bytes::complete::is_not,
    character::complete::multispace0,
    multi::many0,
    sequence::preceded,
    IResult,
};

/// Separates pipeline stages. Split on before tokenizing.
pub const PIPE: char = '|';
/// Binds the following word as the stage's standard input.
pub const REDIRECT_IN: &str = "<";
/// Binds the following word as the stage's standard output.
pub const REDIRECT_OUT: &str = ">";
/// Trailing marker that runs the pipeline in the background.
pub const BACKGROUND: &str = "&";

const DELIMITERS: &str = " \t\r\n";

/// Is this word one of the structural markers?
pub fn is_structural(word: &str) -> bool {
    matches!(word, REDIRECT_IN | REDIRECT_OUT | BACKGROUND)
}

/// Parse one word, skipping leading whitespace
fn word(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, is_not(DELIMITERS))(input)
}

/// Split text into its whitespace-delimited words.
///
/// Empty or blank input yields an empty vector; callers treat that as "no
/// command". Words are never truncated.
pub fn tokenize(input: &str) -> Vec<String> {
    match many0(word)(input) {
        Ok((_, words)) => words.into_iter().map(String::from).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_spaces_and_tabs() {
        assert_eq!(tokenize("ls -l\t/tmp"), vec!["ls", "-l", "/tmp"]);
    }

    #[test]
    fn collapses_repeated_delimiters() {
        assert_eq!(tokenize("  echo   a \t\t b  "), vec!["echo", "a", "b"]);
    }

    #[test]
    fn blank_input_is_no_command() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t ").is_empty());
    }

    #[test]
    fn long_words_are_kept_whole() {
        let long = "x".repeat(4096);
        let words = tokenize(&format!("echo {}", long));
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].len(), 4096);
    }

    #[test]
    fn many_arguments_are_kept() {
        let line = (0..200).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(tokenize(&line).len(), 200);
    }

    #[test]
    fn markers_need_whitespace() {
        assert_eq!(tokenize("cat < in > out &"), vec!["cat", "<", "in", ">", "out", "&"]);
        assert_eq!(tokenize("ls>out"), vec!["ls>out"]);
    }

    #[test]
    fn structural_words() {
        assert!(is_structural("<"));
        assert!(is_structural(">"));
        assert!(is_structural("&"));
        assert!(!is_structural(">>"));
        assert!(!is_structural("file"));
        // Lines are split on '|' before tokenizing, so it never reaches here
        assert!(!is_structural("|"));
    }
}
