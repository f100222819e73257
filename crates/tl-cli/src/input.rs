//! Where the texts to translate come from.

use std::io::{self, Read};

/// Positional argument that stands for standard input.
pub const STDIN_ARG: &str = "-";

#[derive(Debug, PartialEq, Eq)]
pub enum Source {
    /// Each argument is a separate text.
    Args(Vec<String>),
    /// All of stdin, up to EOF, is one text.
    Stdin,
}

/// Decide where input comes from. `None` means there is nothing to read and
/// the caller should show usage instead.
pub fn source(args: Vec<String>, stdin_is_terminal: bool) -> Option<Source> {
    if args.iter().any(|a| a == STDIN_ARG) {
        return Some(Source::Stdin);
    }
    if !args.is_empty() {
        return Some(Source::Args(args));
    }
    (!stdin_is_terminal).then_some(Source::Stdin)
}

/// Collect the texts to translate, trimmed, with blank ones dropped.
pub fn read_texts<R: Read>(source: Source, mut stdin: R) -> io::Result<Vec<String>> {
    let raw = match source {
        Source::Args(args) => args,
        Source::Stdin => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf)?;
            vec![buf]
        }
    };

    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, text)| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                tracing::warn!(index = i, "skipping blank input");
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect())
}
