//! Granularity of a piece of English text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ClassifyError;

/// The granularity the classifier assigns to an input text.
///
/// Each kind except `Invalid` selects its own system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextKind {
    Invalid,
    Word,
    Phrase,
    Sentence,
    Paragraph,
}

impl TextKind {
    /// All kinds a classifier may legitimately answer with.
    pub const CLASSIFIABLE: [TextKind; 4] = [
        TextKind::Word,
        TextKind::Phrase,
        TextKind::Sentence,
        TextKind::Paragraph,
    ];

    /// Canonical upper-case token, as the classifier is asked to reply.
    pub fn as_str(self) -> &'static str {
        match self {
            TextKind::Invalid => "INVALID",
            TextKind::Word => "WORD",
            TextKind::Phrase => "PHRASE",
            TextKind::Sentence => "SENTENCE",
            TextKind::Paragraph => "PARAGRAPH",
        }
    }

    /// Lower-case label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            TextKind::Invalid => "invalid",
            TextKind::Word => "word",
            TextKind::Phrase => "phrase",
            TextKind::Sentence => "sentence",
            TextKind::Paragraph => "paragraph",
        }
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextKind {
    type Err = ClassifyError;

    /// Parse a classifier reply. Case-insensitive; surrounding whitespace,
    /// quotes and a trailing period are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s
            .trim()
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .trim_end_matches('.')
            .trim();

        match token.to_ascii_uppercase().as_str() {
            "INVALID" => Ok(TextKind::Invalid),
            "WORD" => Ok(TextKind::Word),
            "PHRASE" => Ok(TextKind::Phrase),
            "SENTENCE" => Ok(TextKind::Sentence),
            "PARAGRAPH" => Ok(TextKind::Paragraph),
            _ => Err(ClassifyError::UnknownKind(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_tokens() {
        assert_eq!("WORD".parse::<TextKind>().unwrap(), TextKind::Word);
        assert_eq!("PHRASE".parse::<TextKind>().unwrap(), TextKind::Phrase);
        assert_eq!("SENTENCE".parse::<TextKind>().unwrap(), TextKind::Sentence);
        assert_eq!(
            "PARAGRAPH".parse::<TextKind>().unwrap(),
            TextKind::Paragraph
        );
        assert_eq!("INVALID".parse::<TextKind>().unwrap(), TextKind::Invalid);
    }

    #[test]
    fn parses_mixed_case_paragraph() {
        assert_eq!(
            "Paragraph".parse::<TextKind>().unwrap(),
            TextKind::Paragraph
        );
    }

    #[test]
    fn tolerates_whitespace_and_period() {
        assert_eq!(" word.\n".parse::<TextKind>().unwrap(), TextKind::Word);
        assert_eq!("\"SENTENCE\"".parse::<TextKind>().unwrap(), TextKind::Sentence);
    }

    #[test]
    fn rejects_unknown_reply() {
        match "It is a noun".parse::<TextKind>() {
            Err(ClassifyError::UnknownKind(raw)) => assert_eq!(raw, "It is a noun"),
            other => panic!("Expected UnknownKind, got {other:?}"),
        }
    }

    #[test]
    fn display_matches_token() {
        for kind in TextKind::CLASSIFIABLE {
            assert_eq!(kind.to_string().parse::<TextKind>().unwrap(), kind);
        }
    }
}
