use std::error::Error as StdError;

use thiserror::Error;

use crate::parser::SyntaxError;

/// The single error type returned by [`crate::RepoInitParser::parse`].
///
/// Grammar failures are wrapped into [`RepoInitParsingError::Syntax`] with the
/// underlying diagnostic chained as the error source. Parser internals never
/// leak through this type.
#[derive(Debug, Error)]
pub enum RepoInitParsingError {
    #[error("failed to parse repoinit script: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("failed to read repoinit script: {0}")]
    Io(#[from] std::io::Error),

    #[error("repoinit script exceeds the configured limit of {limit} bytes")]
    ScriptTooLarge { limit: usize },
}

impl RepoInitParsingError {
    pub(crate) fn from_syntax(err: SyntaxError) -> Self {
        RepoInitParsingError::Syntax {
            message: err.to_string(),
            line: err.line,
            column: err.column,
            source: Box::new(err),
        }
    }

    /// 1-based line of a syntax error, if this is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            RepoInitParsingError::Syntax { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// 1-based column of a syntax error, if this is one.
    pub fn column(&self) -> Option<usize> {
        match self {
            RepoInitParsingError::Syntax { column, .. } => Some(*column),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_error() -> SyntaxError {
        SyntaxError {
            token: "frobnicate".to_string(),
            line: 2,
            column: 5,
            expected: "a statement".to_string(),
        }
    }

    #[test]
    fn test_syntax_error_is_chained() {
        let err = RepoInitParsingError::from_syntax(syntax_error());
        assert_eq!(err.line(), Some(2));
        assert_eq!(err.column(), Some(5));

        let source = err.source().expect("syntax errors chain their cause");
        assert_eq!(
            source.to_string(),
            r#"Encountered "frobnicate" at line 2, column 5: expected a statement"#
        );
        assert_eq!(
            err.to_string(),
            r#"failed to parse repoinit script: Encountered "frobnicate" at line 2, column 5: expected a statement"#
        );
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream reset");
        let err = RepoInitParsingError::from(io);
        assert!(matches!(err, RepoInitParsingError::Io(_)));
        assert_eq!(err.line(), None);
        assert!(err.to_string().contains("stream reset"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_too_large_message() {
        let err = RepoInitParsingError::ScriptTooLarge { limit: 16 };
        assert_eq!(
            err.to_string(),
            "repoinit script exceeds the configured limit of 16 bytes"
        );
        assert_eq!(err.column(), None);
    }
}
