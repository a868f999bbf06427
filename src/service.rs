use std::io::{self, Read};

use tracing::{debug, info, warn};

use crate::error::RepoInitParsingError;
use crate::metrics::ParseRecorder;
use crate::parser;
use crate::settings::ParserSettings;
use crate::types::Operation;

/// Turns a RepoInit script into the ordered list of operations it describes.
pub trait RepoInitParser {
    /// Reads `reader` to the end and parses it. The reader is consumed and
    /// dropped before this returns, whatever the outcome.
    fn parse<R: Read>(&self, reader: R) -> Result<Vec<Operation>, RepoInitParsingError>;
}

/// The default [`RepoInitParser`]. Stateless apart from its settings, so a
/// single instance can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct RepoInitParserService {
    settings: ParserSettings,
}

impl RepoInitParserService {
    /// A service with [`ParserSettings::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A service enforcing the given settings.
    pub fn with_settings(settings: ParserSettings) -> Self {
        RepoInitParserService { settings }
    }

    /// The settings this service was built with.
    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Parses a script that is already in memory.
    pub fn parse_str(&self, script: &str) -> Result<Vec<Operation>, RepoInitParsingError> {
        let recorder = ParseRecorder::start(script.len());
        self.check_size(script.len())?;
        self.compile(script, recorder)
    }

    fn compile(
        &self,
        script: &str,
        mut recorder: ParseRecorder,
    ) -> Result<Vec<Operation>, RepoInitParsingError> {
        debug!(event = "Parse", phase = "Start", bytes = script.len());

        match parser::parse_script(script) {
            Ok(operations) => {
                recorder.succeeded(operations.len());
                info!(
                    event = "Parse",
                    phase = "Complete",
                    operations = operations.len()
                );
                Ok(operations)
            }
            Err(err) => {
                warn!(
                    event = "Parse",
                    phase = "Failed",
                    line = err.line,
                    column = err.column,
                    error = %err
                );
                Err(RepoInitParsingError::from_syntax(err))
            }
        }
    }

    fn check_size(&self, bytes: usize) -> Result<(), RepoInitParsingError> {
        match self.settings.max_script_bytes {
            Some(limit) if bytes > limit => {
                warn!(event = "Parse", phase = "Read", bytes, limit, "Script too large");
                Err(RepoInitParsingError::ScriptTooLarge { limit })
            }
            _ => Ok(()),
        }
    }

    /// Reads at most one byte past the limit, so an oversized stream is
    /// detected without buffering all of it. The size is checked before
    /// decoding, since the cut may fall inside a multi-byte character.
    fn read_script<R: Read>(
        &self,
        mut reader: R,
        recorder: &mut ParseRecorder,
    ) -> Result<String, RepoInitParsingError> {
        let mut bytes = Vec::new();
        let read = match self.settings.max_script_bytes {
            Some(limit) => reader
                .take((limit as u64).saturating_add(1))
                .read_to_end(&mut bytes),
            None => reader.read_to_end(&mut bytes),
        };
        recorder.set_bytes(bytes.len());

        if let Err(err) = read {
            warn!(event = "Parse", phase = "Read", error = %err);
            return Err(err.into());
        }
        self.check_size(bytes.len())?;

        String::from_utf8(bytes).map_err(|err| {
            warn!(event = "Parse", phase = "Read", error = %err);
            RepoInitParsingError::Io(io::Error::new(io::ErrorKind::InvalidData, err))
        })
    }
}

impl RepoInitParser for RepoInitParserService {
    fn parse<R: Read>(&self, reader: R) -> Result<Vec<Operation>, RepoInitParsingError> {
        let mut recorder = ParseRecorder::start(0);
        let script = self.read_script(reader, &mut recorder)?;
        self.compile(&script, recorder)
    }
}
