use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubvoxError {
    #[error("{0}")]
    Parse(String),

    #[error("Unknown language: '{0}'")]
    UnknownLanguage(String),

    #[error("Unknown translation style: '{0}'")]
    UnknownStyle(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Failed to transcribe audio and format to SRT: {0}")]
    Transcription(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
