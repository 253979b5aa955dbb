pub mod decode;
pub mod error;
pub mod parser;
pub mod processor;
pub mod prompt;
pub mod request;
pub mod serialiser;
pub mod srt;
pub mod wav;

pub use decode::{extract_audio, AudioDecoder, WavDecoder};
pub use error::SubvoxError;
pub use parser::parse;
pub use processor::{transcribe, translate_blocks};
pub use prompt::{Language, TranslationStyle};
pub use request::{GenerateRequest, Generator};
pub use serialiser::{renumber, serialise, stringify};
pub use srt::{SubtitleBlock, Timestamp};
pub use wav::{encode, encode_to_base64, AudioBuffer};
