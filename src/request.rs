use crate::prompt::{self, Language, TranslationStyle};

use serde::Serialize;

pub const AUDIO_MIME_TYPE: &str = "audio/wav";

/// A single call to the generative-language API.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateRequest {
    /// Translate one block's caption text. The answer is plain text.
    Translate {
        text: String,
        language: Language,
        style: TranslationStyle,
    },
    /// Transcribe inline WAV audio. The answer is an SRT document.
    Transcribe {
        audio_base64: String,
        language: Language,
    },
}

/// The service answering [`GenerateRequest`]s, typically a remote model.
pub trait Generator {
    fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String>;
}

impl<G: Generator + ?Sized> Generator for &G {
    fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String> {
        (**self).generate(request)
    }
}

#[derive(Debug, Serialize)]
pub struct RequestBody {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GenerateRequest {
    pub fn prompt(&self) -> String {
        match self {
            Self::Translate {
                text,
                language,
                style,
            } => prompt::translation_prompt(text, *language, *style),
            Self::Transcribe { language, .. } => prompt::transcription_prompt(*language),
        }
    }

    /// Builds the `generateContent` request body.
    pub fn to_body(&self) -> RequestBody {
        let mut parts = Vec::new();
        if let Self::Transcribe { audio_base64, .. } = self {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: AUDIO_MIME_TYPE.to_string(),
                    data: audio_base64.clone(),
                },
            });
        }
        parts.push(Part::Text {
            text: self.prompt(),
        });
        RequestBody {
            contents: vec![Content { parts }],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_body())
    }
}
