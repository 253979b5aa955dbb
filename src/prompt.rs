use crate::error::SubvoxError;

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use clap::ValueEnum;
use regex::Regex;

/// Languages offered for translation targets and transcription sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    ChineseSimplified,
    Japanese,
    Korean,
    Russian,
    Arabic,
    Portuguese,
    Italian,
    Vietnamese,
}

impl Language {
    pub const ALL: [Language; 12] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::ChineseSimplified,
        Language::Japanese,
        Language::Korean,
        Language::Russian,
        Language::Arabic,
        Language::Portuguese,
        Language::Italian,
        Language::Vietnamese,
    ];

    /// Human readable name, as used inside prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::ChineseSimplified => "Chinese (Simplified)",
            Self::Japanese => "Japanese",
            Self::Korean => "Korean",
            Self::Russian => "Russian",
            Self::Arabic => "Arabic",
            Self::Portuguese => "Portuguese",
            Self::Italian => "Italian",
            Self::Vietnamese => "Vietnamese",
        }
    }

    /// Kebab-case identifier, convenient on the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ChineseSimplified => "chinese-simplified",
            Self::English => "english",
            Self::Spanish => "spanish",
            Self::French => "french",
            Self::German => "german",
            Self::Japanese => "japanese",
            Self::Korean => "korean",
            Self::Russian => "russian",
            Self::Arabic => "arabic",
            Self::Portuguese => "portuguese",
            Self::Italian => "italian",
            Self::Vietnamese => "vietnamese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Language {
    type Err = SubvoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(wanted) || l.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SubvoxError::UnknownLanguage(s.to_string()))
    }
}

/// Register the translation should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default)]
pub enum TranslationStyle {
    Formal,
    Informal,
    #[default]
    Neutral,
    Technical,
}

impl TranslationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "Formal",
            Self::Informal => "Informal",
            Self::Neutral => "Neutral",
            Self::Technical => "Technical",
        }
    }
}

impl fmt::Display for TranslationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TranslationStyle {
    type Err = SubvoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_| SubvoxError::UnknownStyle(s.to_string()))
    }
}

pub fn translation_prompt(text: &str, language: Language, style: TranslationStyle) -> String {
    format!(
        "Translate the following text into {}.\n\
         The translation style should be: {}.\n\
         Do not add any introductory phrases like \"Here is the translation:\".\n\
         Only return the translated text.\n\
         \n\
         Text to translate:\n\
         ---\n\
         {}\n\
         ---",
        language, style, text
    )
}

pub fn transcription_prompt(language: Language) -> String {
    format!(
        "This is an audio file in {}.\n\
         1. Transcribe the audio content accurately.\n\
         2. Format the entire transcript as a standard SRT (SubRip Text) file.\n\
         3. Create timestamps (HH:MM:SS,mmm --> HH:MM:SS,mmm) for each subtitle block based on natural speaking pauses.\n\
         4. Output ONLY the SRT content. Do not include explanations or code fences like ```srt.",
        language
    )
}

/// Removes a Markdown code fence wrapped around a model response.
pub fn strip_code_fences(response: &str) -> String {
    static OPENING: OnceLock<Regex> = OnceLock::new();
    static CLOSING: OnceLock<Regex> = OnceLock::new();

    let opening = OPENING
        .get_or_init(|| Regex::new(r"(?i)\A\s*```(?:srt)?[ \t]*\r?\n").expect("valid fence pattern"));
    let closing =
        CLOSING.get_or_init(|| Regex::new(r"\r?\n```\s*\z").expect("valid fence pattern"));

    let stripped = opening.replace(response, "");
    let stripped = closing.replace(&stripped, "");
    stripped.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_language {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                let language: Language = input.parse().unwrap();

                assert_eq!(language, expected);
            }
        )*
        }
    }

    test_language! {
        test_language_0: ("English", Language::English),
        test_language_1: ("vietnamese", Language::Vietnamese),
        test_language_2: ("Chinese (Simplified)", Language::ChineseSimplified),
        test_language_3: ("chinese-simplified", Language::ChineseSimplified),
        test_language_4: (" PORTUGUESE ", Language::Portuguese),
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(matches!(
            "Klingon".parse::<Language>(),
            Err(SubvoxError::UnknownLanguage(l)) if l == "Klingon"
        ));
    }

    #[test]
    fn style_parsing() {
        assert_eq!("formal".parse::<TranslationStyle>().unwrap(), TranslationStyle::Formal);
        assert_eq!("Technical".parse::<TranslationStyle>().unwrap(), TranslationStyle::Technical);
        assert_eq!(TranslationStyle::default(), TranslationStyle::Neutral);
        assert!(matches!(
            "sarcastic".parse::<TranslationStyle>(),
            Err(SubvoxError::UnknownStyle(_))
        ));
    }

    #[test]
    fn translation_prompt_names_language_and_style() {
        let prompt = translation_prompt("Hello", Language::French, TranslationStyle::Informal);
        assert!(prompt.contains("into French."));
        assert!(prompt.contains("style should be: Informal."));
        assert!(prompt.contains("---\nHello\n---"));
    }

    #[test]
    fn transcription_prompt_names_language() {
        let prompt = transcription_prompt(Language::ChineseSimplified);
        assert!(prompt.starts_with("This is an audio file in Chinese (Simplified)."));
        assert!(prompt.contains("SRT"));
    }

    macro_rules! test_strip_fences {
        ($($name:ident: $value:expr,)*) => {
        $(
            #[test]
            fn $name() {
                let (input, expected) = $value;

                assert_eq!(strip_code_fences(input), expected);
            }
        )*
        }
    }

    test_strip_fences! {
        test_strip_fences_0: ("```srt\n1\nx\n```", "1\nx"),
        test_strip_fences_1: ("```SRT\n1\nx\n```\n", "1\nx"),
        test_strip_fences_2: ("```\n1\nx\n```", "1\nx"),
        test_strip_fences_3: ("  1\nx  ", "1\nx"),
        test_strip_fences_4: ("```srt\r\n1\r\nx\r\n```", "1\r\nx"),
        test_strip_fences_5: ("1\n```inline``` stays", "1\n```inline``` stays"),
    }
}
