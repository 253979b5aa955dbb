use crate::error::SubvoxError;
use crate::parser;
use crate::prompt::{strip_code_fences, Language, TranslationStyle};
use crate::request::{GenerateRequest, Generator};
use crate::srt::SubtitleBlock;
use crate::wav::AudioBuffer;

use tracing::{info, warn};

/// Caption text used for a block whose translation failed.
pub const TRANSLATION_FAILED: &str = "Error: Could not translate.";

/// Translates every block's text, one request per block, in order.
///
/// A failing block gets [`TRANSLATION_FAILED`] as its text and the remaining
/// blocks are still translated. `on_progress` receives `(done, total)` after
/// each block.
pub fn translate_blocks<G, F>(
    generator: &G,
    subs: &[SubtitleBlock],
    language: Language,
    style: TranslationStyle,
    mut on_progress: F,
) -> Vec<SubtitleBlock>
where
    G: Generator + ?Sized,
    F: FnMut(usize, usize),
{
    info!(
        "Translating {} subtitle blocks to {} ({} style)",
        subs.len(),
        language,
        style
    );

    let total = subs.len();
    let mut failed = 0;
    let mut translated = Vec::with_capacity(total);
    for (done, sub) in subs.iter().enumerate() {
        let request = GenerateRequest::Translate {
            text: sub.text.clone(),
            language,
            style,
        };
        let text = match generator.generate(&request) {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!(index = sub.index, "Translation failed: {:#}", err);
                failed += 1;
                TRANSLATION_FAILED.to_string()
            }
        };
        translated.push(sub.with_text(text));
        on_progress(done + 1, total);
    }

    if failed > 0 {
        warn!("{} of {} blocks could not be translated", failed, total);
    }
    translated
}

/// Sends the audio to the generator for transcription and parses the SRT it
/// returns. Any failure of the generator aborts the whole transcription.
pub fn transcribe<G: Generator + ?Sized>(
    generator: &G,
    audio: &AudioBuffer,
    language: Language,
) -> Result<Vec<SubtitleBlock>, SubvoxError> {
    info!(
        "Transcribing {:.2} seconds of {} audio",
        audio.duration_secs(),
        language
    );
    let request = GenerateRequest::Transcribe {
        audio_base64: audio.to_wav_base64(),
        language,
    };
    let response = generator
        .generate(&request)
        .map_err(|err| SubvoxError::Transcription(format!("{:#}", err)))?;

    let subs = parser::parse(&strip_code_fences(&response));
    info!("Transcription produced {} subtitle blocks", subs.len());
    Ok(subs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srt::Timestamp;

    use anyhow::anyhow;
    use std::cell::RefCell;

    struct Uppercase;

    impl Generator for Uppercase {
        fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String> {
            match request {
                GenerateRequest::Translate { text, .. } if text == "boom" => {
                    Err(anyhow!("quota exceeded"))
                }
                GenerateRequest::Translate { text, .. } => Ok(format!("  {}\n", text.to_uppercase())),
                GenerateRequest::Transcribe { .. } => Err(anyhow!("not supported")),
            }
        }
    }

    struct Canned(&'static str, RefCell<Vec<GenerateRequest>>);

    impl Generator for Canned {
        fn generate(&self, request: &GenerateRequest) -> anyhow::Result<String> {
            self.1.borrow_mut().push(request.clone());
            Ok(self.0.to_string())
        }
    }

    fn block(index: u32, text: &str) -> SubtitleBlock {
        SubtitleBlock::new(
            index,
            Timestamp::from_millis(u64::from(index) * 1000),
            Timestamp::from_millis(u64::from(index) * 1000 + 900),
            text,
        )
    }

    #[test]
    fn translates_each_block_and_keeps_timing() {
        let subs = vec![block(1, "hello"), block(2, "two\nlines")];
        let mut progress = Vec::new();

        let out = translate_blocks(
            &Uppercase,
            &subs,
            Language::Spanish,
            TranslationStyle::Neutral,
            |done, total| progress.push((done, total)),
        );

        assert_eq!(out[0].text, "HELLO");
        assert_eq!(out[1].text, "TWO\nLINES");
        assert_eq!(out[1].index, 2);
        assert_eq!(out[1].start_time, subs[1].start_time);
        assert_eq!(out[1].end_time, subs[1].end_time);
        assert_eq!(progress, vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn failing_block_gets_placeholder() {
        let subs = vec![block(1, "a"), block(2, "boom"), block(3, "c")];

        let out = translate_blocks(&Uppercase, &subs, Language::Korean, TranslationStyle::Formal, |_, _| {});

        let texts: Vec<&str> = out.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["A", TRANSLATION_FAILED, "C"]);
    }

    #[test]
    fn transcription_strips_fences_and_parses() {
        let generator = Canned(
            "```srt\n1\n00:00:00,000 --> 00:00:01,500\nHola\n\n2\n00:00:01,500 --> 00:00:03,000\nAdiós\n```",
            RefCell::new(Vec::new()),
        );
        let audio = AudioBuffer::new(vec![vec![0.0, 0.5]], 16000);

        let subs = transcribe(&generator, &audio, Language::Spanish).unwrap();

        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].text, "Adiós");
        let requests = generator.1.borrow();
        match &requests[0] {
            GenerateRequest::Transcribe {
                audio_base64,
                language,
            } => {
                assert_eq!(audio_base64, &audio.to_wav_base64());
                assert_eq!(*language, Language::Spanish);
            }
            other => panic!("Unexpected request {:?}", other),
        }
    }

    #[test]
    fn transcription_failure_aborts() {
        let audio = AudioBuffer::new(vec![vec![0.0]], 16000);
        match transcribe(&Uppercase, &audio, Language::English) {
            Err(SubvoxError::Transcription(msg)) => assert!(msg.contains("not supported")),
            other => panic!("Expected transcription error, got {:?}", other),
        }
    }
}
