use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use subvox::{
    decode::{extract_audio, WavDecoder},
    parser,
    prompt::{Language, TranslationStyle},
    request::GenerateRequest,
    serialiser,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("An error occurred: {}", err);
            for cause in err.chain().skip(1) {
                eprintln!("    {}", cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "subvox=debug" } else { "subvox=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[derive(ClapParser)]
#[command(name = "subvox", version, about = "Prepare SRT subtitles and WAV audio for generative translation and transcription")]
struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging.")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse an SRT file and write it back out in canonical form.
    Normalise {
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to read from. If not supplied, the subtitles will be read from standard input.",
            default_value = "-"
        )]
        input: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to write to. If not supplied, the subtitles will be written to standard output.",
            default_value = "-"
        )]
        output: String,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "Write a backup of the original input to the specified file."
        )]
        backup: Option<String>,
        #[arg(long, help = "Renumber the subtitles 1, 2, 3, ... in document order.")]
        renumber: bool,
    },
    /// Decode a WAV file and re-encode it as 16-bit PCM with a canonical header.
    Encode {
        #[arg(short, long, value_name = "FILE", help = "The WAV file to read.")]
        input: PathBuf,
        #[arg(
            short,
            long,
            value_name = "FILE",
            help = "The file to write to. If not supplied, the audio will be written to standard output.",
            default_value = "-"
        )]
        output: String,
        #[arg(long, help = "Write the WAV file as base64 text instead of raw bytes.")]
        base64: bool,
    },
    /// Print generative-API request bodies as JSON.
    Request {
        #[command(subcommand)]
        kind: RequestKind,
    },
}

#[derive(Subcommand)]
enum RequestKind {
    /// One translation request per subtitle block, as JSON Lines.
    Translate {
        #[arg(short, long, value_name = "FILE", default_value = "-", help = "The SRT file to translate.")]
        input: String,
        #[arg(short, long, env = "SUBVOX_LANGUAGE", help = "The target language.")]
        language: Language,
        #[arg(short, long, value_enum, env = "SUBVOX_STYLE", default_value_t = TranslationStyle::Neutral)]
        style: TranslationStyle,
    },
    /// A transcription request carrying the audio inline.
    Transcribe {
        #[arg(short, long, value_name = "FILE", help = "The WAV file to transcribe.")]
        input: PathBuf,
        #[arg(short, long, env = "SUBVOX_LANGUAGE", help = "The spoken language.")]
        language: Language,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Normalise {
            input,
            output,
            backup,
            renumber,
        } => normalise(&input, &output, backup.as_deref(), renumber),
        Command::Encode {
            input,
            output,
            base64,
        } => encode(&input, &output, base64),
        Command::Request { kind } => request(kind),
    }
}

fn normalise(input: &str, output: &str, backup: Option<&str>, renumber: bool) -> Result<()> {
    let data = read_input(input)?;

    if let Some(backup_path) = backup {
        std::fs::write(backup_path, &data)
            .context(format!("Failed to write backup file: '{}'", backup_path))?;
    }

    let mut subs = parser::parse(&data);
    if subs.is_empty() {
        return Err(anyhow!("You appear to have supplied an empty file."));
    }
    if renumber {
        subs = serialiser::renumber(subs);
    }
    info!("Writing {} subtitles", subs.len());

    if output == "-" {
        serialiser::serialise(&subs, io::stdout().lock())?;
    } else {
        let dst = std::fs::File::create(output)
            .context(format!("Failed to create output file: '{}'", output))?;
        serialiser::serialise(&subs, dst)?;
    }
    Ok(())
}

fn encode(input: &Path, output: &str, base64: bool) -> Result<()> {
    let audio = extract_audio(&WavDecoder::new(), input)
        .context(format!("Failed to read audio file: '{}'", input.display()))?;

    let bytes = if base64 {
        audio.to_wav_base64().into_bytes()
    } else {
        audio.to_wav()
    };
    write_output(output, &bytes)
}

fn request(kind: RequestKind) -> Result<()> {
    let mut lines = Vec::new();
    match kind {
        RequestKind::Translate {
            input,
            language,
            style,
        } => {
            let data = read_input(&input)?;
            for sub in parser::parse(&data) {
                let request = GenerateRequest::Translate {
                    text: sub.text,
                    language,
                    style,
                };
                lines.push(request.to_json()?);
            }
        }
        RequestKind::Transcribe { input, language } => {
            let audio = extract_audio(&WavDecoder::new(), &input)
                .context(format!("Failed to read audio file: '{}'", input.display()))?;
            let request = GenerateRequest::Transcribe {
                audio_base64: audio.to_wav_base64(),
                language,
            };
            lines.push(request.to_json()?);
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    write_output("-", text.as_bytes())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input).context(format!("Failed to open input file: '{}'", input))
    }
}

fn write_output(output: &str, bytes: &[u8]) -> Result<()> {
    if output == "-" {
        let mut stdout = io::stdout().lock();
        stdout.write_all(bytes).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    } else {
        std::fs::write(output, bytes)
            .context(format!("Failed to write output file: '{}'", output))?;
    }
    Ok(())
}
