use crate::error::SubvoxError;
use crate::srt::{SubtitleBlock, Timestamp};

use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{digit1, space0, space1};
use nom::combinator::{all_consuming, map_res, verify};
use nom::error::{convert_error, VerboseError};
use nom::sequence::delimited;
use nom::{Err, IResult};
use tracing::{debug, warn};

/// Parses SRT text into blocks, in document order.
///
/// Blocks whose index line is not a number, or whose timing line is missing or
/// malformed, are dropped. The rest of the document is still parsed.
pub fn parse(input: &str) -> Vec<SubtitleBlock> {
    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let input = normalise_line_endings(input);

    let mut subs = Vec::new();
    let mut dropped = 0;
    for lines in candidate_blocks(input.trim()) {
        match subtitle(&lines) {
            Some(sub) => subs.push(sub),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!(parsed = subs.len(), dropped, "Finished parsing SRT text");
    }
    subs
}

pub(crate) fn parse_timestamp(input: &str) -> Result<Timestamp, SubvoxError> {
    let input = input.trim();
    match all_consuming(timestamp)(input) {
        Ok((_, ts)) => Ok(ts),
        Err(Err::Error(err)) | Err(Err::Failure(err)) => {
            Err(SubvoxError::Parse(convert_error(input, err)))
        }
        Err(Err::Incomplete(_)) => {
            unreachable!("Incomplete data received by non-streaming parser.")
        }
    }
}

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

/// Groups lines into blocks separated by runs of empty lines.
fn candidate_blocks(input: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in input.split('\n') {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn subtitle(lines: &[&str]) -> Option<SubtitleBlock> {
    let (first, rest) = lines.split_first()?;
    let index = match index_line(first) {
        Ok((_, index)) => index,
        Err(_) => {
            debug!(line = %first, "Dropping block with a non-numeric index");
            return None;
        }
    };

    let Some((timing, text)) = rest.split_first() else {
        warn!(index, "Dropping block without a timing line");
        return None;
    };
    let (start_time, end_time) = match timing_line(timing) {
        Ok((_, times)) => times,
        Err(_) => {
            warn!(index, line = %timing, "Dropping block with a malformed timing line");
            return None;
        }
    };

    Some(SubtitleBlock {
        index,
        start_time,
        end_time,
        text: text.join("\n"),
    })
}

fn index_line(input: &str) -> IResult<&str, u32, VerboseError<&str>> {
    all_consuming(delimited(space0, seq_num, space0))(input)
}

fn timing_line(input: &str) -> IResult<&str, (Timestamp, Timestamp), VerboseError<&str>> {
    all_consuming(delimited(space0, show_hide, space0))(input)
}

fn show_hide(input: &str) -> IResult<&str, (Timestamp, Timestamp), VerboseError<&str>> {
    let (input, show_at) = timestamp(input)?;
    let (input, _) = space1(input)?;
    let (input, _) = tag("-->")(input)?;
    let (input, _) = space1(input)?;
    let (input, hide_at) = timestamp(input)?;

    Ok((input, (show_at, hide_at)))
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn timestamp(input: &str) -> IResult<&str, Timestamp, VerboseError<&str>> {
    const HOURS_MAX: usize = 6;
    const HMS_MIN: usize = 0;
    const MS_MAX: usize = 2;
    const MILLIS_MAX: usize = 3;

    // An empty field is left-padded to zero, so `00::01,000` reads as one second.
    let take_hms = |max: usize| {
        map_res(take_while_m_n(HMS_MIN, max, is_digit), |s: &str| {
            format!("{:0>2}", s).parse::<u64>()
        })
    };
    let take_sexagesimal = || verify(take_hms(MS_MAX), |v: &u64| *v < 60);
    let mut take_millis = map_res(take_while_m_n(0, MILLIS_MAX, is_digit), |s: &str| {
        // A short value like `,2` is read as `,200`: the digits are
        // fractions of a second, so they are padded on the right.
        format!("{:0<3}", s).parse::<u64>()
    });

    let (input, hours) = take_hms(HOURS_MAX)(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, minutes) = take_sexagesimal()(input)?;
    let (input, _) = tag(":")(input)?;
    let (input, seconds) = take_sexagesimal()(input)?;
    let (input, _) = tag(",")(input)?;
    let (input, millis) = take_millis(input)?;

    Ok((
        input,
        Timestamp::from_millis(
            millis + seconds * 1000 + minutes * 60 * 1000 + hours * 60 * 60 * 1000,
        ),
    ))
}

fn seq_num(input: &str) -> IResult<&str, u32, VerboseError<&str>> {
    verify(map_res(digit1, |s: &str| s.parse()), |n: &u32| *n > 0)(input)
}
