use crate::srt::SubtitleBlock;

use std::io::{BufWriter, Write};

use anyhow::{Context, Result};

/// Renders blocks as SRT text, one blank line between blocks and nothing after
/// the last one.
pub fn stringify(subs: &[SubtitleBlock]) -> String {
    subs.iter()
        .map(SubtitleBlock::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes blocks to `output` as an SRT document terminated by a newline.
pub fn serialise<W: Write>(subs: &[SubtitleBlock], output: W) -> Result<()> {
    let mut writer = BufWriter::new(output);
    write_subs(&mut writer, subs).context("Failed to write subtitles.")?;
    writer.flush().context("Failed to write subtitles.")?;
    Ok(())
}

fn write_subs<W: Write>(buf: &mut W, subs: &[SubtitleBlock]) -> Result<()> {
    if subs.is_empty() {
        return Ok(());
    }
    writeln!(buf, "{}", stringify(subs))?;
    Ok(())
}

/// Rewrites indices as `1..=n` in document order.
pub fn renumber(subs: Vec<SubtitleBlock>) -> Vec<SubtitleBlock> {
    let mut seqnum = 0;
    subs.into_iter()
        .map(|mut s| {
            seqnum += 1;
            s.index = seqnum;
            s
        })
        .collect()
}
