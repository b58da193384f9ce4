// 📝 Plain line-mode front-end for the shell
// Used with --plain and in builds without the `tui` feature.

use crate::filter::numbered;
use crate::shell::{Effect, Shell};
use crate::views::{map_points, text_chart, UrlOpener};
use anyhow::Result;
use std::io::{BufRead, Write};

const CHART_WIDTH: usize = 40;

/// Drive the shell over any line reader until it exits or input ends
pub fn run_plain<R: BufRead, W: Write>(
    shell: &mut Shell,
    opener: &dyn UrlOpener,
    input: R,
    out: &mut W,
) -> Result<()> {
    for effect in shell.start() {
        render_effect(&effect, opener, out)?;
    }

    let mut lines = input.lines();
    while !shell.is_finished() {
        write!(out, "\n{} ", shell.prompt())?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };

        for effect in shell.handle(&line?) {
            render_effect(&effect, opener, out)?;
        }
    }

    Ok(())
}

pub fn render_effect<W: Write>(effect: &Effect, opener: &dyn UrlOpener, out: &mut W) -> Result<()> {
    match effect {
        Effect::Message(text) => writeln!(out, "\n{}", text)?,
        Effect::Notice(text) => writeln!(out, "\n== {} ==", text)?,
        Effect::Invalid(text) => writeln!(out, "\n! {}", text)?,
        Effect::Parks { title, names } | Effect::Options { title, items: names } => {
            writeln!(out, "\n{}\n", title)?;
            for (n, name) in numbered(names) {
                writeln!(out, "{}. {}", n, name)?;
            }
        }
        Effect::Tree(rows) => {
            writeln!(out)?;
            for (depth, text) in rows {
                writeln!(out, "{}└─ {}", "   ".repeat(*depth), text)?;
            }
        }
        Effect::OpenUrl(url) => {
            if let Err(e) = opener.open(url) {
                writeln!(out, "! {:#}", e)?;
            }
        }
        Effect::DrawMap(parks) => {
            writeln!(out, "\nLocations Map ({} parks)\n", parks.len())?;
            for (name, lon, lat) in map_points(parks) {
                writeln!(out, "{:>9.4} {:>10.4}  {}", lat, lon, name)?;
            }
        }
        Effect::DrawChart(parks) => {
            writeln!(out, "\nNumber of Visitors in 2022 by Park\n")?;
            for line in text_chart(parks, CHART_WIDTH) {
                writeln!(out, "{}", line)?;
            }
        }
    }

    Ok(())
}
