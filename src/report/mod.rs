//! Plain-text report rendering.
//!
//! Every tool prints a sequence of sections: a bold title underlined with
//! `=`, followed by `label: value` rows with the label padded to 18
//! columns (16 when nested under a device heading). Colour is applied
//! through [`Palette`] and can be switched off entirely.
//!
//! - [`cpu`]: `cpuinfo` sections
//! - [`memory`]: `meminfo` sections
//! - [`disk`]: `diskls` sections
//! - [`os`]: `osinfo` sections

pub mod cpu;
pub mod disk;
pub mod memory;
pub mod os;

use std::fmt::Display;
use std::io::{self, Write};

use crossterm::style::{Stylize, style};

/// Width of a top-level label column.
pub const LABEL_WIDTH: usize = 18;
/// Width of a label nested under a device heading.
pub const SUB_LABEL_WIDTH: usize = 16;
/// Length of a plain separator line.
pub const SEPARATOR_WIDTH: usize = 70;

/// Text styling that is either fully on or fully off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// A palette that never emits escape sequences.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            style(text).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            style(text).dim().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn yellow(&self, text: &str) -> String {
        if self.enabled {
            style(text).yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: &str) -> String {
        if self.enabled {
            style(text).red().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Line-oriented writer for report sections.
pub struct Report<W: Write> {
    out: W,
    palette: Palette,
    sections: usize,
}

impl<W: Write> Report<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            sections: 0,
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Starts a section. All but the first are preceded by a blank line.
    pub fn section(&mut self, title: &str) -> io::Result<()> {
        if self.sections > 0 {
            writeln!(self.out)?;
        }
        self.sections += 1;
        writeln!(self.out, "{}", self.palette.bold(title))?;
        writeln!(self.out, "{}", "=".repeat(title.chars().count()))
    }

    pub fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    /// Writes `label` padded to [`LABEL_WIDTH`] followed by `value`.
    pub fn field(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{:<width$}{}", label, value, width = LABEL_WIDTH)
    }

    /// Writes an indented `label` padded to [`SUB_LABEL_WIDTH`].
    pub fn sub_field(&mut self, label: &str, value: impl Display) -> io::Result<()> {
        writeln!(
            self.out,
            "  {:<width$}{}",
            label,
            value,
            width = SUB_LABEL_WIDTH
        )
    }

    /// Writes a bold heading line, such as a device name.
    pub fn heading(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", self.palette.bold(text))
    }

    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Writes a yellow `Warning: ...` line.
    pub fn warning(&mut self, message: impl Display) -> io::Result<()> {
        let text = format!("Warning: {}", message);
        writeln!(self.out, "{}", self.palette.yellow(&text))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
pub(crate) fn render_to_string<F>(palette: Palette, render: F) -> String
where
    F: FnOnce(&mut Report<Vec<u8>>) -> io::Result<()>,
{
    let mut report = Report::new(Vec::new(), palette);
    render(&mut report).unwrap();
    String::from_utf8(report.into_inner()).unwrap()
}
