//! Minimal ASCII table writer.
//!
//! Cells wider than their column's maximum wrap onto continuation lines,
//! preferring to break at spaces. Widths are terminal columns of the
//! uncoloured text, so wide CJK characters count twice; colour is applied
//! after padding is computed.

use std::io::{self, Write};

use colored::{Color, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone)]
pub(crate) struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    pub(crate) fn colored(text: impl Into<String>, color: Color) -> Self {
        Cell {
            text: text.into(),
            color: Some(color),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell { text, color: None }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::from(text.to_string())
    }
}

#[derive(Debug, Clone)]
struct Column {
    header: String,
    max_width: Option<usize>,
}

#[derive(Debug, Clone)]
enum Row {
    Cells(Vec<Cell>),
    Separator,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn column(mut self, header: &str, max_width: Option<usize>) -> Self {
        self.columns.push(Column {
            header: header.to_uppercase(),
            max_width: max_width.map(|w| w.max(1)),
        });
        self
    }

    /// Missing trailing cells render empty; extra cells are dropped.
    pub(crate) fn row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut cells: Vec<Cell> = cells.into_iter().map(Into::into).collect();
        cells.resize(self.columns.len(), Cell::from(""));
        self.rows.push(Row::Cells(cells));
    }

    pub(crate) fn separator(&mut self) {
        self.rows.push(Row::Separator);
    }

    pub(crate) fn render(&self, out: &mut dyn Write, colorize: bool) -> io::Result<()> {
        let header: Vec<Cell> = self
            .columns
            .iter()
            .map(|c| Cell::from(c.header.as_str()))
            .collect();

        let wrapped_header = self.wrap_row(&header);
        let wrapped_rows: Vec<Option<Vec<Vec<String>>>> = self
            .rows
            .iter()
            .map(|row| match row {
                Row::Cells(cells) => Some(self.wrap_row(cells)),
                Row::Separator => None,
            })
            .collect();

        let mut widths = vec![0usize; self.columns.len()];
        for lines in std::iter::once(&wrapped_header).chain(wrapped_rows.iter().flatten()) {
            for (width, cell_lines) in widths.iter_mut().zip(lines) {
                for line in cell_lines {
                    *width = (*width).max(line.width());
                }
            }
        }

        let border = border_line(&widths);
        writeln!(out, "{}", border)?;
        write_cells(out, &widths, &header, &wrapped_header, false)?;
        writeln!(out, "{}", border)?;
        for (row, lines) in self.rows.iter().zip(&wrapped_rows) {
            match (row, lines) {
                (Row::Cells(cells), Some(lines)) => {
                    write_cells(out, &widths, cells, lines, colorize)?
                }
                _ => writeln!(out, "{}", border)?,
            }
        }
        writeln!(out, "{}", border)?;
        Ok(())
    }

    fn wrap_row(&self, cells: &[Cell]) -> Vec<Vec<String>> {
        self.columns
            .iter()
            .zip(cells)
            .map(|(column, cell)| wrap(&cell.text, column.max_width))
            .collect()
    }
}

fn border_line(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line
}

fn write_cells(
    out: &mut dyn Write,
    widths: &[usize],
    cells: &[Cell],
    lines: &[Vec<String>],
    colorize: bool,
) -> io::Result<()> {
    let height = lines.iter().map(Vec::len).max().unwrap_or(1).max(1);

    for i in 0..height {
        let mut line = String::from("|");
        for ((width, cell), cell_lines) in widths.iter().zip(cells).zip(lines) {
            let text = cell_lines.get(i).map(String::as_str).unwrap_or("");
            let pad = width.saturating_sub(text.width());
            let painted = match cell.color {
                Some(color) if colorize && !text.is_empty() => text.color(color).to_string(),
                _ => text.to_string(),
            };
            line.push(' ');
            line.push_str(&painted);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Split `text` into lines at most `max_width` columns wide.
///
/// A single character wider than `max_width` still gets a line of its own.
pub(crate) fn wrap(text: &str, max_width: Option<usize>) -> Vec<String> {
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let Some(max) = max_width else {
            lines.push(raw.to_string());
            continue;
        };

        let mut current = String::new();
        let mut current_len = 0;
        for word in raw.split(' ') {
            let word_len = word.width();
            let needed = if current_len == 0 {
                word_len
            } else {
                current_len + 1 + word_len
            };

            if needed <= max {
                if current_len > 0 {
                    current.push(' ');
                }
                current.push_str(word);
                current_len = needed;
                continue;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            // hard-break words longer than the column
            for c in word.chars() {
                let char_len = c.width().unwrap_or(0);
                if current_len > 0 && current_len + char_len > max {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                current.push(c);
                current_len += char_len;
            }
        }
        lines.push(current);
    }

    lines
}
