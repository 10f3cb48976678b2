//! Text and html previews of chunks.

use super::{Chunk, Frame, Series};
use crate::value::Value;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write};

fn write_rows(f: &mut fmt::Formatter<'_>, header: Option<&[String]>, rows: &[Vec<String>]) -> fmt::Result {
    let width = rows
        .iter()
        .map(|r| r.len())
        .chain(header.map(|h| h.len() + 1))
        .max()
        .unwrap_or(0);
    let mut widths = alloc::vec![0usize; width];
    if let Some(h) = header {
        for (i, cell) in h.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(cell.len());
        }
    }
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    if let Some(h) = header {
        write!(f, "{:w$}", "", w = widths[0])?;
        for (i, cell) in h.iter().enumerate() {
            write!(f, "  {:>w$}", cell, w = widths[i + 1])?;
        }
        writeln!(f)?;
    }
    for (n, row) in rows.iter().enumerate() {
        for (i, cell) in row.iter().enumerate() {
            if i == 0 {
                write!(f, "{:<w$}", cell, w = widths[0])?;
            } else {
                write!(f, "  {:>w$}", cell, w = widths[i])?;
            }
        }
        if n + 1 < rows.len() {
            writeln!(f)?;
        }
    }
    Ok(())
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Empty frame\nColumns: [{}]", self.columns().join(", "));
        }
        let columns: Vec<&[Value]> = self.iter_columns().map(|(_, v)| v).collect();
        let rows: Vec<Vec<String>> = self
            .index()
            .iter()
            .enumerate()
            .map(|(r, label)| {
                core::iter::once(label.to_string())
                    .chain(columns.iter().map(|col| col[r].to_string()))
                    .collect()
            })
            .collect();
        write_rows(f, Some(self.columns()), &rows)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Empty series")?;
        } else {
            let rows: Vec<Vec<String>> = self
                .index()
                .iter()
                .zip(self.values())
                .map(|(l, v)| alloc::vec![l.to_string(), v.to_string()])
                .collect();
            write_rows(f, None, &rows)?;
        }
        match self.name() {
            Some(name) => write!(f, "\nName: {}", name),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chunk::Frame(frame) => fmt::Display::fmt(frame, f),
            Chunk::Series(series) => fmt::Display::fmt(series, f),
            Chunk::Scalar(value) => fmt::Display::fmt(value, f),
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl Chunk {
    /// Renders the chunk as an html table.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        match self {
            Chunk::Scalar(v) => {
                let _ = write!(out, "<pre>{}</pre>", escape(&v.to_string()));
            }
            Chunk::Series(s) => {
                out.push_str("<table>\n<tbody>\n");
                for (l, v) in s.index().iter().zip(s.values()) {
                    let _ = writeln!(
                        out,
                        "<tr><th>{}</th><td>{}</td></tr>",
                        escape(&l.to_string()),
                        escape(&v.to_string())
                    );
                }
                out.push_str("</tbody>\n</table>");
            }
            Chunk::Frame(frame) => {
                out.push_str("<table>\n<thead>\n<tr><th></th>");
                for c in frame.columns() {
                    let _ = write!(out, "<th>{}</th>", escape(c));
                }
                out.push_str("</tr>\n</thead>\n<tbody>\n");
                let columns: Vec<&[Value]> = frame.iter_columns().map(|(_, v)| v).collect();
                for (r, label) in frame.index().iter().enumerate() {
                    let cells: String = columns
                        .iter()
                        .map(|col| format!("<td>{}</td>", escape(&col[r].to_string())))
                        .collect();
                    let _ = writeln!(out, "<tr><th>{}</th>{}</tr>", escape(&label.to_string()), cells);
                }
                out.push_str("</tbody>\n</table>");
            }
        }
        out
    }
}
