// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;

use itertools::Itertools;
use serde::Deserialize;

use crate::alignment::Alignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Maximum line length; 0 writes each row on a single line.
    pub width: usize,
    /// Right-align names and tags instead of left-aligning them.
    pub indent_names: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            width: 80,
            indent_names: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FastaOptions {
    /// Residues per line; 0 means unwrapped.
    pub width: usize,
}

/// Stockholm rendering of an alignment, see [`Alignment::display`].
pub struct StockholmDisplay<'a> {
    aln: &'a Alignment,
    opts: &'a WriteOptions,
}

/// FastA rendering of an alignment, see [`Alignment::fasta`].
pub struct FastaDisplay<'a> {
    aln: &'a Alignment,
    opts: &'a FastaOptions,
}

impl Alignment {
    pub fn display<'a>(&'a self, opts: &'a WriteOptions) -> StockholmDisplay<'a> {
        StockholmDisplay { aln: self, opts }
    }

    pub fn fasta<'a>(&'a self, opts: &'a FastaOptions) -> FastaDisplay<'a> {
        FastaDisplay { aln: self, opts }
    }

    pub fn to_stockholm_string(&self, opts: &WriteOptions) -> String {
        self.display(opts).to_string()
    }

    pub fn to_fasta(&self, opts: &FastaOptions) -> String {
        self.fasta(opts).to_string()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display(&WriteOptions::default()))
    }
}

// `s` cut into consecutive pieces of `count` (> 0) characters, in one pass over the string.
fn blocks(s: &str, count: usize) -> Vec<&str> {
    if s.is_ascii() {
        return s
            .as_bytes()
            .chunks(count)
            .map(|b| std::str::from_utf8(b).unwrap_or_default())
            .collect();
    }
    let mut pieces = Vec::with_capacity(s.len() / count + 1);
    let mut start = 0;
    for (n, (i, _)) in s.char_indices().enumerate() {
        if n > 0 && n % count == 0 {
            pieces.push(&s[start..i]);
            start = i;
        }
    }
    if start < s.len() {
        pieces.push(&s[start..]);
    }
    pieces
}

fn block_at<'s>(pieces: &[&'s str], i: usize) -> &'s str {
    pieces.get(i).copied().unwrap_or("")
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// Label layout shared by every line of one record.
struct Gutter {
    name_width: usize,
    tag_width: usize,
    indent: bool,
}

impl Gutter {
    fn pad(&self, text: &str, width: usize) -> String {
        if self.indent {
            format!("{:>width$}", text, width = width)
        } else {
            format!("{:<width$}", text, width = width)
        }
    }

    fn tag(&self, tag: &str) -> String {
        self.pad(tag, self.tag_width)
    }

    // "#=GS"/"#=GR" label: sequence name, then tag.
    fn name_tag(&self, name: &str, tag: &str) -> String {
        if self.indent {
            format!(
                "{:>nw$} {:>tw$}",
                name,
                tag,
                nw = self.name_width,
                tw = self.tag_width
            )
        } else {
            self.pad(&format!("{} {}", name, tag), self.name_width + self.tag_width + 1)
        }
    }

    // Rows line up with the data of "#=GR <name> <tag>" lines when there are tags.
    fn seq_indent(&self) -> usize {
        if self.tag_width > 0 {
            self.tag_width + 6
        } else {
            0
        }
    }

    fn name(&self, name: &str) -> String {
        self.pad(name, self.name_width + self.seq_indent())
    }
}

impl fmt::Display for StockholmDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let aln = self.aln;
        let names = aln.names();
        let cols = aln.columns();
        let gutter = Gutter {
            name_width: names.iter().map(|n| char_len(n)).max().unwrap_or(0),
            tag_width: aln.tags().iter().map(|t| char_len(t)).max().unwrap_or(0),
            indent: self.opts.indent_names,
        };
        let block = if self.opts.width > 0 {
            self.opts
                .width
                .saturating_sub(gutter.name_width + gutter.seq_indent() + 1)
                .max(1)
        } else {
            cols.max(1)
        };

        writeln!(f, "# STOCKHOLM 1.0")?;

        for tag in aln.gf.keys().sorted() {
            for line in &aln.gf[tag] {
                writeln!(f, "#=GF {} {}", gutter.tag(tag), line)?;
            }
        }

        for tag in aln.gs.keys().sorted() {
            for (name, lines) in &aln.gs[tag] {
                for line in lines {
                    writeln!(f, "#=GS {} {}", gutter.name_tag(name, tag), line)?;
                }
            }
        }

        // Every string is cut into blocks once; block `i` of a short string may be missing.
        let gc_lines: Vec<(&String, Vec<&str>)> = aln
            .gc
            .keys()
            .sorted()
            .map(|tag| (tag, blocks(&aln.gc[tag], block)))
            .collect();
        let gr_tags: Vec<&String> = aln.gr.keys().sorted().collect();
        let by_name: Vec<(&String, Vec<(&String, Vec<&str>)>, Vec<&str>)> = names
            .iter()
            .map(|name| {
                let gr_lines = gr_tags
                    .iter()
                    .filter_map(|tag| Some((*tag, blocks(aln.gr[*tag].get(name)?, block))))
                    .collect();
                let row = aln.row(name).map_or_else(Vec::new, |row| blocks(row, block));
                (name, gr_lines, row)
            })
            .collect();
        let gc_pad = " ".repeat(gutter.name_width + 2);

        for i in 0..cols.div_ceil(block).max(1) {
            if i > 0 {
                writeln!(f)?;
            }
            for (tag, pieces) in &gc_lines {
                let part = block_at(pieces, i);
                if !part.is_empty() {
                    writeln!(f, "#=GC {}{}{}", gutter.tag(tag), gc_pad, part)?;
                }
            }
            for (name, gr_lines, row) in &by_name {
                for (tag, pieces) in gr_lines {
                    let part = block_at(pieces, i);
                    if !part.is_empty() {
                        writeln!(f, "#=GR {} {}", gutter.name_tag(name, tag), part)?;
                    }
                }
                let part = block_at(row, i);
                if !part.is_empty() {
                    writeln!(f, "{} {}", gutter.name(name), part)?;
                }
            }
        }

        writeln!(f, "//")
    }
}

impl fmt::Display for FastaDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rec in self.aln.to_row_list() {
            writeln!(f, ">{}", rec.header)?;
            let width = if self.opts.width > 0 {
                self.opts.width
            } else {
                char_len(&rec.sequence).max(1)
            };
            for piece in blocks(&rec.sequence, width) {
                writeln!(f, "{}", piece)?;
            }
        }
        Ok(())
    }
}
