// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

mod coords;

pub use coords::DEFAULT_GAP_CHARS;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::StockholmError;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

/// One Stockholm record: the aligned rows plus the four classes of annotation.
///
/// All maps keep insertion order. The row order and row data are private so that they can only
/// change together, through [`Alignment::add_row`] and [`Alignment::delete_row`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AlignmentRepr")]
pub struct Alignment {
    /// `#=GF`: file annotation, tag -> lines of text.
    pub gf: IndexMap<String, Vec<String>>,
    /// `#=GC`: column annotation, tag -> one string spanning the columns.
    pub gc: IndexMap<String, String>,
    /// `#=GS`: per-sequence annotation, tag -> sequence name -> lines of text.
    pub gs: IndexMap<String, IndexMap<String, Vec<String>>>,
    /// `#=GR`: per-sequence, per-column annotation, tag -> sequence name -> string.
    pub gr: IndexMap<String, IndexMap<String, String>>,
    seqname: Vec<String>,
    seqdata: IndexMap<String, String>,
}

// Serialized form. Rows are rebuilt through `add_row` so that row order and row data agree.
#[derive(Deserialize)]
struct AlignmentRepr {
    #[serde(default)]
    gf: IndexMap<String, Vec<String>>,
    #[serde(default)]
    gc: IndexMap<String, String>,
    #[serde(default)]
    gs: IndexMap<String, IndexMap<String, Vec<String>>>,
    #[serde(default)]
    gr: IndexMap<String, IndexMap<String, String>>,
    #[serde(default)]
    seqname: Vec<String>,
    #[serde(default)]
    seqdata: IndexMap<String, String>,
}

impl TryFrom<AlignmentRepr> for Alignment {
    type Error = StockholmError;

    fn try_from(repr: AlignmentRepr) -> Result<Self, Self::Error> {
        let AlignmentRepr {
            gf,
            gc,
            gs,
            gr,
            seqname,
            mut seqdata,
        } = repr;
        let mut aln = Alignment {
            gf,
            gc,
            gs,
            gr,
            ..Alignment::default()
        };
        for name in seqname {
            if aln.has_row(&name) {
                return Err(StockholmError::DuplicateRow(name));
            }
            let data = seqdata
                .shift_remove(&name)
                .ok_or_else(|| StockholmError::RowNotFound(name.clone()))?;
            aln.add_row(name, data)?;
        }
        // row data without a place in the row order
        if let Some(name) = seqdata.into_keys().next() {
            return Err(StockholmError::RowNotFound(name));
        }
        Ok(aln)
    }
}

impl Alignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an alignment from a name -> sequence map. If `names` is given it fixes the row
    /// order (names absent from the map get an empty row); otherwise the map's own order is used.
    pub fn from_seq_index(
        seqs: &IndexMap<String, String>,
        names: Option<&[String]>,
    ) -> Result<Self, StockholmError> {
        let mut aln = Alignment::new();
        match names {
            Some(names) => {
                for name in names {
                    let data = seqs.get(name).cloned().unwrap_or_default();
                    aln.add_row(name.clone(), data)?;
                }
            }
            None => {
                for (name, data) in seqs {
                    aln.add_row(name.clone(), data.clone())?;
                }
            }
        }
        Ok(aln)
    }

    /// Builds an alignment from (name, sequence) pairs, in order.
    pub fn from_row_list<I, R>(rows: I) -> Result<Self, StockholmError>
    where
        I: IntoIterator<Item = R>,
        R: Into<SeqRecord>,
    {
        let mut aln = Alignment::new();
        for row in rows {
            let SeqRecord { header, sequence } = row.into();
            aln.add_row(header, sequence)?;
        }
        Ok(aln)
    }

    pub fn rows(&self) -> usize {
        self.seqname.len()
    }

    /// Number of columns: the longest row or `#=GR` string.
    pub fn columns(&self) -> usize {
        let row_lengths = self.seqdata.values();
        let gr_lengths = self.gr.values().flat_map(|by_name| by_name.values());
        row_lengths
            .chain(gr_lengths)
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Row names, in row order.
    pub fn row_names(&self) -> &[String] {
        &self.seqname
    }

    pub fn row(&self, name: &str) -> Option<&str> {
        self.seqdata.get(name).map(String::as_str)
    }

    pub fn has_row(&self, name: &str) -> bool {
        self.seqdata.contains_key(name)
    }

    /// Every sequence name the record knows of, first-seen order: rows first, then names that
    /// only occur in `#=GR` or `#=GS` annotation.
    pub fn names(&self) -> Vec<String> {
        let gr_names = self.gr.values().flat_map(|by_name| by_name.keys());
        let gs_names = self.gs.values().flat_map(|by_name| by_name.keys());
        self.seqname
            .iter()
            .chain(self.seqdata.keys())
            .chain(gr_names)
            .chain(gs_names)
            .unique()
            .cloned()
            .collect()
    }

    /// All annotation tags, sorted and deduplicated.
    pub fn tags(&self) -> Vec<String> {
        self.gc
            .keys()
            .chain(self.gf.keys())
            .chain(self.gr.keys())
            .chain(self.gs.keys())
            .sorted()
            .dedup()
            .cloned()
            .collect()
    }

    pub fn add_row(
        &mut self,
        name: impl Into<String>,
        data: impl Into<String>,
    ) -> Result<&mut Self, StockholmError> {
        let name = name.into();
        if self.seqdata.contains_key(&name) {
            return Err(StockholmError::DuplicateRow(name));
        }
        self.seqname.push(name.clone());
        self.seqdata.insert(name, data.into());
        Ok(self)
    }

    /// Removes a row together with its `#=GS` and `#=GR` annotation.
    pub fn delete_row(&mut self, name: &str) -> Result<&mut Self, StockholmError> {
        if self.seqdata.shift_remove(name).is_none() {
            return Err(StockholmError::RowNotFound(name.to_string()));
        }
        self.seqname.retain(|n| n != name);
        for by_name in self.gr.values_mut() {
            by_name.shift_remove(name);
        }
        for by_name in self.gs.values_mut() {
            by_name.shift_remove(name);
        }
        // A tag with no names left is gone too; it would still show up in tags().
        self.gr.retain(|_, by_name| !by_name.is_empty());
        self.gs.retain(|_, by_name| !by_name.is_empty());
        Ok(self)
    }

    /// Deep copy; nothing is shared with `self` afterwards.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// New alignment made of the given columns (0-based), in the given order, duplicates
    /// included. `#=GF` and `#=GS` annotation is copied as is.
    pub fn extract_columns(&self, cols: &[usize]) -> Result<Self, StockholmError> {
        let columns = self.columns();
        let bad: Vec<usize> = cols
            .iter()
            .copied()
            .filter(|&c| c >= columns)
            .unique()
            .collect();
        if !bad.is_empty() {
            return Err(StockholmError::BadColumnIndex {
                indices: bad,
                columns,
            });
        }

        let pick = |s: &String| select_columns(s, cols);
        Ok(Alignment {
            gf: self.gf.clone(),
            gc: self
                .gc
                .iter()
                .map(|(tag, s)| (tag.clone(), pick(s)))
                .collect(),
            gs: self.gs.clone(),
            gr: self
                .gr
                .iter()
                .map(|(tag, by_name)| {
                    let picked: IndexMap<String, String> = by_name
                        .iter()
                        .map(|(name, s)| (name.clone(), pick(s)))
                        .collect();
                    (tag.clone(), picked)
                })
                .collect(),
            seqname: self.seqname.clone(),
            seqdata: self
                .seqdata
                .iter()
                .map(|(name, s)| (name.clone(), pick(s)))
                .collect(),
        })
    }

    /// Columns `start` to `end`, both included. An out-of-range end is reported as the bounds of
    /// the bad part of the range, without enumerating it.
    pub fn extract_column_range(&self, start: usize, end: usize) -> Result<Self, StockholmError> {
        let columns = self.columns();
        if start <= end && end >= columns {
            return Err(StockholmError::BadColumnIndex {
                indices: [start.max(columns), end].into_iter().dedup().collect(),
                columns,
            });
        }
        let cols: Vec<usize> = (start..=end).collect();
        self.extract_columns(&cols)
    }

    /// (name, sequence) pairs for every name that has row data, in [`Alignment::names`] order.
    pub fn to_row_list(&self) -> SeqFile {
        self.names()
            .into_iter()
            .filter_map(|name| {
                let data = self.seqdata.get(&name)?.clone();
                Some(SeqRecord::new(name, data))
            })
            .collect()
    }

    // Parser-side upserts. Text is appended to growable buffers, so long interleaved alignments
    // don't pay for repeated concatenation.

    pub(crate) fn push_gf(&mut self, tag: &str, text: &str) {
        self.gf.entry(tag.to_string()).or_default().push(text.to_string());
    }

    pub(crate) fn append_gc(&mut self, tag: &str, text: &str) {
        self.gc.entry(tag.to_string()).or_default().push_str(text);
    }

    pub(crate) fn push_gs(&mut self, name: &str, tag: &str, text: &str) {
        self.gs
            .entry(tag.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
            .push(text.to_string());
    }

    pub(crate) fn append_gr(&mut self, name: &str, tag: &str, text: &str) {
        self.gr
            .entry(tag.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
            .push_str(text);
    }

    pub(crate) fn append_row(&mut self, name: &str, data: &str) {
        match self.seqdata.get_mut(name) {
            Some(row) => row.push_str(data),
            None => {
                self.seqname.push(name.to_string());
                self.seqdata.insert(name.to_string(), data.to_string());
            }
        }
    }
}

// Positions past the end of a (ragged) string contribute nothing.
fn select_columns(s: &str, cols: &[usize]) -> String {
    let chars: Vec<char> = s.chars().collect();
    cols.iter().filter_map(|&c| chars.get(c)).collect()
}
