// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

// One aligned row: a sequence name and its residue/gap string. This is the unit of the row-list
// view of an alignment, and what the FastA reader produces.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqRecord {
    pub header: String,
    pub sequence: String,
}

impl SeqRecord {
    pub fn new(header: impl Into<String>, sequence: impl Into<String>) -> Self {
        SeqRecord {
            header: header.into(),
            sequence: sequence.into(),
        }
    }
}

impl<N: Into<String>, S: Into<String>> From<(N, S)> for SeqRecord {
    fn from((header, sequence): (N, S)) -> Self {
        SeqRecord::new(header, sequence)
    }
}
