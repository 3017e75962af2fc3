// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use stockholm_msa::{
    seq::stockholm::read_stockholm_file,
    Alignment,
    ParseOptions,
    WriteOptions,
};

pub const PFAM: &str = "tests/data/PF00571.sto";

#[allow(dead_code)]
pub fn read_data(path: &str) -> String {
    std::fs::read_to_string(path).expect("Test file not found")
}

#[allow(dead_code)]
pub fn pfam() -> Alignment {
    let mut alns = read_stockholm_file(PFAM, &ParseOptions::strict()).expect("parse");
    assert_eq!(alns.len(), 1);
    alns.remove(0)
}

#[allow(dead_code)]
pub fn width(width: usize) -> WriteOptions {
    WriteOptions {
        width,
        indent_names: false,
    }
}

// Serializes, parses the output, and serializes again; returns both texts.
#[allow(dead_code)]
pub fn reserialize(aln: &Alignment, opts: &WriteOptions) -> (String, String) {
    let first = aln.to_stockholm_string(opts);
    let again = stockholm_msa::parse(&first, &ParseOptions::strict())
        .expect("reparse")
        .to_stockholm_string(opts);
    (first, again)
}
