// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs;
use std::path::Path;

use crate::errors::StockholmError;
use crate::seq::file::SeqFile;
use crate::seq::record::SeqRecord;

// Reads FastA text into a row list. The record name is the first word of the header line, since
// Stockholm names cannot contain whitespace.
pub fn read_fasta_str(text: &str) -> Result<SeqFile, StockholmError> {
    let mut result: SeqFile = Vec::new();
    let mut current_record: Option<SeqRecord> = None;

    for (n, l) in text.lines().enumerate() {
        let l = l.trim();
        if let Some(hdr) = l.strip_prefix('>') {
            if let Some(rec) = current_record.take() {
                result.push(rec);
            }
            let Some(name) = hdr.split_whitespace().next() else {
                return Err(StockholmError::MalformedLine {
                    line: n + 1,
                    text: l.to_string(),
                });
            };
            current_record = Some(SeqRecord::new(name, String::new()));
        } else if l.is_empty() {
            continue;
        } else {
            // append line to current record's sequence
            match current_record.as_mut() {
                Some(rec) => rec.sequence.push_str(l),
                None => {
                    return Err(StockholmError::MalformedLine {
                        line: n + 1,
                        text: l.to_string(),
                    })
                }
            }
        }
    }
    if let Some(rec) = current_record {
        result.push(rec);
    }
    Ok(result)
}

pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<SeqFile, StockholmError> {
    let text = fs::read_to_string(path)?;
    read_fasta_str(&text)
}
