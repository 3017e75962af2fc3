// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StockholmError {
    #[error("line {line}: no format header: # STOCKHOLM 1.0")]
    MissingHeader { line: usize },

    #[error("line {line}: no format footer: //")]
    MissingFooter { line: usize },

    // Always fatal, even in lenient mode.
    #[error("line {line}: malformed line: {text:?}")]
    MalformedLine { line: usize, text: String },

    #[error("duplicate row name: {0}")]
    DuplicateRow(String),

    #[error("row not found: {0}")]
    RowNotFound(String),

    #[error("bad column indices {indices:?} (alignment has {columns} columns)")]
    BadColumnIndex { indices: Vec<usize>, columns: usize },

    #[error("no alignments found")]
    EmptyDocument,

    #[error("expected one alignment, found {count}")]
    AmbiguousDocument { count: usize },

    // Only raised by the command-line front end.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl StockholmError {
    /// Structural violations may be downgraded to warnings by a lenient parse; everything else
    /// is fatal.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            StockholmError::MissingHeader { .. } | StockholmError::MissingFooter { .. }
        )
    }
}
