// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use crate::seq::record::SeqRecord;

/// A row list: name/sequence pairs in row order, without annotations.
pub type SeqFile = Vec<SeqRecord>;
