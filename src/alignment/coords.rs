// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

// Mapping between positions in the ungapped sequence and alignment columns.

use crate::alignment::Alignment;
use crate::errors::StockholmError;

pub const DEFAULT_GAP_CHARS: &str = ".-";

impl Alignment {
    fn gapped_row(&self, name: &str) -> Result<&str, StockholmError> {
        self.row(name)
            .ok_or_else(|| StockholmError::RowNotFound(name.to_string()))
    }

    /// Column of each residue of row `name`: element `k` is the (0-based) column of the `k`-th
    /// residue.
    pub fn seqpos2col(
        &self,
        name: &str,
        gap_chars: Option<&str>,
    ) -> Result<Vec<usize>, StockholmError> {
        let gaps = gap_chars.unwrap_or(DEFAULT_GAP_CHARS);
        let seq = self.gapped_row(name)?;
        Ok(seq
            .chars()
            .enumerate()
            .filter(|(_, c)| !gaps.contains(*c))
            .map(|(col, _)| col)
            .collect())
    }

    /// Sequence position of each column of row `name`. Residue columns map to the residue's
    /// 0-based index; a gap column maps to the index of the preceding residue plus 0.5 (-0.5
    /// before the first residue), i.e. the insertion point.
    pub fn col2seqpos(
        &self,
        name: &str,
        gap_chars: Option<&str>,
    ) -> Result<Vec<f64>, StockholmError> {
        let gaps = gap_chars.unwrap_or(DEFAULT_GAP_CHARS);
        let seq = self.gapped_row(name)?;
        let mut pos: f64 = -1.0;
        Ok(seq
            .chars()
            .map(|c| {
                if gaps.contains(c) {
                    pos + 0.5
                } else {
                    pos += 1.0;
                    pos
                }
            })
            .collect())
    }
}
