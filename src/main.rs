// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use stockholm_msa::StockholmError;

fn main() -> Result<(), StockholmError> {
    stockholm_msa::run()
}
