// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    fmt, fs,
    io::{stdout, Write},
    path::{Path, PathBuf},
};

use log::{info, warn};

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::alignment::Alignment;
use crate::errors::StockholmError;
use crate::seq::fasta::read_fasta_str;
use crate::seq::stockholm::{parse_all, ParseOptions};
use crate::seq::writer::{FastaOptions, WriteOptions};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    /// Alignment file
    aln_fname: String,

    /// Input format
    #[arg(short, long = "from", default_value_t = InputFormat::Stockholm,
        help = "Input format [stockholm|fasta] (or just s|f); default: stockholm",
        hide_default_value = true,
        hide_possible_values = true,
    )]
    from: InputFormat,

    /// Output format
    #[arg(short, long = "to", default_value_t = OutputFormat::Stockholm,
        help = "Output format [stockholm|fasta|json] (or just s|f|j); default: stockholm",
        hide_default_value = true,
        hide_possible_values = true,
    )]
    to: OutputFormat,

    /// Output line width, 0 for no wrapping (default: 80 for Stockholm, unwrapped for FastA)
    #[arg(short, long)]
    width: Option<usize>,

    /// Right-align sequence names and annotation tags
    #[arg(long = "indent-names")]
    indent_names: bool,

    /// Fail on a missing header or footer instead of warning
    #[arg(short, long)]
    strict: bool,

    /// Do not warn about missing headers or footers
    #[arg(short, long)]
    quiet: bool,

    /// Check that the file is valid Stockholm, then exit
    #[arg(long)]
    check: bool,

    /// Info mode: print the number of rows and columns of each alignment
    #[arg(short, long)]
    info: bool,

    /// Configuration file (JSON); default: .stockholmconfig in $HOME or the current directory
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InputFormat {
    #[clap(name = "stockholm")]
    #[clap(alias = "s")]
    Stockholm,
    #[clap(name = "fasta")]
    #[clap(alias = "f")]
    FastA,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputFormat::Stockholm => "stockholm",
            InputFormat::FastA => "fasta",
        };
        write!(f, "{}", s)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[clap(name = "stockholm")]
    #[clap(alias = "s")]
    Stockholm,
    #[clap(name = "fasta")]
    #[clap(alias = "f")]
    FastA,
    #[clap(name = "json")]
    #[clap(alias = "j")]
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputFormat::Stockholm => "stockholm",
            OutputFormat::FastA => "fasta",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StockholmConfig {
    parse: ParseOptions,
    write: WriteOptions,
    fasta: FastaOptions,
}

impl StockholmConfig {
    fn from_file(path: &Path) -> Result<Self, StockholmError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn find_stockholm_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(".stockholmconfig");
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(".stockholmconfig");
        if path.exists() {
            return Some(path);
        }
    }
    None
}

// Config file values, overridden by whatever was given on the command line.
#[derive(Debug)]
struct Settings {
    from: InputFormat,
    to: OutputFormat,
    parse: ParseOptions,
    write: WriteOptions,
    fasta: FastaOptions,
}

impl Settings {
    fn new(cli: &Cli, config: StockholmConfig) -> Self {
        let StockholmConfig {
            mut parse,
            mut write,
            mut fasta,
        } = config;
        parse.strict |= cli.strict;
        parse.quiet |= cli.quiet;
        write.indent_names |= cli.indent_names;
        if let Some(width) = cli.width {
            write.width = width;
            fasta.width = width;
        }
        Settings {
            from: cli.from,
            to: cli.to,
            parse,
            write,
            fasta,
        }
    }
}

fn read_alignments(text: &str, settings: &Settings) -> Result<Vec<Alignment>, StockholmError> {
    match settings.from {
        InputFormat::Stockholm => parse_all(text, &settings.parse),
        InputFormat::FastA => {
            let rows = read_fasta_str(text)?;
            Ok(vec![Alignment::from_row_list(rows)?])
        }
    }
}

fn render(alns: &[Alignment], settings: &Settings) -> Result<String, StockholmError> {
    let out: String = match settings.to {
        OutputFormat::Stockholm => alns
            .iter()
            .map(|aln| aln.to_stockholm_string(&settings.write))
            .collect(),
        OutputFormat::FastA => alns
            .iter()
            .map(|aln| aln.to_fasta(&settings.fasta))
            .collect(),
        OutputFormat::Json => serde_json::to_string_pretty(alns)? + "\n",
    };
    Ok(out)
}

fn info_lines(alns: &[Alignment]) -> String {
    alns.iter()
        .enumerate()
        .map(|(i, aln)| format!("{}\t{} rows\t{} columns\n", i + 1, aln.rows(), aln.columns()))
        .collect()
}

pub fn run() -> Result<(), StockholmError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StockholmConfig::from_file(Path::new(path))?,
        None => match find_stockholm_config() {
            Some(path) => StockholmConfig::from_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring {}: {}", path.display(), e);
                StockholmConfig::default()
            }),
            None => StockholmConfig::default(),
        },
    };
    let settings = Settings::new(&cli, config);
    info!("Settings: {:?}", settings);

    let text = fs::read_to_string(&cli.aln_fname)?;

    if cli.check {
        let alns = parse_all(&text, &ParseOptions::strict())?;
        println!("{}: {} valid alignment(s)", cli.aln_fname, alns.len());
        return Ok(());
    }

    let alns = read_alignments(&text, &settings)?;
    info!("Read {} alignment(s) from {}", alns.len(), cli.aln_fname);
    let out = if cli.info {
        info_lines(&alns)
    } else {
        render(&alns, &settings)?
    };
    stdout().write_all(out.as_bytes())?;

    Ok(())
}
