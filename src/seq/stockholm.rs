// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::alignment::Alignment;
use crate::errors::StockholmError;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# STOCKHOLM 1\.0\s*$").expect("header regex"));
static FOOTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//\s*$").expect("footer regex"));
static GF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#=GF\s+(\S+)(?:\s+(.*?))?\s*$").expect("GF regex"));
static GC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#=GC\s+(\S+)(?:\s+(.*?))?\s*$").expect("GC regex"));
static GS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#=GS\s+(\S+)\s+(\S+)(?:\s+(.*?))?\s*$").expect("GS regex")
});
static GR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#=GR\s+(\S+)\s+(\S+)(?:\s+(.*?))?\s*$").expect("GR regex")
});
static SEQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s+(\S+)\s*$").expect("sequence line regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Structural problems (missing header or footer) abort the parse instead of being warned
    /// about.
    pub strict: bool,
    /// Don't log warnings about recovered structural problems.
    pub quiet: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        ParseOptions {
            strict: true,
            quiet: false,
        }
    }

    pub fn quiet() -> Self {
        ParseOptions {
            strict: false,
            quiet: true,
        }
    }
}

// What a single input line is, in order of precedence.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Header,
    Footer,
    FileAnnotation { tag: &'a str, text: &'a str },
    ColumnAnnotation { tag: &'a str, text: &'a str },
    SeqAnnotation { name: &'a str, tag: &'a str, text: &'a str },
    ResidueAnnotation { name: &'a str, tag: &'a str, text: &'a str },
    Sequence { name: &'a str, data: &'a str },
    Blank,
    Malformed,
}

// Unmatched optional groups (annotation without text) read as "".
fn text_of<'h>(caps: &Captures<'h>, i: usize) -> &'h str {
    caps.get(i).map_or("", |m| m.as_str())
}

fn classify(line: &str) -> Line<'_> {
    if HEADER_RE.is_match(line) {
        Line::Header
    } else if FOOTER_RE.is_match(line) {
        Line::Footer
    } else if let Some(caps) = GF_RE.captures(line) {
        Line::FileAnnotation {
            tag: text_of(&caps, 1),
            text: text_of(&caps, 2),
        }
    } else if let Some(caps) = GC_RE.captures(line) {
        Line::ColumnAnnotation {
            tag: text_of(&caps, 1),
            text: text_of(&caps, 2),
        }
    } else if let Some(caps) = GS_RE.captures(line) {
        Line::SeqAnnotation {
            name: text_of(&caps, 1),
            tag: text_of(&caps, 2),
            text: text_of(&caps, 3),
        }
    } else if let Some(caps) = GR_RE.captures(line) {
        Line::ResidueAnnotation {
            name: text_of(&caps, 1),
            tag: text_of(&caps, 2),
            text: text_of(&caps, 3),
        }
    } else if let Some(caps) = SEQ_RE.captures(line) {
        Line::Sequence {
            name: text_of(&caps, 1),
            data: text_of(&caps, 2),
        }
    } else if line.trim().is_empty() {
        Line::Blank
    } else {
        Line::Malformed
    }
}

struct Parser<'o> {
    opts: &'o ParseOptions,
    // The record under construction; `None` between a footer and the next header.
    current: Option<Alignment>,
    done: Vec<Alignment>,
}

impl<'o> Parser<'o> {
    fn new(opts: &'o ParseOptions) -> Self {
        Parser {
            opts,
            current: None,
            done: Vec::new(),
        }
    }

    // Severity policy: decides whether a violation ends the parse or is only reported.
    fn violation(&self, err: StockholmError) -> Result<(), StockholmError> {
        if self.opts.strict || !err.is_structural() {
            return Err(err);
        }
        if !self.opts.quiet {
            warn!("{}", err);
        }
        Ok(())
    }

    // NoRecord -> InRecord for content lines: allowed only if the policy lets a missing header
    // through.
    fn record(&mut self, lineno: usize) -> Result<&mut Alignment, StockholmError> {
        if self.current.is_none() {
            self.violation(StockholmError::MissingHeader { line: lineno })?;
            debug!("line {}: opening a record without header", lineno);
        }
        Ok(self.current.get_or_insert_with(Alignment::new))
    }

    fn finish(&mut self) {
        if let Some(aln) = self.current.take() {
            debug!(
                "closing record: {} rows, {} columns",
                aln.rows(),
                aln.columns()
            );
            self.done.push(aln);
        }
    }

    fn line(&mut self, lineno: usize, line: &str) -> Result<(), StockholmError> {
        match classify(line) {
            Line::Header => {
                if self.current.is_some() {
                    self.violation(StockholmError::MissingFooter { line: lineno })?;
                    self.finish();
                }
                self.current = Some(Alignment::new());
            }
            Line::Footer => {
                if self.current.is_some() {
                    self.finish();
                } else {
                    self.violation(StockholmError::MissingHeader { line: lineno })?;
                }
            }
            Line::FileAnnotation { tag, text } => self.record(lineno)?.push_gf(tag, text),
            Line::ColumnAnnotation { tag, text } => self.record(lineno)?.append_gc(tag, text),
            Line::SeqAnnotation { name, tag, text } => {
                self.record(lineno)?.push_gs(name, tag, text)
            }
            Line::ResidueAnnotation { name, tag, text } => {
                self.record(lineno)?.append_gr(name, tag, text)
            }
            Line::Sequence { name, data } => self.record(lineno)?.append_row(name, data),
            Line::Blank => {}
            Line::Malformed => {
                return Err(StockholmError::MalformedLine {
                    line: lineno,
                    text: line.to_string(),
                })
            }
        }
        Ok(())
    }

    fn end(mut self, last_lineno: usize) -> Result<Vec<Alignment>, StockholmError> {
        if self.current.is_some() {
            self.violation(StockholmError::MissingFooter { line: last_lineno })?;
            self.finish();
        }
        Ok(self.done)
    }
}

/// Parses every record in `text`, in document order.
pub fn parse_all(text: &str, opts: &ParseOptions) -> Result<Vec<Alignment>, StockholmError> {
    let mut parser = Parser::new(opts);
    let mut last_lineno = 0;
    for (n, line) in text.lines().enumerate() {
        last_lineno = n + 1;
        parser.line(last_lineno, line)?;
    }
    parser.end(last_lineno)
}

/// Parses a document that must hold exactly one record.
pub fn parse(text: &str, opts: &ParseOptions) -> Result<Alignment, StockholmError> {
    let mut alns = parse_all(text, opts)?;
    match alns.len() {
        0 => Err(StockholmError::EmptyDocument),
        1 => Ok(alns.remove(0)),
        count => Err(StockholmError::AmbiguousDocument { count }),
    }
}

/// True iff the first line is a Stockholm header.
pub fn sniff(text: &str) -> bool {
    text.lines().next().is_some_and(|l| HEADER_RE.is_match(l))
}

/// True iff a strict parse succeeds.
pub fn validate(text: &str) -> bool {
    parse_all(text, &ParseOptions::strict()).is_ok()
}

pub fn read_stockholm_file<P: AsRef<Path>>(
    path: P,
    opts: &ParseOptions,
) -> Result<Vec<Alignment>, StockholmError> {
    let text = fs::read_to_string(path)?;
    parse_all(&text, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = "# STOCKHOLM 1.0\nfoo AC-GT\nbar ACGGT\n//\n";

    #[test]
    fn test_classify_annotations() {
        assert_eq!(
            classify("#=GF ID  CBS domain  "),
            Line::FileAnnotation {
                tag: "ID",
                text: "CBS domain"
            }
        );
        assert_eq!(
            classify("#=GC SS_cons ..<<>>"),
            Line::ColumnAnnotation {
                tag: "SS_cons",
                text: "..<<>>"
            }
        );
        assert_eq!(
            classify("#=GS O83071/192-246 AC O83071"),
            Line::SeqAnnotation {
                name: "O83071/192-246",
                tag: "AC",
                text: "O83071"
            }
        );
        assert_eq!(
            classify("#=GR O83071/192-246 SS CCHH"),
            Line::ResidueAnnotation {
                name: "O83071/192-246",
                tag: "SS",
                text: "CCHH"
            }
        );
    }

    #[test]
    fn test_classify_annotation_without_text() {
        assert_eq!(
            classify("#=GF CC"),
            Line::FileAnnotation { tag: "CC", text: "" }
        );
    }

    #[test]
    fn test_classify_structure() {
        assert_eq!(classify("# STOCKHOLM 1.0"), Line::Header);
        assert_eq!(classify("# STOCKHOLM 1.0  "), Line::Header);
        assert_eq!(classify("//"), Line::Footer);
        assert_eq!(classify("//   "), Line::Footer);
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify(""), Line::Blank);
        assert_eq!(
            classify("  seq1   AC..GT  "),
            Line::Sequence {
                name: "seq1",
                data: "AC..GT"
            }
        );
        assert_eq!(classify("seq1 AC GT"), Line::Malformed);
        assert_eq!(classify("lonely"), Line::Malformed);
        assert_eq!(classify("# STOCKHOLM 1.0 extra"), Line::Malformed);
    }

    #[test]
    fn test_parse_simple() {
        let aln = parse(SIMPLE, &ParseOptions::default()).expect("parse");
        assert_eq!(aln.rows(), 2);
        assert_eq!(aln.columns(), 5);
        assert_eq!(aln.row("foo"), Some("AC-GT"));
        assert_eq!(aln.row("bar"), Some("ACGGT"));
        assert_eq!(aln.row_names(), ["foo", "bar"]);
    }

    #[test]
    fn test_parse_interleaved_blocks() {
        let text = "# STOCKHOLM 1.0\n\
                    #=GF ID test\n\
                    #=GF CC first line\n\
                    #=GF CC second line\n\
                    s1 ACGT\n\
                    s2 A-GT\n\
                    #=GR s1 SS ..<<\n\
                    #=GC SS_cons ..<<\n\
                    \n\
                    s1 TTAA\n\
                    s2 TT-A\n\
                    #=GR s1 SS >>..\n\
                    #=GC SS_cons >>..\n\
                    //\n";
        let aln = parse(text, &ParseOptions::default()).expect("parse");
        assert_eq!(aln.rows(), 2);
        assert_eq!(aln.columns(), 8);
        assert_eq!(aln.row("s1"), Some("ACGTTTAA"));
        assert_eq!(aln.row("s2"), Some("A-GTTT-A"));
        assert_eq!(aln.gf["CC"], vec!["first line", "second line"]);
        assert_eq!(aln.gc["SS_cons"], "..<<>>..");
        assert_eq!(aln.gr["SS"]["s1"], "..<<>>..");
    }

    #[test]
    fn test_parse_all_multiple_records() {
        let text = format!("{}{}", SIMPLE, "# STOCKHOLM 1.0\nbaz GG\n//\n");
        let alns = parse_all(&text, &ParseOptions::strict()).expect("parse");
        assert_eq!(alns.len(), 2);
        assert_eq!(alns[0].rows(), 2);
        assert_eq!(alns[1].row("baz"), Some("GG"));
        assert!(alns[1].row("foo").is_none());
    }

    #[test]
    fn test_parse_requires_exactly_one() {
        let two = format!("{}{}", SIMPLE, SIMPLE);
        assert!(matches!(
            parse(&two, &ParseOptions::default()),
            Err(StockholmError::AmbiguousDocument { count: 2 })
        ));
        assert!(matches!(
            parse("\n\n", &ParseOptions::default()),
            Err(StockholmError::EmptyDocument)
        ));
    }

    #[test]
    fn test_strict_missing_header() {
        let err = parse_all("foo ACGT\n//\n", &ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, StockholmError::MissingHeader { line: 1 }));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_strict_missing_footer() {
        let text = "# STOCKHOLM 1.0\nfoo ACGT\n# STOCKHOLM 1.0\nbar ACGT\n//\n";
        let err = parse_all(text, &ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, StockholmError::MissingFooter { line: 3 }));

        let err = parse_all("# STOCKHOLM 1.0\nfoo ACGT\n", &ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, StockholmError::MissingFooter { line: 2 }));
    }

    #[test]
    fn test_lenient_recovers_missing_header() {
        let text = "foo AC-GT\n#=GS foo DE some protein\nbar ACGGT\n//\n";
        let alns = parse_all(text, &ParseOptions::quiet()).expect("parse");
        assert_eq!(alns.len(), 1);
        assert_eq!(alns[0].rows(), 2);
        assert_eq!(alns[0].row("foo"), Some("AC-GT"));
        assert_eq!(alns[0].gs["DE"]["foo"], vec!["some protein"]);
    }

    #[test]
    fn test_lenient_keeps_unterminated_records() {
        let text = "# STOCKHOLM 1.0\nfoo ACGT\n# STOCKHOLM 1.0\nbar TTTT\n";
        let alns = parse_all(text, &ParseOptions::quiet()).expect("parse");
        assert_eq!(alns.len(), 2);
        assert_eq!(alns[0].row("foo"), Some("ACGT"));
        assert_eq!(alns[1].row("bar"), Some("TTTT"));
    }

    #[test]
    fn test_lenient_stray_footer() {
        let alns = parse_all("//\n# STOCKHOLM 1.0\nfoo A\n//\n", &ParseOptions::quiet())
            .expect("parse");
        assert_eq!(alns.len(), 1);
    }

    #[test]
    fn test_malformed_is_always_fatal() {
        let text = "# STOCKHOLM 1.0\nfoo ACGT\nthis line is bad\n//\n";
        for opts in [ParseOptions::default(), ParseOptions::quiet(), ParseOptions::strict()] {
            match parse_all(text, &opts) {
                Err(StockholmError::MalformedLine { line, text }) => {
                    assert_eq!(line, 3);
                    assert_eq!(text, "this line is bad");
                }
                other => panic!("expected malformed line, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_sniff() {
        assert!(sniff(SIMPLE));
        assert!(!sniff("Not a Stockholm file"));
        assert!(!sniff("\n# STOCKHOLM 1.0\n"));
        assert!(!sniff(""));
    }

    #[test]
    fn test_validate() {
        assert!(validate(SIMPLE));
        assert!(!validate("Not a Stockholm file"));
        assert!(!validate(
            "# STOCKHOLM 1.0\nBut it's not actually a Stockholm file\n"
        ));
        assert!(!validate("# STOCKHOLM 1.0\nfoo ACGT\n"));
    }

    #[test]
    fn test_parse_options_from_json() {
        let opts: ParseOptions = serde_json::from_str(r#"{"strict": true}"#).expect("json");
        assert_eq!(opts, ParseOptions::strict());
        let opts: ParseOptions = serde_json::from_str("{}").expect("json");
        assert_eq!(opts, ParseOptions::default());
    }
}
