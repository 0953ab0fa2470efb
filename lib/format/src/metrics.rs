//! Evaluation metrics for formatted output
//!
//! Per-token prediction accuracy from a diagnostic run, plus whole-document
//! distances between an original file and its reformatted version.

use std::fmt;

use codebuff_core::{Result, WsCategory};
use codebuff_lang::text::count;
use codebuff_lang::{FrontEnd, InputDocument, TokenStream};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::formatter::TokenPositionAnalysis;

/// `correct` out of `total`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub correct: usize,
    pub total: usize,
}

impl Ratio {
    fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Percentage correct; NaN when nothing was counted
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return f64::NAN;
        }
        self.correct as f64 * 100.0 / self.total as f64
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, {:.3}%", self.correct, self.total, self.percent())
    }
}

/// Prediction accuracy of one formatting run
///
/// Category ratios compare only the whitespace category; alignment is scored
/// on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Boundaries that actually had no whitespace
    pub none: Ratio,
    pub newline: Ratio,
    pub space: Ratio,
    pub overall: Ratio,
    /// Alignment hits among boundaries predicted as newlines
    pub alignment: Ratio,
}

impl AccuracyReport {
    pub fn from_analysis(analysis: &[TokenPositionAnalysis]) -> Self {
        let mut report = Self::default();
        for a in analysis {
            let hit = a.predicted.category == a.actual.category;
            match a.actual.category {
                WsCategory::None => report.none.record(hit),
                WsCategory::Space => report.space.record(hit),
                WsCategory::Newline => report.newline.record(hit),
            }
            report.overall.record(hit);
            if a.predicted.is_newline() {
                report.alignment.record(a.predicted.alignment == a.actual.alignment);
            }
        }
        report
    }
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "correct none / num none = {}", self.none)?;
        writeln!(f, "correct nl / num nl = {}", self.newline)?;
        writeln!(f, "correct sp / num ws = {}", self.space)?;
        writeln!(f, "overall ws correct = {}", self.overall)?;
        write!(f, "align correct = {}", self.alignment)
    }
}

/// Edit distance between `s` and `t` over characters, normalised to 0..=1
///
/// Divides by the longer length, so an empty string against a non-empty
/// one scores 1.0.
pub fn levenshtein_distance(s: &str, t: &str) -> f32 {
    if s == t {
        return 0.0;
    }
    let s: Vec<char> = s.chars().collect();
    let t: Vec<char> = t.chars().collect();
    let longest = s.len().max(t.len());
    if s.is_empty() || t.is_empty() {
        return 1.0;
    }

    let mut prev: Vec<usize> = (0..=t.len()).collect();
    let mut cur = vec![0usize; t.len() + 1];
    for (i, sc) in s.iter().enumerate() {
        cur[0] = i + 1;
        for (j, tc) in t.iter().enumerate() {
            let cost = usize::from(sc != tc);
            cur[j + 1] = (cur[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[t.len()] as f32 / longest as f32
}

/// Cheap whitespace distance: spaces and newlines are counted separately
///
/// `"a \nb"` and `"a\n b"` score 0.
pub fn whitespace_edit_distance(s: &str, t: &str) -> usize {
    count(s, ' ').abs_diff(count(t, ' ')) + count(s, '\n').abs_diff(count(t, '\n'))
}

/// Whitespace difference between two token-identical documents, 0..=1
///
/// Walks the real tokens of both in lock step and stops at the first end of
/// input. The summed [`whitespace_edit_distance`] of the hidden runs is
/// divided by the larger total hidden text length; two documents with no
/// hidden text at all score 0.
pub fn doc_diff(original: &str, formatted: &str, front_end: &dyn FrontEnd) -> Result<f64> {
    let original = front_end.tokenize(original)?;
    let formatted = front_end.tokenize(formatted)?;

    let mut distance = 0usize;
    let mut original_ws = 0usize;
    let mut formatted_ws = 0usize;
    for k in 0.. {
        let Some(ot) = original.real(k) else { break };
        let ows = hidden_before(&original, ot.index);
        original_ws += ows.chars().count();

        let Some(ft) = formatted.real(k) else { break };
        let fws = hidden_before(&formatted, ft.index);
        formatted_ws += fws.chars().count();

        distance += whitespace_edit_distance(&ows, &fws);
    }

    let max_ws = original_ws.max(formatted_ws);
    if max_ws == 0 {
        return Ok(0.0);
    }
    Ok(distance as f64 / max_ws as f64)
}

/// Whole-document distances between an input and its formatted version
///
/// A metric that needs the formatted text re-tokenized is NaN when that
/// fails; the formatted output itself is still usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetrics {
    /// Levenshtein distance of the concatenated hidden text
    pub ws_levenshtein: f32,
    pub levenshtein: f32,
    pub doc_diff: f64,
}

impl DocumentMetrics {
    pub fn measure(original: &InputDocument, formatted: &str, front_end: &dyn FrontEnd) -> Self {
        let ws_levenshtein = match front_end.tokenize(formatted) {
            Ok(tokens) => levenshtein_distance(&hidden_text(&original.parsed.tokens), &hidden_text(&tokens)),
            Err(e) => {
                warn!("{}: cannot re-tokenize formatted output: {}", original.file_name, e);
                f32::NAN
            }
        };
        let diff = doc_diff(&original.content, formatted, front_end).unwrap_or_else(|e| {
            warn!("{}: cannot compute doc diff: {}", original.file_name, e);
            f64::NAN
        });

        Self {
            ws_levenshtein,
            levenshtein: levenshtein_distance(&original.content, formatted),
            doc_diff: diff,
        }
    }
}

fn hidden_before(tokens: &TokenStream, index: usize) -> String {
    codebuff_lang::token::concat_text(tokens.hidden_to_left(index))
}

/// Concatenated hidden-channel text of a stream
pub fn hidden_text(tokens: &TokenStream) -> String {
    tokens.hidden_text()
}

/// Whitespace runs that differ only before their first newline are equal
pub fn two_ws_equal(a: &str, b: &str) -> bool {
    fn from_first_newline(s: &str) -> &str {
        match s.find('\n') {
            Some(i) if i > 0 => &s[i..],
            _ => s,
        }
    }
    from_first_newline(a) == from_first_newline(b)
}

/// Visible rendering of whitespace, one cell per character
pub fn dump_whitespace(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' => "\\n".to_string(),
            '\t' => "\\t".to_string(),
            '\r' => "\\r".to_string(),
            '\u{000C}' => "\\u000C".to_string(),
            ' ' => "ws".to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebuff_core::Label;
    use codebuff_lang::clike::CLikeFrontEnd;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn analysis(predicted: Label, actual: Label) -> TokenPositionAnalysis {
        TokenPositionAnalysis {
            index: 1,
            token: "x".to_string(),
            line: 1,
            column: 0,
            predicted,
            actual,
            neighbors: Vec::new(),
        }
    }

    #[test]
    fn test_levenshtein_known_values() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3.0 / 7.0);
        assert_eq!(levenshtein_distance("", "abc"), 1.0);
        assert_eq!(levenshtein_distance("abc", ""), 1.0);
        assert_eq!(levenshtein_distance("", ""), 0.0);
        assert_eq!(levenshtein_distance("same", "same"), 0.0);
        assert_eq!(levenshtein_distance("ab", "ba"), 1.0);
    }

    #[test]
    fn test_levenshtein_bounded_and_symmetric() {
        let mut rng = StdRng::seed_from_u64(7);
        let alphabet = [' ', '\n', 'a', 'b'];
        let random_string = |rng: &mut StdRng| -> String {
            let len = rng.random_range(0..12);
            (0..len).map(|_| alphabet[rng.random_range(0..alphabet.len())]).collect()
        };
        for _ in 0..200 {
            let s = random_string(&mut rng);
            let t = random_string(&mut rng);
            let d = levenshtein_distance(&s, &t);
            assert!((0.0..=1.0).contains(&d), "{:?} {:?} -> {}", s, t, d);
            assert_eq!(d, levenshtein_distance(&t, &s));
            assert_eq!(d == 0.0, s == t);
        }
    }

    #[test]
    fn test_whitespace_edit_distance_table() {
        assert_eq!(whitespace_edit_distance("", " "), 1);
        assert_eq!(whitespace_edit_distance("", "   "), 3);
        assert_eq!(whitespace_edit_distance(" ", "  "), 1);
        assert_eq!(whitespace_edit_distance("\n", " "), 2);
        assert_eq!(whitespace_edit_distance("\n\n", " "), 3);
        assert_eq!(whitespace_edit_distance("\n \n", " "), 2);
        assert_eq!(whitespace_edit_distance("\n \n", "\n"), 2);
        assert_eq!(whitespace_edit_distance(" \n", "\n "), 0);
    }

    #[test]
    fn test_doc_diff_identical_is_zero() {
        let fe = CLikeFrontEnd::java();
        let src = "class A {\n    int x;\n}";
        assert_eq!(doc_diff(src, src, &fe).unwrap(), 0.0);
    }

    #[test]
    fn test_doc_diff_no_whitespace_is_zero() {
        let fe = CLikeFrontEnd::java();
        assert_eq!(doc_diff("a;b;", "a;b;", &fe).unwrap(), 0.0);
    }

    #[test]
    fn test_doc_diff_squashed() {
        let fe = CLikeFrontEnd::java();
        // hidden runs: "\n    " , " " , " " , "\n"  -> 5+1+1+1 = 8 chars
        let original = "{\n    a = b;\n}";
        let squashed = "{a=b;}";
        // distances: 1 nl + 4 sp, 1 sp, 1 sp, 1 nl = 8
        assert_eq!(doc_diff(original, squashed, &fe).unwrap(), 1.0);
        let diff = doc_diff(original, "{\n    a=b;\n}", &fe).unwrap();
        assert_eq!(diff, 2.0 / 8.0);
    }

    #[test]
    fn test_doc_diff_lex_error() {
        let fe = CLikeFrontEnd::java();
        assert!(doc_diff("a \"b", "a", &fe).is_err());
    }

    #[test]
    fn test_document_metrics() {
        let lang = codebuff_lang::Language::by_name("c").unwrap();
        let original = InputDocument::from_source("a.c", "x = a / *p;", &lang).unwrap();

        let same = DocumentMetrics::measure(&original, "x = a / *p;", lang.front_end());
        assert_eq!(same.ws_levenshtein, 0.0);
        assert_eq!(same.levenshtein, 0.0);
        assert_eq!(same.doc_diff, 0.0);

        // Dropping the space opens an unterminated block comment
        let broken = DocumentMetrics::measure(&original, "x = a/*p;", lang.front_end());
        assert!(broken.ws_levenshtein.is_nan());
        assert!(broken.doc_diff.is_nan());
        assert!(broken.levenshtein > 0.0);
    }

    #[test]
    fn test_two_ws_equal() {
        assert!(two_ws_equal("  \n    ", "\n    "));
        assert!(two_ws_equal("\n  ", "\n  "));
        assert!(!two_ws_equal("\n  ", "\n    "));
        assert!(!two_ws_equal(" ", "  "));
        assert!(two_ws_equal("  \n", "\n"));
        assert!(!two_ws_equal(" ", "\n"));
    }

    #[test]
    fn test_dump_whitespace() {
        assert_eq!(dump_whitespace("\n  \t"), "\\n | ws | ws | \\t");
        assert_eq!(dump_whitespace(""), "");
    }

    #[test]
    fn test_hidden_text() {
        let tokens = CLikeFrontEnd::java().tokenize("a /* c */\n b").unwrap();
        assert_eq!(hidden_text(&tokens), " /* c */\n ");
    }

    #[test]
    fn test_accuracy_report() {
        let report = AccuracyReport::from_analysis(&[
            analysis(Label::none(), Label::none()),
            analysis(Label::space(), Label::none()),
            analysis(Label::space(), Label::space()),
            analysis(Label::newline(4), Label::newline(4)),
            analysis(Label::newline(0), Label::newline(4)),
            analysis(Label::newline(0), Label::space()),
        ]);
        assert_eq!(report.none, Ratio { correct: 1, total: 2 });
        assert_eq!(report.space, Ratio { correct: 1, total: 2 });
        assert_eq!(report.newline, Ratio { correct: 2, total: 2 });
        assert_eq!(report.overall, Ratio { correct: 4, total: 6 });
        assert_eq!(report.alignment, Ratio { correct: 1, total: 3 });
        assert_eq!(report.space.percent(), 50.0);

        let text = report.to_string();
        assert!(text.contains("correct none / num none = 1/2, 50.000%"));
        assert!(text.contains("align correct = 1/3"));
    }

    #[test]
    fn test_wrong_alignment_still_counts_newline() {
        let report = AccuracyReport::from_analysis(&[analysis(Label::newline(0), Label::newline(4))]);
        assert_eq!(report.newline, Ratio { correct: 1, total: 1 });
        assert_eq!(report.overall, Ratio { correct: 1, total: 1 });
        assert_eq!(report.alignment, Ratio { correct: 0, total: 1 });
    }

    #[test]
    fn test_report_json() {
        let report = AccuracyReport::from_analysis(&[analysis(Label::space(), Label::space())]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["space"]["correct"], 1);
        assert_eq!(json["newline"]["total"], 0);
        let back: AccuracyReport = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);

        let entry = serde_json::to_value(&analysis(Label::newline(4), Label::space())).unwrap();
        assert_eq!(entry["predicted"]["category"], "newline");
        assert_eq!(entry["predicted"]["alignment"], 4);
        assert_eq!(entry["actual"]["alignment"], serde_json::Value::Null);
    }

    #[test]
    fn test_empty_ratio_is_nan() {
        let report = AccuracyReport::from_analysis(&[]);
        assert!(report.overall.percent().is_nan());
    }
}
