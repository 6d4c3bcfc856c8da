//! Text normalization shared by the style guides and the resolved style sheet
//!
//! The guides differ only in the parameters they pass: which whitespace policy applies,
//! which characters count as punctuation, and whether the strict academic rules
//! (spacing after punctuation, sentence capitalization and completion) are on.

use super::types::{AllowanceType, WhitespaceAllowanceType};
use crate::pipp::document::{Emphasis, FormattedParagraph, Span};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());
static SENTENCE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?]\s+)(\p{Ll})").unwrap());

const CLOSING: [char; 6] = ['"', '\'', ')', ']', '\u{201d}', '\u{2019}'];
const OPENING: [char; 4] = ['(', '[', '\u{201c}', '\u{2018}'];

/// Apply a whitespace policy to one run. The result never starts or ends with spaces.
pub fn normalize_whitespace(text: &str, policy: WhitespaceAllowanceType) -> String {
    match policy {
        WhitespaceAllowanceType::Yes => text.trim_matches(' ').to_string(),
        WhitespaceAllowanceType::No => WHITESPACE_RUN.replace_all(text, " ").trim().to_string(),
        WhitespaceAllowanceType::Escaped => SPACE_RUN
            .replace_all(text, " ")
            .trim_matches(' ')
            .to_string(),
    }
}

/// Drop whitespace directly in front of punctuation. Under the escaped policy tabs are
/// deliberate and only spaces are dropped.
pub fn tighten_punctuation(
    text: &str,
    whitespace: WhitespaceAllowanceType,
    is_punctuation: impl Fn(char) -> bool,
) -> String {
    let droppable = |c: char| match whitespace {
        WhitespaceAllowanceType::Escaped => c == ' ',
        _ => c == ' ' || c == '\t',
    };
    let mut out = String::with_capacity(text.len());
    let mut pending = String::new();
    for character in text.chars() {
        if droppable(character) {
            pending.push(character);
            continue;
        }
        if !is_punctuation(character) {
            out.push_str(&pending);
        }
        pending.clear();
        out.push(character);
    }
    out.push_str(&pending);
    out
}

/// Marks every character that belongs to a URL-like word
fn url_mask(characters: &[char]) -> Vec<bool> {
    let mut mask = vec![false; characters.len()];
    let mut start = 0;
    while start < characters.len() {
        if characters[start].is_whitespace() {
            start += 1;
            continue;
        }
        let end = characters[start..]
            .iter()
            .position(|c| c.is_whitespace())
            .map_or(characters.len(), |offset| start + offset);
        let word: String = characters[start..end].iter().collect();
        if word.contains("://") || word.to_lowercase().starts_with("www.") {
            mask[start..end].fill(true);
        }
        start = end;
    }
    mask
}

/// Exactly one space after punctuation that is followed by a word. Abbreviations such as
/// "e.g." and URLs are left alone.
pub fn space_after_punctuation(text: &str, is_punctuation: impl Fn(char) -> bool) -> String {
    let characters: Vec<char> = text.chars().collect();
    let in_url = url_mask(&characters);
    let mut out = String::with_capacity(text.len() + 8);
    for (index, &character) in characters.iter().enumerate() {
        out.push(character);
        if !is_punctuation(character) || in_url[index] {
            continue;
        }
        let Some(&next) = characters.get(index + 1) else {
            continue;
        };
        let between_digits = index > 0
            && characters[index - 1].is_ascii_digit()
            && next.is_ascii_digit();
        let abbreviation = character == '.'
            && next.is_alphabetic()
            && characters.get(index + 2) == Some(&'.');
        if !next.is_whitespace()
            && !is_punctuation(next)
            && !CLOSING.contains(&next)
            && !between_digits
            && !abbreviation
        {
            out.push(' ');
        }
    }
    out
}

/// True when the text ends in a dotted abbreviation such as "e.g."
fn ends_with_abbreviation(text: &str) -> bool {
    let mut tail = text.chars().rev();
    matches!(
        (tail.next(), tail.next(), tail.next()),
        (Some('.'), Some(letter), Some('.')) if letter.is_alphabetic()
    )
}

/// Uppercase the first letter after `.`, `!` or `?`, except after a dotted abbreviation
pub fn capitalize_sentences(text: &str) -> String {
    SENTENCE_START
        .replace_all(text, |captures: &Captures| {
            // The mark is a single ASCII byte.
            let stop = captures.get(1).map_or(0, |mark| mark.start() + 1);
            if ends_with_abbreviation(&text[..stop]) {
                captures[0].to_string()
            } else {
                format!("{}{}", &captures[1], captures[2].to_uppercase())
            }
        })
        .into_owned()
}

/// Uppercase the first alphanumeric character if it is a lowercase letter
pub fn capitalize_first(text: &str) -> String {
    match text.char_indices().find(|(_, c)| c.is_alphanumeric()) {
        Some((index, character)) if character.is_lowercase() => {
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..index]);
            out.extend(character.to_uppercase());
            out.push_str(&text[index + character.len_utf8()..]);
            out
        }
        _ => text.to_string(),
    }
}

/// Full text normalization for one run
pub fn normalize(
    text: &str,
    whitespace: WhitespaceAllowanceType,
    strict: bool,
    is_punctuation: impl Fn(char) -> bool + Copy,
) -> String {
    let collapsed = normalize_whitespace(text, whitespace);
    let tightened = tighten_punctuation(&collapsed, whitespace, is_punctuation);
    if strict {
        capitalize_sentences(&space_after_punctuation(&tightened, is_punctuation))
    } else {
        tightened
    }
}

/// Emphasis that survives the style's allowances
pub fn gate_emphasis(requested: Emphasis, bold: AllowanceType, italic: AllowanceType) -> Emphasis {
    match requested {
        Emphasis::Bold if !bold.permits() => Emphasis::Regular,
        Emphasis::Italic if !italic.permits() => Emphasis::Regular,
        other => other,
    }
}

/// True when the text ends a sentence, looking through closing quotes
pub fn ends_sentence(text: &str, is_terminal: impl Fn(char) -> bool) -> bool {
    text.trim_end()
        .trim_end_matches(['"', '\'', '\u{201d}', '\u{2019}'])
        .chars()
        .last()
        .is_some_and(is_terminal)
}

fn needs_space(previous: &str, next: &str) -> bool {
    let (Some(last), Some(first)) = (previous.chars().last(), next.chars().next()) else {
        return false;
    };
    !last.is_whitespace()
        && !first.is_whitespace()
        && !OPENING.contains(&last)
        && !CLOSING[2..].contains(&first)
        && !matches!(first, '.' | ',' | ';' | ':' | '!' | '?')
}

/// Merge neighbouring spans with the same emphasis
pub fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.text.is_empty() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if last.emphasis == span.emphasis => last.text.push_str(&span.text),
            _ => merged.push(span),
        }
    }
    merged
}

/// Join the runs of one sentence with single spaces. Note markers attach to the preceding run.
pub fn join_sentence(spans: &[Span]) -> Vec<Span> {
    let mut joined: Vec<Span> = Vec::with_capacity(spans.len() * 2);
    for span in spans.iter().filter(|span| !span.text.is_empty()) {
        if let Some(previous) = joined.last() {
            if span.emphasis != Emphasis::Superscript && needs_space(&previous.text, &span.text) {
                joined.push(Span::regular(" "));
            }
        }
        joined.push(span.clone());
    }
    joined
}

/// Assemble formatted sentences into one paragraph
pub fn assemble_paragraph(
    sentences: &[Vec<Span>],
    indentation: f32,
    prefix: &str,
    complete_sentences: bool,
    is_terminal: impl Fn(char) -> bool + Copy,
) -> FormattedParagraph {
    let mut spans = Vec::new();
    for sentence in sentences {
        let mut joined = join_sentence(sentence);
        if joined.is_empty() {
            continue;
        }
        if complete_sentences {
            if let Some(first) = joined.first_mut() {
                first.text = capitalize_first(&first.text);
            }
            // Note markers trail the sentence; the full stop belongs in front of them.
            let markers = joined
                .iter()
                .rev()
                .take_while(|span| span.emphasis == Emphasis::Superscript)
                .count();
            let end = joined.len() - markers;
            let finished = end > 0 && ends_sentence(&joined[end - 1].text, is_terminal);
            if !finished && end > 0 {
                joined.insert(end, Span::regular("."));
            }
        }
        if !spans.is_empty() && !prefix.is_empty() {
            spans.push(Span::regular(prefix));
        }
        spans.extend(joined);
    }
    FormattedParagraph {
        indentation,
        spans: merge_spans(spans),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mla_punctuation(c: char) -> bool {
        matches!(c, '.' | '?' | '!' | ',' | ';' | ':')
    }

    fn strict(text: &str) -> String {
        normalize(text, WhitespaceAllowanceType::No, true, mla_punctuation)
    }

    #[rstest]
    #[case("   Hello World   ", "Hello World")]
    #[case("Hello     World", "Hello World")]
    #[case("Hello \t\n World", "Hello World")]
    #[case("Hello , World", "Hello, World")]
    #[case("Hello,World", "Hello, World")]
    #[case("One.two", "One. Two")]
    #[case("Is it? yes!  it is", "Is it? Yes! It is")]
    #[case("Pi is 3.14, roughly", "Pi is 3.14, roughly")]
    #[case("Wait...what", "Wait... What")]
    #[case("He said \"no.\"then left", "He said \"no.\"then left")]
    #[case("a ;b", "a; b")]
    #[case("Birds, e.g. ravens, are clever", "Birds, e.g. ravens, are clever")]
    #[case("Corvids (i.e.ravens) talk", "Corvids (i.e. ravens) talk")]
    #[case("See www.example.com/ravens today", "See www.example.com/ravens today")]
    #[case("Read https://example.org/a.b,c now", "Read https://example.org/a.b,c now")]
    fn test_strict_normalization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strict(input), expected);
    }

    #[test]
    fn test_permissive_keeps_whitespace() {
        let text = normalize(
            "keep   these  spaces ,",
            WhitespaceAllowanceType::Yes,
            false,
            mla_punctuation,
        );
        assert_eq!(text, "keep   these  spaces,");
    }

    #[test]
    fn test_escaped_keeps_line_feeds() {
        let text = normalize_whitespace("line one  \nline   two", WhitespaceAllowanceType::Escaped);
        assert_eq!(text, "line one \nline two");
    }

    #[rstest]
    #[case(WhitespaceAllowanceType::Escaped, "name\t: value ,", "name\t: value,")]
    #[case(WhitespaceAllowanceType::Yes, "name\t: value ,", "name: value,")]
    fn test_tighten_punctuation_respects_policy(
        #[case] policy: WhitespaceAllowanceType,
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(tighten_punctuation(input, policy, mla_punctuation), expected);
    }

    #[test]
    fn test_gate_emphasis() {
        assert_eq!(
            gate_emphasis(Emphasis::Bold, AllowanceType::No, AllowanceType::Yes),
            Emphasis::Regular
        );
        assert_eq!(
            gate_emphasis(Emphasis::Italic, AllowanceType::No, AllowanceType::IfNecessary),
            Emphasis::Italic
        );
        assert_eq!(
            gate_emphasis(Emphasis::Bold, AllowanceType::Yes, AllowanceType::No),
            Emphasis::Bold
        );
    }

    #[test]
    fn test_ends_sentence() {
        let terminal = |c| matches!(c, '.' | '!' | '?');
        assert!(ends_sentence("Done.", terminal));
        assert!(ends_sentence("He said \"stop!\"", terminal));
        assert!(!ends_sentence("(Poe 12)", terminal));
        assert!(!ends_sentence("", terminal));
    }

    #[test]
    fn test_assemble_paragraph_completes_sentences() {
        let terminal = |c| matches!(c, '.' | '!' | '?');
        let sentences = vec![
            vec![Span::regular("the raven"), Span::italic("speaks")],
            vec![Span::regular("Nevermore"), Span::regular("!")],
        ];
        let paragraph = assemble_paragraph(&sentences, 36.0, " ", true, terminal);
        assert_eq!(paragraph.text(), "The raven speaks. Nevermore!");
        assert_eq!(paragraph.indentation, 36.0);
        assert_eq!(
            paragraph.spans,
            vec![
                Span::regular("The raven "),
                Span::italic("speaks"),
                Span::regular(". Nevermore!"),
            ]
        );
    }

    #[test]
    fn test_assemble_paragraph_puts_full_stop_before_note_markers() {
        let terminal = |c| matches!(c, '.' | '!' | '?');
        let sentences = vec![
            vec![Span::regular("Ravens are clever."), Span::new("1", Emphasis::Superscript)],
            vec![Span::regular("the bird never explains itself"), Span::new("2", Emphasis::Superscript)],
        ];
        let paragraph = assemble_paragraph(&sentences, 0.0, " ", true, terminal);
        assert_eq!(
            paragraph.spans,
            vec![
                Span::regular("Ravens are clever."),
                Span::new("1", Emphasis::Superscript),
                Span::regular(" The bird never explains itself."),
                Span::new("2", Emphasis::Superscript),
            ]
        );
    }

    #[test]
    fn test_assemble_paragraph_without_completion() {
        let terminal = |c| matches!(c, '.' | '!' | '?');
        let sentences = vec![vec![Span::regular("lower case")], vec![Span::regular("no stop")]];
        let paragraph = assemble_paragraph(&sentences, 0.0, " ", false, terminal);
        assert_eq!(paragraph.text(), "lower case no stop");
    }

    #[test]
    fn test_join_sentence_respects_brackets() {
        let joined = join_sentence(&[
            Span::regular("\"Quoted\""),
            Span::regular("(Poe 1)"),
            Span::regular("."),
        ]);
        assert_eq!(crate::pipp::document::plain_text(&joined), "\"Quoted\" (Poe 1).");
    }
}
