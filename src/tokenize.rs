//! Sentence and word tokenization.
//!
//! Raw story text becomes a corpus of uppercase word tokens, one sentence per
//! line. The analysis side reads that corpus back with a plain whitespace
//! split, so sentence boundaries do not stop bigram windows.

use std::io::Write;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;
use crate::frequency::Token;

/// Split `text` into sentences of uppercase word tokens.
///
/// Newlines are treated as spaces before segmentation. Tokens starting with
/// an ASCII punctuation character are dropped, as are sentences left empty.
///
/// # Example
/// ```
/// use corpus_stats::tokenize::sentences;
/// let sents = sentences("Hello, world! It rains.");
/// assert_eq!(sents, vec![vec!["HELLO", "WORLD"], vec!["IT", "RAINS"]]);
/// ```
pub fn sentences(text: &str) -> Vec<Vec<Token>> {
    let text = text.replace(['\r', '\n'], " ");
    text.unicode_sentences()
        .map(words)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

fn words(sentence: &str) -> Vec<Token> {
    sentence
        .split_word_bounds()
        .filter(|segment| !segment.trim().is_empty())
        .filter(|segment| {
            !segment
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_punctuation())
        })
        .map(str::to_uppercase)
        .collect()
}

/// Write one sentence per line, tokens separated by a single space.
pub fn write_corpus<W: Write>(sentences: &[Vec<Token>], mut writer: W) -> Result<()> {
    for sentence in sentences {
        writeln!(writer, "{}", sentence.join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Parse a corpus written by [`write_corpus`]. Blank lines are skipped.
pub fn read_corpus(text: &str) -> Vec<Vec<Token>> {
    text.lines()
        .map(whitespace_tokens)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Whitespace-delimited tokens, in order, case preserved.
pub fn whitespace_tokens(text: &str) -> Vec<Token> {
    text.split_whitespace().map(String::from).collect()
}

pub fn flatten(sentences: Vec<Vec<Token>>) -> Vec<Token> {
    sentences.into_iter().flatten().collect()
}
