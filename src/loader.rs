//! Story text extraction from newswire archives.
//!
//! Documents are XML (optionally gzip-compressed, optionally packed in a zip
//! archive) holding `DOC` elements. Only `DOC type="story"` elements
//! contribute text: every `P` paragraph under their `TEXT` element.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use log::{debug, info};
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::Event;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::{AnalysisError, Result};

/// A single file is returned as-is; a directory yields every regular file
/// below it, sorted by path.
pub fn collect_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

fn has_extension(name: &str, ext: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn unavailable(path: &Path, what: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::input_unavailable(format!("{}: {what}", path.display()))
}

fn gunzip<R: Read>(reader: R, path: &Path) -> Result<String> {
    let mut text = String::new();
    MultiGzDecoder::new(reader)
        .read_to_string(&mut text)
        .map_err(|e| unavailable(path, format!("gzip decode failed: {e}")))?;
    Ok(text)
}

/// Read the markup documents stored at `path`.
///
/// `.gz` files are decompressed, `.zip` archives yield one document per
/// `.xml`, `.sgml` or `.gz` entry, anything else is read as UTF-8 text.
pub fn read_documents(path: &Path) -> Result<Vec<String>> {
    let name = path.to_string_lossy();
    if has_extension(&name, "gz") {
        let file = File::open(path).map_err(|e| unavailable(path, e))?;
        return Ok(vec![gunzip(file, path)?]);
    }
    if has_extension(&name, "zip") {
        let file = File::open(path).map_err(|e| unavailable(path, e))?;
        let mut zip = ZipArchive::new(file)
            .map_err(|e| unavailable(path, format!("open zip failed: {e}")))?;
        let mut documents = Vec::new();
        for i in 0..zip.len() {
            let mut entry = zip
                .by_index(i)
                .map_err(|e| unavailable(path, format!("zip entry {i}: {e}")))?;
            let entry_name = entry.name().to_string();
            if entry.is_dir() {
                continue;
            }
            if has_extension(&entry_name, "gz") {
                documents.push(gunzip(&mut entry, path)?);
            } else if has_extension(&entry_name, "xml") || has_extension(&entry_name, "sgml") {
                let mut text = String::new();
                entry
                    .read_to_string(&mut text)
                    .map_err(|e| unavailable(path, format!("read {entry_name}: {e}")))?;
                documents.push(text);
            } else {
                debug!("skipping zip entry {entry_name}");
            }
        }
        return Ok(documents);
    }
    let text = fs::read_to_string(path).map_err(|e| unavailable(path, e))?;
    Ok(vec![text])
}

/// Paragraph texts of every story `DOC` in `xml`, in document order.
///
/// # Example
/// ```
/// use corpus_stats::loader::extract_stories;
/// let xml = r#"<DOC type="story"><TEXT><P>Hello &amp; bye</P></TEXT></DOC>
/// <DOC type="advis"><TEXT><P>skip me</P></TEXT></DOC>"#;
/// assert_eq!(extract_stories(xml).unwrap(), vec!["Hello & bye"]);
/// ```
pub fn extract_stories(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();

    let mut in_story = false;
    let mut in_text = false;
    let mut current: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"DOC" => {
                    in_story = e
                        .try_get_attribute("type")
                        .map_err(|e| AnalysisError::input_unavailable(e.to_string()))?
                        .is_some_and(|attr| attr.value.as_ref() == b"story");
                }
                b"TEXT" if in_story => in_text = true,
                b"P" if in_text => current = Some(String::new()),
                _ => {}
            },
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"DOC" => {
                    in_story = false;
                    in_text = false;
                }
                b"TEXT" => in_text = false,
                b"P" => {
                    if let Some(p) = current.take() {
                        let p = normalize_whitespace(&p);
                        if !p.is_empty() {
                            paragraphs.push(p);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(p) = current.as_mut() {
                    p.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Ok(Event::GeneralRef(r)) => {
                if let Some(p) = current.as_mut() {
                    let raw = format!("&{};", String::from_utf8_lossy(&r));
                    match unescape(&raw) {
                        Ok(resolved) => p.push_str(&resolved),
                        Err(_) => p.push_str(&raw),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AnalysisError::input_unavailable(format!(
                    "parse XML failed at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(paragraphs)
}

/// Story paragraphs of every file, in file order.
pub fn load_stories(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut stories = Vec::new();
    for path in paths {
        let before = stories.len();
        for document in read_documents(path)? {
            let paragraphs =
                extract_stories(&document).map_err(|e| unavailable(path, e))?;
            stories.extend(paragraphs);
        }
        info!(
            "{}: {} story paragraphs",
            path.display(),
            stories.len() - before
        );
    }
    Ok(stories)
}

// ---- Internal helpers ----

fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<DOC id="A1" type="story">
<HEADLINE>Ignored headline</HEADLINE>
<TEXT>
<P>
First paragraph
spans lines.
</P>
<P>  </P>
<P>Second one.</P>
</TEXT>
</DOC>
<DOC id="A2" type="multi">
<TEXT><P>Not a story.</P></TEXT>
</DOC>
<DOC id="A3" type="story">
<TEXT><P>AT&amp;T &#38; friends</P></TEXT>
</DOC>
"#;

    #[test]
    fn test_extract_only_story_paragraphs() {
        let paragraphs = extract_stories(SAMPLE).unwrap();
        assert_eq!(
            paragraphs,
            vec![
                "First paragraph spans lines.",
                "Second one.",
                "AT&T & friends",
            ]
        );
    }

    #[test]
    fn test_malformed_markup() {
        let err = extract_stories("<DOC type=\"story\"><TEXT><P>oops</TEXT>").unwrap_err();
        assert!(matches!(err, AnalysisError::InputUnavailable(_)));
    }

    #[test]
    fn test_gzip_document() {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.xml.gz");
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(SAMPLE.as_bytes()).unwrap();
        enc.finish().unwrap();

        let stories = load_stories(&collect_files(dir.path())).unwrap();
        assert_eq!(stories.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = read_documents(Path::new("/no/such/file.xml")).unwrap_err();
        assert!(matches!(err, AnalysisError::InputUnavailable(_)));
    }
}
