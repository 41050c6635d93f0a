//! Text extraction for specification, dictionary and data inputs.

use std::io::{self, Read};
use std::path::Path;
use webgen_traits::trim_final_line_break;

/// Reads a source fully into a string, dropping one trailing line break.
pub fn extract_text<R: Read>(mut reader: R) -> io::Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let trimmed_len = trim_final_line_break(&text).len();
    text.truncate(trimmed_len);
    Ok(text)
}

/// Reads a UTF-8 file, naming the file in the error when it can't be read.
pub fn read_text_file<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| {
        io::Error::new(e.kind(), format!("Failed to read '{}': {}", path.display(), e))
    })?;
    extract_text(file)
}

/// Splits text on `\r\n`, `\r` or `\n`.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(pos) => {
                let skip = if current[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[pos + skip..]);
                Some(&current[..pos])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}
