//! Alignment keys for tokens and lines.
//!
//! Normalization only feeds the aligners. Classification and display always
//! use the original text.

/// Fold OCR noise out of `text` so that cosmetically different renderings
/// of the same content compare equal.
///
/// Strips zero-width characters, folds dash variants to `-` and curly quotes
/// to straight quotes, collapses whitespace runs to a single space, trims
/// and lowercases.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        let c = match c {
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => continue,
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            '“' | '”' | '„' | '‟' => '"',
            '‘' | '’' | '‚' | '‛' => '\'',
            c => c,
        };

        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }

        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.extend(c.to_lowercase());
    }

    out
}
