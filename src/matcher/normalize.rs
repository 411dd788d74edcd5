//! Input normalization applied before rule matching

/// Harakat (fathatan through sukun) and superscript alef
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{0652}' | '\u{0670}')
}

const TATWEEL: char = '\u{0640}';

/// Fold one character; `None` drops it
fn fold_char(c: char) -> Option<char> {
    if is_diacritic(c) || c == TATWEEL {
        return None;
    }
    Some(match c {
        'أ' | 'إ' | 'آ' | 'ٱ' => 'ا',
        'ى' => 'ي',
        '٠'..='٩' => char::from_digit(c as u32 - '٠' as u32, 10).unwrap_or(c),
        '۰'..='۹' => char::from_digit(c as u32 - '۰' as u32, 10).unwrap_or(c),
        '،' => ',',
        _ => c,
    })
}

fn is_trailing_punctuation(c: char) -> bool {
    matches!(c, '.' | '?' | '!' | '؟' | '؛' | '…') || c.is_whitespace()
}

/// Normalized text that remembers where each byte came from
///
/// Rules match against `as_str()`; free-text parameters are sliced back
/// out of the original with `original_slice`.
#[derive(Debug, Clone)]
pub struct Normalized<'a> {
    original: &'a str,
    text: String,
    /// Original byte range of the character each normalized byte belongs to
    spans: Vec<(usize, usize)>,
}

impl<'a> Normalized<'a> {
    /// Collapses whitespace, strips trailing sentence punctuation and folds
    /// Arabic orthographic variants. Case is preserved; rules match
    /// case-insensitively.
    pub fn new(original: &'a str) -> Self {
        let mut out = Self {
            original,
            text: String::with_capacity(original.len()),
            spans: Vec::with_capacity(original.len()),
        };
        let mut pending_space: Option<(usize, usize)> = None;
        let mut last_char = 0;

        for (start, c) in original.char_indices() {
            let end = start + c.len_utf8();
            let Some(folded) = fold_char(c) else {
                // Dropped marks belong to the letter they sit on
                if pending_space.is_none() {
                    for span in &mut out.spans[last_char..] {
                        span.1 = end;
                    }
                }
                continue;
            };
            if folded.is_whitespace() {
                if !out.text.is_empty() {
                    let span = pending_space.get_or_insert((start, end));
                    span.1 = end;
                }
                continue;
            }
            if let Some(span) = pending_space.take() {
                out.push(' ', span);
            }
            last_char = out.text.len();
            out.push(folded, (start, end));
        }

        while let Some(c) = out.text.chars().next_back() {
            if !is_trailing_punctuation(c) {
                break;
            }
            out.text.truncate(out.text.len() - c.len_utf8());
        }
        out.spans.truncate(out.text.len());
        out
    }

    fn push(&mut self, c: char, span: (usize, usize)) {
        self.text.push(c);
        self.spans.extend(std::iter::repeat(span).take(c.len_utf8()));
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// What the user typed for the normalized byte range `start..end`
    pub fn original_slice(&self, start: usize, end: usize) -> &'a str {
        if start >= end || end > self.spans.len() {
            return "";
        }
        &self.original[self.spans[start].0..self.spans[end - 1].1]
    }

    /// What the user typed from normalized offset `start` to the end,
    /// including any trailing punctuation normalization stripped
    pub fn original_tail(&self, start: usize) -> &'a str {
        let Some(&(from, _)) = self.spans.get(start) else {
            return "";
        };
        let to = self.original.trim_end().len();
        &self.original[from..to.max(from)]
    }
}

/// Normalize user text for matching
pub fn normalize(text: &str) -> String {
    Normalized::new(text).text
}
