/*!
 * Conservative OCR look-alike correction.
 *
 * Scanned documents often carry digits in place of letters (`c0ugh`,
 * `fev3r`). Only digit runs enclosed by letters on both sides inside a single
 * token are rewritten; numerals such as `120/80`, `38.5` or `500mg` are left alone.
 */

use std::borrow::Cow;

use crate::errors::PageError;
use crate::translation::pipeline::PageStage;

/// Rewrites digit look-alikes inside words.
#[derive(Debug, Clone, Copy, Default)]
pub struct OcrCorrector;

impl OcrCorrector {
    pub fn new() -> Self {
        Self
    }

    fn lookalike(digit: char, upper: bool) -> Option<char> {
        let letter = match digit {
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '5' => 's',
            _ => return None,
        };
        Some(if upper { letter.to_ascii_uppercase() } else { letter })
    }

    /// Correct one token.
    pub fn correct_token<'a>(&self, token: &'a str) -> Cow<'a, str> {
        let chars: Vec<char> = token.chars().collect();
        let mut out = chars.clone();
        let mut changed = false;

        let mut i = 0;
        while i < chars.len() {
            if !chars[i].is_ascii_digit() {
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            let end = i;

            let before = start.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(end).copied();
            let (Some(before), Some(after)) = (before, after) else {
                continue;
            };
            if !before.is_alphabetic() || !after.is_alphabetic() {
                continue;
            }

            let run: Option<Vec<char>> = chars[start..end]
                .iter()
                .map(|d| Self::lookalike(*d, before.is_uppercase()))
                .collect();
            if let Some(run) = run {
                out[start..end].copy_from_slice(&run);
                changed = true;
            }
        }

        if changed {
            Cow::Owned(out.into_iter().collect())
        } else {
            Cow::Borrowed(token)
        }
    }

    /// Correct every whitespace-delimited token, keeping the whitespace.
    pub fn correct(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut token_start: Option<usize> = None;

        for (i, c) in text.char_indices() {
            if c.is_whitespace() {
                if let Some(start) = token_start.take() {
                    out.push_str(&self.correct_token(&text[start..i]));
                }
                out.push(c);
            } else if token_start.is_none() {
                token_start = Some(i);
            }
        }
        if let Some(start) = token_start {
            out.push_str(&self.correct_token(&text[start..]));
        }
        out
    }
}

impl PageStage for OcrCorrector {
    fn name(&self) -> &str {
        "ocr"
    }

    fn process(&self, text: &str) -> Result<String, PageError> {
        Ok(self.correct(text))
    }
}
