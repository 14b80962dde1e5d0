//! Text collation for table cells
//!
//! A deterministic, platform independent replacement for host locale
//! collation, with the options the tables need:
//!
//! - base-letter comparison: case and accents (including Hebrew vowel
//!   points) are ignored,
//! - numeric awareness: runs of ASCII digits compare by value, so `item2`
//!   sorts before `item10`,
//! - non-ignorable punctuation: whitespace < punctuation/symbols < digits <
//!   letters, letters in code point order of their folded form.
//!
//! Strings equal under these rules compare `Equal`; a stable sort then keeps
//! their original order.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Compare two strings with numeric-aware, case and accent insensitive rules
pub fn collate(a: &str, b: &str) -> Ordering {
    let a = fold(a);
    let b = fold(b);

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let end_a = digit_run_end(&a, i);
            let end_b = digit_run_end(&b, j);
            match compare_digit_runs(&a[i..end_a], &b[j..end_b]) {
                Ordering::Equal => {
                    i = end_a;
                    j = end_b;
                    continue;
                }
                unequal => return unequal,
            }
        }

        match weight(a[i]).cmp(&weight(b[j])) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            unequal => return unequal,
        }
    }

    (a.len() - i).cmp(&(b.len() - j))
}

/// Decompose, strip combining marks, lowercase
fn fold(text: &str) -> Vec<char> {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn digit_run_end(chars: &[char], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|c| !c.is_ascii_digit())
        .map_or(chars.len(), |offset| start + offset)
}

/// Compare two digit runs by value without parsing them
fn compare_digit_runs(a: &[char], b: &[char]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(run: &[char]) -> &[char] {
    let zeros = run.iter().take_while(|c| **c == '0').count();
    &run[zeros..]
}

/// Primary weight of a folded character
fn weight(c: char) -> (u8, char) {
    let class = if c.is_whitespace() {
        0
    } else if c.is_ascii_digit() {
        2
    } else if c.is_alphanumeric() {
        3
    } else {
        1
    };
    (class, c)
}
