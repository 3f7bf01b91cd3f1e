//! Phonetic codes over the ASCII letters of a mark.
//!
//! Both encoders only see upper-cased ASCII letters: spaces, digits and
//! non-ASCII characters are dropped first. Text without letters yields an empty
//! code, which never matches anything.

use rphonetic::{Encoder, Metaphone, Soundex};

/// American Soundex code, e.g. `T142` for "topology".
pub fn soundex(text: &str) -> String {
    let letters = ascii_letters(text);
    if letters.is_empty() {
        return String::new();
    }
    Soundex::default().encode(&letters)
}

/// Metaphone code, e.g. `FN` for both "phone" and "fone".
pub fn metaphone(text: &str) -> String {
    let letters = ascii_letters(text);
    if letters.is_empty() {
        return String::new();
    }
    Metaphone::default().encode(&letters)
}

/// Two texts sound alike when their Soundex or their Metaphone codes agree.
pub fn sounds_alike(a: &str, b: &str) -> bool {
    let same = |x: String, y: String| !x.is_empty() && x == y;
    same(soundex(a), soundex(b)) || same(metaphone(a), metaphone(b))
}

fn ascii_letters(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
