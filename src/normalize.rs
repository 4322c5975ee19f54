use unicode_general_category::{GeneralCategory, get_general_category};

/// Whether `c` is in the `Ll` or `Lu` general category.
fn is_cased_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::LowercaseLetter | GeneralCategory::UppercaseLetter
    )
}

/// Reduce `text` to a token made of lowercase letters only.
///
/// Digits, punctuation, whitespace, combining marks and every letter-like symbol outside
/// `Ll`/`Lu` (circled letters, roman numerals, modifier letters) are dropped without a
/// separator, so "Ada Lovelace" becomes "adalovelace". Lowercasing happens before filtering:
/// some letters lowercase to a letter plus a combining mark, and the mark must not survive a
/// second pass.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|&c| is_cased_letter(c))
        .collect()
}
