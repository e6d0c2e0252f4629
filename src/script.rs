//! Character classes for the Tamil Unicode block (U+0B80..=U+0BFF).

pub const TAMIL_CLASS: &str = r"[\x{0B80}-\x{0BFF}]";

pub fn is_tamil(character: char) -> bool {
    ('\u{0B80}'..='\u{0BFF}').contains(&character)
}

pub fn starts_with_tamil(text: &str) -> bool {
    text.chars().next().is_some_and(is_tamil)
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn latin_letter_count(text: &str) -> usize {
    text.chars()
        .filter(|character| character.is_ascii_alphabetic())
        .count()
}

pub fn condense_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tamil_block_bounds_are_inclusive() {
        assert!(is_tamil('\u{0B80}'));
        assert!(is_tamil('\u{0BFF}'));
        assert!(is_tamil('க'));
        assert!(!is_tamil('a'));
        assert!(!is_tamil('\u{0C00}'));
    }

    #[test]
    fn latin_letter_count_ignores_digits_and_tamil() {
        assert_eq!(latin_letter_count("கh 12 Nஅ"), 2);
        assert_eq!(latin_letter_count("ஹதீஸ் : 5"), 0);
    }
}
