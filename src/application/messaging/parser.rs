//! Message parser - Finds commands addressed to the bot

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::domain::entities::CommandInvocation;

/// Lower-case one character at a time, keeping one character per input
/// character (`İ` becomes `i`, not `i` plus a combining dot).
pub fn lowercase(text: &str) -> String {
    text.chars().map(lower_char).collect()
}

fn lower_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Letters (L*) and numbers (N*). Combining marks are separators.
fn is_word_char(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
    )
}

/// Lower-case `text` and split it on everything that is not a letter or number.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars().map(lower_char) {
        if is_word_char(c) {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Recognises `<nick> <command> [args...]`
pub struct MessageParser {
    nick: String,
}

impl MessageParser {
    pub fn new(nick: impl AsRef<str>) -> Self {
        Self {
            nick: lowercase(nick.as_ref()),
        }
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// The command following the nickname, if the message is addressed to the bot.
    ///
    /// The nickname alone is not a command.
    pub fn parse(&self, text: &str) -> Option<CommandInvocation> {
        let mut tokens = tokenize(text);
        if tokens.len() < 2 || tokens[0] != self.nick {
            return None;
        }
        tokens.remove(0);
        CommandInvocation::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_splits_and_lowercases() {
        assert_eq!(tokenize("Svensson, GIF cats!"), vec!["svensson", "gif", "cats"]);
        assert_eq!(tokenize("  --a--b  "), vec!["a", "b"]);
        assert_eq!(tokenize("r2d2 vs c-3po"), vec!["r2d2", "vs", "c", "3po"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("?!. ,").is_empty());
    }

    #[test]
    fn test_tokenize_unicode_letters() {
        assert_eq!(tokenize("Smörgås, ÅÄÖ!"), vec!["smörgås", "åäö"]);
        assert_eq!(tokenize("٣ apples"), vec!["٣", "apples"]);
    }

    #[test]
    fn test_tokenize_lowercases_per_character() {
        assert_eq!(tokenize("İstanbul"), vec!["istanbul"]);
        assert_eq!(tokenize("ΣΟΦΟΣ"), vec!["σοφοσ"]);
        assert_eq!(lowercase("İI"), "ii");
    }

    #[test]
    fn test_tokenize_marks_and_symbols_separate() {
        // Devanagari vowel signs are marks, not letters.
        assert_eq!(tokenize("हिंदी"), vec!["ह", "द"]);
        assert_eq!(tokenize("e\u{301}clair"), vec!["e", "clair"]);
        assert_eq!(tokenize("cats🐱dogs"), vec!["cats", "dogs"]);
        assert_eq!(tokenize("a\tb\nc—d"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_tokenize_idempotent() {
        for input in ["Hello, World", "İstanbul hi", "हिंदी", "Ⅻ—½"] {
            let once = tokenize(input);
            assert_eq!(tokenize(&once.join(" ")), once);
        }
    }

    #[test]
    fn test_tokenize_other_numbers_kept() {
        assert_eq!(tokenize("Ⅻ ½ x²"), vec!["ⅻ", "½", "x²"]);
    }

    #[test]
    fn test_parse_addressed_command() {
        let parser = MessageParser::new("Svensson");
        let inv = parser.parse("Svensson hi").unwrap();
        assert_eq!(inv.name(), "hi");
        assert!(inv.args().is_empty());
    }

    #[test]
    fn test_parse_case_insensitive() {
        let parser = MessageParser::new("Svensson");
        assert_eq!(parser.parse("svensson HI").unwrap().name(), "hi");
        assert_eq!(parser.parse("SVENSSON: gif Cats").unwrap().args(), ["cats".to_string()]);
    }

    #[test]
    fn test_parse_nick_alone_ignored() {
        let parser = MessageParser::new("Svensson");
        assert!(parser.parse("Svensson").is_none());
        assert!(parser.parse("Svensson!!!").is_none());
    }

    #[test]
    fn test_parse_dotted_capital_nick() {
        let parser = MessageParser::new("İlse");
        assert_eq!(parser.nick(), "ilse");
        assert_eq!(parser.parse("İLSE hi").unwrap().name(), "hi");
    }

    #[test]
    fn test_parse_not_addressed() {
        let parser = MessageParser::new("Svensson");
        assert!(parser.parse("hi Svensson").is_none());
        assert!(parser.parse("Svenssons hi").is_none());
        assert!(parser.parse("").is_none());
    }
}
