//! Word tokenization.
//!
//! Splits text into word and punctuation tokens, in the spirit of a
//! treebank-style `word_tokenize`: letters, digits, `_` and in-word
//! apostrophes form words, every other visible character is its own token.

/// Split text into ordered word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if is_word_char(c) {
            current.push(c);
        } else if is_apostrophe(c)
            && !current.is_empty()
            && chars.peek().is_some_and(|next| is_word_char(*next))
        {
            // don't, it's, we'll
            current.push('\'');
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Whether a token is a word (as opposed to punctuation).
pub fn is_word(token: &str) -> bool {
    token.chars().next().is_some_and(is_word_char)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}
