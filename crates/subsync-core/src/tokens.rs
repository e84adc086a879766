//! Subtitle markup tokenizer.
//!
//! Subtitle text may carry tagged spans of the form `{{kind|refId|display}}`
//! where `kind` is `w`, `p` or `e`. Each span becomes one highlightable token
//! linked to a lookup record; everything between spans is plain text.
//! Tokens are computed once per subtitle when a track is built.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static RE_TAGGED_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([wpe])\|([^|{}]+)\|([^{}]+?)\}\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TokenKind {
    #[default]
    Word,
    Phrase,
    Expression,
}

impl TokenKind {
    pub fn code(self) -> char {
        match self {
            TokenKind::Word => 'w',
            TokenKind::Phrase => 'p',
            TokenKind::Expression => 'e',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Highlight {
    pub kind: TokenKind,
    pub ref_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Token {
    pub text: String,
    #[ts(optional)]
    pub highlight: Option<Highlight>,
}

impl Token {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: None,
        }
    }

    pub fn highlighted(text: impl Into<String>, kind: TokenKind, ref_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: Some(Highlight {
                kind,
                ref_id: ref_id.into(),
            }),
        }
    }

    pub fn is_highlight(&self) -> bool {
        self.highlight.is_some()
    }

    pub fn kind(&self) -> Option<TokenKind> {
        self.highlight.as_ref().map(|h| h.kind)
    }

    pub fn ref_id(&self) -> Option<&str> {
        self.highlight.as_ref().map(|h| h.ref_id.as_str())
    }
}

/// Split tagged subtitle text into plain and highlighted runs.
///
/// Unterminated or otherwise malformed tags are kept as literal text.
pub fn parse(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0usize;

    for caps in RE_TAGGED_SPAN.captures_iter(text) {
        let (Some(whole), Some(code), Some(ref_id), Some(display)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        // The pattern only admits `w`, `p` and `e`.
        let kind = match code.as_str() {
            "p" => TokenKind::Phrase,
            "e" => TokenKind::Expression,
            _ => TokenKind::Word,
        };
        if whole.start() > cursor {
            tokens.push(Token::plain(&text[cursor..whole.start()]));
        }
        tokens.push(Token::highlighted(display.as_str(), kind, ref_id.as_str().trim()));
        cursor = whole.end();
    }

    if cursor < text.len() || tokens.is_empty() {
        tokens.push(Token::plain(&text[cursor..]));
    }
    tokens
}

/// Compatibility renderer for subtitles that only carry a list of clickable
/// words. Words are matched case-insensitively in order of first appearance;
/// words missing from the text are skipped.
pub fn legacy_tokens<'a, I>(text: &str, words: I) -> Vec<Token>
where
    I: IntoIterator<Item = (&'a str, TokenKind)>,
{
    let mut located: Vec<(usize, Regex, &'a str, TokenKind)> = words
        .into_iter()
        .filter(|(word, _)| !word.trim().is_empty())
        .filter_map(|(word, kind)| {
            let pattern = Regex::new(&format!("(?i){}", regex::escape(word))).ok()?;
            let first = pattern.find(text)?.start();
            Some((first, pattern, word, kind))
        })
        .collect();
    if located.is_empty() {
        return vec![Token::plain(text)];
    }
    located.sort_by_key(|(first, ..)| *first);

    let mut tokens = Vec::new();
    let mut cursor = 0usize;
    for (_, pattern, word, kind) in located {
        let Some(found) = pattern.find_at(text, cursor) else {
            continue;
        };
        if found.start() > cursor {
            tokens.push(Token::plain(&text[cursor..found.start()]));
        }
        tokens.push(Token::highlighted(found.as_str(), kind, word.to_lowercase()));
        cursor = found.end();
    }
    if cursor < text.len() {
        tokens.push(Token::plain(&text[cursor..]));
    }
    tokens
}

/// Display string with markup removed.
pub fn display_text(tokens: &[Token]) -> String {
    tokens.iter().map(|token| token.text.as_str()).collect()
}

/// Fill-in-the-blank rendering: highlighted runs become underscores.
pub fn cloze_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| {
            if token.is_highlight() {
                "_".repeat(token.text.chars().count())
            } else {
                token.text.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_phrase_round_trips_to_display_text() {
        let tokens = parse("Do you see {{p|p1|two silvers gained}} or not?");

        assert_eq!(tokens.len(), 3);
        assert_eq!(display_text(&tokens), "Do you see two silvers gained or not?");
        assert!(!tokens[0].is_highlight());
        assert!(tokens[1].is_highlight());
        assert_eq!(tokens[1].kind(), Some(TokenKind::Phrase));
        assert_eq!(tokens[1].ref_id(), Some("p1"));
        assert_eq!(tokens[1].text, "two silvers gained");
        assert_eq!(tokens[2].text, " or not?");
    }

    #[test]
    fn untagged_text_is_one_plain_token() {
        assert_eq!(parse("Just words."), vec![Token::plain("Just words.")]);
        assert_eq!(parse(""), vec![Token::plain("")]);
    }

    #[test]
    fn adjacent_spans_do_not_emit_empty_runs() {
        let tokens = parse("{{w|w1|gold}}{{e|e7|in and of itself}}");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind(), Some(TokenKind::Word));
        assert_eq!(tokens[1].kind(), Some(TokenKind::Expression));
        assert_eq!(display_text(&tokens), "goldin and of itself");
    }

    #[test]
    fn unterminated_tag_stays_literal() {
        let text = "Keep {{p|p1|this open and {{w|w2|gold}} here";
        let tokens = parse(text);

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "Keep {{p|p1|this open and ");
        assert!(!tokens[0].is_highlight());
        assert_eq!(tokens[1].ref_id(), Some("w2"));
        assert_eq!(tokens[2].text, " here");
    }

    #[test]
    fn unknown_kind_code_stays_literal() {
        let text = "A {{x|1|bad}} tag";
        assert_eq!(parse(text), vec![Token::plain(text)]);
    }

    #[test]
    fn legacy_words_are_matched_in_text_order_ignoring_case() {
        let tokens = legacy_tokens(
            "Do you see these as two silvers gained or two golds lost?",
            [
                ("two golds lost", TokenKind::Phrase),
                ("Two Silvers Gained", TokenKind::Phrase),
                ("medal", TokenKind::Word),
            ],
        );

        let highlighted: Vec<&str> = tokens
            .iter()
            .filter(|token| token.is_highlight())
            .map(|token| token.text.as_str())
            .collect();
        assert_eq!(highlighted, vec!["two silvers gained", "two golds lost"]);
        assert_eq!(tokens[1].ref_id(), Some("two silvers gained"));
        assert_eq!(
            display_text(&tokens),
            "Do you see these as two silvers gained or two golds lost?"
        );
    }

    #[test]
    fn legacy_without_words_is_plain() {
        let tokens = legacy_tokens("Plain line.", std::iter::empty());
        assert_eq!(tokens, vec![Token::plain("Plain line.")]);
    }

    #[test]
    fn cloze_masks_only_highlighted_runs() {
        let tokens = parse("I won {{w|w1|silver}} twice");
        assert_eq!(cloze_text(&tokens), "I won ______ twice");
    }
}
