//! Markup tokenizer state machine.
//!
//! Converts a stream of characters into [`Token`]s.  Malformed input never
//! errors: each state has an explicit recovery transition (drop the
//! character, re-emit it as text, or stay put), so garbage degrades to
//! garbage text rather than failing the parse.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::token::Token;

/// Elements whose content is scanned as raw text: markup inside them is
/// not interpreted until the matching literal end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script"];

// ---------------------------------------------------------------------------
// Tokenizer states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    TagOpen,
    EndTagOpen,
    TagName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueDoubleQuoted,
    AttributeValueSingleQuoted,
    AttributeValueUnquoted,
    AfterAttributeValueQuoted,
    SelfClosingStartTag,
    RawText,
    RawTextLessThan,
    RawTextEndTag,
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

/// Markup tokenizer — call [`next_token`](Tokenizer::next_token) repeatedly
/// until you receive [`Token::EndOfInput`].
///
/// A tokenizer is single-use: it owns all in-progress tag state, and a
/// fresh parse needs a fresh instance.
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
    state: State,

    // Pending token being built
    current_tag_name: String,
    current_tag_is_end: bool,
    current_tag_self_closing: bool,
    current_attrs: IndexMap<String, String>,
    current_attr_name: String,
    current_attr_value: String,

    // Raw-text end tag literal and how much of it has matched
    rawtext_end_tag: String,
    raw_matched: usize,

    // Queue of tokens to emit (recovery paths emit several at once)
    pending: SmallVec<[Token; 4]>,
    done: bool,
}

impl Tokenizer {
    /// Create a new tokenizer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            state: State::Data,

            current_tag_name: String::new(),
            current_tag_is_end: false,
            current_tag_self_closing: false,
            current_attrs: IndexMap::new(),
            current_attr_name: String::new(),
            current_attr_value: String::new(),

            rawtext_end_tag: String::new(),
            raw_matched: 0,

            pending: SmallVec::new(),
            done: false,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn start_new_tag(&mut self, is_end: bool) {
        self.current_tag_name.clear();
        self.current_tag_is_end = is_end;
        self.current_tag_self_closing = false;
        self.current_attrs.clear();
        self.current_attr_name.clear();
        self.current_attr_value.clear();
    }

    fn start_new_attr(&mut self) {
        self.current_attr_name.clear();
        self.current_attr_value.clear();
    }

    /// Commit the pending attribute onto the tag.  The name/value buffers
    /// are intentionally kept: a stray character after a closing quote
    /// resumes the value, and the re-commit overwrites.
    fn commit_attr(&mut self) {
        if !self.current_attr_name.is_empty() {
            self.current_attrs.insert(
                self.current_attr_name.clone(),
                self.current_attr_value.clone(),
            );
        }
    }

    /// Emit the completed tag and pick the follow-up state: `Data`, or raw
    /// text when a raw-text element was opened.
    fn emit_current_tag(&mut self) -> Token {
        if self.current_tag_is_end {
            self.state = State::Data;
            return Token::EndTag {
                name: std::mem::take(&mut self.current_tag_name),
            };
        }

        let name = std::mem::take(&mut self.current_tag_name);
        let attributes = std::mem::take(&mut self.current_attrs);
        if !self.current_tag_self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.rawtext_end_tag = name.clone();
            self.raw_matched = 0;
            self.state = State::RawText;
        } else {
            self.state = State::Data;
        }
        Token::StartTag {
            name,
            attributes,
            self_closing: self.current_tag_self_closing,
        }
    }

    /// A `</…` scan inside raw text failed: turn the consumed literal back
    /// into text tokens and resume raw-text scanning.
    fn flush_raw_end_tag(&mut self, current: char) -> Token {
        self.pending.push(Token::Text('/'));
        let matched: String = self.rawtext_end_tag.chars().take(self.raw_matched).collect();
        for c in matched.chars() {
            self.pending.push(Token::Text(c));
        }
        self.pending.push(Token::Text(current));
        self.raw_matched = 0;
        self.state = State::RawText;
        Token::Text('<')
    }

    // -----------------------------------------------------------------------
    // Public interface
    // -----------------------------------------------------------------------

    /// Return the next token, or `Token::EndOfInput` when done.
    ///
    /// End of input inside an unfinished tag drops the partial tag — only
    /// `EndOfInput` is delivered.
    pub fn next_token(&mut self) -> Token {
        loop {
            // Drain queued tokens first
            if !self.pending.is_empty() {
                return self.pending.remove(0);
            }
            if self.done {
                return Token::EndOfInput;
            }

            match self.state {
                // =============================================================
                // Data state
                // =============================================================
                State::Data => match self.consume() {
                    Some('<') => {
                        self.state = State::TagOpen;
                    }
                    Some(c) => {
                        return Token::Text(c);
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // Tag open
                // =============================================================
                State::TagOpen => match self.peek() {
                    Some('/') => {
                        self.consume();
                        self.state = State::EndTagOpen;
                    }
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.start_new_tag(false);
                        self.state = State::TagName;
                    }
                    Some(c) => {
                        // Stray `<`: it and the offending character are
                        // both literal text.
                        self.consume();
                        self.pending.push(Token::Text(c));
                        self.state = State::Data;
                        return Token::Text('<');
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // End tag open
                // =============================================================
                State::EndTagOpen => match self.peek() {
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.start_new_tag(true);
                        self.state = State::TagName;
                    }
                    Some('>') => {
                        // Missing end tag name — dropped
                        self.consume();
                        self.state = State::Data;
                    }
                    Some(_) => {
                        // Dropped, scan stays open
                        self.consume();
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // Tag name
                // =============================================================
                State::TagName => match self.consume() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.state = State::BeforeAttributeName;
                    }
                    Some('/') => {
                        self.state = State::SelfClosingStartTag;
                    }
                    Some('>') => {
                        return self.emit_current_tag();
                    }
                    Some(c) if c.is_ascii_alphabetic() => {
                        self.current_tag_name.push(c);
                    }
                    Some(_) => {
                        // Non-alphabetic — ignored, state kept
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // Before attribute name
                // =============================================================
                State::BeforeAttributeName => match self.peek() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.consume();
                    }
                    Some('/') | Some('>') | None => {
                        self.state = State::AfterAttributeName;
                    }
                    Some('=') => {
                        // Bare `=` before any name — dropped
                        self.consume();
                    }
                    Some(_) => {
                        self.start_new_attr();
                        self.state = State::AttributeName;
                    }
                },

                // =============================================================
                // Attribute name
                // =============================================================
                State::AttributeName => match self.peek() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.state = State::AfterAttributeName;
                    }
                    Some('/') | Some('>') | None => {
                        self.state = State::AfterAttributeName;
                    }
                    Some('=') => {
                        self.consume();
                        self.state = State::BeforeAttributeValue;
                    }
                    Some('\0') | Some('"') | Some('\'') | Some('<') => {
                        // Ignored, state kept
                        self.consume();
                    }
                    Some(c) => {
                        self.consume();
                        self.current_attr_name.push(c);
                    }
                },

                // =============================================================
                // After attribute name
                // =============================================================
                State::AfterAttributeName => match self.peek() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.consume();
                    }
                    Some('/') => {
                        self.consume();
                        self.commit_attr();
                        self.state = State::SelfClosingStartTag;
                    }
                    Some('=') => {
                        self.consume();
                        self.state = State::BeforeAttributeValue;
                    }
                    Some('>') => {
                        self.consume();
                        self.commit_attr();
                        return self.emit_current_tag();
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                    Some(_) => {
                        self.commit_attr();
                        self.start_new_attr();
                        self.state = State::AttributeName;
                    }
                },

                // =============================================================
                // Before attribute value
                // =============================================================
                State::BeforeAttributeValue => match self.peek() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.consume();
                    }
                    Some('"') => {
                        self.consume();
                        self.state = State::AttributeValueDoubleQuoted;
                    }
                    Some('\'') => {
                        self.consume();
                        self.state = State::AttributeValueSingleQuoted;
                    }
                    Some('>') => {
                        self.consume();
                        self.commit_attr();
                        return self.emit_current_tag();
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                    Some(_) => {
                        self.state = State::AttributeValueUnquoted;
                    }
                },

                // =============================================================
                // Attribute value (double-quoted)
                // =============================================================
                State::AttributeValueDoubleQuoted => match self.consume() {
                    Some('"') => {
                        self.commit_attr();
                        self.state = State::AfterAttributeValueQuoted;
                    }
                    Some('\0') => {
                        // Ignored placeholder
                    }
                    Some(c) => {
                        self.current_attr_value.push(c);
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // Attribute value (single-quoted)
                // =============================================================
                State::AttributeValueSingleQuoted => match self.consume() {
                    Some('\'') => {
                        self.commit_attr();
                        self.state = State::AfterAttributeValueQuoted;
                    }
                    Some('\0') => {
                        // Ignored placeholder
                    }
                    Some(c) => {
                        self.current_attr_value.push(c);
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // Attribute value (unquoted)
                // =============================================================
                State::AttributeValueUnquoted => match self.consume() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.commit_attr();
                        self.state = State::BeforeAttributeName;
                    }
                    Some('/') => {
                        self.commit_attr();
                        self.state = State::SelfClosingStartTag;
                    }
                    Some('>') => {
                        self.commit_attr();
                        return self.emit_current_tag();
                    }
                    Some('\0') | Some('"') | Some('\'') | Some('<') | Some('=') | Some('`') => {
                        // Ignored, state kept
                    }
                    Some(c) => {
                        self.current_attr_value.push(c);
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // After attribute value (quoted)
                // =============================================================
                State::AfterAttributeValueQuoted => match self.consume() {
                    Some(c) if c.is_ascii_whitespace() => {
                        self.state = State::BeforeAttributeName;
                    }
                    Some('/') => {
                        self.state = State::SelfClosingStartTag;
                    }
                    Some('>') => {
                        return self.emit_current_tag();
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                    Some(c) => {
                        // Junk directly after the closing quote resumes the
                        // value; the eventual re-commit overwrites.
                        self.current_attr_value.push(c);
                        self.state = State::AttributeValueDoubleQuoted;
                    }
                },

                // =============================================================
                // Self-closing start tag
                // =============================================================
                State::SelfClosingStartTag => match self.consume() {
                    Some('>') => {
                        self.current_tag_self_closing = true;
                        return self.emit_current_tag();
                    }
                    Some(_) => {
                        // Ignored, state kept
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                // =============================================================
                // Raw text (inside <script>)
                // =============================================================
                State::RawText => match self.consume() {
                    Some('<') => {
                        self.state = State::RawTextLessThan;
                    }
                    Some(c) => {
                        return Token::Text(c);
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                State::RawTextLessThan => match self.consume() {
                    Some('/') => {
                        self.raw_matched = 0;
                        self.state = State::RawTextEndTag;
                    }
                    Some(c) => {
                        self.pending.push(Token::Text(c));
                        self.state = State::RawText;
                        return Token::Text('<');
                    }
                    None => {
                        self.done = true;
                        return Token::EndOfInput;
                    }
                },

                State::RawTextEndTag => {
                    let expected = self.rawtext_end_tag.chars().nth(self.raw_matched);
                    match (self.consume(), expected) {
                        (Some(c), Some(e)) if c == e => {
                            self.raw_matched += 1;
                        }
                        (Some(' '), None) => {
                            // Spaces between the literal name and `>` are
                            // skipped; any other whitespace is a mismatch.
                        }
                        (Some('>'), None) => {
                            let name = std::mem::take(&mut self.rawtext_end_tag);
                            self.state = State::Data;
                            return Token::EndTag { name };
                        }
                        (Some(c), _) => {
                            return self.flush_raw_end_tag(c);
                        }
                        (None, _) => {
                            self.done = true;
                            return Token::EndOfInput;
                        }
                    }
                }
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
