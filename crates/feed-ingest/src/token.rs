//! Flat tokenization events with implicit nesting.

use feed_model::{Result, Scalar};

/// One depth-first tokenization event.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartDocument,
    EndDocument,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    /// Object key; always followed by that key's value.
    Key(String),
    Value(Scalar),
}

impl Token {
    pub fn key(key: impl Into<String>) -> Self {
        Token::Key(key.into())
    }

    pub fn value(value: impl Into<Scalar>) -> Self {
        Token::Value(value.into())
    }
}

/// Receiver of a token stream.
pub trait TokenSink {
    fn token(&mut self, token: Token) -> Result<()>;
}

impl TokenSink for Vec<Token> {
    fn token(&mut self, token: Token) -> Result<()> {
        self.push(token);
        Ok(())
    }
}

impl<S: TokenSink + ?Sized> TokenSink for &mut S {
    fn token(&mut self, token: Token) -> Result<()> {
        (**self).token(token)
    }
}
