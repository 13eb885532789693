//! JSON token source built on `serde_json`.
//!
//! The document is walked with a [`DeserializeSeed`] that forwards every
//! value to a [`TokenSink`] as it is read, so nothing beyond the current
//! scalar is held in memory. Wrap file handles in a `BufReader`;
//! `serde_json` reads byte by byte from the underlying reader.

use std::fmt;
use std::io::Read;

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_json::Number;

use feed_model::{FeedError, Result, Scalar};

use crate::token::{Token, TokenSink};

/// Streams a JSON document from a reader as [`Token`]s.
pub struct JsonTokenSource<R> {
    reader: R,
}

impl<R: Read> JsonTokenSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Emit the whole document, framed by start/end document tokens.
    ///
    /// Stops at the first error from either the JSON syntax or the sink; a
    /// sink error is returned as-is rather than wrapped in a JSON error.
    pub fn drive<S: TokenSink + ?Sized>(self, sink: &mut S) -> Result<()> {
        sink.token(Token::StartDocument)?;
        let mut deserializer = serde_json::Deserializer::from_reader(self.reader);
        let mut failure = None;
        let outcome = TokenSeed {
            sink: &mut *sink,
            failure: &mut failure,
        }
        .deserialize(&mut deserializer);
        if let Some(error) = failure {
            return Err(error);
        }
        outcome?;
        deserializer.end()?;
        sink.token(Token::EndDocument)
    }
}

/// Tokenize an in-memory JSON document.
pub fn tokenize_str<S: TokenSink + ?Sized>(input: &str, sink: &mut S) -> Result<()> {
    JsonTokenSource::new(input.as_bytes()).drive(sink)
}

struct TokenSeed<'a, S: ?Sized> {
    sink: &'a mut S,
    failure: &'a mut Option<FeedError>,
}

impl<S: TokenSink + ?Sized> TokenSeed<'_, S> {
    fn emit<E: de::Error>(&mut self, token: Token) -> std::result::Result<(), E> {
        match self.sink.token(token) {
            Ok(()) => Ok(()),
            Err(error) => {
                *self.failure = Some(error);
                Err(E::custom("token sink stopped the stream"))
            }
        }
    }

    fn reborrow(&mut self) -> TokenSeed<'_, S> {
        TokenSeed {
            sink: &mut *self.sink,
            failure: &mut *self.failure,
        }
    }
}

impl<'de, S: TokenSink + ?Sized> DeserializeSeed<'de> for TokenSeed<'_, S> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<(), D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

impl<'de, S: TokenSink + ?Sized> Visitor<'de> for TokenSeed<'_, S> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(mut self, v: bool) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::Bool(v)))
    }

    fn visit_i64<E: de::Error>(mut self, v: i64) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::Number(v.into())))
    }

    fn visit_u64<E: de::Error>(mut self, v: u64) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::Number(v.into())))
    }

    fn visit_f64<E: de::Error>(mut self, v: f64) -> std::result::Result<(), E> {
        let number = Number::from_f64(v).ok_or_else(|| E::custom("non-finite number"))?;
        self.emit(Token::Value(Scalar::Number(number)))
    }

    fn visit_str<E: de::Error>(mut self, v: &str) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::String(v.to_owned())))
    }

    fn visit_string<E: de::Error>(mut self, v: String) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::String(v)))
    }

    fn visit_unit<E: de::Error>(mut self) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::Null))
    }

    fn visit_none<E: de::Error>(mut self) -> std::result::Result<(), E> {
        self.emit(Token::Value(Scalar::Null))
    }

    fn visit_seq<A>(mut self, mut seq: A) -> std::result::Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.emit(Token::StartArray)?;
        while seq.next_element_seed(self.reborrow())?.is_some() {}
        self.emit(Token::EndArray)
    }

    fn visit_map<A>(mut self, mut map: A) -> std::result::Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        self.emit(Token::StartObject)?;
        while let Some(key) = map.next_key::<String>()? {
            self.emit(Token::Key(key))?;
            map.next_value_seed(self.reborrow())?;
        }
        self.emit(Token::EndObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_nested_document() {
        let mut tokens = Vec::new();
        tokenize_str(r#"[{"a": [1, true, null]}, "x"]"#, &mut tokens).expect("tokenize");
        assert_eq!(
            tokens,
            vec![
                Token::StartDocument,
                Token::StartArray,
                Token::StartObject,
                Token::key("a"),
                Token::StartArray,
                Token::value(1_u64),
                Token::value(true),
                Token::Value(Scalar::Null),
                Token::EndArray,
                Token::EndObject,
                Token::value("x"),
                Token::EndArray,
                Token::EndDocument,
            ]
        );
    }

    #[test]
    fn rejects_trailing_data() {
        let mut tokens = Vec::new();
        let error = tokenize_str("{} {}", &mut tokens).unwrap_err();
        assert!(matches!(error, FeedError::Json(_)));
    }

    #[test]
    fn sink_errors_are_not_wrapped() {
        struct Refuse;
        impl TokenSink for Refuse {
            fn token(&mut self, token: Token) -> Result<()> {
                match token {
                    Token::Key(key) => Err(FeedError::structural(0, format!("refused {key}"))),
                    _ => Ok(()),
                }
            }
        }
        let error = tokenize_str(r#"{"a": 1}"#, &mut Refuse).unwrap_err();
        assert!(matches!(error, FeedError::Structural { .. }));
    }
}
