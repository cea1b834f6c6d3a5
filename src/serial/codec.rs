//! # Line Codec
//!
//! Frames the serial byte stream into newline-terminated strings. Outbound
//! strings are written verbatim; the caller decides about terminators.

use crate::error::SerialPushError;
use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Newline framing for the serial link.
#[derive(Clone, Copy, Debug, Default)]
pub struct LineCodec;

impl Decoder for LineCodec {
    type Item = String;
    type Error = SerialPushError;

    /// Yields one line per `\n`, terminator included.
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(newline) = src.iter().position(|b| *b == b'\n') else {
            return Ok(None);
        };
        let line = src.split_to(newline + 1);
        match std::str::from_utf8(&line) {
            Ok(s) => Ok(Some(s.to_string())),
            Err(_) => Err(SerialPushError::encoding("Invalid String")),
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = SerialPushError;

    fn encode(&mut self, item: String, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        dst.put(item.as_bytes());
        Ok(())
    }
}
