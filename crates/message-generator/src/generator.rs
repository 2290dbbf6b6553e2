//! Sized payload generation.

use crate::error::GeneratorError;
use crate::filler::random_filler;
use crate::format::MessageFormat;
use crate::message::Message;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One serialized message body ready to send.
#[derive(Debug, Clone)]
pub struct GeneratedPayload {
    pub message_id: String,
    pub body: String,
    /// Bytes taken by everything except the filler.
    pub overhead: usize,
    pub filler_len: usize,
}

impl GeneratedPayload {
    /// Body length in bytes.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Produces message bodies of approximately `target_size` bytes.
///
/// Each call to [`next_payload`](Self::next_payload) advances a per-run
/// sequence which also provides the message id, so ids are unique within a
/// generator's lifetime. Filler is drawn from a general-purpose PRNG and is
/// not reproducible across runs unless a seeded RNG is supplied.
pub struct PayloadGenerator<R = StdRng> {
    format: MessageFormat,
    target_size: usize,
    sequence: u64,
    rng: R,
}

impl PayloadGenerator<StdRng> {
    pub fn new(format: MessageFormat, target_size: usize) -> Self {
        Self::with_rng(format, target_size, StdRng::from_os_rng())
    }
}

impl<R: Rng> PayloadGenerator<R> {
    pub fn with_rng(format: MessageFormat, target_size: usize, rng: R) -> Self {
        Self {
            format,
            target_size,
            sequence: 0,
            rng,
        }
    }

    /// Number of payloads generated so far.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Generate the next payload.
    ///
    /// The fixed overhead is measured by rendering the message with empty
    /// data, then `max(0, target_size - overhead)` filler characters are
    /// added. The body is therefore exactly `max(target_size, overhead)`
    /// bytes long.
    pub fn next_payload(&mut self) -> Result<GeneratedPayload, GeneratorError> {
        self.sequence += 1;

        let mut message = Message::new(format_message_id(self.sequence), String::new());
        let overhead = message.render(self.format)?.len();

        let filler_len = self.target_size.saturating_sub(overhead);
        message.data = random_filler(&mut self.rng, filler_len);
        let body = message.render(self.format)?;

        Ok(GeneratedPayload {
            message_id: message.message_id,
            body,
            overhead,
            filler_len,
        })
    }

    /// Lazily generate `count` payloads.
    pub fn payloads(&mut self, count: u64) -> Payloads<'_, R> {
        Payloads {
            generator: self,
            remaining: count,
        }
    }
}

/// Render a sequence number as a message id: at least six zero-padded digits.
pub fn format_message_id(sequence: u64) -> String {
    format!("{sequence:06}")
}

/// Iterator returned by [`PayloadGenerator::payloads`].
pub struct Payloads<'a, R> {
    generator: &'a mut PayloadGenerator<R>,
    remaining: u64,
}

impl<R: Rng> Iterator for Payloads<'_, R> {
    type Item = Result<GeneratedPayload, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.generator.next_payload())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for Payloads<'_, R> {}
