//! Message type carried through the pipeline queue
//!
//! Messages are immutable once built. The producer generates them with
//! [`Message::generate`]; senders only ever read them.

use rand::seq::SliceRandom;
use rand::Rng;

/// Printable ASCII: digits, letters, punctuation and whitespace
const PRINTABLE: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\x0b\x0c";

/// Longest generated message body, in characters
pub const MAX_BODY_LEN: usize = 100;

/// A synthetic text message addressed to a phone number
///
/// # Example
///
/// ```rust
/// use sendsim::queue::Message;
///
/// let message = Message::new("555-010-4477".to_string(), "hello".to_string());
/// assert_eq!(message.recipient(), "555-010-4477");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    recipient: String,
    body: String,
}

impl Message {
    pub fn new(recipient: String, body: String) -> Self {
        Self { recipient, body }
    }

    /// Build a message with a random recipient and a random printable body
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            recipient: generate_phone_number(rng),
            body: generate_body(rng),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Random phone number in `DDD-DDD-DDDD` form
pub fn generate_phone_number<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut digits = |count: usize| -> String {
        (0..count)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect()
    };
    let area = digits(3);
    let middle = digits(3);
    let end = digits(4);
    format!("{}-{}-{}", area, middle, end)
}

/// Random body of 1 to [`MAX_BODY_LEN`] printable characters
pub fn generate_body<R: Rng + ?Sized>(rng: &mut R) -> String {
    let size = rng.gen_range(1..=MAX_BODY_LEN);
    (0..size)
        .filter_map(|_| PRINTABLE.choose(&mut *rng).map(|&b| char::from(b)))
        .collect()
}
