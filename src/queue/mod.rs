//! Bounded Message Queue
//!
//! The single synchronisation point between the producer and the senders.
//!
//! # Overview
//!
//! - **Fixed capacity**: a push into a full queue is rejected, never blocked
//! - **Competing consumers**: each message is removed by exactly one sender
//! - **FIFO removal**: messages leave the queue in the order they entered
//! - **Async pop**: consumers suspend until a message arrives
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Producer   │
//! └──────┬───────┘
//!        │ push (rejected when full)
//!        ▼
//! ┌─────────────────────────────────────┐
//! │      BoundedQueue (capacity C)      │
//! │  ┌───┬───┬───┬───┬───┬───┬───┐     │
//! │  │ 1 │ 2 │ 3 │ 4 │...│   │   │     │
//! │  └───┴───┴───┴───┴───┴───┴───┘     │
//! └────────┬──────────┬──────────┬──────┘
//!          │ pop      │ pop      │ pop
//! ┌────────┴──┐ ┌─────┴────┐ ┌───┴──────┐
//! │ Sender 1  │ │ Sender 2 │ │ Sender 3 │ (competing consumers)
//! └───────────┘ └──────────┘ └──────────┘
//! ```

mod bounded;
mod error;
mod message;

pub use bounded::BoundedQueue;
pub use error::{QueueError, QueueResult};
pub use message::{generate_body, generate_phone_number, Message, MAX_BODY_LEN};

#[cfg(test)]
mod tests;
