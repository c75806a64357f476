pub mod app;
pub mod core;
pub mod monitor;
pub mod pipeline;
pub mod producer;
pub mod queue;
pub mod sender;
