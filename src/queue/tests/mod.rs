//! Test modules for the bounded queue
//!
//! Single-threaded behaviour is covered next to the implementation; these
//! suites exercise the queue under real contention.
