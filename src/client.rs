//! Reply generator client.
//!
//! Keep the public surface small: build a [`ReplyGenerator`] once, share it,
//! and call [`ReplyGenerator::generate`] per email.

pub mod builder;
pub mod core;

pub use self::builder::ReplyGeneratorBuilder;
pub use self::core::{ReplyGenerator, ERROR_REPLY_PREFIX};
