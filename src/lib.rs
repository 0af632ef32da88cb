//! # ai-email-writer
//!
//! Generate email replies with the Gemini `generateContent` API.
//!
//! ## Overview
//!
//! One call, one request: the email (and an optional tone) is turned into a
//! prompt, wrapped in the provider's `contents/parts/text` envelope, POSTed to
//! the configured endpoint, and the reply is read from
//! `candidates[0].content.parts[0].text`.
//!
//! - [`ReplyGenerator::generate`] returns a structured [`Result`].
//! - [`ReplyGenerator::generate_text`] always returns text, prefixing failures
//!   with `"Error processing request: "`.
//! - [`ReplyGenerator::generate_with_cancel`] races the call against a
//!   [`CancellationToken`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ai_email_writer::{GenerationRequest, ReplyGenerator};
//!
//! #[tokio::main]
//! async fn main() -> ai_email_writer::Result<()> {
//!     // Reads GEMINI_API_URL and GEMINI_API_KEY.
//!     let generator = ReplyGenerator::from_env()?;
//!
//!     let request = GenerationRequest::new("Can we reschedule?").tone("friendly");
//!     let reply = generator.generate(&request).await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | `ReplyGenerator` and its builder |
//! | [`config`] | Endpoint, key and HTTP settings |
//! | [`prompt`] | Prompt construction |
//! | [`response`] | Reply extraction from provider responses |
//! | [`transport`] | The outbound HTTP POST |
//! | [`types`] | Requests, envelopes, replies |

pub mod client;
pub mod config;
pub mod prompt;
pub mod response;
pub mod transport;
pub mod types;

pub use client::{ReplyGenerator, ReplyGeneratorBuilder, ERROR_REPLY_PREFIX};
pub use config::GeminiConfig;
pub use tokio_util::sync::CancellationToken;
pub use types::{
    EmailMessage, GenerationRequest, ProviderEnvelope, Reply, ReplyLength, ReplyOutcome,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
