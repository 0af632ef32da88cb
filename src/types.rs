//! Request, envelope and reply types.

use crate::error::{Error, ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An email to reply to, plus optional style hints.
///
/// Deserializes from the camelCase shape front ends post:
/// `{"emailContent": "...", "tone": "friendly"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub email_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<ReplyLength>,
}

impl GenerationRequest {
    pub fn new(email_content: impl Into<String>) -> Self {
        Self {
            email_content: email_content.into(),
            tone: None,
            length: None,
        }
    }

    /// Build a request from a structured message (sender, subject, body).
    pub fn from_message(message: &EmailMessage) -> Self {
        Self::new(message.to_email_content())
    }

    pub fn tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = Some(tone.into());
        self
    }

    pub fn length(mut self, length: ReplyLength) -> Self {
        self.length = Some(length);
        self
    }

    /// The tone to request, if one was given and it is not empty.
    pub fn effective_tone(&self) -> Option<&str> {
        self.tone.as_deref().filter(|t| !t.is_empty())
    }
}

/// Desired reply length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyLength {
    Short,
    Medium,
    Long,
}

impl ReplyLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl fmt::Display for ReplyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyLength {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!(
                "unknown reply length '{}', expected short, medium or long",
                other
            )),
        }
    }
}

/// A received email as a mail client sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Render as plain email content: headers, blank line, body.
    pub fn to_email_content(&self) -> String {
        format!(
            "From: {}\nSubject: {}\n\n{}",
            self.from, self.subject, self.body
        )
    }
}

/// `{ "contents": [ { "parts": [ { "text": ... } ] } ] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEnvelope {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

impl ProviderEnvelope {
    /// Wrap a prompt as a single content with a single text part.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
        }
    }
}

/// A generated reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Text of the first part of the first candidate, untouched.
    pub text: String,
    /// `finishReason` of that candidate, when the provider sent one.
    pub finish_reason: Option<String>,
}

impl Reply {
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Serializable, tagged form of a generation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Success { reply: String },
    Failure { kind: ErrorKind, message: String },
}

impl ReplyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<std::result::Result<Reply, Error>> for ReplyOutcome {
    fn from(result: std::result::Result<Reply, Error>) -> Self {
        match result {
            Ok(reply) => Self::Success { reply: reply.text },
            Err(e) => Self::Failure {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}
