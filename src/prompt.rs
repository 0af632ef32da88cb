//! Prompt construction.

use crate::types::{GenerationRequest, ReplyLength};

/// Instruction every prompt starts with.
pub const REPLY_INSTRUCTION: &str = "Generate only a professional email reply for the following email content. \
Do not include a subject line or any introductory text. Just one email reply. \
Include an appropriate greeting such as Hello and a sign-off such as Sincerely or Yours.";

/// Line placed between the instructions and the original email.
pub const ORIGINAL_EMAIL_SEPARATOR: &str = "\nOriginal email:\n";

/// Build the prompt for a request.
///
/// Pure: identical requests yield byte-identical prompts. The original email
/// content always closes the prompt, unmodified.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let mut prompt = String::with_capacity(
        REPLY_INSTRUCTION.len() + ORIGINAL_EMAIL_SEPARATOR.len() + request.email_content.len() + 64,
    );
    prompt.push_str(REPLY_INSTRUCTION);

    if let Some(tone) = request.effective_tone() {
        prompt.push_str(" Use a ");
        prompt.push_str(tone);
        prompt.push_str(" tone.");
    }

    if let Some(length) = request.length {
        prompt.push(' ');
        prompt.push_str(length_clause(length));
    }

    prompt.push_str(ORIGINAL_EMAIL_SEPARATOR);
    prompt.push_str(&request.email_content);
    prompt
}

fn length_clause(length: ReplyLength) -> &'static str {
    match length {
        ReplyLength::Short => "Keep the reply brief, two or three sentences at most.",
        ReplyLength::Medium => "Keep the reply to a few short paragraphs.",
        ReplyLength::Long => "Write a detailed reply that addresses every point raised.",
    }
}
