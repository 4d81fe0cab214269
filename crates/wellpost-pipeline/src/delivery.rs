//! `mailto:` links that hand a generated post to the user's mail client.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use wellpost_core::Platform;

#[derive(Debug, Clone, Default)]
pub struct MailtoMessage<'a> {
    pub recipient: Option<&'a str>,
    pub post: &'a str,
    pub topic: &'a str,
    pub subject_line: Option<&'a str>,
    pub image_path: Option<&'a str>,
}

#[must_use]
pub fn email_subject(platform: Platform, topic: &str) -> String {
    format!("Generated {} Post - {topic}", platform.title())
}

/// Optional sections sit directly under the greeting, each wrapped in
/// newlines; a blank line then separates them from the post.
#[must_use]
pub fn email_body(message: &MailtoMessage<'_>, platform: Platform) -> String {
    let subject = message
        .subject_line
        .filter(|s| !s.is_empty())
        .map(|s| format!("\nSubject Line: {s}\n"))
        .unwrap_or_default();
    let image = message
        .image_path
        .filter(|p| !p.is_empty())
        .map(|p| format!("\nImage: {p}\n"))
        .unwrap_or_default();
    format!(
        "Here's your generated {} post:{subject}{image}\n\n{}",
        platform.title(),
        message.post
    )
}

/// Subject and body are percent-encoded; the recipient is used as given.
#[must_use]
pub fn mailto_link(message: &MailtoMessage<'_>, platform: Platform) -> String {
    let subject = email_subject(platform, message.topic);
    let body = email_body(message, platform);
    format!(
        "mailto:{}?subject={}&body={}",
        message.recipient.unwrap_or(""),
        utf8_percent_encode(&subject, NON_ALPHANUMERIC),
        utf8_percent_encode(&body, NON_ALPHANUMERIC),
    )
}
