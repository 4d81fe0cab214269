//! Command handlers. Results go to stdout; logs go to stderr.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use wellpost_core::Platform;
use wellpost_pipeline::{mailto_link, EditRequest, MailtoMessage, Pipeline, PostRequest};

#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub json: bool,
}

impl Output {
    fn emit(self, value: &serde_json::Value, plain: impl FnOnce()) {
        if self.json {
            println!("{value:#}");
        } else {
            plain();
        }
    }
}

pub(crate) struct GenerateOptions<'a> {
    pub platform: Platform,
    pub topic: &'a str,
    pub image: bool,
    pub mailto: bool,
    pub mail_recipient: Option<&'a str>,
}

/// Reads the post to operate on from `file`, or stdin when absent.
///
/// # Errors
///
/// Returns an error if the source cannot be read or is blank.
pub(crate) fn read_post(file: Option<&Path>) -> anyhow::Result<String> {
    let post = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read post from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read post from stdin")?;
            buf
        }
    };
    if post.trim().is_empty() {
        anyhow::bail!("post is empty; pass --file or pipe the post on stdin");
    }
    Ok(post)
}

pub(crate) async fn run_generate(
    pipeline: &Pipeline,
    output: Output,
    options: &GenerateOptions<'_>,
) -> anyhow::Result<()> {
    let request = PostRequest::new(options.topic, options.platform.as_str());
    let result = pipeline.generate_post(&request).await;
    if !result.success {
        anyhow::bail!("generation failed: {}", result.error);
    }

    let image_path = if options.image {
        let asset = pipeline
            .generate_image(&result.topic, options.platform, result.subject_line.as_deref())
            .await?;
        asset.local_path.map(|p| p.display().to_string())
    } else {
        None
    };

    let link = options.mailto.then(|| {
        mailto_link(
            &MailtoMessage {
                recipient: options.mail_recipient,
                post: &result.body,
                topic: &result.topic,
                subject_line: result.subject_line.as_deref(),
                image_path: image_path.as_deref(),
            },
            options.platform,
        )
    });

    let value = serde_json::json!({
        "result": &result,
        "image_path": &image_path,
        "mailto": &link,
    });
    output.emit(&value, || {
        println!("Topic: {}", result.topic);
        if let Some(subject) = &result.subject_line {
            println!("Subject: {subject}");
        }
        println!("\n{}", result.body);
        if options.image {
            match &image_path {
                Some(path) => println!("\nImage: {path}"),
                None => println!("\nImage: generation failed"),
            }
        }
        if let Some(link) = &link {
            println!("\n{link}");
        }
    });
    Ok(())
}

pub(crate) async fn run_edit(
    pipeline: &Pipeline,
    output: Output,
    platform: Platform,
    instruction: &str,
    post: String,
) -> anyhow::Result<()> {
    let request = EditRequest {
        original_body: post,
        instruction: instruction.to_string(),
        platform,
    };
    let edited = pipeline.edit_post(&request).await?;
    output.emit(&serde_json::json!({ "post": &edited }), || {
        println!("{edited}");
    });
    Ok(())
}

pub(crate) async fn run_suggest(
    pipeline: &Pipeline,
    output: Output,
    platform: Platform,
    post: &str,
) -> anyhow::Result<()> {
    let suggestions = pipeline.suggest_improvements(post, platform).await?;
    output.emit(&serde_json::json!({ "suggestions": &suggestions }), || {
        if suggestions.is_empty() {
            println!("no suggestions returned");
        }
        for suggestion in &suggestions {
            println!("{suggestion}");
        }
    });
    Ok(())
}

pub(crate) async fn run_image(
    pipeline: &Pipeline,
    output: Output,
    platform: Platform,
    topic: &str,
    subject: Option<&str>,
) -> anyhow::Result<()> {
    let asset = pipeline.generate_image(topic, platform, subject).await?;
    let Some(path) = asset.local_path.as_deref() else {
        anyhow::bail!("image generation failed for topic '{topic}'");
    };
    let display = path.display().to_string();
    output.emit(&serde_json::json!(&asset), || println!("{display}"));
    Ok(())
}

pub(crate) async fn run_trending(
    pipeline: &Pipeline,
    output: Output,
    random: bool,
) -> anyhow::Result<()> {
    if random {
        let topic = pipeline.random_trending_topic().await?;
        output.emit(&serde_json::json!({ "topic": &topic }), || println!("{topic}"));
        return Ok(());
    }

    let topics = pipeline.trending_topics().await?;
    output.emit(&serde_json::json!({ "topics": &topics }), || {
        for (i, topic) in topics.iter().enumerate() {
            println!("{}. {topic}", i + 1);
        }
    });
    Ok(())
}

pub(crate) fn run_platforms(pipeline: &Pipeline, output: Output) {
    let profiles: Vec<_> = pipeline.registry().iter().collect();
    output.emit(&serde_json::json!(&profiles), || {
        for profile in &profiles {
            println!(
                "{:<10} max {:>6} chars  up to {:>2} hashtags  tone: {}",
                profile.platform.as_str(),
                profile.max_length,
                profile.hashtag_limit,
                profile.template.tone
            );
        }
    });
}
