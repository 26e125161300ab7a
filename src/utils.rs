//! Utility functions for string handling and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - String truncation for logging
//! - Whitespace-token truncation for model prompts and outputs
//! - Slugification for output file names
//! - Capitalization for headings
//! - File system validation for output directories

use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

use crate::error::Result;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to roughly `max` bytes with an ellipsis and
/// byte count indicator appended. The cut never splits a character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Keep at most `max_tokens` whitespace-separated tokens of `text`.
///
/// Tokens are re-joined with single spaces. Text already within the bound
/// is returned with its whitespace normalized the same way.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Count whitespace-separated tokens.
pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Convert a title to a file-name friendly slug.
///
/// It lowercases the text, removes special characters, and replaces
/// runs of whitespace with single hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// assert_eq!(slugify_title("Test-Article!"), "test-article");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && !c.is_whitespace() && c != '-', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Uppercase the first character and lowercase the rest.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(capitalize("rust LANG"), "Rust lang");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + &c.as_str().to_lowercase(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and removes a
/// scratch file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let check_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    stdfs::File::create(&check_path)?;
    let _ = stdfs::remove_file(&check_path);
    info!("Output directory is writable");
    Ok(())
}

/// Serve a single canned HTTP response on a local port and return its base URL.
#[cfg(test)]
pub async fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        // The client may hang up early, e.g. on an oversized body.
        if socket.write_all(head.as_bytes()).await.is_ok() {
            let _ = socket.write_all(&body).await;
        }
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}
