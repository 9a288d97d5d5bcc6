//! Email input loading.
//! Supports: TXT, MD, TEXT, extension-less files and RFC 822 `.eml` messages.

use std::path::Path;

use tracing::{debug, info};

use crate::error::AppError;

/// Read an email from disk and return the text to analyze.
pub fn read_email_file(path: impl AsRef<Path>) -> Result<String, AppError> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    extract_email_text(file_name, &data)
}

/// Extract email text from raw file data based on file extension.
pub fn extract_email_text(file_name: &str, file_data: &[u8]) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    info!("Reading email from file: {} (type: {})", file_name, display_ext(&extension));

    if file_data.contains(&0) {
        return Err(AppError::Validation(format!(
            "{} looks like a binary file, expected plain text",
            file_name
        )));
    }

    let text = String::from_utf8(file_data.to_vec())
        .map_err(|e| AppError::Validation(format!("Invalid UTF-8 content: {}", e)))?;

    match extension.as_str() {
        "txt" | "md" | "text" | "" => Ok(text),
        "eml" => Ok(strip_rfc822_headers(&text)),
        other => Err(AppError::Validation(format!("Unsupported file extension: {}", other))),
    }
}

fn display_ext(extension: &str) -> &str {
    if extension.is_empty() {
        "none"
    } else {
        extension
    }
}

/// Reduce an RFC 822 message to its `Subject:` line and body.
fn strip_rfc822_headers(message: &str) -> String {
    let normalized = message.replace("\r\n", "\n");
    let (headers, body) = match normalized.split_once("\n\n") {
        Some((headers, body)) => (headers, body),
        None => return normalized.trim().to_string(),
    };

    // Unfold continuation lines before looking for the subject.
    let mut subject: Option<String> = None;
    let mut current: Option<String> = None;
    for line in headers.lines() {
        if line.starts_with([' ', '\t']) {
            if let Some(value) = current.as_mut() {
                value.push(' ');
                value.push_str(line.trim());
            }
            continue;
        }

        if let Some(value) = current.take() {
            subject = Some(value);
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("subject") && subject.is_none() {
                current = Some(value.trim().to_string());
            }
        }
    }
    if let Some(value) = current {
        subject = Some(value);
    }

    debug!(has_subject = subject.is_some(), "Stripped message headers");

    let body = body.trim();
    match subject {
        Some(subject) if !subject.is_empty() => format!("Subject: {}\n\n{}", subject, body),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txt_extraction() {
        let content = b"Hi Sam,\nThe deck is attached.";
        let result = extract_email_text("email.txt", content);
        assert_eq!(result.unwrap(), "Hi Sam,\nThe deck is attached.");
    }

    #[test]
    fn test_extensionless_and_md() {
        assert!(extract_email_text("draft", b"Hello").is_ok());
        assert!(extract_email_text("draft.MD", b"# Notes").is_ok());
    }

    #[test]
    fn test_eml_keeps_subject_and_body() {
        let content = b"From: a@example.com\r\nTo: b@example.com\r\nSubject: Quarterly\r\n report\r\nDate: Mon, 1 Jan 2024 10:00:00 +0000\r\n\r\nHi team,\r\nNumbers are in.\r\n";
        let text = extract_email_text("message.eml", content).unwrap();
        assert_eq!(text, "Subject: Quarterly report\n\nHi team,\nNumbers are in.");
    }

    #[test]
    fn test_eml_without_subject() {
        let content = b"From: a@example.com\n\nJust the body.";
        assert_eq!(extract_email_text("m.eml", content).unwrap(), "Just the body.");
    }

    #[test]
    fn test_binary_and_unsupported_are_rejected() {
        assert!(matches!(
            extract_email_text("email.txt", b"abc\0def"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            extract_email_text("email.txt", &[0xff, 0xfe, 0x41]),
            Err(AppError::Validation(_))
        ));
        let err = extract_email_text("report.pdf", b"%PDF").unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    #[test]
    fn test_read_email_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("email.txt");
        std::fs::write(&path, "Thanks for the update!").unwrap();

        assert_eq!(read_email_file(&path).unwrap(), "Thanks for the update!");
        assert!(matches!(read_email_file(dir.path().join("missing.txt")), Err(AppError::Io(_))));
    }
}
