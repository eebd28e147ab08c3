//! Opening links in the system browser.

use std::io;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

/// Command line that hands `url` to the platform opener.
pub fn opener_command(url: &str) -> (String, Vec<String>) {
    if let Ok(browser) = std::env::var("BROWSER") {
        if !browser.trim().is_empty() {
            return (browser, vec![url.to_string()]);
        }
    }

    if cfg!(target_os = "macos") {
        ("open".to_string(), vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd".to_string(),
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        )
    } else {
        ("xdg-open".to_string(), vec![url.to_string()])
    }
}

/// Only web and mail links are handed to the opener.
pub fn is_openable(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
}

/// Launch the opener detached from the terminal. The child is never awaited,
/// so the browser gets its own window and lifetime.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    if !is_openable(url) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to open non-web link: {url}"),
        ));
    }

    let (program, args) = opener_command(url);
    debug!(%program, %url, "Opening link");
    let child = Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(false)
        .spawn();

    match child {
        Ok(_) => Ok(()),
        Err(err) => {
            warn!(%program, error = %err, "Could not launch browser");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_web_links_are_openable() {
        assert!(is_openable("https://example.com"));
        assert!(is_openable("HTTP://example.com"));
        assert!(is_openable("mailto:someone@example.com"));
        assert!(!is_openable("file:///etc/passwd"));
        assert!(!is_openable("javascript:alert(1)"));
    }

    #[test]
    fn opener_passes_url_as_last_argument() {
        let (_, args) = opener_command("https://example.com");
        assert_eq!(args.last().map(String::as_str), Some("https://example.com"));
    }

    #[test]
    fn rejected_links_never_spawn() {
        let err = open_in_browser("file:///tmp/x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
