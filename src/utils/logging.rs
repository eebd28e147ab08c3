use crate::core::message::{Role, Turn};
use chrono::{Local, SecondsFormat};
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Plain-text transcript of the session, appended turn by turn.
pub struct LoggingState {
    file_path: Option<PathBuf>,
    header_written: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<PathBuf>) -> Self {
        LoggingState {
            file_path: log_file,
            header_written: false,
        }
    }

    /// Open `path` once to fail early on an unwritable location.
    pub fn with_file(path: PathBuf) -> io::Result<Self> {
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self::new(Some(path)))
    }

    pub fn is_active(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn log_turn(&mut self, turn: &Turn) -> io::Result<()> {
        let Some(file_path) = self.file_path.as_deref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        if !self.header_written {
            let started = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
            writeln!(writer, "## Session started {started}")?;
            writeln!(writer)?;
        }

        let text = match turn.role() {
            Role::User => format!("You: {}", turn.content()),
            Role::Assistant => turn.content().to_string(),
        };
        // Each line separately so CRLF input does not leak into the file
        for line in text.lines() {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer)?;

        writer.flush()?;
        self.header_written = true;
        Ok(())
    }

    pub fn get_status_string(&self) -> String {
        match &self.file_path {
            None => "off".to_string(),
            Some(path) => Path::new(path)
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn inactive_logger_writes_nothing() {
        let mut logging = LoggingState::new(None);
        logging.log_turn(&Turn::user("hello")).expect("no-op");
        assert!(!logging.is_active());
        assert_eq!(logging.get_status_string(), "off");
    }

    #[test]
    fn turns_are_appended_with_header_and_spacing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.log");
        let mut logging = LoggingState::with_file(path.clone()).expect("log opens");

        logging.log_turn(&Turn::user("hello")).unwrap();
        logging.log_turn(&Turn::assistant("Hi there\nSecond line")).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].starts_with("## Session started "));
        assert_eq!(
            &lines[1..],
            &["", "You: hello", "", "Hi there", "Second line", ""]
        );
        assert_eq!(logging.get_status_string(), "chat.log");
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("chat.log");
        assert!(LoggingState::with_file(path).is_err());
    }
}
