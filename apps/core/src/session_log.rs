//! Session History Module
//!
//! Keeps a small rolling history of finished sessions in a JSON-lines file.
//! Only the last 10 sessions are retained. The history is bookkeeping for the
//! operator; the responder never reads it back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let log = SessionLog::new("data/sessions.log");
//! let summary = session.run(&mut source, &mut stdout)?;
//! log.record(&summary)?;
//! ```

use chrono::Local;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::error::ChatError;
use crate::session::SessionSummary;

/// Maximum number of sessions to keep in the history file
pub const MAX_SESSIONS: usize = 10;

/// Rolling session history backed by a file
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Gets the path to the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a finished session, dropping the oldest beyond `MAX_SESSIONS`.
    pub fn record(&self, summary: &SessionSummary) -> Result<(), ChatError> {
        let mut sessions = self.history();
        sessions.retain(|s| s.session_id != summary.session_id);
        sessions.push(summary.clone());

        if sessions.len() > MAX_SESSIONS {
            let excess = sessions.len() - MAX_SESSIONS;
            sessions.drain(..excess);
        }

        self.write_sessions(&sessions)?;
        info!(
            "Recorded session {} in {:?}",
            summary.session_id, self.path
        );
        Ok(())
    }

    /// Reads all recorded sessions, oldest first.
    ///
    /// Missing files yield an empty history; unparsable lines are skipped.
    pub fn history(&self) -> Vec<SessionSummary> {
        if !self.path.exists() {
            return Vec::new();
        }

        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open session history: {}", e);
                return Vec::new();
            }
        };

        let mut sessions = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to read session history line: {}", e);
                    continue;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match serde_json::from_str::<SessionSummary>(trimmed) {
                Ok(entry) => sessions.push(entry),
                Err(e) => warn!("Failed to parse session entry: {} - line: {}", e, trimmed),
            }
        }

        sessions
    }

    fn write_sessions(&self, sessions: &[SessionSummary]) -> Result<(), ChatError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&self.path)?;

        writeln!(file, "# ChatBuddy Session Log - Last {} sessions", sessions.len())?;
        writeln!(
            file,
            "# Generated: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file, "# Each line is a JSON object representing one session")?;
        writeln!(file)?;

        for session in sessions {
            match serde_json::to_string(session) {
                Ok(json) => writeln!(file, "{}", json)?,
                Err(e) => error!("Failed to serialize session entry: {}", e),
            }
        }

        Ok(())
    }
}
