//! Reminder log stored as JSON lines.

use std::io::{self, Write};

use cap_std::fs::{Dir, OpenOptions};
use tracing::warn;

use crate::domain::EmailLogEntry;
use crate::domain::ports::{EmailLogError, EmailLogRepository};

/// File name of the reminder log inside the data directory.
pub const EMAIL_LOG_FILE: &str = "email_logs.jsonl";

/// [`EmailLogRepository`] backed by `email_logs.jsonl`.
#[derive(Debug)]
pub struct FileEmailLogRepository {
    dir: Dir,
}

impl FileEmailLogRepository {
    /// Store the log in `dir`.
    #[must_use]
    pub fn new(dir: Dir) -> Self {
        Self { dir }
    }
}

impl EmailLogRepository for FileEmailLogRepository {
    fn append(&self, entries: &[EmailLogEntry]) -> Result<(), EmailLogError> {
        let mut buffer = Vec::new();
        for entry in entries {
            serde_json::to_writer(&mut buffer, entry)
                .map_err(|err| EmailLogError::encode(err.to_string()))?;
            buffer.push(b'\n');
        }

        let mut options = OpenOptions::new();
        options.append(true).create(true);
        let mut file = self
            .dir
            .open_with(EMAIL_LOG_FILE, &options)
            .map_err(|err| EmailLogError::io(err.to_string()))?;
        file.write_all(&buffer)
            .and_then(|()| file.sync_data())
            .map_err(|err| EmailLogError::io(err.to_string()))
    }

    fn load_all(&self) -> Result<Vec<EmailLogEntry>, EmailLogError> {
        let contents = match self.dir.read_to_string(EMAIL_LOG_FILE) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(EmailLogError::io(err.to_string())),
        };
        let entries = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(line = index + 1, error = %err, "skipping unreadable email log line");
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    fn clear(&self) -> Result<(), EmailLogError> {
        match self.dir.remove_file(EMAIL_LOG_FILE) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(EmailLogError::io(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailMode;
    use cap_std::ambient_authority;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Store {
        _temp: TempDir,
        repo: FileEmailLogRepository,
        dir: Dir,
    }

    #[fixture]
    fn store() -> Store {
        let temp = TempDir::new().expect("temp dir");
        let open = || Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open dir");
        let repo = FileEmailLogRepository::new(open());
        let dir = open();
        Store {
            _temp: temp,
            repo,
            dir,
        }
    }

    fn entry(to: &str) -> EmailLogEntry {
        EmailLogEntry {
            to: to.to_owned(),
            name: "Student".to_owned(),
            subject: "Overdue".to_owned(),
            body: "Please return".to_owned(),
            mode: EmailMode::PerStudent,
            sent_at: Utc
                .with_ymd_and_hms(2025, 12, 2, 9, 0, 0)
                .single()
                .expect("valid time"),
            books: Vec::new(),
            from: None,
        }
    }

    #[rstest]
    fn missing_log_reads_empty(store: Store) {
        assert!(store.repo.load_all().expect("load").is_empty());
    }

    #[rstest]
    fn appends_accumulate_in_order(store: Store) {
        store.repo.append(&[entry("a@b.com")]).expect("first");
        store
            .repo
            .append(&[entry("c@d.com"), entry("a@b.com")])
            .expect("second");

        let recipients: Vec<String> = store
            .repo
            .load_all()
            .expect("load")
            .into_iter()
            .map(|logged| logged.to)
            .collect();
        assert_eq!(recipients, vec!["a@b.com", "c@d.com", "a@b.com"]);
        let raw = store.dir.read_to_string(EMAIL_LOG_FILE).expect("raw");
        assert_eq!(raw.lines().count(), 3);
    }

    #[rstest]
    fn unreadable_lines_are_skipped(store: Store) {
        store.repo.append(&[entry("a@b.com")]).expect("append");
        let mut raw = store.dir.read_to_string(EMAIL_LOG_FILE).expect("raw");
        raw.push_str("{truncated\n\n");
        store.dir.write(EMAIL_LOG_FILE, raw).expect("rewrite");
        store.repo.append(&[entry("c@d.com")]).expect("append");

        let logged = store.repo.load_all().expect("load");
        assert_eq!(logged.len(), 2);
    }

    #[rstest]
    fn clear_removes_file_and_tolerates_absence(store: Store) {
        store.repo.append(&[entry("a@b.com")]).expect("append");
        store.repo.clear().expect("clear");
        assert!(!store.dir.exists(EMAIL_LOG_FILE));
        store.repo.clear().expect("clear again");
    }
}
