//! Directory listing entries

use std::str::FromStr;

/// Parsed remote directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Entry name (file or directory name)
    pub name: String,

    /// Whether this is a directory
    pub is_directory: bool,

    /// File size in bytes, if the listing reported one
    pub size: Option<u64>,
}

impl RemoteEntry {
    /// Create a file entry
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
            size: Some(size),
        }
    }

    /// Parse one LIST line
    ///
    /// Unix (`-rw-r--r-- 1 ftp ftp 1234 Jan 15 12:00 name`) and DOS
    /// (`01-15-25 12:00PM 1234 name`) formats are understood through
    /// `suppaftp::list`. Anything else falls back to a whitespace split that
    /// takes the fifth column as the size and everything from the ninth column
    /// on as the name.
    ///
    /// # Examples
    ///
    /// ```
    /// use stockfeed::adapters::ftp::RemoteEntry;
    ///
    /// let line = "-rw-r--r--   1 ftp ftp  24 Jan 15 12:00 inventory.csv";
    /// let entry = RemoteEntry::parse(line).unwrap();
    /// assert_eq!(entry.name, "inventory.csv");
    /// assert_eq!(entry.size, Some(24));
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }

        if let Ok(file) = suppaftp::list::File::from_str(line) {
            let is_directory = file.is_directory();
            return Some(Self {
                name: file.name().to_string(),
                is_directory,
                size: (!is_directory).then_some(file.size() as u64),
            });
        }

        Self::parse_fallback(line)
    }

    fn parse_fallback(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 4 {
            return None;
        }

        let is_directory = parts[0].starts_with('d');
        let name = if parts.len() >= 9 {
            parts[8..].join(" ")
        } else {
            parts.last()?.to_string()
        };
        let size = if parts.len() >= 5 {
            parts[4].parse().ok()
        } else {
            None
        };

        Some(Self {
            name,
            is_directory,
            size,
        })
    }

    /// Whether this entry is the file `remote_name`
    ///
    /// Some servers list full paths; only the last path segment is compared.
    pub fn matches(&self, remote_name: &str) -> bool {
        !self.is_directory && self.name.rsplit('/').next() == Some(remote_name)
    }
}
