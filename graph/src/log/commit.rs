use chrono::{DateTime, TimeZone, Utc};
use smallvec::SmallVec;
use std::fmt;

use crate::error::ParseError;

/// Field separator of the commit log format
pub const SEPARATOR: &str = "|-";

const FIELDS: [&str; 5] = ["hash", "parents", "author", "date", "message"];

/// Commit identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash(String);

impl Hash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading `width` characters, or the whole hash when shorter
    pub fn short(&self, width: usize) -> &str {
        match self.0.char_indices().nth(width) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Hash {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Hash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parent list, main parent first
pub type Parents = SmallVec<[Hash; 2]>;

/// The `hash|-parents` prefix of a log line, all the graph builder needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitParents {
    pub hash: Hash,
    pub parents: Parents,
}

impl CommitParents {
    pub fn new(hash: Hash, parents: impl IntoIterator<Item = Hash>) -> Self {
        Self {
            hash,
            parents: dedup_parents(parents),
        }
    }

    /// Parse `hash|-parents[|-...]`; anything after the parents field is ignored
    pub fn parse(line: &str, line_no: usize) -> Result<Self, ParseError> {
        let fields = split_fields(line, 2, line_no)?;
        let hash = parse_hash(fields[0], line_no)?;
        let parents = parse_parents(fields[1].split(SEPARATOR).next().unwrap_or(""));
        Ok(Self { hash, parents })
    }
}

/// A fully parsed commit record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: Hash,
    pub parents: Parents,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl Commit {
    pub fn new(
        hash: Hash,
        parents: impl IntoIterator<Item = Hash>,
        author: String,
        timestamp: DateTime<Utc>,
        message: String,
    ) -> Self {
        Self {
            hash,
            parents: dedup_parents(parents),
            author,
            timestamp,
            message,
        }
    }

    /// Parse `hash|-parents|-author|-date|-message`.
    ///
    /// The message is the remainder of the line and may itself contain the
    /// separator. `line_no` is only used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self, ParseError> {
        let fields = split_fields(line, FIELDS.len(), line_no)?;
        let hash = parse_hash(fields[0], line_no)?;
        let parents = parse_parents(fields[1]);
        let timestamp = parse_date(fields[3], line_no)?;

        Ok(Self {
            hash,
            parents,
            author: fields[2].to_string(),
            timestamp,
            message: fields[4].to_string(),
        })
    }

    pub fn main_parent(&self) -> Option<&Hash> {
        self.parents.first()
    }

    pub fn second_parent(&self) -> Option<&Hash> {
        self.parents.get(1)
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn to_parents(&self) -> CommitParents {
        CommitParents {
            hash: self.hash.clone(),
            parents: self.parents.clone(),
        }
    }

    /// Inverse of [`Commit::parse`]
    pub fn to_log_line(&self) -> String {
        let parents: Vec<&str> = self.parents.iter().map(Hash::as_str).collect();
        format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}",
            self.hash,
            parents.join(" "),
            self.author,
            self.timestamp.timestamp(),
            self.message,
            sep = SEPARATOR,
        )
    }
}

/// Parse every non-blank line of `text` as a full commit record
pub fn parse_log(text: &str) -> Result<Vec<Commit>, ParseError> {
    log_lines(text)
        .map(|(line_no, line)| Commit::parse(line, line_no))
        .collect()
}

/// Parse every non-blank line of `text` as a `hash|-parents` record
pub fn parse_parents_log(text: &str) -> Result<Vec<CommitParents>, ParseError> {
    log_lines(text)
        .map(|(line_no, line)| CommitParents::parse(line, line_no))
        .collect()
}

/// Non-blank lines with their 1-based line numbers
pub(crate) fn log_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
}

fn split_fields(line: &str, count: usize, line_no: usize) -> Result<Vec<&str>, ParseError> {
    let fields: Vec<&str> = line.splitn(count, SEPARATOR).collect();
    if fields.len() < count {
        return Err(ParseError::MissingSeparator {
            line: line_no,
            field: FIELDS[fields.len()],
        });
    }
    Ok(fields)
}

fn parse_hash(field: &str, line_no: usize) -> Result<Hash, ParseError> {
    let hash = field.trim();
    if hash.is_empty() {
        return Err(ParseError::EmptyHash { line: line_no });
    }
    Ok(Hash::new(hash))
}

fn parse_parents(field: &str) -> Parents {
    dedup_parents(field.split_whitespace().map(Hash::new))
}

fn dedup_parents(parents: impl IntoIterator<Item = Hash>) -> Parents {
    let mut result = Parents::new();
    for parent in parents {
        if !result.contains(&parent) {
            result.push(parent);
        }
    }
    result
}

fn parse_date(field: &str, line_no: usize) -> Result<DateTime<Utc>, ParseError> {
    let invalid = || ParseError::InvalidDate {
        line: line_no,
        token: field.to_string(),
    };
    let seconds: i64 = field.trim().parse().map_err(|_| invalid())?;
    Utc.timestamp_opt(seconds, 0).single().ok_or_else(invalid)
}
