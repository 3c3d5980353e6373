//! Domain entities for grading distribution
//!
//! Callers hold identifiers ([`StudentId`], [`GraderId`], [`GroupId`],
//! [`PartId`]); the entities themselves are owned by the database and handed
//! out as immutable snapshots.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TadistError};

/// Student login
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

impl StudentId {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// TA login
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraderId(String);

impl GraderId {
    pub fn new(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Database row id of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distribution scope: `<assignment>.<part>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(String);

impl PartId {
    pub fn new(assignment: &str, part: &str) -> Self {
        Self(format!("{}.{}", assignment, part))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The assignment component
    pub fn assignment(&self) -> &str {
        self.0.split_once('.').map(|(a, _)| a).unwrap_or(&self.0)
    }

    /// The part component
    pub fn part(&self) -> &str {
        self.0.split_once('.').map(|(_, p)| p).unwrap_or("")
    }
}

impl FromStr for PartId {
    type Err = TadistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((assignment, part))
                if !assignment.is_empty() && !part.is_empty() && !part.contains('.') =>
            {
                Ok(Self::new(assignment, part))
            }
            _ => Err(TadistError::invalid_value(
                "part (expected <assignment>.<part>)",
                s,
            )),
        }
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One or more students graded together.
///
/// Immutable once created; membership never changes for a distribution round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub id: GroupId,
    pub assignment: String,
    pub name: String,
    pub members: BTreeSet<StudentId>,
}

impl Group {
    /// Members that appear in the given blacklist
    pub fn blacklisted_members(&self, blacklist: &HashSet<StudentId>) -> Vec<StudentId> {
        self.members
            .iter()
            .filter(|m| blacklist.contains(*m))
            .cloned()
            .collect()
    }

    /// A group is blacklisted iff any member is blacklisted.
    pub fn is_blacklisted_by(&self, blacklist: &HashSet<StudentId>) -> bool {
        self.members.iter().any(|m| blacklist.contains(m))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A registered student
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub login: StudentId,
    pub name: String,
    pub enabled: bool,
}

/// An active grader and their load offset for one distribution run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraderLoad {
    pub grader: GraderId,
    pub offset: i64,
}

impl GraderLoad {
    pub fn new(grader: GraderId, offset: i64) -> Self {
        Self { grader, offset }
    }
}

impl FromStr for GraderLoad {
    type Err = TadistError;

    /// Parses `login`, `login:+2` or `login:-1`.
    fn from_str(s: &str) -> Result<Self> {
        let (login, offset) = match s.split_once(':') {
            Some((login, offset)) => {
                let offset = offset
                    .trim_start_matches('+')
                    .parse::<i64>()
                    .map_err(|_| TadistError::invalid_value("grader offset", s))?;
                (login, offset)
            }
            None => (s, 0),
        };

        if login.is_empty() {
            return Err(TadistError::invalid_value("grader", s));
        }

        Ok(Self::new(GraderId::new(login), offset))
    }
}

/// Where a group currently sits for one part
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "state", content = "grader")]
pub enum Assignee {
    Unassigned,
    Grader(GraderId),
}

impl Assignee {
    pub fn grader(&self) -> Option<&GraderId> {
        match self {
            Assignee::Unassigned => None,
            Assignee::Grader(g) => Some(g),
        }
    }
}

impl From<Option<GraderId>> for Assignee {
    fn from(grader: Option<GraderId>) -> Self {
        match grader {
            Some(g) => Assignee::Grader(g),
            None => Assignee::Unassigned,
        }
    }
}

/// Spellings that parse as [`Assignee::Unassigned`] and so cannot be TA logins
pub const UNASSIGNED_NAMES: [&str; 2] = ["unassigned", "-"];

impl FromStr for Assignee {
    type Err = TadistError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(TadistError::invalid_value("grader", s));
        }
        if UNASSIGNED_NAMES.contains(&s) {
            return Ok(Assignee::Unassigned);
        }
        Ok(Assignee::Grader(GraderId::new(s)))
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignee::Unassigned => f.write_str("unassigned"),
            Assignee::Grader(g) => write!(f, "{}", g),
        }
    }
}

/// Result of one balancing pass. Never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionResponse {
    pub distribution: BTreeMap<GraderId, Vec<Group>>,
    pub undistributed: Vec<Group>,
}

impl DistributionResponse {
    pub fn is_complete(&self) -> bool {
        self.undistributed.is_empty()
    }

    pub fn distributed_count(&self) -> usize {
        self.distribution.values().map(Vec::len).sum()
    }

    /// Flatten into (group, grader) pairs for storage
    pub fn records(&self) -> Vec<(GroupId, GraderId)> {
        self.distribution
            .iter()
            .flat_map(|(grader, groups)| groups.iter().map(move |g| (g.id, grader.clone())))
            .collect()
    }
}
