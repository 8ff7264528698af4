//! Data models for a collected SQLite catalog.
//!
//! The collector builds one [`DatabaseSchema`] per run and hands it to the
//! renderer unchanged. Every type is serializable so the same tree can be
//! emitted as JSON.

use serde::{Deserialize, Serialize};

/// Complete catalog of one SQLite database file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub database_info: DatabaseInfo,
    pub tables: Vec<Table>,
    pub views: Vec<View>,
    pub triggers: Vec<Trigger>,
    /// Indexes with their own `sqlite_master` entry (auto indexes excluded)
    pub indexes: Vec<StandaloneIndex>,
}

impl DatabaseSchema {
    /// Creates an empty schema around the given database information.
    pub const fn new(database_info: DatabaseInfo) -> Self {
        Self {
            database_info,
            tables: Vec::new(),
            views: Vec::new(),
            triggers: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Number of user tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of views
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Number of triggers
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Number of standalone indexes
    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    /// Object counts printed in the console summary
    pub fn summary(&self) -> SchemaSummary {
        SchemaSummary {
            tables: self.table_count(),
            views: self.view_count(),
            triggers: self.trigger_count(),
            indexes: self.index_count(),
        }
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Per-kind object counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub tables: usize,
    pub views: usize,
    pub triggers: usize,
    pub indexes: usize,
}

/// Engine and file level facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    /// SQLite library version, e.g. `3.45.1`
    pub version: String,
    /// Page size in bytes
    pub page_size: u32,
    pub page_count: u64,
    /// Text encoding, e.g. `UTF-8`
    pub encoding: String,
    /// Output of `PRAGMA database_list`
    pub databases: Vec<AttachedDatabase>,
}

impl DatabaseInfo {
    /// Creates database info for the given version with zeroed page figures.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            page_size: 0,
            page_count: 0,
            encoding: "UTF-8".to_string(),
            databases: Vec::new(),
        }
    }

    /// File size implied by the page figures.
    ///
    /// A page size is at most 65536 and a page count fits in 32 bits, so the
    /// product never saturates for a real database.
    pub fn total_size_bytes(&self) -> u64 {
        u64::from(self.page_size).saturating_mul(self.page_count)
    }
}

/// One row of `PRAGMA database_list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedDatabase {
    pub seq: i64,
    /// Schema name (`main`, `temp`, or the ATTACH alias)
    pub name: String,
    /// Backing file; `None` for in-memory and temporary databases
    pub file: Option<String>,
}

/// User table with its columns, indexes and foreign keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// `CREATE TABLE` statement as stored in the catalog
    pub sql: Option<String>,
    pub columns: Vec<Column>,
    pub indexes: Vec<Index>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// One row of `PRAGMA table_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub cid: i64,
    pub name: String,
    /// Declared type; empty when the column was declared without one
    pub data_type: String,
    pub not_null: bool,
    /// Default expression text exactly as written in the DDL
    pub default_value: Option<String>,
    /// 1-based position within the primary key, 0 if not part of it
    pub primary_key: u32,
}

impl Column {
    /// True unless the column carries a NOT NULL constraint.
    pub const fn is_nullable(&self) -> bool {
        !self.not_null
    }

    /// True if the column participates in the primary key.
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key > 0
    }
}

/// How an index came into existence (`origin` column of `PRAGMA index_list`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexOrigin {
    /// Created by `CREATE INDEX`
    CreateIndex,
    /// Created by a UNIQUE constraint
    Unique,
    /// Created by a PRIMARY KEY constraint
    PrimaryKey,
    /// Any tag this version does not know about
    Other(String),
}

impl IndexOrigin {
    /// Parses the pragma's origin tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "c" => Self::CreateIndex,
            "u" => Self::Unique,
            "pk" => Self::PrimaryKey,
            other => Self::Other(other.to_string()),
        }
    }

    /// The tag as SQLite reports it.
    pub fn as_tag(&self) -> &str {
        match self {
            Self::CreateIndex => "c",
            Self::Unique => "u",
            Self::PrimaryKey => "pk",
            Self::Other(tag) => tag,
        }
    }
}

/// Index attached to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub unique: bool,
    pub origin: IndexOrigin,
    pub partial: bool,
    /// Indexed columns in key order; expression terms appear as `<expr>`
    pub columns: Vec<String>,
}

/// Referential action of a foreign key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    SetNull,
    SetDefault,
    Cascade,
    Other(String),
}

impl ReferentialAction {
    /// Parses the action text reported by `PRAGMA foreign_key_list`.
    pub fn parse(action: &str) -> Self {
        match action.to_uppercase().as_str() {
            "NO ACTION" | "" => Self::NoAction,
            "RESTRICT" => Self::Restrict,
            "SET NULL" => Self::SetNull,
            "SET DEFAULT" => Self::SetDefault,
            "CASCADE" => Self::Cascade,
            _ => Self::Other(action.to_string()),
        }
    }

    /// True for SQLite's default action.
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::NoAction)
    }
}

impl std::fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAction => write!(f, "NO ACTION"),
            Self::Restrict => write!(f, "RESTRICT"),
            Self::SetNull => write!(f, "SET NULL"),
            Self::SetDefault => write!(f, "SET DEFAULT"),
            Self::Cascade => write!(f, "CASCADE"),
            Self::Other(action) => write!(f, "{action}"),
        }
    }
}

/// One row of `PRAGMA foreign_key_list`.
///
/// Composite keys produce one record per column pair sharing the same `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub id: i64,
    pub seq: i64,
    /// Referenced (parent) table
    pub table: String,
    /// Column in this table
    pub from: String,
    /// Referenced column; `None` when the key targets the parent's primary key implicitly
    pub to: Option<String>,
    pub on_update: ReferentialAction,
    pub on_delete: ReferentialAction,
    pub match_type: String,
}

/// View definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub sql: Option<String>,
}

/// Trigger definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub name: String,
    /// Table or view the trigger fires on
    pub table_name: String,
    pub sql: Option<String>,
}

/// Index with its own `sqlite_master` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandaloneIndex {
    pub name: String,
    pub table_name: String,
    pub sql: Option<String>,
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
