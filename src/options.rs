use std::fmt;
use std::str::FromStr;

/// Isolation level requested for a transaction.
///
/// The level is handed to the database as-is; no level is chosen or
/// upgraded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for IsolationLevel {
    type Err = String;

    /// Accepts `read committed`, `READ_COMMITTED`, `read-committed` and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | '-' => ' ',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "read uncommitted" => Ok(Self::ReadUncommitted),
            "read committed" => Ok(Self::ReadCommitted),
            "repeatable read" => Ok(Self::RepeatableRead),
            "serializable" => Ok(Self::Serializable),
            _ => Err(format!("unknown isolation level: {s}")),
        }
    }
}

/// Options passed through to the database when a transaction begins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    pub isolation: Option<IsolationLevel>,
    pub read_only: bool,
}

impl TxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_isolation(mut self, isolation: IsolationLevel) -> Self {
        self.isolation = Some(isolation);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Whether these options leave everything to the driver defaults.
    pub fn is_default(&self) -> bool {
        self.isolation.is_none() && !self.read_only
    }

    /// The `SET TRANSACTION` statement applying these options, or `None` for
    /// driver defaults. It must run before any other statement of the
    /// transaction.
    pub fn set_transaction_statement(&self) -> Option<String> {
        if self.is_default() {
            return None;
        }

        let mut statement = String::from("SET TRANSACTION");
        if let Some(isolation) = self.isolation {
            statement.push_str(" ISOLATION LEVEL ");
            statement.push_str(isolation.as_sql());
        }
        if self.read_only {
            statement.push_str(" READ ONLY");
        }
        Some(statement)
    }
}
