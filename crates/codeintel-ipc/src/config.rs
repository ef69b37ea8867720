use serde::{Deserialize, Serialize};

/// Default upper bound for message ids.
pub const DEFAULT_ID_MAX: u64 = 15_000;

/// How to launch the worker and how many messages may be in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Worker executable.
    pub program: String,
    /// Arguments passed to `program`.
    pub args: Vec<String>,
    /// Ids are allocated from `1..=id_max`.
    pub id_max: u64,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            program: "codeintel-worker".to_string(),
            args: Vec::new(),
            id_max: DEFAULT_ID_MAX,
        }
    }
}

impl IpcConfig {
    /// Launch `program` without arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Set the worker arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the largest message id.
    pub fn with_id_max(mut self, id_max: u64) -> Self {
        self.id_max = id_max;
        self
    }

    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
