use crate::error::IpcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Commands the worker answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Word completion.
    Autocomplete,
    /// Spelling-style replacement suggestions.
    Replacements,
    /// Reference (non tree-sitter) highlighting.
    Highlight,
    /// `.editorconfig` lookup.
    Editorconfig,
    /// Go to definition.
    Definition,
    /// Tree-sitter highlighting.
    HighlightTreeSitter,
}

impl Command {
    /// Every command.
    pub const ALL: [Command; 6] = [
        Command::Autocomplete,
        Command::Replacements,
        Command::Highlight,
        Command::Editorconfig,
        Command::Definition,
        Command::HighlightTreeSitter,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Autocomplete => "autocomplete",
            Command::Replacements => "replacements",
            Command::Highlight => "highlight",
            Command::Editorconfig => "editorconfig",
            Command::Definition => "definition",
            Command::HighlightTreeSitter => "highlight_tree_sitter",
        }
    }

    /// Comma separated list of every wire name.
    pub fn names() -> String {
        Self::ALL.map(Command::as_str).join(", ")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Command {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Command {
    type Err = IpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| IpcError::UnknownCommand(s.to_string()))
    }
}
