//! Error types for the command layer.
//!
//! Only startup can fail here. Once a [`CommandRegistry`](crate::CommandRegistry)
//! exists, every command resolves to player messages and an outcome value.

use std::fmt;

/// Which namespace a command lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Player,
    Admin,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// One problem found while validating a [`CommandTable`](crate::CommandTable).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{scope} command with an empty name")]
    EmptyName { scope: Scope },

    /// Names are matched against the first word of input, so they can't
    /// contain whitespace.
    #[error("{scope} command name {name:?} contains whitespace")]
    InvalidName { name: String, scope: Scope },

    #[error("{scope} command {name:?} registered twice")]
    Duplicate { name: String, scope: Scope },

    #[error("alias {0:?} has the same name as a command")]
    AliasShadowsCommand(String),

    #[error("alias {alias:?} points at unknown command {target:?}")]
    UnknownAliasTarget { alias: String, target: String },

    #[error("alias {0:?} is part of an alias cycle")]
    AliasCycle(String),
}

/// Every registration problem found at startup, reported together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} command registration failure(s): {}", .failures.len(), summary(.failures))]
pub struct StartupError {
    pub failures: Vec<RegistrationError>,
}

fn summary(failures: &[RegistrationError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_error_lists_every_failure() {
        let err = StartupError {
            failures: vec![
                RegistrationError::EmptyName { scope: Scope::Admin },
                RegistrationError::AliasCycle("a".into()),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 command registration failure(s)"));
        assert!(text.contains("admin command with an empty name"));
        assert!(text.contains("alias \"a\" is part of an alias cycle"));
    }
}
