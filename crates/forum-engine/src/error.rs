use std::fmt;

/// What a failed lookup or insert was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Sender,
    Recipient,
    Subreddit,
    Post,
    Comment,
    ParentComment,
    OriginalMessage,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Sender => "sender",
            Self::Recipient => "recipient",
            Self::Subreddit => "subreddit",
            Self::Post => "post",
            Self::Comment => "comment",
            Self::ParentComment => "parent comment",
            Self::OriginalMessage => "original message",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("{kind} already exists: {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl EngineError {
    pub fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn already_exists(kind: EntityKind, id: impl ToString) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.to_string(),
        }
    }

    /// The entity kind for `NotFound` / `AlreadyExists`, `None` otherwise.
    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::NotFound { kind, .. } | Self::AlreadyExists { kind, .. } => Some(*kind),
            Self::InvalidState(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
