use std::fmt;

use serde::Deserialize;
use time::OffsetDateTime;

/// Board role held by an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Moderator,
    Admin,
}

/// What a role may do to comments it did not author.
///
/// Authors can always edit and delete their own comments regardless of role;
/// these flags only widen that baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub edit_any: bool,
    pub delete_any: bool,
}

impl Role {
    pub fn capabilities(self) -> Capabilities {
        match self {
            Role::Member => Capabilities {
                edit_any: false,
                delete_any: false,
            },
            Role::Moderator => Capabilities {
                edit_any: false,
                delete_any: true,
            },
            Role::Admin => Capabilities {
                edit_any: true,
                delete_any: true,
            },
        }
    }
}

/// One posted comment. Immutable once constructed; the creation timestamp is
/// supplied by the caller rather than sampled here.
#[derive(Debug, Clone)]
pub struct Comment {
    author: String,
    message: String,
    replied_to: Option<Box<Comment>>,
    created_at: OffsetDateTime,
}

impl Comment {
    pub fn new(
        author: impl Into<String>,
        message: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
            replied_to: None,
            created_at,
        }
    }

    pub fn reply(
        author: impl Into<String>,
        message: impl Into<String>,
        parent: Comment,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
            replied_to: Some(Box::new(parent)),
            created_at,
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn replied_to(&self) -> Option<&Comment> {
        self.replied_to.as_deref()
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.replied_to {
            Some(parent) => write!(
                formatter,
                "«{}» by «{}» (replied to «{}»)",
                self.message, self.author, parent.author
            ),
            None => write!(formatter, "«{}» by «{}»", self.message, self.author),
        }
    }
}

pub fn can_edit(actor: &str, role: Role, comment: &Comment) -> bool {
    role.capabilities().edit_any || comment.author == actor
}

pub fn can_delete(actor: &str, role: Role, comment: &Comment) -> bool {
    role.capabilities().delete_any || comment.author == actor
}

/// Login state as an explicit value instead of in-place flags. `log_in` and
/// `log_out` return fresh sessions; existing ones are never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub logged_in_since: Option<OffsetDateTime>,
}

impl Session {
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn log_in(at: OffsetDateTime) -> Self {
        Self {
            logged_in_since: Some(at),
        }
    }

    pub fn log_out(self) -> Self {
        Self::logged_out()
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in_since.is_some()
    }
}
