//! Unified error handling for glyphbot.
//!
//! This module provides the error hierarchy for command processing: argument
//! validation failures, permission failures, deliberate handler rejections and
//! unclassified faults, plus the startup-time registration errors.

use crate::platform::{Capability, PlatformError};
use thiserror::Error;

// ============================================================================
// Argument Errors (user input)
// ============================================================================

/// Input validation failures raised while parsing command arguments.
///
/// Every variant renders to a complete one-line message that is safe to show
/// to the invoking user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("Too little arguments. Expected {expected} but only received {received}.")]
    TooFew { expected: usize, received: usize },

    #[error("Too little args. Please provide a {expected}")]
    Missing { expected: String },

    /// `expected` already carries any "one or more arguments of type" wording.
    #[error("Wrong argument `{raw}`. Expected {expected}.")]
    Invalid { raw: String, expected: String },

    #[error("Expected one of `{}`, received `{received}`", .choices.join(","))]
    NotAChoice {
        choices: Vec<String>,
        received: String,
    },

    #[error("This command requires text input!")]
    EmptyText,

    #[error("Expected {expected} but this is not a server.")]
    GuildRequired { expected: String },

    /// Free-form input error raised by a handler.
    #[error("{0}")]
    Custom(String),
}

impl ArgumentError {
    /// Shorthand for a handler-level input error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

// ============================================================================
// Command Errors (dispatch boundary)
// ============================================================================

/// Which side of a permission check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionSubject {
    /// The invoking user lacks capabilities.
    Caller,
    /// The bot's service account lacks capabilities.
    Service,
}

fn permission_message(subject: &PermissionSubject, missing: &[Capability]) -> String {
    let names = missing
        .iter()
        .map(Capability::display_name)
        .collect::<Vec<_>>()
        .join("`, `");
    match subject {
        PermissionSubject::Caller => {
            format!("You are not allowed to do this. Required permissions: `{names}`")
        }
        PermissionSubject::Service => {
            format!("Sorry, I can't do that. Needed permissions: `{names}`")
        }
    }
}

/// Errors that can end a command invocation.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("{}", permission_message(.subject, .missing))]
    Permission {
        subject: PermissionSubject,
        missing: Vec<Capability>,
    },

    /// Expected business-rule violation raised deliberately by a handler.
    #[error("{0}")]
    Rejected(String),

    /// Anything else. Never shown verbatim to the user.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse classification used for routing replies and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    Permission,
    Rejected,
    Unclassified,
}

impl CommandError {
    /// Business-rule rejection with a user-facing message.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn caller_permission(missing: Vec<Capability>) -> Self {
        Self::Permission {
            subject: PermissionSubject::Caller,
            missing,
        }
    }

    pub fn service_permission(missing: Vec<Capability>) -> Self {
        Self::Permission {
            subject: PermissionSubject::Service,
            missing,
        }
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::Permission { .. } => ErrorKind::Permission,
            Self::Rejected(_) => ErrorKind::Rejected,
            Self::Internal(_) => ErrorKind::Unclassified,
        }
    }

    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Argument(_) => "argument",
            Self::Permission {
                subject: PermissionSubject::Caller,
                ..
            } => "caller_permission",
            Self::Permission {
                subject: PermissionSubject::Service,
                ..
            } => "service_permission",
            Self::Rejected(_) => "rejected",
            Self::Internal(_) => "unclassified",
        }
    }

    /// Only unclassified faults are forwarded to operator reporting.
    #[inline]
    pub fn is_reportable(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// The message shown to the user, or `None` when only a generic apology
    /// may be shown.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Internal(_) => None,
            other => Some(other.to_string()),
        }
    }
}

impl From<PlatformError> for CommandError {
    fn from(err: PlatformError) -> Self {
        Self::Internal(anyhow::Error::new(err))
    }
}

/// Result type for command handlers.
pub type CommandResult = Result<(), CommandError>;

// ============================================================================
// Registration Errors (startup-time programmer errors)
// ============================================================================

/// Problems in a command's declared arguments, caught at registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgSpecError {
    #[error("remainder argument `{key}` must be the last argument")]
    RemainderNotLast { key: String },

    #[error("argument key `{0}` is declared twice")]
    DuplicateKey(String),

    #[error("default for argument `{key}` does not match its type {kind}")]
    DefaultMismatch { key: String, kind: &'static str },

    #[error("flag `{0}` is declared twice")]
    DuplicateFlag(String),

    #[error("flag `{0}` must be a camelCase name without dashes")]
    InvalidFlag(String),
}

/// Fatal errors raised while populating the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("duplicate command name or alias `{name}` (already used by `{existing}`)")]
    Duplicate { name: String, existing: String },

    #[error("command `{name}` in category `{category}` must be owner-only")]
    NotOwnerOnly { name: String, category: String },

    #[error("command `{command}` has invalid arguments: {source}")]
    InvalidArguments {
        command: String,
        #[source]
        source: ArgSpecError,
    },

    #[error("command name `{0}` is empty or contains whitespace")]
    InvalidName(String),

    #[error("no discovery source configured")]
    NoSource,
}
