//! Error taxonomy shared by all allocator operations.

use thiserror::Error;

/// Allocator errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IoasidError {
    #[error("ID or set not found")]
    NotFound,

    #[error("ID is owned by another set")]
    WrongSet,

    #[error("resource busy")]
    Busy,

    #[error("already registered")]
    Exists,

    #[error("insufficient ID capacity")]
    NoSpace,

    #[error("backend allocation failed")]
    NoMem,

    #[error("invalid argument")]
    Invalid,

    #[error("set quota exhausted")]
    OutOfQuota,

    #[error("no active allocator backend")]
    NoBackend,
}

pub type Result<T> = std::result::Result<T, IoasidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(IoasidError::OutOfQuota.to_string(), "set quota exhausted");
        assert_eq!(IoasidError::NoSpace.to_string(), "insufficient ID capacity");
    }
}
