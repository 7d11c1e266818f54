//! Rejection taxonomy for chunk operations
//!
//! Every rejection is terminal: the authority never retries on the caller's
//! behalf and never leaves a partial mutation behind. Variants carry the hex
//! prefix of the chunk name for diagnostics.

use crate::operation::Outcome;

/// Reason an operation was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorityError {
    /// The submitted envelope did not parse
    #[error("Invalid signed data for {name}: {reason}")]
    InvalidSignedData {
        /// Chunk name (hex prefix)
        name: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Content digest does not match the name of a hashable chunk
    #[error("Chunk {name} is marked hashable but does not hash to its name")]
    NotHashable {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// Update attempted on content-addressed data
    #[error("Update of hashable chunk {name} is not allowed")]
    InvalidUpdate {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// Payload signature does not verify under the requester key
    #[error("Signature verification failed for {name}")]
    SignatureVerificationFailure {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// `Store` on a name that already exists
    #[error("Chunk {name} already exists; use update")]
    DuplicateNameFailure {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// Current record missing when ownership had to be checked
    #[error("No current data for {name}")]
    VerifyDataFailure {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// Requester key does not match the recorded owner
    #[error("Requester is not the owner of {name}")]
    NotOwner {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// Social-identity mailbox is closed to new contacts
    #[error("Mailbox {name} does not accept new contacts")]
    WontAcceptContact {
        /// Chunk name (hex prefix)
        name: String,
    },

    /// The store rejected a create
    #[error("Store of {name} failed: {reason}")]
    StoreFailure {
        /// Chunk name (hex prefix)
        name: String,
        /// Failure detail
        reason: String,
    },

    /// The store rejected a modification
    #[error("Modify of {name} failed: {reason}")]
    ModifyFailure {
        /// Chunk name (hex prefix)
        name: String,
        /// Failure detail
        reason: String,
    },

    /// The store rejected a delete
    #[error("Delete of {name} failed: {reason}")]
    DeleteFailure {
        /// Chunk name (hex prefix)
        name: String,
        /// Failure detail
        reason: String,
    },

    /// A persisted record is corrupt
    #[error("Stored record {name} is corrupt: {reason}")]
    ParseFailure {
        /// Chunk name (hex prefix)
        name: String,
        /// Parser diagnostic
        reason: String,
    },

    /// The store failed to answer a read
    #[error("Read of {name} failed: {reason}")]
    ReadFailure {
        /// Chunk name (hex prefix)
        name: String,
        /// Failure detail
        reason: String,
    },

    /// Operation not valid for this data kind or ownership state
    #[error("Operation rejected for {name}: {reason}")]
    UnknownFailure {
        /// Chunk name (hex prefix)
        name: String,
        /// Why the operation is not permitted
        reason: String,
    },
}

/// Flat result codes for callers that report outcomes numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ReturnCode {
    /// Operation succeeded
    Success = 0,
    /// `Has`: name is free
    KeyUnique = 1,
    /// `Has`: name is taken
    KeyNotUnique = 2,
    /// See [`AuthorityError::InvalidSignedData`]
    InvalidSignedData = -1,
    /// See [`AuthorityError::NotHashable`]
    NotHashable = -2,
    /// See [`AuthorityError::InvalidUpdate`]
    InvalidUpdate = -3,
    /// See [`AuthorityError::SignatureVerificationFailure`]
    SignatureVerificationFailure = -4,
    /// See [`AuthorityError::DuplicateNameFailure`]
    DuplicateNameFailure = -5,
    /// See [`AuthorityError::VerifyDataFailure`]
    VerifyDataFailure = -6,
    /// See [`AuthorityError::NotOwner`]
    NotOwner = -7,
    /// See [`AuthorityError::WontAcceptContact`]
    WontAcceptContact = -8,
    /// See [`AuthorityError::StoreFailure`]
    StoreFailure = -9,
    /// See [`AuthorityError::ModifyFailure`]
    ModifyFailure = -10,
    /// See [`AuthorityError::DeleteFailure`]
    DeleteFailure = -11,
    /// See [`AuthorityError::ParseFailure`]
    ParseFailure = -12,
    /// See [`AuthorityError::ReadFailure`]
    ReadFailure = -13,
    /// See [`AuthorityError::UnknownFailure`]
    UnknownFailure = -14,
}

impl AuthorityError {
    /// Flat code for this rejection
    pub fn code(&self) -> ReturnCode {
        match self {
            Self::InvalidSignedData { .. } => ReturnCode::InvalidSignedData,
            Self::NotHashable { .. } => ReturnCode::NotHashable,
            Self::InvalidUpdate { .. } => ReturnCode::InvalidUpdate,
            Self::SignatureVerificationFailure { .. } => ReturnCode::SignatureVerificationFailure,
            Self::DuplicateNameFailure { .. } => ReturnCode::DuplicateNameFailure,
            Self::VerifyDataFailure { .. } => ReturnCode::VerifyDataFailure,
            Self::NotOwner { .. } => ReturnCode::NotOwner,
            Self::WontAcceptContact { .. } => ReturnCode::WontAcceptContact,
            Self::StoreFailure { .. } => ReturnCode::StoreFailure,
            Self::ModifyFailure { .. } => ReturnCode::ModifyFailure,
            Self::DeleteFailure { .. } => ReturnCode::DeleteFailure,
            Self::ParseFailure { .. } => ReturnCode::ParseFailure,
            Self::ReadFailure { .. } => ReturnCode::ReadFailure,
            Self::UnknownFailure { .. } => ReturnCode::UnknownFailure,
        }
    }
}

impl ReturnCode {
    /// Numeric value of this code
    pub const fn value(self) -> i32 {
        self as i32
    }
}

impl From<&Result<Outcome, AuthorityError>> for ReturnCode {
    fn from(result: &Result<Outcome, AuthorityError>) -> Self {
        match result {
            Ok(Outcome::KeyUnique) => Self::KeyUnique,
            Ok(Outcome::KeyNotUnique) => Self::KeyNotUnique,
            Ok(_) => Self::Success,
            Err(err) => err.code(),
        }
    }
}
