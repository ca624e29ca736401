//! Operation result codes and error infrastructure.
//!
//! Every container operation reports failure as an [`OpError`] value. The flat
//! [`OpCode`] mirrors the codes a presentation layer branches on, including
//! `Success`.
//!
//! # Classification
//!
//! - **Validation**: bad coordinates, amount or target; nothing was mutated.
//! - **Recoverable**: well-formed request refused by container policy
//!   (permission, weight, overlap, space); nothing was mutated.
//! - **Partial**: a multi-step operation stopped short; the applied portion
//!   stays applied and is reported in the error.

use crate::item::ItemInstance;

/// Severity level of an error, used to pick a recovery strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input; retry only with different parameters.
    Validation,

    /// Refused by current container state; the request was well-formed.
    Recoverable,

    /// Part of the request was applied before the operation stopped.
    Partial,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Recoverable => "recoverable",
            Self::Partial => "partial",
        }
    }

    /// Returns true when the grid was left untouched by the failed call.
    pub const fn is_clean(&self) -> bool {
        !matches!(self, Self::Partial)
    }
}

/// Common trait for all stash-core errors.
pub trait StashError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failure of a container operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpError {
    /// No item at the target cell, or the item cannot serve the request.
    #[error("no suitable item at the target")]
    ErrorInItem,

    /// Coordinates (or the footprint anchored there) fall outside the grid.
    #[error("position is outside the container")]
    ErrorInPosition,

    /// Requested amount is zero or out of range for the item.
    #[error("invalid amount")]
    ErrorInAmount,

    /// Target rectangle straddles two or more distinct items.
    #[error("target area is blocked by another item")]
    BlockedByItem,

    /// Only part of the requested amount could be processed.
    #[error("operation applied {applied} of {requested} units")]
    Incomplete { applied: u32, requested: u32 },

    #[error("container weight limit exceeded")]
    WeightExceeded,

    #[error("container does not permit this item")]
    NoPermission,

    #[error("no space left in container")]
    ContainerFull,
}

impl OpError {
    pub const fn code(&self) -> OpCode {
        match self {
            Self::ErrorInItem => OpCode::ErrorInItem,
            Self::ErrorInPosition => OpCode::ErrorInPosition,
            Self::ErrorInAmount => OpCode::ErrorInAmount,
            Self::BlockedByItem => OpCode::BlockedByItem,
            Self::Incomplete { .. } => OpCode::Incomplete,
            Self::WeightExceeded => OpCode::WeightExceeded,
            Self::NoPermission => OpCode::NoPermission,
            Self::ContainerFull => OpCode::ContainerFull,
        }
    }
}

impl StashError for OpError {
    fn severity(&self) -> ErrorSeverity {
        use OpError::*;
        match self {
            ErrorInItem | ErrorInPosition | ErrorInAmount => ErrorSeverity::Validation,
            BlockedByItem | WeightExceeded | NoPermission | ContainerFull => {
                ErrorSeverity::Recoverable
            }
            Incomplete { .. } => ErrorSeverity::Partial,
        }
    }

    fn error_code(&self) -> &'static str {
        use OpError::*;
        match self {
            ErrorInItem => "CONTAINER_ERROR_IN_ITEM",
            ErrorInPosition => "CONTAINER_ERROR_IN_POSITION",
            ErrorInAmount => "CONTAINER_ERROR_IN_AMOUNT",
            BlockedByItem => "CONTAINER_BLOCKED_BY_ITEM",
            Incomplete { .. } => "CONTAINER_INCOMPLETE",
            WeightExceeded => "CONTAINER_WEIGHT_EXCEEDED",
            NoPermission => "CONTAINER_NO_PERMISSION",
            ContainerFull => "CONTAINER_FULL",
        }
    }
}

/// Flat result code of a container operation.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OpCode {
    Success,
    ErrorInItem,
    ErrorInPosition,
    ErrorInAmount,
    BlockedByItem,
    Incomplete,
    WeightExceeded,
    NoPermission,
    ContainerFull,
}

impl OpCode {
    /// Collapses any operation result into its code.
    pub fn of<T>(result: &Result<T, OpError>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(error) => error.code(),
        }
    }

    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

pub type OpResult<T = ()> = Result<T, OpError>;

/// A refused placement. The carried instance is handed back to the caller.
#[derive(Debug, thiserror::Error)]
#[error("placement rejected: {error}")]
pub struct Rejected {
    pub error: OpError,
    pub instance: ItemInstance,
}

impl Rejected {
    pub fn new(error: OpError, instance: ItemInstance) -> Self {
        Self { error, instance }
    }

    pub fn code(&self) -> OpCode {
        self.error.code()
    }

    pub fn into_instance(self) -> ItemInstance {
        self.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_round_trip_through_names() {
        for code in OpCode::iter() {
            let name: &'static str = code.into();
            assert_eq!(name.parse::<OpCode>(), Ok(code));
        }
    }

    #[test]
    fn incomplete_is_the_only_partial_error() {
        let partial = OpError::Incomplete {
            applied: 1,
            requested: 4,
        };
        assert_eq!(partial.severity(), ErrorSeverity::Partial);
        assert!(!partial.severity().is_clean());
        assert!(OpError::BlockedByItem.severity().is_clean());
        assert_eq!(OpError::ErrorInAmount.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn result_collapses_to_code() {
        let ok: OpResult<u32> = Ok(3);
        let err: OpResult<u32> = Err(OpError::WeightExceeded);
        assert_eq!(OpCode::of(&ok), OpCode::Success);
        assert_eq!(OpCode::of(&err), OpCode::WeightExceeded);
        assert_eq!(OpCode::WeightExceeded.to_string(), "WeightExceeded");
    }
}
