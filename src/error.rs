//! Error types.
//!
//! Decoding and encoding errors are never wrapped: they travel as the same [`BoxDynError`]
//! that SQLx drivers and user types return from `Decode` and `Encode`.

pub use sqlx_core::error::BoxDynError;

/// An absent value was found where a present one was required.
///
/// Returned from [`Null::try_into_inner`](crate::Null::try_into_inner).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unexpected null; try checking `Null::is_set` first")]
pub struct UnexpectedNullError;
