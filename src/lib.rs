//! Nullable values that work with [`serde`], [SQLx](https://docs.rs/sqlx) and plain references.
//!
//! [`Null<T>`] stores a `T` next to a presence flag. It serializes an absent value as the null
//! literal, decodes a SQL `NULL` as an absent value, binds an absent value as `NULL`, and
//! converts to and from `Option<&T>` at any point.
//!
//! ```rust
//! use sqlx_null::{NullString, StrRef};
//!
//! #[derive(serde::Deserialize)]
//! struct Request {
//!     #[serde(default)]
//!     phone_number: NullString,
//! }
//!
//! let request: Request = serde_json::from_str(r#"{"phone_number":"+12065550100"}"#).unwrap();
//!
//! let phone: StrRef<'_> = request.phone_number.as_null_ref();
//! assert_eq!(phone.val(), "+12065550100");
//! ```
//!
//! The SQL support covers a closed set of [primitives](primitive) and, through [`Custom<T>`],
//! any type that implements SQLx's `Type`, `Encode` and `Decode` itself.
//!
//! Copies are shallow: cloning a `Null<T>` where `T` is reference-like shares the referent.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_debug_implementations)]

mod custom;
pub mod error;
mod null;
pub mod primitive;
mod reference;

pub use custom::Custom;
pub use error::UnexpectedNullError;
pub use null::Null;
pub use primitive::*;
pub use reference::NullRef;
