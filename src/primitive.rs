//! Nullable wrappers for the primitive SQL types.
//!
//! Every type in the closed set below has a [`Null`] alias and a [`NullRef`] alias. Decoding
//! goes through SQLx's own handling of `Option<T>`, so a `NULL` yields an absent value. Binding
//! an absent value sends `NULL` without calling `T`'s encoder.
//!
//! | Rust type | Alias | Reference view |
//! |---|---|---|
//! | `bool` | [`NullBool`] | [`BoolRef`] |
//! | `u8` | [`NullByte`] | [`ByteRef`] |
//! | `i16` | [`NullI16`] | [`I16Ref`] |
//! | `i32` | [`NullI32`] | [`I32Ref`] |
//! | `i64` | [`NullI64`] | [`I64Ref`] |
//! | `String` | [`NullString`] | [`StrRef`] |
//! | `chrono::DateTime<Utc>` | `NullDateTime` | `DateTimeRef` |
//!
//! The timestamp aliases require the `chrono` feature.
//!
//! Types outside this set that implement SQLx's `Type`, `Encode` and `Decode` are supported
//! through [`Custom`](crate::Custom).

use sqlx_core::database::Database;
use sqlx_core::decode::Decode;
use sqlx_core::encode::{Encode, IsNull};
use sqlx_core::error::BoxDynError;
use sqlx_core::types::Type;

use crate::null::Null;
use crate::reference::NullRef;

mod private {
    pub trait Sealed {}
}

/// A type with a built-in nullable SQL counterpart.
///
/// This trait is sealed; the set of primitives is closed. Use [`Custom`](crate::Custom) for
/// anything else.
pub trait Primitive: private::Sealed + Default + 'static {}

macro_rules! impl_primitive {
    ($($(#[$meta:meta])* $ty:ty => $null:ident, $view:ident;)*) => {
        $(
            $(#[$meta])*
            impl private::Sealed for $ty {}

            $(#[$meta])*
            impl Primitive for $ty {}

            $(#[$meta])*
            #[doc = concat!("A nullable `", stringify!($ty), "`.")]
            pub type $null = Null<$ty>;

            $(#[$meta])*
            #[doc = concat!("A possibly-absent reference to a `", stringify!($ty), "`.")]
            pub type $view<'a> = NullRef<'a, $ty>;
        )*
    };
}

impl_primitive! {
    bool => NullBool, BoolRef;
    u8 => NullByte, ByteRef;
    i16 => NullI16, I16Ref;
    i32 => NullI32, I32Ref;
    i64 => NullI64, I64Ref;
    String => NullString, StrRef;

    #[cfg(feature = "chrono")]
    #[cfg_attr(docsrs, doc(cfg(feature = "chrono")))]
    chrono::DateTime<chrono::Utc> => NullDateTime, DateTimeRef;
}

impl<T: Primitive> Null<T> {
    /// Decodes a raw database value into `self`, in place.
    ///
    /// A `NULL` leaves `self` absent. If the value cannot be decoded as `T`, `self` is cleared
    /// and the driver's error is returned unchanged.
    ///
    /// ```rust,no_run
    /// # use sqlx::{Connection, Row, Sqlite, SqliteConnection};
    /// # use sqlx_null::NullI64;
    /// # async fn example() -> Result<(), sqlx::error::BoxDynError> {
    /// let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
    /// let row = sqlx::query("SELECT 42").fetch_one(&mut conn).await?;
    ///
    /// let mut id = NullI64::null();
    /// id.scan::<Sqlite>(row.try_get_raw(0)?)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn scan<'r, DB>(
        &mut self,
        value: <DB as Database>::ValueRef<'r>,
    ) -> Result<(), BoxDynError>
    where
        DB: Database,
        T: Decode<'r, DB>,
    {
        match <Self as Decode<'r, DB>>::decode(value) {
            Ok(decoded) => {
                *self = decoded;
                Ok(())
            }

            Err(error) => {
                self.clear();

                tracing::trace!(
                    target: "sqlx_null::scan",
                    rust_type = std::any::type_name::<T>(),
                    %error,
                    "failed to scan value; cleared"
                );

                Err(error)
            }
        }
    }
}

impl<T, DB> Type<DB> for Null<T>
where
    T: Primitive + Type<DB>,
    DB: Database,
{
    fn type_info() -> DB::TypeInfo {
        <Option<T> as Type<DB>>::type_info()
    }

    fn compatible(ty: &DB::TypeInfo) -> bool {
        <Option<T> as Type<DB>>::compatible(ty)
    }
}

impl<'q, T, DB> Encode<'q, DB> for Null<T>
where
    T: Primitive + Encode<'q, DB> + Type<DB>,
    DB: Database,
{
    fn encode(
        self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.into_option() {
            Some(value) => <T as Encode<'q, DB>>::encode(value, buf),
            None => Ok(IsNull::Yes),
        }
    }

    fn encode_by_ref(
        &self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.as_ref() {
            Some(value) => <T as Encode<'q, DB>>::encode_by_ref(value, buf),
            None => Ok(IsNull::Yes),
        }
    }

    fn produces(&self) -> Option<DB::TypeInfo> {
        match self.as_ref() {
            Some(value) => <T as Encode<'q, DB>>::produces(value),
            None => Some(<T as Type<DB>>::type_info()),
        }
    }

    fn size_hint(&self) -> usize {
        self.as_ref().map_or(0, <T as Encode<'q, DB>>::size_hint)
    }
}

impl<'r, T, DB> Decode<'r, DB> for Null<T>
where
    T: Primitive + Decode<'r, DB>,
    DB: Database,
{
    fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        <Option<T> as Decode<'r, DB>>::decode(value).map(Self::from)
    }
}
