use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};
use sqlx_core::database::Database;
use sqlx_core::decode::Decode;
use sqlx_core::encode::{Encode, IsNull};
use sqlx_core::error::BoxDynError;
use sqlx_core::types::Type;
use sqlx_core::value::ValueRef;

use crate::null::Null;

/// A nullable wrapper for any type that already knows how to decode itself from, and encode
/// itself to, the database.
///
/// `T` only needs SQLx's [`Type`], [`Decode`] and [`Encode`]; its own implementations are
/// reused as-is. The wrapper adds the presence flag on top:
///
///  * decoding a SQL `NULL` produces an absent value and never calls `T`'s decoder,
///  * encoding an absent value binds `NULL` and never calls `T`'s encoder.
///
/// Any notion of validity inside `T` itself is ignored; only [`Null::is_set`] counts.
///
/// `Custom<T>` dereferences to [`Null<T>`] and serializes exactly like it.
///
/// ```rust,no_run
/// # use sqlx::{Connection, SqliteConnection};
/// # use sqlx_null::Custom;
/// # async fn example() -> sqlx::Result<()> {
/// let mut conn = SqliteConnection::connect("sqlite::memory:").await?;
///
/// let thumbnail: Custom<Vec<u8>> = sqlx::query_scalar("SELECT thumbnail FROM documents")
///     .fetch_one(&mut conn)
///     .await?;
///
/// if thumbnail.is_set() {
///     println!("{} bytes", thumbnail.val().len());
/// }
/// # Ok(())
/// # }
/// ```
///
/// See `tests/sqlite/custom.rs` for user-defined types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Deserialize<'de> + Default"
))]
pub struct Custom<T>(pub Null<T>);

impl<T> Custom<T> {
    /// Creates a present value.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(Null::new(value))
    }

    #[inline]
    pub fn into_inner(self) -> Null<T> {
        self.0
    }
}

impl<T: Default> Custom<T> {
    /// Creates an absent value.
    #[inline]
    pub fn null() -> Self {
        Self(Null::null())
    }

    /// Decodes a raw database value into `self`, in place.
    ///
    /// A `NULL` makes `self` absent without calling `T`'s decoder. Otherwise `T` is decoded and
    /// marked present. If `T`'s decoder fails, `self` is cleared before its error is returned,
    /// so a reused wrapper never reports a value left over from an earlier scan.
    pub fn scan<'r, DB>(
        &mut self,
        value: <DB as Database>::ValueRef<'r>,
    ) -> Result<(), BoxDynError>
    where
        DB: Database,
        T: Decode<'r, DB>,
    {
        if value.is_null() {
            self.0.clear();
            return Ok(());
        }

        match <T as Decode<'r, DB>>::decode(value) {
            Ok(decoded) => {
                self.0.set(decoded);
                Ok(())
            }

            Err(error) => {
                self.0.clear();

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

impl<T> From<Null<T>> for Custom<T> {
    fn from(value: Null<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Custom<T>> for Null<T> {
    fn from(value: Custom<T>) -> Self {
        value.0
    }
}

impl<T> Deref for Custom<T> {
    type Target = Null<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Custom<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T, DB> Type<DB> for Custom<T>
where
    T: Type<DB>,
    DB: Database,
{
    fn type_info() -> DB::TypeInfo {
        <T as Type<DB>>::type_info()
    }

    fn compatible(ty: &DB::TypeInfo) -> bool {
        <T as Type<DB>>::compatible(ty)
    }
}

impl<'q, T, DB> Encode<'q, DB> for Custom<T>
where
    T: Encode<'q, DB> + Type<DB>,
    DB: Database,
{
    fn encode(
        self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.0.into_option() {
            Some(value) => <T as Encode<'q, DB>>::encode(value, buf),
            None => Ok(IsNull::Yes),
        }
    }

    fn encode_by_ref(
        &self,
        buf: &mut <DB as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        match self.0.as_ref() {
            Some(value) => <T as Encode<'q, DB>>::encode_by_ref(value, buf),
            None => Ok(IsNull::Yes),
        }
    }

    fn produces(&self) -> Option<DB::TypeInfo> {
        match self.0.as_ref() {
            Some(value) => <T as Encode<'q, DB>>::produces(value),
            None => Some(<T as Type<DB>>::type_info()),
        }
    }

    fn size_hint(&self) -> usize {
        self.0.as_ref().map_or(0, <T as Encode<'q, DB>>::size_hint)
    }
}

impl<'r, T, DB> Decode<'r, DB> for Custom<T>
where
    T: Decode<'r, DB> + Default,
    DB: Database,
{
    fn decode(value: <DB as Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        if value.is_null() {
            return Ok(Self::null());
        }

        <T as Decode<'r, DB>>::decode(value).map(Self::new)
    }
}
