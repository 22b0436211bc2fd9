use serde::{Serialize, Serializer};

use crate::null::Null;

/// A borrowed, possibly-absent reference to a `T`.
///
/// This is the reference-shaped counterpart of [`Null<T>`]: it does not own the value and
/// cannot outlive whatever it borrows from. Use [`Null::as_null_ref`] to view a `Null` this
/// way and [`NullRef::to_null`] to copy the referent back into an owned `Null`.
///
/// Unlike `Null<T>`, an absent `NullRef` can be dropped from serialized output entirely:
///
/// ```rust
/// # use sqlx_null::{Null, NullRef};
/// #[derive(serde::Serialize)]
/// struct Response<'a> {
///     #[serde(skip_serializing_if = "NullRef::is_none")]
///     first_name: NullRef<'a, String>,
/// }
///
/// let name = Null::<String>::null();
/// let response = Response { first_name: name.as_null_ref() };
///
/// assert_eq!(serde_json::to_string(&response).unwrap(), "{}");
/// ```
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct NullRef<'a, T>(Option<&'a T>);

impl<'a, T> NullRef<'a, T> {
    #[inline]
    pub const fn new(value: Option<&'a T>) -> Self {
        Self(value)
    }

    /// A reference to nothing.
    #[inline]
    pub const fn null() -> Self {
        Self(None)
    }

    #[inline]
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0.is_none()
    }

    #[inline]
    pub const fn get(&self) -> Option<&'a T> {
        self.0
    }

    /// Returns a copy of the referent, or `T::default()` for a reference to nothing.
    pub fn val(&self) -> T
    where
        T: Clone + Default,
    {
        self.0.cloned().unwrap_or_default()
    }

    /// Copies the referent into an owned [`Null<T>`].
    pub fn to_null(&self) -> Null<T>
    where
        T: Clone + Default,
    {
        Null::from_ref(self.0)
    }
}

// manual impls: the derives would require `T: Clone`
impl<T> Clone for NullRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NullRef<'_, T> {}

impl<T> Default for NullRef<'_, T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<'a, T> From<&'a T> for NullRef<'a, T> {
    fn from(value: &'a T) -> Self {
        Self(Some(value))
    }
}

impl<'a, T> From<Option<&'a T>> for NullRef<'a, T> {
    fn from(value: Option<&'a T>) -> Self {
        Self(value)
    }
}

impl<'a, T> From<&'a Null<T>> for NullRef<'a, T> {
    fn from(value: &'a Null<T>) -> Self {
        value.as_null_ref()
    }
}

impl<'a, T> From<NullRef<'a, T>> for Option<&'a T> {
    fn from(value: NullRef<'a, T>) -> Self {
        value.0
    }
}

impl<T: Serialize> Serialize for NullRef<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_none(),
        }
    }
}
