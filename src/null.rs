use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::UnexpectedNullError;
use crate::reference::NullRef;

/// A value of `T` that may be absent.
///
/// `Null<T>` stores the value inline next to a presence flag instead of behind a pointer, but
/// converts to and from a possibly-absent reference at any time (see [`Null::as_ref`] and
/// [`Null::from_ref`]).
///
/// When the value is absent, [`val`](Null::val) returns `T::default()`; every operation that
/// clears presence also resets the value, so an absent `Null` never exposes stale data.
///
/// # Serialization
///
/// With [`serde`], an absent value serializes as the format's null literal (`null` in JSON).
/// Deserializing the null literal produces an absent value without consulting `T`'s
/// deserializer; anything else is deserialized as `T`.
///
/// ```rust
/// # use sqlx_null::Null;
/// #[derive(serde::Deserialize)]
/// struct Request {
///     #[serde(default)]
///     phone_number: Null<String>,
/// }
///
/// let request: Request = serde_json::from_str(r#"{"phone_number":null}"#).unwrap();
/// assert!(!request.phone_number.is_set());
/// ```
///
/// # Equality
///
/// Two values are equal when both are absent or both hold equal values. The contents of
/// `value` are ignored while `is_set` is `false`, for [`PartialEq`] and [`Hash`] alike.
///
/// # Copies are shallow
///
/// Cloning a `Null<T>` clones `T` and nothing more. If `T` is itself reference-like
/// (`&U`, `Rc<U>`, `Arc<U>`, ...), the clone shares the referent with the original.
#[derive(Copy, Clone, Default)]
pub struct Null<T> {
    /// The contained value. Only meaningful when `is_set` is `true`.
    pub value: T,

    /// Whether `value` is present.
    pub is_set: bool,
}

impl<T> Null<T> {
    /// Creates a present value.
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            is_set: true,
        }
    }

    /// Returns `true` if a value is present.
    #[inline]
    pub const fn is_set(&self) -> bool {
        self.is_set
    }

    /// Returns the contained value without checking for presence.
    ///
    /// For an absent value this is `T::default()`.
    #[inline]
    pub const fn val(&self) -> &T {
        &self.value
    }

    /// Returns a reference to the value, or `None` if absent.
    ///
    /// The reference borrows from `self` and does not outlive it.
    #[inline]
    pub fn as_ref(&self) -> Option<&T> {
        self.is_set.then_some(&self.value)
    }

    /// Returns a mutable reference to the value, or `None` if absent.
    #[inline]
    pub fn as_mut(&mut self) -> Option<&mut T> {
        self.is_set.then_some(&mut self.value)
    }

    /// Returns the reference-shaped view of this value.
    #[inline]
    pub fn as_null_ref(&self) -> NullRef<'_, T> {
        NullRef::new(self.as_ref())
    }

    /// Stores `value` and marks it present.
    #[inline]
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.is_set = true;
    }

    /// Converts into an `Option<T>`, dropping the value if it is absent.
    #[inline]
    pub fn into_option(self) -> Option<T> {
        self.is_set.then_some(self.value)
    }

    /// Returns the value or an [`UnexpectedNullError`] if it is absent.
    pub fn try_into_inner(self) -> Result<T, UnexpectedNullError> {
        self.into_option().ok_or(UnexpectedNullError)
    }

    /// Maps the contained value, keeping presence.
    ///
    /// The function is only called if the value is present.
    pub fn map<U, F>(self, f: F) -> Null<U>
    where
        U: Default,
        F: FnOnce(T) -> U,
    {
        self.into_option().map(f).into()
    }
}

impl<T: Default> Null<T> {
    /// Creates an absent value.
    #[inline]
    pub fn null() -> Self {
        Self::default()
    }

    /// Creates a value from a possibly-absent reference, cloning the referent.
    pub fn from_ref(value: Option<&T>) -> Self
    where
        T: Clone,
    {
        value.cloned().into()
    }

    /// Marks the value absent and resets it to `T::default()`.
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Takes the value out, leaving an absent value in its place.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        std::mem::take(self).into_option()
    }
}

impl<T: Debug> Debug for Null<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.as_ref() {
            Some(value) => f.debug_tuple("Null").field(value).finish(),
            None => f.write_str("Null(null)"),
        }
    }
}

impl<T: PartialEq> PartialEq for Null<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<T: Eq> Eq for Null<T> {}

impl<T: Hash> Hash for Null<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ref().hash(state);
    }
}

impl<T: Default> From<Option<T>> for Null<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::new(value),
            None => Self::default(),
        }
    }
}

impl<T> From<Null<T>> for Option<T> {
    fn from(value: Null<T>) -> Self {
        value.into_option()
    }
}

impl<T: Clone + Default> From<NullRef<'_, T>> for Null<T> {
    fn from(value: NullRef<'_, T>) -> Self {
        Self::from_ref(value.get())
    }
}

impl<T: Serialize> Serialize for Null<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.as_ref() {
            Some(value) => serializer.serialize_some(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T> Deserialize<'de> for Null<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // `Option`'s deserializer checks for the null literal before touching `T`
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
