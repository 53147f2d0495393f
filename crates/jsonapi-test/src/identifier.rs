//! Routable identifiers.
//!
//! Filters and pagination parameters frequently refer to domain entities
//! ("posts by this author", "page after this cursor"). Rather than forcing
//! the test author to pull the identifier out by hand, any type implementing
//! [`RouteKey`] can be placed directly into a filter or page value and is
//! replaced by its route key when it enters the builder.

use crate::query::QueryValue;
use std::fmt;
use std::sync::Arc;

/// A domain entity that knows the identifier used for it in URIs.
///
/// # Example
///
/// ```
/// use jsonapi_test::RouteKey;
///
/// struct Post {
///     slug: String,
/// }
///
/// impl RouteKey for Post {
///     fn route_key(&self) -> String {
///         self.slug.clone()
///     }
/// }
/// ```
pub trait RouteKey {
    /// Returns the routable identifier of this entity.
    fn route_key(&self) -> String;
}

impl<T: RouteKey + ?Sized> RouteKey for &T {
    fn route_key(&self) -> String {
        (**self).route_key()
    }
}

impl<T: RouteKey + ?Sized> RouteKey for Arc<T> {
    fn route_key(&self) -> String {
        (**self).route_key()
    }
}

impl<T: RouteKey + ?Sized> RouteKey for Box<T> {
    fn route_key(&self) -> String {
        (**self).route_key()
    }
}

/// Shared handle to an entity exposing a [`RouteKey`].
///
/// Two handles are equal when their route keys are equal.
#[derive(Clone)]
pub struct RouteRef(Arc<dyn RouteKey + Send + Sync>);

impl RouteRef {
    /// Wraps an entity.
    pub fn new<T>(entity: T) -> Self
    where
        T: RouteKey + Send + Sync + 'static,
    {
        Self(Arc::new(entity))
    }

    /// Returns the entity's route key.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.route_key()
    }
}

impl fmt::Debug for RouteRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RouteRef").field(&self.key()).finish()
    }
}

impl PartialEq for RouteRef {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

/// Replaces every entity reference in `value` with its route key.
///
/// Lists and maps are normalized element-wise; all other values are
/// returned unchanged.
pub fn normalize(value: QueryValue) -> QueryValue {
    match value {
        QueryValue::Route(entity) => {
            let key = entity.key();
            tracing::trace!(route_key = %key, "resolved entity reference");
            QueryValue::String(key)
        }
        QueryValue::List(items) => QueryValue::List(items.into_iter().map(normalize).collect()),
        QueryValue::Map(map) => QueryValue::Map(
            map.into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .collect(),
        ),
        other => other,
    }
}
