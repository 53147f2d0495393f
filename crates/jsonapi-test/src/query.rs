//! Query parameter values and their wire encoding.
//!
//! JSON:API query parameters are nested (`filter[author]=1`,
//! `fields[posts]=title,slug`, `page[size]=10`). The builder accumulates
//! them as a tree of [`QueryValue`]s and flattens the tree into the
//! bracketed key convention when the request is dispatched.

use crate::error::InvalidQueryLeaf;
use crate::identifier::{RouteKey, RouteRef};
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Ordered query parameter map.
pub type QueryParams = IndexMap<String, QueryValue>;

/// A query parameter value.
///
/// Only [`String`](QueryValue::String), [`Integer`](QueryValue::Integer)
/// and [`Float`](QueryValue::Float) leaves can be encoded. The remaining
/// scalar variants exist so that mistakes (a `true` instead of `"true"`)
/// are reported with the key that caused them instead of being coerced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A string leaf.
    String(String),
    /// An integer leaf.
    Integer(i64),
    /// A float leaf.
    Float(f64),
    /// A boolean. Not encodable.
    Bool(bool),
    /// An absent value. Not encodable.
    Null,
    /// A list, encoded with zero-based indexes (`id[0]=1&id[1]=2`).
    List(Vec<QueryValue>),
    /// A nested map, encoded with bracketed keys (`page[size]=10`).
    Map(QueryParams),
    /// An entity reference. Resolved to its route key inside `filter` and
    /// `page`; not encodable anywhere else.
    Route(RouteRef),
}

impl QueryValue {
    /// Wraps an entity exposing a [`RouteKey`].
    pub fn route<T>(entity: T) -> Self
    where
        T: RouteKey + Send + Sync + 'static,
    {
        Self::Route(RouteRef::new(entity))
    }

    /// Returns the nested map, if this value is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&QueryParams> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the string, if this value is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Builds an ordered [`QueryParams`] map.
///
/// Values may be anything convertible into a [`QueryValue`].
///
/// ```
/// use jsonapi_test::{params, QueryValue};
///
/// let query = params! {
///     "include" => "author",
///     "page" => params! { "number" => 1, "size" => 10 },
/// };
///
/// assert_eq!(query["include"], QueryValue::from("author"));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::QueryParams::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::QueryParams::new();
        $(
            params.insert(
                ::std::string::String::from($key),
                $crate::QueryValue::from($value),
            );
        )+
        params
    }};
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_wide_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    i64::try_from(value).map_or_else(|_| Self::String(value.to_string()), Self::Integer)
                }
            }
        )*
    };
}

// Values beyond `i64::MAX` are sent as their exact decimal digits.
impl_from_wide_integer!(u64, usize);

impl From<f32> for QueryValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<RouteRef> for QueryValue {
    fn from(value: RouteRef) -> Self {
        Self::Route(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<QueryValue>, const N: usize> From<[T; N]> for QueryValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<QueryValue>> From<IndexMap<K, V>> for QueryValue {
    fn from(map: IndexMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<QueryValue>> From<BTreeMap<K, V>> for QueryValue {
    fn from(map: BTreeMap<K, V>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Value> for QueryValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => {
                if let Some(int) = n.as_i64() {
                    Self::Integer(int)
                } else if let Some(uint) = n.as_u64() {
                    Self::from(uint)
                } else {
                    n.as_f64()
                        .map_or_else(|| Self::String(n.to_string()), Self::Float)
                }
            }
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

/// Encodes query parameters using the bracketed nested-key convention.
///
/// Every leaf must be a string, integer or float. The first leaf that is
/// not is returned as an [`InvalidQueryLeaf`] naming its key path.
///
/// ```
/// use jsonapi_test::{params, query};
///
/// let encoded = query::encode(&params! {
///     "include" => "author,tags",
///     "filter" => params! { "author" => "1" },
/// })
/// .unwrap();
///
/// assert_eq!(encoded, "include=author,tags&filter[author]=1");
/// ```
pub fn encode(params: &QueryParams) -> Result<String, InvalidQueryLeaf> {
    let mut pairs = Pairs::default();

    for (key, value) in params {
        flatten_strict(key, value, &mut pairs)?;
    }

    Ok(pairs.finish())
}

/// Form-encodes a raw payload with the same key convention as [`encode`].
///
/// Unlike query parameters, payloads are not validated: booleans render as
/// `1`/`0` and `null` members are skipped.
pub fn encode_form(payload: &serde_json::Value) -> String {
    use serde_json::Value;

    let mut pairs = Pairs::default();

    match payload {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_lenient(key, value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten_lenient(&index.to_string(), value, &mut pairs);
            }
        }
        _ => {}
    }

    pairs.finish()
}

fn flatten_strict(
    path: &str,
    value: &QueryValue,
    pairs: &mut Pairs,
) -> Result<(), InvalidQueryLeaf> {
    match value {
        QueryValue::String(s) => pairs.push(path, s),
        QueryValue::Integer(i) => pairs.push(path, &i.to_string()),
        QueryValue::Float(f) => pairs.push(path, &f.to_string()),
        QueryValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_strict(&format!("{path}[{index}]"), item, pairs)?;
            }
        }
        QueryValue::Map(map) => {
            for (key, item) in map {
                flatten_strict(&format!("{path}[{key}]"), item, pairs)?;
            }
        }
        QueryValue::Bool(_) | QueryValue::Null | QueryValue::Route(_) => {
            return Err(InvalidQueryLeaf {
                path: path.to_string(),
            });
        }
    }

    Ok(())
}

fn flatten_lenient(path: &str, value: &serde_json::Value, pairs: &mut Pairs) {
    use serde_json::Value;

    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push(path, if *b { "1" } else { "0" }),
        Value::Number(n) => pairs.push(path, &n.to_string()),
        Value::String(s) => pairs.push(path, s),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_lenient(&format!("{path}[{index}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten_lenient(&format!("{path}[{key}]"), item, pairs);
            }
        }
    }
}

#[derive(Default)]
struct Pairs(Vec<String>);

impl Pairs {
    fn push(&mut self, path: &str, value: &str) {
        self.0
            .push(format!("{}={}", escape(path, &['[', ']']), escape(value, &[','])));
    }

    fn finish(self) -> String {
        self.0.join("&")
    }
}

/// Percent-encodes `input`, leaving the `literal` characters as they are.
fn escape(input: &str, literal: &[char]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        if literal.contains(&ch) {
            out.push_str(&urlencoding::encode(&input[start..idx]));
            out.push(ch);
            start = idx + ch.len_utf8();
        }
    }

    out.push_str(&urlencoding::encode(&input[start..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use serde_json::json;

    #[test]
    fn test_encode_flat() {
        let query = params! { "include" => "author,tags", "sort" => "-publishedAt,title" };
        assert_eq!(
            encode(&query).unwrap(),
            "include=author,tags&sort=-publishedAt,title"
        );
    }

    #[test]
    fn test_encode_nested() {
        let query = params! {
            "page" => params! { "number" => "1", "size" => 10 },
            "fields" => params! { "posts" => "title,slug", "users" => "name" },
        };
        assert_eq!(
            encode(&query).unwrap(),
            "page[number]=1&page[size]=10&fields[posts]=title,slug&fields[users]=name"
        );
    }

    #[test]
    fn test_encode_list() {
        let query = params! { "filter" => params! { "id" => ["1", "2"] } };
        assert_eq!(encode(&query).unwrap(), "filter[id][0]=1&filter[id][1]=2");
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let query = params! { "filter" => params! { "title sw" => "a&b=c d" } };
        assert_eq!(
            encode(&query).unwrap(),
            "filter[title%20sw]=a%26b%3Dc%20d"
        );
    }

    #[test]
    fn test_encode_float() {
        let query = params! { "filter" => params! { "min" => 1.5 } };
        assert_eq!(encode(&query).unwrap(), "filter[min]=1.5");
    }

    #[test]
    fn test_boolean_leaf_rejected() {
        let query = params! { "filter" => params! { "published" => "true", "archived" => false } };
        let err = encode(&query).unwrap_err();
        assert_eq!(err.path, "filter[archived]");
    }

    #[test]
    fn test_null_leaf_rejected() {
        let query = params! { "page" => params! { "cursor" => None::<String> } };
        assert_eq!(encode(&query).unwrap_err().path, "page[cursor]");
    }

    #[test]
    fn test_unresolved_route_rejected() {
        struct Tag;
        impl RouteKey for Tag {
            fn route_key(&self) -> String {
                "news".to_string()
            }
        }

        let query = params! { "tag" => QueryValue::route(Tag) };
        assert_eq!(encode(&query).unwrap_err().path, "tag");
    }

    #[test]
    fn test_from_json_value() {
        let value = QueryValue::from(json!({ "size": 10, "ratio": 0.5, "id": ["1"] }));
        let map = value.as_map().unwrap();
        assert_eq!(map["size"], QueryValue::Integer(10));
        assert_eq!(map["ratio"], QueryValue::Float(0.5));
        assert_eq!(map["id"], QueryValue::List(vec![QueryValue::from("1")]));
    }

    #[test]
    fn test_from_json_value_keeps_large_integers() {
        let value = QueryValue::from(json!({ "id": u64::MAX, "after": -3 }));
        let map = value.as_map().unwrap();
        assert_eq!(map["id"], QueryValue::String("18446744073709551615".to_string()));
        assert_eq!(map["after"], QueryValue::Integer(-3));

        let query = params! { "filter" => value };
        assert_eq!(
            encode(&query).unwrap(),
            "filter[id]=18446744073709551615&filter[after]=-3"
        );
    }

    #[test]
    fn test_from_wide_integers() {
        assert_eq!(QueryValue::from(42u64), QueryValue::Integer(42));
        assert_eq!(QueryValue::from(7usize), QueryValue::Integer(7));
        assert_eq!(
            QueryValue::from(u64::MAX),
            QueryValue::String(u64::MAX.to_string())
        );

        let ids: Vec<u64> = vec![1, 2];
        let query = params! { "page" => params! { "size" => ids.len() }, "id" => ids };
        assert_eq!(encode(&query).unwrap(), "page[size]=2&id[0]=1&id[1]=2");
    }

    #[test]
    fn test_encode_form() {
        let payload = json!({ "foo": "bar", "baz": "bat" });
        assert_eq!(encode_form(&payload), "foo=bar&baz=bat");
    }

    #[test]
    fn test_encode_form_is_lenient() {
        let payload = json!({ "accepted": true, "note": null, "tags": ["a", "b"] });
        assert_eq!(encode_form(&payload), "accepted=1&tags[0]=a&tags[1]=b");
    }

    #[test]
    fn test_escape_keeps_literals() {
        assert_eq!(escape("a,b c", &[',']), "a,b%20c");
        assert_eq!(escape("x[y]", &['[', ']']), "x[y]");
        assert_eq!(escape("é", &[]), "%C3%A9");
    }
}
