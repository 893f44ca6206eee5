// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Accessors: how the chart reads weights, children, labels, and colors from caller data.
//!
//! Every accessor is either a field key, resolved through [`Record`], or a
//! function over the datum. Keys keep configuration data-driven (for example
//! `"value"` and `"children"` on a JSON tree); functions cover everything else.

use std::fmt;
use std::rc::Rc;

/// Keyed access to a datum's fields.
///
/// All methods default to "absent", so a type that is only ever read through
/// function accessors can implement this with an empty `impl`.
pub trait Record {
    /// Numeric field `key`.
    fn number(&self, key: &str) -> Option<f64> {
        let _ = key;
        None
    }

    /// Text field `key`.
    fn text(&self, key: &str) -> Option<String> {
        let _ = key;
        None
    }

    /// Child list stored under `key`. Absent means leaf.
    fn list(&self, key: &str) -> &[Self]
    where
        Self: Sized,
    {
        let _ = key;
        &[]
    }
}

/// Values an [`Accessor::Key`] can produce from a [`Record`].
pub trait FromRecord: Sized {
    /// Read field `key` of `datum`.
    fn from_record<T: Record>(datum: &T, key: &str) -> Option<Self>;
}

impl FromRecord for f64 {
    fn from_record<T: Record>(datum: &T, key: &str) -> Option<Self> {
        datum.number(key)
    }
}

impl FromRecord for String {
    fn from_record<T: Record>(datum: &T, key: &str) -> Option<Self> {
        datum.text(key)
    }
}

/// Reads a value of type `V` from a datum of type `T`.
pub enum Accessor<T, V> {
    /// Field name looked up through [`Record`].
    Key(String),
    /// Arbitrary function of the datum.
    Func(Rc<dyn Fn(&T) -> V>),
    /// The same value for every datum.
    Const(V),
}

impl<T, V> Accessor<T, V> {
    /// Accessor reading field `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Accessor calling `f`.
    pub fn func(f: impl Fn(&T) -> V + 'static) -> Self {
        Self::Func(Rc::new(f))
    }
}

impl<T: Record, V: FromRecord + Clone> Accessor<T, V> {
    /// Read the value for `datum`. `None` when a keyed field is absent.
    pub fn resolve(&self, datum: &T) -> Option<V> {
        match self {
            Self::Key(key) => V::from_record(datum, key),
            Self::Func(f) => Some(f(datum)),
            Self::Const(v) => Some(v.clone()),
        }
    }
}

impl<T, V: Clone> Clone for Accessor<T, V> {
    fn clone(&self) -> Self {
        match self {
            Self::Key(key) => Self::Key(key.clone()),
            Self::Func(f) => Self::Func(Rc::clone(f)),
            Self::Const(v) => Self::Const(v.clone()),
        }
    }
}

impl<T, V: fmt::Debug> fmt::Debug for Accessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
            Self::Const(v) => f.debug_tuple("Const").field(v).finish(),
        }
    }
}

/// Function form of a children accessor.
pub type ChildrenFn<T> = dyn for<'a> Fn(&'a T) -> &'a [T];

/// Reads a datum's children.
pub enum Children<T> {
    /// Field name looked up through [`Record::list`].
    Key(String),
    /// Arbitrary function of the datum.
    Func(Rc<ChildrenFn<T>>),
}

impl<T> Children<T> {
    /// Accessor reading field `key`.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// Accessor calling `f`.
    pub fn func(f: impl for<'a> Fn(&'a T) -> &'a [T] + 'static) -> Self {
        Self::Func(Rc::new(f))
    }
}

impl<T: Record> Children<T> {
    /// The children of `datum`; empty for leaves.
    pub fn resolve<'a>(&self, datum: &'a T) -> &'a [T] {
        match self {
            Self::Key(key) => datum.list(key),
            Self::Func(f) => f(datum),
        }
    }
}

impl<T> Clone for Children<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Key(key) => Self::Key(key.clone()),
            Self::Func(f) => Self::Func(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for Children<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

#[cfg(feature = "json")]
impl Record for serde_json::Value {
    fn number(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Self::String(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn list(&self, key: &str) -> &[Self] {
        self.get(key)
            .and_then(Self::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf {
        size: f64,
        kids: Vec<Leaf>,
    }

    impl Record for Leaf {
        fn number(&self, key: &str) -> Option<f64> {
            (key == "size").then_some(self.size)
        }
    }

    #[test]
    fn keyed_access_goes_through_record() {
        let leaf = Leaf { size: 3.0, kids: vec![] };
        assert_eq!(Accessor::<Leaf, f64>::key("size").resolve(&leaf), Some(3.0));
        assert_eq!(Accessor::<Leaf, f64>::key("value").resolve(&leaf), None);
        assert_eq!(
            Accessor::<Leaf, String>::key("name").resolve(&leaf),
            None,
            "default text lookup is absent"
        );
    }

    #[test]
    fn function_and_constant_access() {
        let leaf = Leaf { size: 3.0, kids: vec![] };
        let doubled = Accessor::func(|d: &Leaf| d.size * 2.0);
        assert_eq!(doubled.resolve(&leaf), Some(6.0));
        let grey: Accessor<Leaf, String> = Accessor::Const("lightgrey".into());
        assert_eq!(grey.resolve(&leaf).as_deref(), Some("lightgrey"));
    }

    #[test]
    fn children_default_to_leaf() {
        let tree = Leaf {
            size: 0.0,
            kids: vec![Leaf { size: 1.0, kids: vec![] }],
        };
        assert!(Children::key("children").resolve(&tree).is_empty());
        let by_fn = Children::func(|d: &Leaf| d.kids.as_slice());
        assert_eq!(by_fn.resolve(&tree).len(), 1);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_values_are_records() {
        let v = serde_json::json!({
            "name": "root",
            "value": 2,
            "children": [{ "name": 7, "value": 1.5 }]
        });
        assert_eq!(v.number("value"), Some(2.0));
        assert_eq!(v.text("name").as_deref(), Some("root"));
        let kids = v.list("children");
        assert_eq!(kids.len(), 1);
        assert_eq!(kids[0].text("name").as_deref(), Some("7"));
        assert!(kids[0].list("children").is_empty());
    }
}
