//! `set` / `delete`: writes that the reactive cells alone cannot notice, such
//! as adding a key to an observed object or replacing an array element.

use std::fmt;

use crate::array::MAX_INDEX;
use crate::error::{Error, Result};
use crate::observer::define_reactive;
use crate::value::Value;

/// Names every plain object inherits. They never count as existing keys, so
/// `set` on them always installs a fresh reactive cell.
const BUILTIN_NAMES: &[&str] = &[
    "constructor",
    "hasOwnProperty",
    "isPrototypeOf",
    "propertyIsEnumerable",
    "toLocaleString",
    "toString",
    "valueOf",
    "__proto__",
    "__defineGetter__",
    "__defineSetter__",
    "__lookupGetter__",
    "__lookupSetter__",
];

/// An object key or an array index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// The array index this key denotes: a non-negative integer no larger
    /// than [`MAX_INDEX`], possibly written as a string (`"2"`, `"2.0"`,
    /// `"+2"`).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => (*i <= MAX_INDEX).then_some(*i),
            Key::Name(name) => {
                let n: f64 = name.trim().parse().ok()?;
                let valid = n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= MAX_INDEX as f64;
                valid.then_some(n as usize)
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_owned())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

/// Writes `target[key] = value` so that watchers notice, even when `key` is
/// new or `target` is an array. Returns the written value.
///
/// - array + index: grows the array if needed and splices the value in.
/// - existing key: plain assignment through the key's cell.
/// - unobserved object: plain assignment, nobody is notified.
/// - otherwise: installs a reactive cell and notifies the object's
///   structural dep.
pub fn set(target: &Value, key: impl Into<Key>, value: impl Into<Value>) -> Result<Value> {
    let key = key.into();
    let value = value.into();
    match target {
        Value::Array(arr) => {
            let index = key.as_index().ok_or_else(|| Error::InvalidIndex {
                key: key.to_string(),
            })?;
            arr.set_len(arr.len().max(index));
            arr.splice(index, 1, [value.clone()]);
            Ok(value)
        }
        Value::Object(obj) => {
            let name = key.to_string();
            if obj.contains_key(&name) && !BUILTIN_NAMES.contains(&name.as_str()) {
                obj.assign(name, value.clone());
                return Ok(value);
            }
            let Some(ob) = obj.observer() else {
                obj.assign(name, value.clone());
                return Ok(value);
            };
            log::debug!("set: adding reactive key `{name}`");
            define_reactive(obj, name, value.clone());
            ob.dep().notify();
            Ok(value)
        }
        _ => Err(Error::NotAContainer {
            key: key.to_string(),
        }),
    }
}

/// Removes `target[key]` so that watchers notice.
///
/// Array indexes are spliced out; object keys are removed and the object's
/// structural dep notified when the object is observed. Subscribers of the
/// removed cell itself are left in place. Missing keys are ignored.
pub fn delete(target: &Value, key: impl Into<Key>) -> Result<()> {
    let key = key.into();
    match target {
        Value::Array(arr) => {
            if let Some(index) = key.as_index() {
                arr.splice(index, 1, Vec::<Value>::new());
            }
            Ok(())
        }
        Value::Object(obj) => {
            let name = key.to_string();
            if obj.remove(&name).is_none() {
                return Ok(());
            }
            if let Some(ob) = obj.observer() {
                log::debug!("delete: removed key `{name}`");
                ob.dep().notify();
            }
            Ok(())
        }
        _ => Err(Error::NotAContainer {
            key: key.to_string(),
        }),
    }
}
