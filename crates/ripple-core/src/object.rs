//! Keyed containers and their reactive cells.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::dep::Dep;
use crate::observer::{self, Observer};
use crate::value::Value;

/// Shared handle to an insertion-ordered map of properties.
///
/// Properties created while the object is observed (or through
/// [`crate::set`]) are reactive cells: reading them through [`Object::get`]
/// subscribes the evaluating watcher, and [`Object::assign`] notifies it.
/// Anything else is a plain property.
#[derive(Clone, Default)]
pub struct Object(Rc<Inner>);

#[derive(Default)]
struct Inner {
    props: RefCell<IndexMap<String, Property>>,
    observer: RefCell<Option<Observer>>,
}

pub(crate) struct Property {
    pub(crate) value: Value,
    /// `None` for plain properties.
    pub(crate) dep: Option<Dep>,
    pub(crate) child: Option<Observer>,
}

impl Property {
    fn plain(value: Value) -> Self {
        Self {
            value,
            dep: None,
            child: None,
        }
    }
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn observer(&self) -> Option<Observer> {
        self.0.observer.borrow().clone()
    }

    /// Observes this object, returning the existing record if there is one.
    pub fn observe(&self) -> Observer {
        if let Some(ob) = self.observer() {
            return ob;
        }
        let ob = Observer::new();
        *self.0.observer.borrow_mut() = Some(ob.clone());
        for (key, value) in self.entries() {
            observer::define_reactive(self, key, value);
        }
        ob
    }

    /// Reads a property, subscribing the evaluating watcher to it.
    pub fn get(&self, key: &str) -> Value {
        let (value, dep, child) = {
            let props = self.0.props.borrow();
            match props.get(key) {
                Some(p) => (p.value.clone(), p.dep.clone(), p.child.clone()),
                None => return Value::Undefined,
            }
        };
        if let Some(dep) = dep {
            dep.depend();
            if let Some(child) = child {
                child.dep().depend();
            }
        }
        value
    }

    /// Reads a property without subscribing anyone.
    pub fn peek(&self, key: &str) -> Value {
        self.0
            .props
            .borrow()
            .get(key)
            .map(|p| p.value.clone())
            .unwrap_or_default()
    }

    /// Plain assignment.
    ///
    /// A reactive cell ignores strictly equal values, otherwise it observes
    /// the new value and notifies its subscribers before returning. Plain
    /// properties and unknown keys are written silently; an unknown key
    /// becomes a plain property, use [`crate::set`] to add a reactive one.
    pub fn assign(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let dep = {
            let mut props = self.0.props.borrow_mut();
            match props.get_mut(&key) {
                Some(p) => match &p.dep {
                    Some(dep) if !p.value.same(&value) => {
                        p.value = value.clone();
                        dep.clone()
                    }
                    Some(_) => return,
                    None => {
                        p.value = value;
                        return;
                    }
                },
                None => {
                    props.insert(key, Property::plain(value));
                    return;
                }
            }
        };
        let child = observer::observe(&value);
        if let Some(p) = self.0.props.borrow_mut().get_mut(&key) {
            p.child = child;
        }
        dep.notify();
    }

    /// Removes a property without notifying anyone.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.0.props.borrow_mut().shift_remove(key).map(|p| p.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.props.borrow().contains_key(key)
    }

    /// Whether `key` is backed by a reactive cell.
    pub fn is_reactive(&self, key: &str) -> bool {
        self.dep(key).is_some()
    }

    /// The subscriber list of the cell behind `key`.
    pub fn dep(&self, key: &str) -> Option<Dep> {
        self.0.props.borrow().get(key).and_then(|p| p.dep.clone())
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.props.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.props.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.props.borrow().is_empty()
    }

    /// Untracked snapshot of every key and value, in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .props
            .borrow()
            .iter()
            .map(|(k, p)| (k.clone(), p.value.clone()))
            .collect()
    }

    pub(crate) fn install(&self, key: String, value: Value, dep: Dep, child: Option<Observer>) {
        self.0.props.borrow_mut().insert(
            key,
            Property {
                value,
                dep: Some(dep),
                child,
            },
        );
    }
}

impl<K, V> FromIterator<(K, V)> for Object
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let obj = Object::new();
        {
            let mut props = obj.0.props.borrow_mut();
            for (k, v) in iter {
                props.insert(k.into(), Property::plain(v.into()));
            }
        }
        obj
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_object_is_not_reactive() {
        let obj: Object = [("a", 1)].into_iter().collect();
        assert!(obj.contains_key("a"));
        assert!(!obj.is_reactive("a"));
        assert!(obj.observer().is_none());

        obj.assign("a", 2);
        obj.assign("b", 3);
        assert_eq!(obj.peek("a"), Value::from(2));
        assert_eq!(obj.keys(), vec!["a", "b"]);
    }

    #[test]
    fn test_observe_installs_cells() {
        let obj: Object = [("a", 1), ("b", 2)].into_iter().collect();
        let ob = obj.observe();
        assert!(obj.is_reactive("a"));
        assert!(obj.is_reactive("b"));
        assert!(ob.ptr_eq(&obj.observe()));
    }

    #[test]
    fn test_assign_after_observe_adds_plain_property() {
        let obj: Object = [("a", 1)].into_iter().collect();
        obj.observe();
        obj.assign("late", true);
        assert!(!obj.is_reactive("late"));
        assert_eq!(obj.get("late"), Value::from(true));
    }

    #[test]
    fn test_remove_keeps_order() {
        let obj: Object = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        assert_eq!(obj.remove("b"), Some(Value::from(2)));
        assert_eq!(obj.remove("b"), None);
        assert_eq!(obj.keys(), vec!["a", "c"]);
        assert_eq!(obj.get("b"), Value::Undefined);
    }
}
