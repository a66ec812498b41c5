use std::fmt;
use std::rc::Rc;

use crate::dep::Dep;
use crate::object::Object;
use crate::value::Value;

/// Observation record stamped on a container the first time it is observed.
///
/// Its dep carries structural changes: array mutations and keys added or
/// deleted through [`crate::set`] / [`crate::delete`].
#[derive(Clone)]
pub struct Observer(Rc<Inner>);

struct Inner {
    dep: Dep,
}

impl Observer {
    pub(crate) fn new() -> Self {
        Self(Rc::new(Inner { dep: Dep::new() }))
    }

    pub fn dep(&self) -> &Dep {
        &self.0.dep
    }

    pub fn ptr_eq(&self, other: &Observer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Observer").field(&self.0.dep).finish()
    }
}

/// Makes a container (and everything reachable from it) reactive.
///
/// Returns `None` for primitives. Observing twice returns the same record.
pub fn observe(value: &Value) -> Option<Observer> {
    match value {
        Value::Object(obj) => Some(obj.observe()),
        Value::Array(arr) => Some(arr.observe()),
        _ => None,
    }
}

/// Installs a reactive cell for `key` on `obj`, replacing whatever was there.
pub fn define_reactive(obj: &Object, key: impl Into<String>, value: Value) {
    let child = observe(&value);
    let dep = Dep::new();
    obj.install(key.into(), value, dep, child);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;

    #[test]
    fn test_primitives_are_not_observable() {
        assert!(observe(&Value::from(1)).is_none());
        assert!(observe(&Value::Null).is_none());
        assert!(observe(&Value::Undefined).is_none());
    }

    #[test]
    fn test_observe_is_idempotent() {
        let obj: Object = [("a", 1)].into_iter().collect();
        let value = Value::from(obj.clone());
        let first = observe(&value).unwrap();
        let dep_a = obj.dep("a").unwrap();

        let second = observe(&value).unwrap();
        assert!(first.ptr_eq(&second));
        // cells were not reinstalled
        assert_eq!(obj.dep("a").unwrap().id(), dep_a.id());
    }

    #[test]
    fn test_nested_containers_are_observed() {
        let inner: Object = [("b", 1)].into_iter().collect();
        let list: Array = [Value::from(inner.clone())].into_iter().collect();
        let root: Object = [("list", Value::from(list.clone()))].into_iter().collect();

        observe(&Value::from(root));
        assert!(list.observer().is_some());
        assert!(inner.is_reactive("b"));
    }

    #[test]
    fn test_cyclic_data_terminates() {
        let obj = Object::new();
        obj.assign("me", obj.clone());
        let ob = observe(&Value::from(obj.clone())).unwrap();
        assert!(obj.is_reactive("me"));
        assert!(ob.ptr_eq(&obj.observer().unwrap()));
    }

    #[test]
    fn test_define_reactive_links_child() {
        let obj = Object::new();
        let child = Array::new();
        define_reactive(&obj, "items", Value::from(child.clone()));
        assert!(obj.is_reactive("items"));
        assert!(child.observer().is_some());
    }
}
