//! Tracked sequences.
//!
//! The seven mutators below are the only way to change an array's shape and
//! be noticed: once the array is observed, each of them runs the plain
//! operation, observes whatever it inserted and notifies the array's own dep.
//! Element reads are never tracked; watchers depend on an array through the
//! property that holds it.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::observer::{self, Observer};
use crate::value::Value;

/// Largest valid element index, `2^32 - 2`.
pub const MAX_INDEX: usize = 4_294_967_294;

#[derive(Clone, Default)]
pub struct Array(Rc<Inner>);

#[derive(Default)]
struct Inner {
    items: RefCell<Vec<Value>>,
    observer: RefCell<Option<Observer>>,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn observer(&self) -> Option<Observer> {
        self.0.observer.borrow().clone()
    }

    /// Observes this array and every element, once.
    pub fn observe(&self) -> Observer {
        if let Some(ob) = self.observer() {
            return ob;
        }
        let ob = Observer::new();
        *self.0.observer.borrow_mut() = Some(ob.clone());
        for item in self.to_vec() {
            observer::observe(&item);
        }
        ob
    }

    pub fn len(&self) -> usize {
        self.0.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.items.borrow().is_empty()
    }

    /// Element at `index`, or `Undefined` past the end.
    pub fn get(&self, index: usize) -> Value {
        self.0.items.borrow().get(index).cloned().unwrap_or_default()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.items.borrow().clone()
    }

    /// Raw index write. Grows the array with `Undefined` holes if needed and
    /// notifies nobody. Indexes above [`MAX_INDEX`] fail with
    /// [`Error::InvalidIndex`].
    pub fn assign(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let len = index
            .checked_add(1)
            .filter(|_| index <= MAX_INDEX)
            .ok_or_else(|| Error::InvalidIndex {
                key: index.to_string(),
            })?;
        let mut items = self.0.items.borrow_mut();
        if index >= items.len() {
            items.resize(len, Value::Undefined);
        }
        items[index] = value.into();
        Ok(())
    }

    /// Raw length write: truncates or pads with `Undefined`, notifies nobody.
    pub fn set_len(&self, len: usize) {
        self.0.items.borrow_mut().resize(len, Value::Undefined);
    }

    /// Appends `values`, returning the new length.
    pub fn push<I, V>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let inserted: Vec<Value> = values.into_iter().map(Into::into).collect();
        let len = {
            let mut items = self.0.items.borrow_mut();
            items.extend(inserted.iter().cloned());
            items.len()
        };
        self.mutated(&inserted);
        len
    }

    /// Removes the last element, or returns `Undefined` when empty.
    pub fn pop(&self) -> Value {
        let removed = self.0.items.borrow_mut().pop().unwrap_or_default();
        self.mutated(&[]);
        removed
    }

    /// Removes the first element, or returns `Undefined` when empty.
    pub fn shift(&self) -> Value {
        let removed = {
            let mut items = self.0.items.borrow_mut();
            if items.is_empty() {
                Value::Undefined
            } else {
                items.remove(0)
            }
        };
        self.mutated(&[]);
        removed
    }

    /// Prepends `values` in order, returning the new length.
    pub fn unshift<I, V>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let inserted: Vec<Value> = values.into_iter().map(Into::into).collect();
        let len = {
            let mut items = self.0.items.borrow_mut();
            items.splice(0..0, inserted.iter().cloned());
            items.len()
        };
        self.mutated(&inserted);
        len
    }

    /// Removes `delete_count` elements starting at `start` and inserts
    /// `values` in their place. Both bounds are clamped to the array.
    pub fn splice<I, V>(&self, start: usize, delete_count: usize, values: I) -> Vec<Value>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let inserted: Vec<Value> = values.into_iter().map(Into::into).collect();
        let removed = {
            let mut items = self.0.items.borrow_mut();
            let start = start.min(items.len());
            let end = start + delete_count.min(items.len() - start);
            items.splice(start..end, inserted.iter().cloned()).collect()
        };
        self.mutated(&inserted);
        removed
    }

    /// Sorts by display string, `Undefined` last.
    pub fn sort(&self) {
        self.sort_by(|a, b| {
            let (a, b) = (a.to_string(), b.to_string());
            a.encode_utf16().cmp(b.encode_utf16())
        });
    }

    /// Stable sort with a comparator. `Undefined` elements are kept at the
    /// end and never passed to `compare`.
    pub fn sort_by(&self, mut compare: impl FnMut(&Value, &Value) -> Ordering) {
        // The comparator may read this array, so sort outside the borrow.
        let items = std::mem::take(&mut *self.0.items.borrow_mut());
        let (mut defined, undefined): (Vec<Value>, Vec<Value>) =
            items.into_iter().partition(|v| !v.is_undefined());
        defined.sort_by(&mut compare);
        defined.extend(undefined);
        *self.0.items.borrow_mut() = defined;
        self.mutated(&[]);
    }

    pub fn reverse(&self) {
        self.0.items.borrow_mut().reverse();
        self.mutated(&[]);
    }

    fn mutated(&self, inserted: &[Value]) {
        let Some(ob) = self.observer() else {
            return;
        };
        for value in inserted {
            observer::observe(value);
        }
        ob.dep().notify();
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self(Rc::new(Inner {
            items: RefCell::new(items),
            observer: RefCell::new(None),
        }))
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(arr: &Array) -> Vec<f64> {
        arr.to_vec().iter().filter_map(Value::as_f64).collect()
    }

    #[test]
    fn test_native_results_are_preserved() {
        let arr: Array = [1, 2, 3].into_iter().collect();
        assert_eq!(arr.push([4, 5]), 5);
        assert_eq!(arr.pop(), Value::from(5));
        assert_eq!(arr.shift(), Value::from(1));
        assert_eq!(arr.unshift([0, 1]), 5);
        assert_eq!(nums(&arr), vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        let removed = arr.splice(1, 2, [9]);
        assert_eq!(removed, vec![Value::from(1), Value::from(2)]);
        assert_eq!(nums(&arr), vec![0.0, 9.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_removals_return_undefined() {
        let arr = Array::new();
        assert_eq!(arr.pop(), Value::Undefined);
        assert_eq!(arr.shift(), Value::Undefined);
        assert!(arr.splice(3, 10, Vec::<Value>::new()).is_empty());
    }

    #[test]
    fn test_splice_clamps_bounds() {
        let arr: Array = [1, 2, 3].into_iter().collect();
        let removed = arr.splice(1, 100, ["x"]);
        assert_eq!(removed.len(), 2);
        assert_eq!(arr.len(), 2);
        arr.splice(10, 0, ["end"]);
        assert_eq!(arr.get(2), Value::from("end"));
    }

    #[test]
    fn test_default_sort_is_lexicographic() {
        let arr: Array = [10, 9, 1, 100].into_iter().collect();
        arr.push([Value::Undefined]);
        arr.sort();
        assert_eq!(Value::from(arr.clone()).to_string(), "1,10,100,9,");
        assert!(arr.get(4).is_undefined());
    }

    #[test]
    fn test_sort_by_and_reverse() {
        let arr: Array = [3, 1, 2].into_iter().collect();
        arr.sort_by(|a, b| a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal));
        assert_eq!(nums(&arr), vec![1.0, 2.0, 3.0]);
        arr.reverse();
        assert_eq!(nums(&arr), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_raw_writes_pad_with_undefined() {
        let arr: Array = [1].into_iter().collect();
        arr.assign(3, "x").unwrap();
        assert_eq!(arr.len(), 4);
        assert!(arr.get(1).is_undefined());
        arr.set_len(2);
        assert_eq!(arr.len(), 2);
    }

    #[test]
    fn test_assign_rejects_out_of_range_index() {
        let arr: Array = [1].into_iter().collect();
        let err = arr.assign(usize::MAX, "x").unwrap_err();
        assert_eq!(err, Error::InvalidIndex { key: usize::MAX.to_string() });
        assert!(arr.assign(MAX_INDEX + 1, "x").is_err());
        assert_eq!(arr.len(), 1);
    }
}
