use std::collections::HashSet;

use crate::dep::DepId;
use crate::value::Value;

/// Touches every reactive cell reachable from `value` so the evaluating
/// watcher subscribes to all of them.
///
/// Observed containers are visited once each, so cyclic observed data stays
/// finite. Unobserved containers are walked but have no cells to touch.
pub fn traverse(value: &Value) {
    let mut seen = HashSet::new();
    walk(value, &mut seen);
}

fn walk(value: &Value, seen: &mut HashSet<DepId>) {
    if !value.is_container() {
        return;
    }
    if let Some(ob) = value.observer()
        && !seen.insert(ob.dep().id())
    {
        return;
    }
    match value {
        Value::Array(arr) => {
            for item in arr.to_vec().iter().rev() {
                walk(item, seen);
            }
        }
        Value::Object(obj) => {
            for key in obj.keys().iter().rev() {
                walk(&obj.get(key), seen);
            }
        }
        _ => {}
    }
}
