//! Conversions between reactive data and `serde_json` values.

use serde_json::{Map, Number, Value as Json};

use crate::array::Array;
use crate::object::Object;
use crate::value::Value;

/// Builds fresh, unobserved containers.
impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::from(s),
            Json::Array(items) => Value::Array(items.into_iter().collect::<Array>()),
            Json::Object(map) => Value::Object(map.into_iter().collect::<Object>()),
        }
    }
}

impl Value {
    /// Untracked snapshot of this value.
    ///
    /// `Undefined` array elements and non-finite numbers become `null`;
    /// `Undefined` object members are left out.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => number(*n),
            Value::String(s) => Json::String(s.to_string()),
            Value::Array(arr) => Json::Array(arr.to_vec().iter().map(Value::to_json).collect()),
            Value::Object(obj) => {
                let mut map = Map::new();
                for (key, value) in obj.entries() {
                    if !value.is_undefined() {
                        map.insert(key, value.to_json());
                    }
                }
                Json::Object(map)
            }
        }
    }
}

fn number(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_builds_unobserved_tree() {
        let value = Value::from(json!({ "a": { "b": [1, 2] }, "s": "x", "n": null }));
        let obj = value.as_object().unwrap();
        assert!(obj.observer().is_none());
        assert_eq!(obj.keys(), vec!["a", "s", "n"]);
        assert_eq!(obj.peek("n"), Value::Null);

        let list = value.member("a").member("b");
        assert_eq!(list.as_array().map(Array::len), Some(2));
    }

    #[test]
    fn test_to_json_snapshot() {
        let data = json!({ "count": 3, "ratio": 0.5, "tags": ["a", "b"], "nested": { "ok": true } });
        let value = Value::from(data.clone());
        assert_eq!(value.to_json(), data);
    }

    #[test]
    fn test_to_json_drops_undefined_members() {
        let obj = Object::new();
        obj.assign("gone", Value::Undefined);
        obj.assign("nan", f64::NAN);
        let arr = Array::from(vec![Value::Undefined]);
        obj.assign("holes", arr);
        assert_eq!(Value::from(obj).to_json(), json!({ "nan": null, "holes": [null] }));
    }
}
