use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mutation::{self, Key};
use crate::observer::observe;
use crate::value::Value;
use crate::watcher::{Expr, WatchOptions, Watcher};

/// Owns a root data value and makes it observable.
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use ripple_core::*;
///
/// let data: Object = [("count", 0)].into_iter().collect();
/// let vm = Instance::new(data);
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = seen.clone();
/// vm.watch("count", move |new, old| log.borrow_mut().push((new.clone(), old.clone())), WatchOptions::new())
///     .unwrap();
///
/// vm.set(vm.data(), "count", 5).unwrap();
/// assert_eq!(*seen.borrow(), vec![(Value::from(5), Value::from(0))]);
/// ```
#[derive(Debug)]
pub struct Instance {
    data: Value,
    config: Config,
}

impl Instance {
    pub fn new(data: impl Into<Value>) -> Self {
        Self::with_config(data, Config::default())
    }

    pub fn with_config(data: impl Into<Value>, config: Config) -> Self {
        let data = data.into();
        observe(&data);
        Self { data, config }
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Subscribes `callback` to `expr`, evaluated against [`Instance::data`].
    ///
    /// Fails with [`Error::UnresolvablePath`] before subscribing anything if
    /// a path expression is malformed. With `immediate`, the callback also
    /// runs once right away with `(current, Undefined)`; a panic there is
    /// reported to the configured error handler and the watch stays live.
    pub fn watch(
        &self,
        expr: impl Into<Expr>,
        callback: impl Fn(&Value, &Value) + 'static,
        options: WatchOptions,
    ) -> Result<Unwatch> {
        let watcher = Watcher::new(
            self.data.clone(),
            expr,
            callback,
            options,
            self.config.clone(),
        )?;
        if options.immediate {
            let value = watcher.value();
            let callback = watcher.callback();
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| callback(&value, &Value::Undefined))) {
                self.config.report(Error::ImmediateCallback {
                    expression: watcher.expression().to_owned(),
                    message: panic_message(panic),
                });
            }
        }
        Ok(Unwatch { watcher })
    }

    /// See [`mutation::set`].
    pub fn set(&self, target: &Value, key: impl Into<Key>, value: impl Into<Value>) -> Result<Value> {
        mutation::set(target, key, value)
    }

    /// See [`mutation::delete`].
    pub fn delete(&self, target: &Value, key: impl Into<Key>) -> Result<()> {
        mutation::delete(target, key)
    }

    /// Reads `data.key`, tracked like any other read.
    pub fn get(&self, key: &str) -> Value {
        self.data.member(key)
    }

    /// Plain assignment to `data.key`: notifies through an existing cell and
    /// never adds a reactive key.
    pub fn assign(&self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        match &self.data {
            Value::Object(obj) => {
                obj.assign(key.to_string(), value);
                Ok(())
            }
            Value::Array(arr) => {
                let index = key.as_index().ok_or_else(|| Error::InvalidIndex {
                    key: key.to_string(),
                })?;
                arr.assign(index, value)
            }
            _ => Err(Error::NotAContainer {
                key: key.to_string(),
            }),
        }
    }
}

/// Handle returned by [`Instance::watch`].
///
/// Dropping it keeps the watcher alive; call [`Unwatch::unwatch`] to stop it.
#[derive(Clone, Debug)]
pub struct Unwatch {
    watcher: Rc<Watcher>,
}

impl Unwatch {
    /// Tears the watcher down. Runs at most once (safe to call multiple times).
    pub fn unwatch(&self) {
        self.watcher.teardown();
    }

    pub fn watcher(&self) -> &Rc<Watcher> {
        &self.watcher
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    }
}
