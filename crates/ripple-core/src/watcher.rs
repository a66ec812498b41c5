use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::config::Config;
use crate::dep::{Dep, DepId};
use crate::error::{Error, Result};
use crate::path::{Path, parse_path};
use crate::runtime::{self, EvalFrame, UpdateDepth, WatcherId};
use crate::traverse::traverse;
use crate::value::Value;

/// Called with `(new, old)` after every re-evaluation.
pub type Callback = Rc<dyn Fn(&Value, &Value)>;

pub type GetterFn = Rc<dyn Fn(&Value) -> Value>;

/// What a watcher evaluates against its root data.
#[derive(Clone)]
pub enum Expr {
    /// A dot-delimited path, e.g. `"user.name"`.
    Path(String),
    /// Any function of the root; every cell it reads becomes a dependency.
    Getter(GetterFn),
}

impl Expr {
    pub fn getter(f: impl Fn(&Value) -> Value + 'static) -> Self {
        Expr::Getter(Rc::new(f))
    }
}

impl From<&str> for Expr {
    fn from(path: &str) -> Self {
        Expr::Path(path.to_owned())
    }
}

impl From<String> for Expr {
    fn from(path: String) -> Self {
        Expr::Path(path)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Path(p) => f.debug_tuple("Path").field(p).finish(),
            Expr::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WatchOptions {
    /// Also depend on everything reachable from the watched value.
    pub deep: bool,
    /// Call the callback once with the current value when subscribing.
    pub immediate: bool,
}

impl WatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }
}

enum Getter {
    Path(Path),
    Func(GetterFn),
}

/// A derivation node.
///
/// Evaluating the getter subscribes the watcher to every cell it reads; a
/// notification from any of them re-evaluates and fires the callback.
/// Dependencies only ever accumulate until [`Watcher::teardown`]: a cell the
/// getter stopped reading keeps triggering updates.
pub struct Watcher {
    id: WatcherId,
    expression: String,
    root: Value,
    getter: Getter,
    callback: Callback,
    deep: bool,
    config: Config,
    value: RefCell<Value>,
    deps: RefCell<Vec<Dep>>,
    dep_ids: RefCell<HashSet<DepId>>,
    active: Cell<bool>,
}

impl Watcher {
    /// Registers a watcher and evaluates it once. The callback does not run
    /// for this first evaluation.
    pub fn new(
        root: Value,
        expr: impl Into<Expr>,
        callback: impl Fn(&Value, &Value) + 'static,
        options: WatchOptions,
        config: Config,
    ) -> Result<Rc<Watcher>> {
        let (expression, getter) = match expr.into() {
            Expr::Path(path) => match parse_path(&path) {
                Some(compiled) => (path, Getter::Path(compiled)),
                None => return Err(Error::UnresolvablePath { path }),
            },
            Expr::Getter(f) => ("<getter>".to_owned(), Getter::Func(f)),
        };
        let callback: Callback = Rc::new(callback);
        let watcher = runtime::insert_watcher(|id| Watcher {
            id,
            expression,
            root,
            getter,
            callback,
            deep: options.deep,
            config,
            value: RefCell::new(Value::Undefined),
            deps: RefCell::new(Vec::new()),
            dep_ids: RefCell::new(HashSet::new()),
            active: Cell::new(true),
        });
        log::debug!(
            "watcher {:?} created for \"{}\" (deep: {})",
            watcher.id,
            watcher.expression,
            watcher.deep
        );
        let value = watcher.get();
        *watcher.value.borrow_mut() = value;
        Ok(watcher)
    }

    /// Evaluates the getter while collecting dependencies.
    pub fn get(self: &Rc<Self>) -> Value {
        let _frame = EvalFrame::enter(self.clone());
        let value = match &self.getter {
            Getter::Path(path) => path.resolve(&self.root),
            Getter::Func(f) => f(&self.root),
        };
        if self.deep {
            traverse(&value);
        }
        value
    }

    /// Subscribes to `dep` unless already subscribed.
    pub fn add_dep(&self, dep: &Dep) {
        if !self.active.get() {
            return;
        }
        if self.dep_ids.borrow_mut().insert(dep.id()) {
            self.deps.borrow_mut().push(dep.clone());
            dep.add(self.id);
            log::trace!("watcher {:?} depends on dep {}", self.id, dep.id());
        }
    }

    /// Re-evaluates and calls the callback with `(new, old)`.
    ///
    /// Runs even when the value did not change, so in-place mutations of a
    /// container reach the callback with `new` and `old` being the same
    /// container.
    pub fn update(self: &Rc<Self>) {
        if !self.active.get() {
            return;
        }
        let limit = self.config.update_depth_limit();
        let Some(_depth) = UpdateDepth::enter(limit) else {
            self.config.report(Error::UpdateDepthExceeded {
                expression: self.expression.clone(),
                limit: limit.unwrap_or_default(),
            });
            return;
        };
        let value = self.get();
        let old = self.value.replace(value.clone());
        (self.callback)(&value, &old);
    }

    /// Unsubscribes from every dependency. Safe to call more than once.
    pub fn teardown(&self) {
        if !self.active.replace(false) {
            return;
        }
        let deps = std::mem::take(&mut *self.deps.borrow_mut());
        for dep in deps.iter().rev() {
            dep.remove(self.id);
        }
        self.dep_ids.borrow_mut().clear();
        log::debug!("watcher {:?} for \"{}\" torn down", self.id, self.expression);
        runtime::remove_watcher(self.id);
    }

    pub fn id(&self) -> WatcherId {
        self.id
    }

    /// The path this watcher was created with, or `<getter>`.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The value cached by the last evaluation.
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    /// Ids of the deps this watcher is subscribed to, in subscription order.
    pub fn dep_ids(&self) -> Vec<DepId> {
        self.deps.borrow().iter().map(Dep::id).collect()
    }

    pub fn is_deep(&self) -> bool {
        self.deep
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub(crate) fn callback(&self) -> Callback {
        self.callback.clone()
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("id", &self.id)
            .field("expression", &self.expression)
            .field("deep", &self.deep)
            .field("active", &self.active.get())
            .field("deps", &self.dep_ids())
            .finish_non_exhaustive()
    }
}
