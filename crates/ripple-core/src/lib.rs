//! # Observed data, deps, and watchers
//!
//! Ripple turns plain data into data that reports its own changes. There are
//! three main pieces:
//!
//! - [`Dep`]: the subscriber list behind every reactive property, and behind
//!   every observed container's structure.
//! - [`Object`] / [`Array`]: container handles. Once observed, reading an
//!   object property subscribes the running watcher, assigning it notifies,
//!   and the array mutators notify the array's structural dep.
//! - [`Watcher`]: evaluates a path or a getter, collects every dep it
//!   touched, and calls its callback with `(new, old)` whenever one of them
//!   fires.
//!
//! ## Watching
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use ripple_core::*;
//!
//! let user: Object = [("name", "Jane")].into_iter().collect();
//! let data: Object = [("user", Value::from(user))].into_iter().collect();
//! let vm = Instance::new(data);
//!
//! let last = Rc::new(RefCell::new(String::new()));
//! let sink = last.clone();
//! let unwatch = vm
//!     .watch("user.name", move |new, _old| *sink.borrow_mut() = new.to_string(), WatchOptions::new())
//!     .unwrap();
//!
//! let user = vm.get("user");
//! user.as_object().unwrap().assign("name", "Doe");
//! assert_eq!(*last.borrow(), "Doe");
//!
//! unwatch.unwatch();
//! ```
//!
//! Everything is synchronous: the callback has already run when `assign`
//! returns.
//!
//! ## New keys and array slots
//!
//! Observation only instruments what exists at the time. A key added with
//! [`Object::assign`] later is a plain property, and writing an array slot
//! with [`Array::assign`] is invisible. Use [`set`] and [`delete`] (or the
//! same methods on [`Instance`]) for those:
//!
//! ```rust
//! use ripple_core::*;
//!
//! let vm = Instance::new(Object::new());
//! vm.set(vm.data(), "later", 1).unwrap();
//! assert!(vm.data().as_object().unwrap().is_reactive("later"));
//! ```
//!
//! ## Deep watchers
//!
//! `WatchOptions::new().deep(true)` subscribes to every property reachable
//! from the watched value, so nested writes fire the callback even though
//! the path only names the top-level key. In-place mutations report the same
//! container as both `new` and `old`.
//!
//! ## Evaluation stack
//!
//! The running watcher is tracked on a thread-local stack. A watcher that is
//! evaluated while another one is collecting dependencies hands tracking back
//! to the outer watcher when it finishes.

pub mod array;
pub mod bind;
pub mod config;
pub mod dep;
pub mod error;
pub mod instance;
#[cfg(feature = "serde")]
pub mod json;
pub mod mutation;
pub mod object;
pub mod observer;
pub mod path;
pub mod prelude;
pub mod runtime;
pub mod traverse;
pub mod value;
pub mod watcher;


pub use array::{Array, MAX_INDEX};
pub use bind::TextSink;
pub use config::{Config, DEFAULT_MAX_UPDATE_DEPTH, ErrorHandler};
pub use dep::{Dep, DepId};
pub use error::{Error, Result};
pub use instance::{Instance, Unwatch};
pub use mutation::{Key, delete, set};
pub use object::Object;
pub use observer::{Observer, define_reactive, observe};
pub use path::{Path, parse_path};
pub use runtime::{WatcherId, current_watcher, live_watchers};
pub use traverse::traverse;
pub use value::Value;
pub use watcher::{Callback, Expr, WatchOptions, Watcher};
