pub use crate::array::Array;
pub use crate::bind::TextSink;
pub use crate::config::Config;
pub use crate::error::*;
pub use crate::instance::{Instance, Unwatch};
pub use crate::mutation::{Key, delete, set};
pub use crate::object::Object;
pub use crate::value::Value;
pub use crate::watcher::{Expr, WatchOptions};
