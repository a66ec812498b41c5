use std::fmt;
use std::rc::Rc;

use crate::error::Error;

/// Default bound on nested watcher updates.
pub const DEFAULT_MAX_UPDATE_DEPTH: usize = 100;

pub type ErrorHandler = Rc<dyn Fn(&Error)>;

/// Per-instance settings, shared by every watcher the instance creates.
///
/// ```rust
/// use ripple_core::Config;
///
/// let config = Config::default()
///     .max_update_depth(16)
///     .on_error(|err| eprintln!("{err}"));
/// assert_eq!(config.update_depth_limit(), Some(16));
/// ```
#[derive(Clone)]
pub struct Config {
    max_update_depth: Option<usize>,
    on_error: ErrorHandler,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_update_depth: Some(DEFAULT_MAX_UPDATE_DEPTH),
            on_error: Rc::new(log_error),
        }
    }
}

impl Config {
    /// Drops updates nested deeper than `limit` and reports
    /// [`Error::UpdateDepthExceeded`].
    pub fn max_update_depth(mut self, limit: usize) -> Self {
        self.max_update_depth = Some(limit);
        self
    }

    /// No depth guard: a callback that keeps writing to its own dependency
    /// recurses until the stack overflows.
    pub fn unbounded_updates(mut self) -> Self {
        self.max_update_depth = None;
        self
    }

    /// Receives errors that cannot be returned to a caller, such as a
    /// panicking immediate callback.
    pub fn on_error(mut self, handler: impl Fn(&Error) + 'static) -> Self {
        self.on_error = Rc::new(handler);
        self
    }

    pub fn update_depth_limit(&self) -> Option<usize> {
        self.max_update_depth
    }

    pub fn report(&self, err: Error) {
        (self.on_error)(&err);
    }
}

fn log_error(err: &Error) {
    log::error!("{err}");
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("max_update_depth", &self.max_update_depth)
            .finish_non_exhaustive()
    }
}
