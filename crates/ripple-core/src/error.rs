use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A watch expression contained characters a path may not hold.
    #[error("failed watching path: \"{path}\" (watchers only accept simple dot-delimited paths)")]
    UnresolvablePath { path: String },

    #[error("callback for immediate watcher \"{expression}\" panicked: {message}")]
    ImmediateCallback { expression: String, message: String },

    /// A callback kept re-triggering its own watcher.
    #[error("watcher \"{expression}\" exceeded the maximum update depth of {limit}")]
    UpdateDepthExceeded { expression: String, limit: usize },

    #[error("cannot set or delete key `{key}` on a primitive value")]
    NotAContainer { key: String },

    #[error("`{key}` is not a valid array index")]
    InvalidIndex { key: String },
}
