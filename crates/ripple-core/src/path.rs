//! Dot-delimited watch paths such as `user.address.city`.

use std::rc::Rc;

use crate::value::Value;

/// Letters allowed in a path besides ASCII letters and digits, `.`, `$`, `_`.
const UNICODE_LETTERS: &[(char, char)] = &[
    ('\u{00B7}', '\u{00B7}'),
    ('\u{00C0}', '\u{00D6}'),
    ('\u{00D8}', '\u{00F6}'),
    ('\u{00F8}', '\u{037D}'),
    ('\u{037F}', '\u{1FFF}'),
    ('\u{200C}', '\u{200D}'),
    ('\u{203F}', '\u{2040}'),
    ('\u{2070}', '\u{218F}'),
    ('\u{2C00}', '\u{2FEF}'),
    ('\u{3001}', '\u{D7FF}'),
    ('\u{F900}', '\u{FDCF}'),
    ('\u{FDF0}', '\u{FFFD}'),
];

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '.' | '$' | '_')
        || UNICODE_LETTERS
            .iter()
            .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// A compiled path. Cheap to clone and reusable across evaluations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    segments: Rc<[String]>,
}

impl Path {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walks the segments from `root`, reading object keys through their
    /// reactive cells. Stops with `Undefined` as soon as an intermediate value
    /// is falsy.
    pub fn resolve(&self, root: &Value) -> Value {
        let mut current = root.clone();
        for segment in self.segments.iter() {
            if !current.is_truthy() {
                return Value::Undefined;
            }
            current = current.member(segment);
        }
        current
    }
}

/// Compiles `path`, or returns `None` if it holds a disallowed character.
pub fn parse_path(path: &str) -> Option<Path> {
    if !path.chars().all(is_path_char) {
        return None;
    }
    Some(Path {
        segments: path.split('.').map(str::to_owned).collect(),
    })
}
