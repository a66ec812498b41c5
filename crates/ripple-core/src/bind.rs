//! One path bound to one text output: the smallest useful consumer of the
//! core, and the shape mount layers build on.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::instance::{Instance, Unwatch};
use crate::value::Value;
use crate::watcher::WatchOptions;

/// Something that displays text, such as an element's text content.
pub trait TextSink {
    fn set_text(&self, text: &str);
}

impl TextSink for RefCell<String> {
    fn set_text(&self, text: &str) {
        let mut buf = self.borrow_mut();
        buf.clear();
        buf.push_str(text);
    }
}

impl<T: TextSink + ?Sized> TextSink for Rc<T> {
    fn set_text(&self, text: &str) {
        (**self).set_text(text)
    }
}

impl Instance {
    /// Observes `data` and keeps `sink` showing the value at `expression`.
    ///
    /// The sink is written once right away and again after every change.
    pub fn mount(
        data: impl Into<Value>,
        sink: impl TextSink + 'static,
        expression: &str,
    ) -> Result<(Instance, Unwatch)> {
        let instance = Instance::new(data);
        let sink = Rc::new(sink);
        let unwatch = instance.watch(
            expression,
            {
                let sink = sink.clone();
                move |value, _old| sink.set_text(&value.to_string())
            },
            WatchOptions::default(),
        )?;
        sink.set_text(&unwatch.watcher().value().to_string());
        Ok((instance, unwatch))
    }
}
