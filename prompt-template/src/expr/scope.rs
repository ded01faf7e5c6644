use serde_json::Value;

use crate::bindings::Bindings;

/// One `{{#each}}` iteration: `item`/`this` and `index`.
#[derive(Clone, Debug)]
pub struct Frame {
    item: Value,
    index: Value,
}

impl Frame {
    pub fn new(item: Value, index: usize) -> Self {
        Self {
            item,
            index: Value::from(index),
        }
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        match name {
            "item" | "this" => Some(&self.item),
            "index" => Some(&self.index),
            _ => None,
        }
    }
}

/// Bindings plus the stack of enclosing loop frames, innermost last.
#[derive(Debug)]
pub struct Scope<'a> {
    bindings: &'a Bindings,
    frames: Vec<Frame>,
}

impl<'a> Scope<'a> {
    pub fn new(bindings: &'a Bindings) -> Self {
        Self {
            bindings,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|f| f.lookup(name))
            .or_else(|| self.bindings.lookup(name))
    }
}
