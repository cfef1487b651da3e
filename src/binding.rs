use std::cell::RefCell;
use std::rc::Rc;

/// On-screen point in presentation coordinates. The core never interprets it;
/// layout writes it and the completion callback reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Shared mutable label slot. The presentation layer owns the text; the
/// completion callback may rewrite it synchronously, and the state machine
/// never touches it afterwards.
#[derive(Debug, Clone, Default)]
pub struct LabelBinding(Rc<RefCell<String>>);

impl LabelBinding {
    pub fn new(text: impl Into<String>) -> Self {
        Self(Rc::new(RefCell::new(text.into())))
    }

    pub fn get(&self) -> String {
        self.0.borrow().clone()
    }

    pub fn set(&self, text: impl Into<String>) {
        *self.0.borrow_mut() = text.into();
    }

    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut String) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}
