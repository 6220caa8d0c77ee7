use crate::{FunctionError, FunctionInvoker, FunctionName, Result};
use serde_json::Value;
use std::cell::{Cell, RefCell};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub name: FunctionName,
    pub body: Value,
}

/// Records every invocation in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryInvoker {
    calls: RefCell<Vec<RecordedCall>>,
    fail: Cell<bool>,
}

impl MemoryInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail after it is recorded.
    pub fn failing() -> Self {
        let invoker = Self::default();
        invoker.fail.set(true);
        invoker
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, name: FunctionName) -> Vec<RecordedCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.name == name)
            .cloned()
            .collect()
    }
}

impl FunctionInvoker for MemoryInvoker {
    fn invoke(&self, name: FunctionName, body: &Value) -> Result<Value> {
        self.calls.borrow_mut().push(RecordedCall {
            name,
            body: body.clone(),
        });
        if self.fail.get() {
            return Err(FunctionError::Rejected {
                function: name.as_str().to_string(),
                message: "forced failure".to_string(),
            });
        }
        Ok(Value::Null)
    }
}
