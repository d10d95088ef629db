//! [`ScriptedWriteBack`] test double.

use bearsync_core::{Error, MemorySource, Result, WriteBack};
use std::cell::RefCell;
use std::rc::Rc;

/// How a [`ScriptedWriteBack`] responds to overwrite requests.
#[derive(Debug, Clone)]
pub enum WriteBackMode {
    /// Apply the body to the shared source, like a working Bear.
    Apply(MemorySource),
    /// Fail every request with the given reason.
    Fail(String),
    /// Report success without changing anything.
    NoOp,
}

/// Records every overwrite request and responds according to its mode.
///
/// Clones share the call log, so a test can keep a handle while the engine
/// owns another.
#[derive(Debug, Clone)]
pub struct ScriptedWriteBack {
    mode: WriteBackMode,
    calls: Rc<RefCell<Vec<(String, String)>>>,
}

impl ScriptedWriteBack {
    pub fn new(mode: WriteBackMode) -> Self {
        Self {
            mode,
            calls: Rc::default(),
        }
    }

    pub fn applying(source: &MemorySource) -> Self {
        Self::new(WriteBackMode::Apply(source.clone()))
    }

    /// Every `(id, body)` requested so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }

    /// Identifiers requested so far, in order.
    pub fn called_ids(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(id, _)| id.clone()).collect()
    }
}

impl WriteBack for ScriptedWriteBack {
    fn request_overwrite(&self, id: &str, body: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push((id.to_string(), body.to_string()));

        match &self.mode {
            WriteBackMode::Apply(source) => {
                source.set_text(id, body);
                Ok(())
            }
            WriteBackMode::Fail(reason) => Err(Error::WriteBack {
                id: id.to_string(),
                reason: reason.clone(),
            }),
            WriteBackMode::NoOp => Ok(()),
        }
    }
}
