//! Render context stack.
//!
//! [`InstanceStack`] is the plain LIFO. [`ContextStack`] puts it behind a
//! mutex so an engine can be shared with template functions, and hands out
//! [`FrameGuard`]s that pop their frame when dropped. A handler that returns
//! early, or a template render that fails, therefore still leaves the stack
//! balanced.
//!
//! The lock is only held for the push, the pop, or the copy made by
//! [`ContextStack::current`]. Nested expansion runs with the lock released.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::RenderInstance;
use crate::core::WydraError;

/// LIFO of render instances. Depth equals the current nesting depth.
#[derive(Debug, Default)]
pub struct InstanceStack {
    frames: Vec<RenderInstance>,
}

impl InstanceStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.frames.push(instance);
    }

    pub fn pop(&mut self) -> Option<RenderInstance> {
        self.frames.pop()
    }

    /// Innermost instance.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] outside of any handler.
    pub fn current(&self) -> Result<&RenderInstance, WydraError> {
        self.frames.last().ok_or(WydraError::EmptyStack)
    }

    pub fn current_mut(&mut self) -> Result<&mut RenderInstance, WydraError> {
        self.frames.last_mut().ok_or(WydraError::EmptyStack)
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Shared, lockable instance stack.
#[derive(Debug, Default)]
pub struct ContextStack {
    inner: Mutex<InstanceStack>,
}

impl ContextStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, InstanceStack> {
        // A panic inside a template function must not wedge the engine
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a frame; it is popped when the returned guard drops.
    #[must_use = "the frame is popped as soon as the guard is dropped"]
    pub fn push(&self, instance: RenderInstance) -> FrameGuard<'_> {
        let mut stack = self.lock();
        stack.push(instance);
        let depth = stack.depth();
        tracing::trace!("Pushed render frame, depth {}", depth);
        FrameGuard {
            stack: self,
            depth,
        }
    }

    /// Copy of the innermost instance.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] outside of any handler.
    pub fn current(&self) -> Result<RenderInstance, WydraError> {
        self.lock().current().cloned()
    }

    /// Run `f` against the innermost instance without copying it.
    ///
    /// `f` must not call back into the engine.
    ///
    /// # Errors
    ///
    /// Returns [`WydraError::EmptyStack`] outside of any handler.
    pub fn with_current<T>(&self, f: impl FnOnce(&RenderInstance) -> T) -> Result<T, WydraError> {
        let stack = self.lock();
        stack.current().map(f)
    }

    /// Record the rendered output on the innermost instance.
    pub(crate) fn set_result(&self, result: &str) {
        if let Ok(instance) = self.lock().current_mut() {
            instance.result = result.to_string();
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.lock().depth()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Pops its frame from the [`ContextStack`] on drop.
#[derive(Debug)]
pub struct FrameGuard<'a> {
    stack: &'a ContextStack,
    depth: usize,
}

impl FrameGuard<'_> {
    /// Stack depth including this frame.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self.stack.lock();
        debug_assert_eq!(stack.depth(), self.depth, "render frames popped out of order");
        stack.pop();
        tracing::trace!("Popped render frame, depth {}", stack.depth());
    }
}
