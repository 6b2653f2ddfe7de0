//! Per-task session binding.
//!
//! A [`SessionContext`] associates one test task with at most one session.
//! The context is owned by the task and passed explicitly; there is no
//! process-wide registry, so two tasks can never observe each other's
//! bindings.
//!
//! Rebinding replaces the previous handle without closing it, and
//! [`release`](SessionContext::release) only forgets the binding. Closing the
//! session with [`Session::quit`](crate::session::Session::quit) stays with
//! the caller.
//!
//! # Example
//!
//! ```
//! use tapline_core::registry::SessionContext;
//!
//! let mut ctx = SessionContext::new();
//! assert!(ctx.current().is_none());
//! ctx.bind(None); // no-op
//! assert!(ctx.current().is_none());
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::error::DriverError;
use crate::session::Session;

/// Holds the session bound to one execution context.
#[derive(Debug, Default)]
pub struct SessionContext {
    current: Option<Arc<Session>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `session` to this context.
    ///
    /// `None` leaves the current binding untouched.
    pub fn bind(&mut self, session: Option<Arc<Session>>) {
        if let Some(session) = session {
            debug!(session_id = %session.id(), "bind session");
            self.current = Some(session);
        }
    }

    /// The bound session, if any.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.clone()
    }

    /// The bound session, or [`DriverError::NoSession`].
    pub fn require(&self) -> Result<Arc<Session>, DriverError> {
        self.current.clone().ok_or(DriverError::NoSession)
    }

    /// Removes the binding and hands the session back.
    pub fn release(&mut self) -> Option<Arc<Session>> {
        let released = self.current.take();
        if let Some(session) = &released {
            debug!(session_id = %session.id(), "release session");
        }
        released
    }
}
