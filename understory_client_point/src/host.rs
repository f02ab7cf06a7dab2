// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the tracker and the UI toolkit that embeds it.

use alloc::boxed::Box;
use core::fmt;

use crate::anchor::{Measurable, PositionReference};

/// Collaborators the tracker needs from its host toolkit.
///
/// The host owns the real elements, the window-level event plumbing, and the
/// placement engine. The tracker never stores a borrow of the host; every
/// operation receives it explicitly.
pub trait Host {
    /// Handle to a measurable element (reference or floating).
    type Element: Measurable + Clone;
    /// Event target reported by window-level pointer events.
    type Target;
    /// Window that owns an element; listeners are attached here.
    type Window;
    /// Registration of a window-level pointer-move listener.
    ///
    /// Dropping the value must remove the listener. [`ListenerGuard`] is a
    /// ready-made implementation.
    type Listener;

    /// The floating element, while it is mounted.
    fn floating(&self) -> Option<Self::Element>;

    /// The real reference element, if any.
    fn reference(&self) -> Option<Self::Element>;

    /// Window owning `node`, or the default window when there is no node.
    fn window_of(&self, node: Option<&Self::Element>) -> Self::Window;

    /// Start delivering pointer moves on `window` to
    /// [`ClientPointTracker::handle_window_move`](crate::ClientPointTracker::handle_window_move).
    fn listen_pointer_move(&mut self, window: &Self::Window) -> Self::Listener;

    /// Whether `target` lies within `floating` (including `floating` itself).
    fn contains(&self, floating: &Self::Element, target: &Self::Target) -> bool;

    /// Point the placement engine at a new reference.
    fn set_position_reference(&mut self, reference: PositionReference<Self::Element>);
}

/// Listener registration that runs a release callback when dropped.
pub struct ListenerGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl ListenerGuard {
    /// Wrap the callback that unregisters the listener.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Drop the registration without running the release callback.
    ///
    /// Use when the host has already torn the listener down itself.
    pub fn forget(mut self) {
        self.release = None;
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}
