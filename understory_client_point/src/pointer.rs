// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer input descriptions: device classification, samples, and the open event.

use alloc::rc::Rc;
use core::cell::Cell;

use kurbo::Point;

/// Kind of pointing device that produced an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerType {
    /// A mouse or trackpad.
    Mouse,
    /// A stylus.
    Pen,
    /// A finger on a touch surface.
    Touch,
}

/// Classify a device as "mouse-like", i.e. one that reports a continuous hover position.
///
/// Pens count as mouse-like because some platforms report mouse input as pen input.
/// Without `strict`, an unspecified device type is also treated as mouse-like.
pub fn is_mouse_like_pointer_type(pointer_type: Option<PointerType>, strict: bool) -> bool {
    match pointer_type {
        Some(PointerType::Mouse | PointerType::Pen) => true,
        Some(PointerType::Touch) => false,
        None => !strict,
    }
}

/// One pointer event's worth of data, as seen by the tracker.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    /// Pointer position in client coordinates.
    pub client: Point,
    /// Originating device, when the event carries one.
    pub pointer_type: Option<PointerType>,
}

impl PointerSample {
    /// A sample at `client` with no device information.
    pub const fn at(client: Point) -> Self {
        Self {
            client,
            pointer_type: None,
        }
    }

    /// Attach a device type.
    pub const fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = Some(pointer_type);
        self
    }
}

/// DOM event type of the interaction that opened the floating element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `mouseenter`
    MouseEnter,
    /// `mousemove`
    MouseMove,
    /// `mousedown`
    MouseDown,
    /// `click`
    Click,
    /// `pointerenter`
    PointerEnter,
    /// `pointerdown`
    PointerDown,
    /// `focus`
    Focus,
    /// `keydown`
    KeyDown,
    /// Anything else.
    Other,
}

/// The event that caused the floating element to open.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OpenEvent {
    /// Event type.
    pub kind: EventKind,
    /// Client coordinates, present for mouse and pointer events.
    pub client: Option<Point>,
}

impl OpenEvent {
    /// An event with client coordinates.
    pub const fn pointer(kind: EventKind, client: Point) -> Self {
        Self {
            kind,
            client: Some(client),
        }
    }

    /// An event without client coordinates (for example focus or a key press).
    pub const fn other(kind: EventKind) -> Self {
        Self { kind, client: None }
    }

    /// Whether the event carries client coordinates.
    pub const fn is_mouse_based(&self) -> bool {
        self.client.is_some()
    }

    /// Whether the event type is one that keeps following the cursor on later
    /// recomputation passes (`mouseenter` or `mousemove`).
    pub const fn tracks_pointer(&self) -> bool {
        matches!(self.kind, EventKind::MouseEnter | EventKind::MouseMove)
    }
}

/// Shared slot holding the current [`OpenEvent`].
///
/// The open-state owner writes it; the tracker and every virtual anchor read it
/// on demand, so an anchor built before opening still sees the event that
/// eventually opened the floating element. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct OpenEventRef(Rc<Cell<Option<OpenEvent>>>);

impl OpenEventRef {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current open event, if any.
    pub fn get(&self) -> Option<OpenEvent> {
        self.0.get()
    }

    /// Replace the open event.
    pub fn set(&self, event: Option<OpenEvent>) {
        self.0.set(event);
    }
}
