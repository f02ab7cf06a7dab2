// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Client Point: keep a floating element anchored to the pointer.
//!
//! Tooltips, context menus, and popovers are usually positioned against a
//! reference element. This crate lets them be positioned against a *point*
//! instead: the pointer's client coordinates, or an explicitly supplied pair.
//!
//! It has two parts:
//!
//! - [`VirtualAnchor`]: a synthetic [`Measurable`] that a placement engine can
//!   query on every recomputation pass. It pins a zero-size rectangle (or a
//!   line, for single-axis tracking) to the tracked coordinates and keeps a small,
//!   explicit [`AnchorState`] so repeated measurements stay stable.
//! - [`ClientPointTracker`]: a state machine that decides when to build a new
//!   anchor, when to follow window-level pointer moves, and when to stop (the
//!   pointer *parked* on the floating element, tracking was disabled, or the
//!   element closed).
//!
//! The tracker talks to the surrounding toolkit through the [`Host`] trait:
//! element access, window resolution, listener registration, hit containment,
//! and the reference setter of the placement engine. Listener registrations are
//! RAII values; dropping one removes the listener, so the tracker never holds
//! more than one and releases it when dropped.
//!
//! This crate does not compute placements (flipping, collision, sizing). It only
//! decides *what* the placement engine measures.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_client_point::{AnchorOptions, Axis, ClientRect, VirtualAnchor};
//!
//! // A 20x10 reference element at (100, 50), tracked at (150, 80).
//! let reference = Rect::new(100.0, 50.0, 120.0, 60.0);
//! let anchor = VirtualAnchor::new(
//!     Some(reference),
//!     AnchorOptions {
//!         axis: Axis::X,
//!         x: Some(150.0),
//!         y: Some(80.0),
//!         ..AnchorOptions::default()
//!     },
//! );
//!
//! // Following only x: a vertical line spanning the reference height.
//! assert_eq!(anchor.measure(), ClientRect::new(150.0, 50.0, 0.0, 10.0));
//! ```
//!
//! See `demos/examples/cursor_tooltip.rs` for a host driving a [`ClientPointTracker`].
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` floating-point support for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod anchor;
mod host;
mod pointer;
#[cfg(test)]
mod test_host;
mod tracker;
mod types;

pub use anchor::{AnchorOptions, AnchorState, Measurable, PositionReference, VirtualAnchor};
pub use host::{Host, ListenerGuard};
pub use pointer::{
    EventKind, OpenEvent, OpenEventRef, PointerSample, PointerType, is_mouse_like_pointer_type,
};
pub use tracker::{
    ClientPointTracker, ReferenceEvent, ReferenceEvents, TrackingConfig, TrackingState,
};
pub use types::{Axis, ClientRect};
