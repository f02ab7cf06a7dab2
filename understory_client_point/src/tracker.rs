// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tracking controller: decides when to rebuild the virtual anchor and when
//! to follow pointer moves at the window level.
//!
//! ## States
//!
//! - [`TrackingState::Idle`]: nothing frozen, no listener. Hovering the reference
//!   while closed places a fresh anchor at the pointer.
//! - [`TrackingState::Locked`]: tracking was disabled while open. The current
//!   reference is frozen until the floating element closes, or tracking is
//!   enabled while no floating element is mounted, or explicit coordinates are
//!   supplied.
//! - [`TrackingState::Listening`]: a window-level pointer-move listener is
//!   registered. Each move outside the floating element rebuilds the anchor; a
//!   move onto the floating element *parks* the pointer and releases the listener.
//!
//! ## Inputs
//!
//! The host drives the tracker with direct calls:
//! [`set_open`](ClientPointTracker::set_open), [`set_enabled`](ClientPointTracker::set_enabled),
//! [`set_coords`](ClientPointTracker::set_coords), [`floating_changed`](ClientPointTracker::floating_changed),
//! [`handle_reference_event`](ClientPointTracker::handle_reference_event) for the events listed in
//! [`reference_props`](ClientPointTracker::reference_props), and
//! [`handle_window_move`](ClientPointTracker::handle_window_move) while a listener is registered.
//!
//! Each state change is applied in a fixed order: explicit coordinates first (so a
//! supplied point is placed before anything else observes the change), then the
//! lock rules, then listener activation. Listener activation only re-runs when one
//! of its inputs changed (open check, enabled, explicit coordinates, floating
//! element presence), or when the pointer re-enters the reference after parking.
//!
//! At most one listener is registered at a time: activation always drops the
//! previous registration before installing a new one, and dropping the tracker
//! releases it.

use core::fmt;
use core::marker::PhantomData;

use tracing::{debug, trace};

use crate::anchor::{AnchorOptions, PositionReference, VirtualAnchor};
use crate::host::Host;
use crate::pointer::{OpenEventRef, PointerSample, PointerType, is_mouse_like_pointer_type};
use crate::types::Axis;

bitflags::bitflags! {
    /// Reference-element events the tracker wants delivered.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ReferenceEvents: u8 {
        /// `pointerdown`: records the device type.
        const POINTER_DOWN  = 0b0000_0001;
        /// `pointerenter`: records the device type.
        const POINTER_ENTER = 0b0000_0010;
        /// `mousemove`: places or re-arms tracking.
        const MOUSE_MOVE    = 0b0000_0100;
        /// `mouseenter`: places or re-arms tracking.
        const MOUSE_ENTER   = 0b0000_1000;
    }
}

/// A single reference-element event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceEvent {
    /// `pointerdown`
    PointerDown,
    /// `pointerenter`
    PointerEnter,
    /// `mousemove`
    MouseMove,
    /// `mouseenter`
    MouseEnter,
}

impl ReferenceEvent {
    /// The flag for this event within [`ReferenceEvents`].
    pub const fn flag(self) -> ReferenceEvents {
        match self {
            Self::PointerDown => ReferenceEvents::POINTER_DOWN,
            Self::PointerEnter => ReferenceEvents::POINTER_ENTER,
            Self::MouseMove => ReferenceEvents::MOUSE_MOVE,
            Self::MouseEnter => ReferenceEvents::MOUSE_ENTER,
        }
    }
}

/// Tracker configuration.
///
/// `axis` is fixed for the tracker's lifetime; `enabled` and the explicit
/// coordinates change through [`ClientPointTracker::set_enabled`] and
/// [`ClientPointTracker::set_coords`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackingConfig {
    /// Whether tracking is active.
    pub enabled: bool,
    /// Axes that follow the pointer.
    pub axis: Axis,
    /// Explicit horizontal coordinate; overrides pointer tracking.
    pub x: Option<f64>,
    /// Explicit vertical coordinate; overrides pointer tracking.
    pub y: Option<f64>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            axis: Axis::Both,
            x: None,
            y: None,
        }
    }
}

impl TrackingConfig {
    /// Whether either explicit coordinate is set.
    pub const fn has_explicit_coords(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }
}

/// Coarse tracker state.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrackingState {
    /// Not frozen, not listening.
    Idle,
    /// Reference frozen; no anchor rebuilds until unlocked.
    Locked,
    /// A window-level pointer-move listener is registered.
    Listening,
}

/// Inputs of listener activation; a change re-runs it.
#[derive(Copy, Clone, Debug, PartialEq)]
struct ListenerDeps {
    open_check: bool,
    enabled: bool,
    x: Option<f64>,
    y: Option<f64>,
    floating: bool,
}

/// Keeps a floating element's position reference on the pointer.
pub struct ClientPointTracker<H: Host> {
    config: TrackingConfig,
    open: bool,
    open_event: OpenEventRef,
    pointer_type: Option<PointerType>,
    locked: bool,
    listener: Option<H::Listener>,
    deps: Option<ListenerDeps>,
    _host: PhantomData<fn() -> H>,
}

impl<H: Host> fmt::Debug for ClientPointTracker<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientPointTracker")
            .field("config", &self.config)
            .field("open", &self.open)
            .field("pointer_type", &self.pointer_type)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<H: Host> ClientPointTracker<H> {
    /// Activate tracking.
    ///
    /// `open_event` is the slot the open-state owner writes the opening event to.
    /// Write it before reporting the open transition through [`set_open`](Self::set_open)
    /// or [`floating_changed`](Self::floating_changed): listener activation reads it
    /// only when those inputs change.
    pub fn new(host: &mut H, config: TrackingConfig, open: bool, open_event: OpenEventRef) -> Self {
        let mut tracker = Self {
            config,
            open,
            open_event,
            pointer_type: None,
            locked: false,
            listener: None,
            deps: None,
            _host: PhantomData,
        };
        tracker.apply_explicit_coords(host);
        tracker.update_lock(host);
        tracker.sync_listener(host, false);
        tracker
    }

    /// Current configuration.
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Last device type seen on the reference element.
    pub fn pointer_type(&self) -> Option<PointerType> {
        self.pointer_type
    }

    /// Whether the reference is frozen.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether a pointer-move listener is registered.
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }

    /// Coarse state; a frozen reference reports [`TrackingState::Locked`] even while listening.
    pub fn state(&self) -> TrackingState {
        if self.locked {
            TrackingState::Locked
        } else if self.listener.is_some() {
            TrackingState::Listening
        } else {
            TrackingState::Idle
        }
    }

    /// Events the host should route from the reference element, or `None` while disabled.
    pub fn reference_props(&self) -> Option<ReferenceEvents> {
        self.config.enabled.then(ReferenceEvents::all)
    }

    /// The floating element opened or closed.
    ///
    /// The opening event must already be in the tracker's [`OpenEventRef`].
    pub fn set_open(&mut self, host: &mut H, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        if !open && self.locked {
            self.locked = false;
            debug!("closed; reference unlocked");
        }
        self.update_lock(host);
        self.sync_listener(host, false);
    }

    /// Enable or disable tracking.
    pub fn set_enabled(&mut self, host: &mut H, enabled: bool) {
        if self.config.enabled == enabled {
            return;
        }
        self.config.enabled = enabled;
        self.apply_explicit_coords(host);
        self.update_lock(host);
        self.sync_listener(host, false);
    }

    /// Replace the explicit coordinates.
    pub fn set_coords(&mut self, host: &mut H, x: Option<f64>, y: Option<f64>) {
        if self.config.x == x && self.config.y == y {
            return;
        }
        self.config.x = x;
        self.config.y = y;
        self.apply_explicit_coords(host);
        self.sync_listener(host, false);
    }

    /// The floating element was mounted, unmounted, or replaced.
    pub fn floating_changed(&mut self, host: &mut H) {
        self.update_lock(host);
        self.sync_listener(host, false);
    }

    /// Handle an event on the reference element.
    ///
    /// Ignored while disabled, since [`reference_props`](Self::reference_props) is `None` then.
    pub fn handle_reference_event(
        &mut self,
        host: &mut H,
        event: ReferenceEvent,
        sample: PointerSample,
    ) {
        if !self.config.enabled {
            return;
        }
        match event {
            ReferenceEvent::PointerDown | ReferenceEvent::PointerEnter => {
                self.pointer_type = sample.pointer_type;
                self.sync_listener(host, false);
            }
            ReferenceEvent::MouseMove | ReferenceEvent::MouseEnter => {
                if self.config.has_explicit_coords() {
                    return;
                }
                if !self.open {
                    self.set_reference(host, Some(sample.client.x), Some(sample.client.y));
                } else if self.listener.is_none() {
                    // Re-entered the reference after parking on the floating element.
                    self.sync_listener(host, true);
                }
            }
        }
    }

    /// Handle a window-level pointer move delivered through the registered listener.
    pub fn handle_window_move(&mut self, host: &mut H, sample: PointerSample, target: &H::Target) {
        if self.listener.is_none() {
            return;
        }
        let parked = host
            .floating()
            .is_some_and(|floating| host.contains(&floating, target));
        if parked {
            self.listener = None;
            debug!("pointer parked on floating element; listener released");
        } else {
            self.set_reference(host, Some(sample.client.x), Some(sample.client.y));
        }
    }

    fn apply_explicit_coords(&mut self, host: &mut H) {
        if self.config.enabled && self.config.has_explicit_coords() {
            self.locked = false;
            self.set_reference(host, self.config.x, self.config.y);
        }
    }

    fn update_lock(&mut self, host: &H) {
        if self.locked && self.config.enabled && host.floating().is_none() {
            self.locked = false;
            debug!("enabled without floating element; reference unlocked");
        }
        if !self.locked && !self.config.enabled && self.open {
            self.locked = true;
            debug!("disabled while open; reference locked");
        }
    }

    /// Mouse-like devices keep following while the floating element exists, even
    /// mid-close; other devices follow the open state strictly.
    fn open_check(&self, host: &H) -> bool {
        if is_mouse_like_pointer_type(self.pointer_type, false) {
            host.floating().is_some()
        } else {
            self.open
        }
    }

    fn set_reference(&mut self, host: &mut H, x: Option<f64>, y: Option<f64>) {
        if self.locked {
            trace!("reference locked; anchor not rebuilt");
            return;
        }
        if self
            .open_event
            .get()
            .is_some_and(|event| !event.is_mouse_based())
        {
            return;
        }
        let anchor = VirtualAnchor::new(
            host.reference(),
            AnchorOptions {
                axis: self.config.axis,
                x,
                y,
                pointer_type: self.pointer_type,
                open_event: self.open_event.clone(),
            },
        );
        trace!(?x, ?y, "virtual anchor rebuilt");
        host.set_position_reference(PositionReference::Virtual(anchor));
    }

    fn sync_listener(&mut self, host: &mut H, force: bool) {
        let deps = ListenerDeps {
            open_check: self.open_check(host),
            enabled: self.config.enabled,
            x: self.config.x,
            y: self.config.y,
            floating: host.floating().is_some(),
        };
        if !force && self.deps == Some(deps) {
            return;
        }
        self.deps = Some(deps);

        if self.listener.take().is_some() {
            debug!("pointer-move listener released");
        }
        if !deps.open_check || !deps.enabled || self.config.has_explicit_coords() {
            return;
        }

        match self.open_event.get() {
            Some(event) if !event.is_mouse_based() => {
                // Opened without a pointer (for example by focus): use the real element.
                if let Some(reference) = host.reference() {
                    debug!(kind = ?event.kind, "non-pointer open; tracking the reference element");
                    host.set_position_reference(PositionReference::Element(reference));
                }
            }
            _ if self.pointer_type == Some(PointerType::Touch) => {
                debug!("touch pointer; not following window moves");
            }
            _ => {
                let floating = host.floating();
                let window = host.window_of(floating.as_ref());
                self.listener = Some(host.listen_pointer_move(&window));
                debug!("pointer-move listener attached");
            }
        }
    }
}

impl<H: Host> Drop for ClientPointTracker<H> {
    fn drop(&mut self) {
        if self.listener.take().is_some() {
            debug!("tracker dropped; pointer-move listener released");
        }
    }
}
