// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual anchors: synthetic measurable rectangles that stand in for a real
//! reference element.
//!
//! A [`VirtualAnchor`] is built around an optional backing element and a tracked
//! coordinate pair. Every call to [`VirtualAnchor::measure`] reads the backing
//! element's current (natural) rectangle and returns a rectangle pinned to the
//! tracked coordinates.
//!
//! ## Offsets
//!
//! The first time a tracked coordinate is available for an applicable axis, the
//! anchor records `offset = natural - tracked` on that axis. The offset is never
//! recaptured for the lifetime of the anchor. Passes that do not snap to the
//! tracked coordinate use `natural - offset` instead, so the anchor keeps moving in
//! lockstep with the backing element if layout shifts it.
//!
//! ## Passes
//!
//! A pass *follows the pointer* when it is the first measurement, or when the
//! open event was `mouseenter`/`mousemove` and the device is not touch. Following
//! passes place the anchor at the tracked coordinates; other passes keep it at the
//! offset-corrected position. Sizing is independent of the pass:
//!
//! | axis   | width          | height          |
//! |--------|----------------|-----------------|
//! | `X`    | 0              | natural height  |
//! | `Y`    | natural width  | 0               |
//! | `Both` | 0              | 0               |

use core::cell::Cell;

use kurbo::{Point, Rect};
use tracing::trace;

use crate::pointer::{OpenEventRef, PointerType};
use crate::types::{Axis, ClientRect};

/// Something whose client rectangle can be queried.
///
/// This is the contract the placement engine relies on: it calls
/// [`Measurable::bounding_client_rect`] on every recomputation pass.
pub trait Measurable {
    /// Current rectangle in client coordinates.
    fn bounding_client_rect(&self) -> ClientRect;
}

impl Measurable for Rect {
    fn bounding_client_rect(&self) -> ClientRect {
        ClientRect::from(*self)
    }
}

impl Measurable for ClientRect {
    fn bounding_client_rect(&self) -> ClientRect {
        *self
    }
}

/// Inputs fixed when an anchor is created.
#[derive(Clone, Debug, Default)]
pub struct AnchorOptions {
    /// Axes that follow the tracked coordinates.
    pub axis: Axis,
    /// Tracked horizontal coordinate.
    pub x: Option<f64>,
    /// Tracked vertical coordinate.
    pub y: Option<f64>,
    /// Device that produced the tracked coordinates.
    pub pointer_type: Option<PointerType>,
    /// Live view of the event that opened the floating element.
    pub open_event: OpenEventRef,
}

/// Correction state owned by one [`VirtualAnchor`].
///
/// Offsets are set at most once and never cleared; `measured` flips to `true`
/// after the first [`VirtualAnchor::measure`] call and stays there.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnchorState {
    /// Captured `natural.x - tracked.x`.
    pub offset_x: Option<f64>,
    /// Captured `natural.y - tracked.y`.
    pub offset_y: Option<f64>,
    /// Whether at least one measurement has happened.
    pub measured: bool,
}

/// A pointer-following stand-in for a reference element.
#[derive(Clone, Debug)]
pub struct VirtualAnchor<E> {
    context: Option<E>,
    options: AnchorOptions,
    state: Cell<AnchorState>,
}

impl<E> VirtualAnchor<E> {
    /// Create an anchor over an optional backing element.
    pub fn new(context: Option<E>, options: AnchorOptions) -> Self {
        Self {
            context,
            options,
            state: Cell::new(AnchorState::default()),
        }
    }

    /// The backing element, for consumers that need a real node (for example to
    /// find scroll ancestors).
    pub fn context_element(&self) -> Option<&E> {
        self.context.as_ref()
    }

    /// Creation options.
    pub fn options(&self) -> &AnchorOptions {
        &self.options
    }

    /// Snapshot of the correction state.
    pub fn state(&self) -> AnchorState {
        self.state.get()
    }

    /// Whether a non-first pass should still snap to the tracked coordinates.
    fn follows_pointer_on_update(&self) -> bool {
        self.options
            .open_event
            .get()
            .is_some_and(|event| event.tracks_pointer())
            && self.options.pointer_type != Some(PointerType::Touch)
    }
}

impl<E: Measurable> VirtualAnchor<E> {
    /// Compute the anchor rectangle for this recomputation pass.
    ///
    /// Never fails: a missing backing element measures as [`ClientRect::ZERO`].
    pub fn measure(&self) -> ClientRect {
        let natural = self
            .context
            .as_ref()
            .map_or(ClientRect::ZERO, Measurable::bounding_client_rect);
        let AnchorOptions { axis, x, y, .. } = self.options;
        let mut state = self.state.get();

        if state.offset_x.is_none() && axis.tracks_x() {
            state.offset_x = x.map(|x| natural.x - x);
        }
        if state.offset_y.is_none() && axis.tracks_y() {
            state.offset_y = y.map(|y| natural.y - y);
        }

        let base = Point::new(
            natural.x - state.offset_x.unwrap_or(0.0),
            natural.y - state.offset_y.unwrap_or(0.0),
        );
        let follow = !state.measured || self.follows_pointer_on_update();

        let (origin, width, height) = match (axis, follow) {
            (Axis::X, true) => (Point::new(x.unwrap_or(base.x), base.y), 0.0, natural.height),
            (Axis::X, false) => (base, 0.0, natural.height),
            (Axis::Y, true) => (Point::new(base.x, y.unwrap_or(base.y)), natural.width, 0.0),
            (Axis::Y, false) => (base, natural.width, 0.0),
            (Axis::Both, true) => (Point::new(x.unwrap_or(base.x), y.unwrap_or(base.y)), 0.0, 0.0),
            (Axis::Both, false) => (base, 0.0, 0.0),
        };

        state.measured = true;
        self.state.set(state);

        let rect = ClientRect::new(origin.x, origin.y, width, height);
        trace!(?rect, follow, "measured virtual anchor");
        rect
    }
}

impl<E: Measurable> Measurable for VirtualAnchor<E> {
    fn bounding_client_rect(&self) -> ClientRect {
        self.measure()
    }
}

/// What the placement engine should measure as the reference.
#[derive(Clone, Debug)]
pub enum PositionReference<E> {
    /// The real reference element.
    Element(E),
    /// A pointer-following virtual anchor.
    Virtual(VirtualAnchor<E>),
}

impl<E> PositionReference<E> {
    /// The virtual anchor, if this reference is one.
    pub fn as_virtual(&self) -> Option<&VirtualAnchor<E>> {
        match self {
            Self::Virtual(anchor) => Some(anchor),
            Self::Element(_) => None,
        }
    }
}

impl<E: Measurable> Measurable for PositionReference<E> {
    fn bounding_client_rect(&self) -> ClientRect {
        match self {
            Self::Element(element) => element.bounding_client_rect(),
            Self::Virtual(anchor) => anchor.measure(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointer::{EventKind, OpenEvent};

    /// An element whose natural rect can be moved between measurements.
    #[derive(Clone, Debug)]
    struct Moving(alloc::rc::Rc<Cell<Rect>>);

    impl Measurable for Moving {
        fn bounding_client_rect(&self) -> ClientRect {
            self.0.get().into()
        }
    }

    fn options(axis: Axis, x: Option<f64>, y: Option<f64>) -> AnchorOptions {
        AnchorOptions {
            axis,
            x,
            y,
            ..AnchorOptions::default()
        }
    }

    fn hover_open_event() -> OpenEventRef {
        let open_event = OpenEventRef::new();
        open_event.set(Some(OpenEvent::pointer(
            EventKind::MouseMove,
            Point::new(0.0, 0.0),
        )));
        open_event
    }

    #[test]
    fn no_backing_element_places_point_per_axis() {
        let both = VirtualAnchor::<Rect>::new(None, options(Axis::Both, Some(15.0), Some(25.0)));
        assert_eq!(both.measure(), ClientRect::new(15.0, 25.0, 0.0, 0.0));

        let x = VirtualAnchor::<Rect>::new(None, options(Axis::X, Some(15.0), Some(25.0)));
        assert_eq!(x.measure(), ClientRect::new(15.0, 0.0, 0.0, 0.0));

        let y = VirtualAnchor::<Rect>::new(None, options(Axis::Y, Some(15.0), Some(25.0)));
        assert_eq!(y.measure(), ClientRect::new(0.0, 25.0, 0.0, 0.0));
    }

    #[test]
    fn first_measure_captures_offsets_and_snaps_to_point() {
        let element = Rect::new(100.0, 50.0, 120.0, 60.0);
        let anchor = VirtualAnchor::new(
            Some(element),
            options(Axis::Both, Some(150.0), Some(80.0)),
        );

        assert_eq!(anchor.measure(), ClientRect::new(150.0, 80.0, 0.0, 0.0));
        assert_eq!(
            anchor.state(),
            AnchorState {
                offset_x: Some(-50.0),
                offset_y: Some(-30.0),
                measured: true,
            }
        );
    }

    #[test]
    fn repeated_measure_reuses_offsets() {
        let element = Rect::new(100.0, 50.0, 120.0, 60.0);
        let anchor = VirtualAnchor::new(
            Some(element),
            options(Axis::Both, Some(150.0), Some(80.0)),
        );

        let first = anchor.measure();
        let state = anchor.state();
        let second = anchor.measure();
        assert_eq!(first, second);
        assert_eq!(anchor.state(), state);
    }

    #[test]
    fn single_axis_exposes_cross_axis_size() {
        let element = Rect::new(100.0, 50.0, 120.0, 60.0);

        let x = VirtualAnchor::new(Some(element), options(Axis::X, Some(10.0), Some(20.0)));
        assert_eq!(x.measure(), ClientRect::new(10.0, 50.0, 0.0, 10.0));

        let y = VirtualAnchor::new(Some(element), options(Axis::Y, Some(10.0), Some(20.0)));
        assert_eq!(y.measure(), ClientRect::new(100.0, 20.0, 20.0, 0.0));
    }

    #[test]
    fn x_axis_ignores_tracked_y() {
        let element = Rect::new(100.0, 50.0, 120.0, 60.0);
        let a = VirtualAnchor::new(Some(element), options(Axis::X, Some(10.0), Some(20.0)));
        let b = VirtualAnchor::new(Some(element), options(Axis::X, Some(10.0), Some(999.0)));
        assert_eq!(a.measure().y, b.measure().y);
        assert_eq!(a.state().offset_y, None);
    }

    #[test]
    fn zero_coordinate_still_captures_offset() {
        let element = Rect::new(30.0, 40.0, 50.0, 60.0);
        let anchor = VirtualAnchor::new(Some(element), options(Axis::Both, Some(0.0), Some(0.0)));
        assert_eq!(anchor.measure(), ClientRect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(anchor.state().offset_x, Some(30.0));
        assert_eq!(anchor.state().offset_y, Some(40.0));
    }

    #[test]
    fn frozen_update_follows_element_not_pointer() {
        let rect = alloc::rc::Rc::new(Cell::new(Rect::new(100.0, 50.0, 120.0, 60.0)));
        // No open event: later passes are not trackable.
        let anchor = VirtualAnchor::new(
            Some(Moving(rect.clone())),
            options(Axis::Both, Some(150.0), Some(80.0)),
        );
        assert_eq!(anchor.measure().origin(), Point::new(150.0, 80.0));

        // Layout scrolls the element by (5, -10); the anchor moves with it.
        rect.set(Rect::new(105.0, 40.0, 125.0, 50.0));
        assert_eq!(anchor.measure(), ClientRect::new(155.0, 70.0, 0.0, 0.0));
    }

    #[test]
    fn trackable_update_keeps_snapping_to_pointer() {
        let rect = alloc::rc::Rc::new(Cell::new(Rect::new(100.0, 50.0, 120.0, 60.0)));
        let anchor = VirtualAnchor::new(
            Some(Moving(rect.clone())),
            AnchorOptions {
                pointer_type: Some(PointerType::Mouse),
                open_event: hover_open_event(),
                ..options(Axis::X, Some(150.0), Some(80.0))
            },
        );
        anchor.measure();

        rect.set(Rect::new(105.0, 40.0, 125.0, 55.0));
        // x stays on the pointer; y and height come from the element.
        assert_eq!(anchor.measure(), ClientRect::new(150.0, 40.0, 0.0, 15.0));
    }

    #[test]
    fn frozen_update_keeps_cross_axis_size_for_x() {
        let rect = alloc::rc::Rc::new(Cell::new(Rect::new(100.0, 50.0, 120.0, 60.0)));
        let anchor = VirtualAnchor::new(
            Some(Moving(rect.clone())),
            options(Axis::X, Some(10.0), Some(20.0)),
        );
        assert_eq!(anchor.measure(), ClientRect::new(10.0, 50.0, 0.0, 10.0));
        // Unchanged element: the frozen pass lands on the same rect.
        assert_eq!(anchor.measure(), ClientRect::new(10.0, 50.0, 0.0, 10.0));

        // offset_x = 90, so x = 105 - 90; y and height come from the element.
        rect.set(Rect::new(105.0, 40.0, 125.0, 55.0));
        assert_eq!(anchor.measure(), ClientRect::new(15.0, 40.0, 0.0, 15.0));
    }

    #[test]
    fn frozen_update_keeps_cross_axis_size_for_y() {
        let rect = alloc::rc::Rc::new(Cell::new(Rect::new(100.0, 50.0, 120.0, 60.0)));
        let anchor = VirtualAnchor::new(
            Some(Moving(rect.clone())),
            options(Axis::Y, Some(10.0), Some(20.0)),
        );
        assert_eq!(anchor.measure(), ClientRect::new(100.0, 20.0, 20.0, 0.0));
        assert_eq!(anchor.measure(), ClientRect::new(100.0, 20.0, 20.0, 0.0));

        // offset_y = 30, so y = 40 - 30; x and width come from the element.
        rect.set(Rect::new(105.0, 40.0, 125.0, 55.0));
        assert_eq!(anchor.measure(), ClientRect::new(105.0, 10.0, 20.0, 0.0));
    }

    #[test]
    fn trackable_update_keeps_snapping_to_pointer_for_y() {
        let rect = alloc::rc::Rc::new(Cell::new(Rect::new(100.0, 50.0, 120.0, 60.0)));
        let anchor = VirtualAnchor::new(
            Some(Moving(rect.clone())),
            AnchorOptions {
                pointer_type: Some(PointerType::Mouse),
                open_event: hover_open_event(),
                ..options(Axis::Y, Some(10.0), Some(20.0))
            },
        );
        assert_eq!(anchor.measure(), ClientRect::new(100.0, 20.0, 20.0, 0.0));

        rect.set(Rect::new(105.0, 40.0, 125.0, 55.0));
        // y stays on the pointer; x and width come from the element.
        assert_eq!(anchor.measure(), ClientRect::new(105.0, 20.0, 20.0, 0.0));
    }

    #[test]
    fn touch_device_does_not_track_on_update() {
        let element = Rect::new(100.0, 50.0, 120.0, 60.0);
        let anchor = VirtualAnchor::new(
            Some(element),
            AnchorOptions {
                pointer_type: Some(PointerType::Touch),
                open_event: hover_open_event(),
                ..options(Axis::Both, Some(150.0), Some(80.0))
            },
        );
        assert_eq!(anchor.measure().origin(), Point::new(150.0, 80.0));
        // The element did not move, so the frozen position equals the tracked point.
        assert_eq!(anchor.measure().origin(), Point::new(150.0, 80.0));
        assert!(!anchor.follows_pointer_on_update());
    }

    #[test]
    fn open_event_is_read_live() {
        let open_event = OpenEventRef::new();
        let anchor = VirtualAnchor::<Rect>::new(
            None,
            AnchorOptions {
                open_event: open_event.clone(),
                ..AnchorOptions::default()
            },
        );
        assert!(!anchor.follows_pointer_on_update());
        open_event.set(Some(OpenEvent::pointer(
            EventKind::MouseEnter,
            Point::new(1.0, 1.0),
        )));
        assert!(anchor.follows_pointer_on_update());
    }

    #[test]
    fn position_reference_delegates() {
        let element = Rect::new(1.0, 2.0, 4.0, 6.0);
        let real = PositionReference::Element(element);
        assert_eq!(real.bounding_client_rect(), ClientRect::new(1.0, 2.0, 3.0, 4.0));
        assert!(real.as_virtual().is_none());

        let virt = PositionReference::Virtual(VirtualAnchor::new(
            Some(element),
            options(Axis::Both, Some(9.0), Some(9.0)),
        ));
        assert_eq!(virt.bounding_client_rect(), ClientRect::new(9.0, 9.0, 0.0, 0.0));
        assert_eq!(
            virt.as_virtual().and_then(VirtualAnchor::context_element),
            Some(&element)
        );
    }
}
