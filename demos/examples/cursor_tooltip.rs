// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tooltip that follows the cursor along the x axis of a button.
//!
//! This example shows how a toolkit embeds `understory_client_point`:
//! - implement `Host` over the toolkit's elements and window events,
//! - forward reference-element events listed by `reference_props`,
//! - forward window pointer moves while a listener is registered,
//! - measure whatever reference the tracker last assigned.
//!
//! Run:
//! - `RUST_LOG=understory_client_point=trace cargo run -p understory_client_point_demos --example cursor_tooltip`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use understory_client_point::{
    Axis, ClientPointTracker, EventKind, Host, ListenerGuard, Measurable, OpenEvent, OpenEventRef,
    PointerSample, PointerType, PositionReference, ReferenceEvent, TrackingConfig,
};

/// What a window-level pointer event landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Hit {
    Button,
    Tooltip,
    Elsewhere,
}

struct Scene {
    button: Rect,
    tooltip: Option<Rect>,
    reference: Option<PositionReference<Rect>>,
    listening: Rc<Cell<bool>>,
}

impl Host for Scene {
    type Element = Rect;
    type Target = Hit;
    type Window = ();
    type Listener = ListenerGuard;

    fn floating(&self) -> Option<Rect> {
        self.tooltip
    }

    fn reference(&self) -> Option<Rect> {
        Some(self.button)
    }

    fn window_of(&self, _node: Option<&Rect>) {}

    fn listen_pointer_move(&mut self, _window: &()) -> ListenerGuard {
        self.listening.set(true);
        let listening = self.listening.clone();
        ListenerGuard::new(move || listening.set(false))
    }

    fn contains(&self, _floating: &Rect, target: &Hit) -> bool {
        *target == Hit::Tooltip
    }

    fn set_position_reference(&mut self, reference: PositionReference<Rect>) {
        self.reference = Some(reference);
    }
}

impl Scene {
    /// Place the tooltip 8px below the anchor, as a placement engine would.
    fn layout_tooltip(&mut self) {
        if let (Some(reference), Some(tooltip)) = (&self.reference, self.tooltip) {
            let anchor = reference.bounding_client_rect();
            let origin = Point::new(anchor.x - tooltip.width() / 2.0, anchor.bottom + 8.0);
            self.tooltip = Some(Rect::from_origin_size(origin, tooltip.size()));
            println!("  anchor {anchor:?}");
            println!("  tooltip at ({:.1}, {:.1})", origin.x, origin.y);
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "understory_client_point=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut scene = Scene {
        button: Rect::new(40.0, 100.0, 240.0, 132.0),
        tooltip: None,
        reference: None,
        listening: Rc::new(Cell::new(false)),
    };
    let open_event = OpenEventRef::new();
    let config = TrackingConfig {
        axis: Axis::X,
        ..TrackingConfig::default()
    };
    let mut tracker = ClientPointTracker::new(&mut scene, config, false, open_event.clone());
    let mouse = |x, y| PointerSample::at(Point::new(x, y)).with_pointer_type(PointerType::Mouse);

    println!("hover the button at (60, 110)");
    tracker.handle_reference_event(&mut scene, ReferenceEvent::PointerEnter, mouse(60.0, 110.0));
    tracker.handle_reference_event(&mut scene, ReferenceEvent::MouseEnter, mouse(60.0, 110.0));

    println!("open");
    open_event.set(Some(OpenEvent::pointer(
        EventKind::MouseEnter,
        Point::new(60.0, 110.0),
    )));
    tracker.set_open(&mut scene, true);
    scene.tooltip = Some(Rect::new(0.0, 0.0, 80.0, 24.0));
    tracker.floating_changed(&mut scene);
    scene.layout_tooltip();

    for x in [90.0, 150.0, 210.0] {
        println!("move to ({x}, 118)");
        if scene.listening.get() {
            tracker.handle_window_move(&mut scene, mouse(x, 118.0), &Hit::Button);
        }
        scene.layout_tooltip();
    }

    println!("move onto the tooltip");
    tracker.handle_window_move(&mut scene, mouse(200.0, 145.0), &Hit::Tooltip);
    println!("  listening: {}", scene.listening.get());

    println!("move away while parked (ignored)");
    if scene.listening.get() {
        tracker.handle_window_move(&mut scene, mouse(400.0, 400.0), &Hit::Elsewhere);
    }
    scene.layout_tooltip();

    println!("back over the button");
    tracker.handle_reference_event(&mut scene, ReferenceEvent::MouseMove, mouse(120.0, 110.0));
    println!("  listening: {}", scene.listening.get());
    tracker.handle_window_move(&mut scene, mouse(120.0, 112.0), &Hit::Button);
    scene.layout_tooltip();

    println!("close");
    tracker.set_open(&mut scene, false);
    scene.tooltip = None;
    tracker.floating_changed(&mut scene);
    println!("  state: {:?}", tracker.state());
}
