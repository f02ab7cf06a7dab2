// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host used by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::anchor::{Measurable, PositionReference};
use crate::host::{Host, ListenerGuard};
use crate::types::ClientRect;

pub(crate) const REFERENCE_ID: u32 = 1;
pub(crate) const FLOATING_ID: u32 = 2;
pub(crate) const FLOATING_CHILD: u32 = 3;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node {
    pub(crate) id: u32,
    pub(crate) rect: Rect,
}

impl Measurable for Node {
    fn bounding_client_rect(&self) -> ClientRect {
        self.rect.into()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Listeners {
    active: u32,
    attached: u32,
}

#[derive(Debug)]
pub(crate) struct TestHost {
    pub(crate) reference: Option<Node>,
    pub(crate) floating: Option<Node>,
    pub(crate) references: Vec<PositionReference<Node>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl TestHost {
    pub(crate) fn new() -> Self {
        Self {
            reference: Some(Node {
                id: REFERENCE_ID,
                rect: Rect::new(100.0, 50.0, 120.0, 60.0),
            }),
            floating: None,
            references: Vec::new(),
            listeners: Rc::default(),
        }
    }

    pub(crate) fn mount_floating(&mut self) {
        self.floating = Some(Node {
            id: FLOATING_ID,
            rect: Rect::new(100.0, 70.0, 180.0, 110.0),
        });
    }

    pub(crate) fn unmount_floating(&mut self) {
        self.floating = None;
    }

    pub(crate) fn active_listeners(&self) -> u32 {
        self.listeners.borrow().active
    }

    pub(crate) fn attached_listeners(&self) -> u32 {
        self.listeners.borrow().attached
    }

    /// Measure the most recently assigned reference.
    pub(crate) fn last_rect(&self) -> Option<ClientRect> {
        self.references.last().map(Measurable::bounding_client_rect)
    }
}

impl Host for TestHost {
    type Element = Node;
    type Target = u32;
    type Window = u32;
    type Listener = ListenerGuard;

    fn floating(&self) -> Option<Node> {
        self.floating.clone()
    }

    fn reference(&self) -> Option<Node> {
        self.reference.clone()
    }

    fn window_of(&self, _node: Option<&Node>) -> u32 {
        0
    }

    fn listen_pointer_move(&mut self, _window: &u32) -> ListenerGuard {
        {
            let mut listeners = self.listeners.borrow_mut();
            listeners.active += 1;
            listeners.attached += 1;
        }
        let listeners = self.listeners.clone();
        ListenerGuard::new(move || listeners.borrow_mut().active -= 1)
    }

    fn contains(&self, floating: &Node, target: &u32) -> bool {
        floating.id == *target || (floating.id == FLOATING_ID && *target == FLOATING_CHILD)
    }

    fn set_position_reference(&mut self, reference: PositionReference<Node>) {
        self.references.push(reference);
    }
}
