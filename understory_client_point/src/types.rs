// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared geometry types: axis selection and client-space rectangles.

use kurbo::{Point, Rect};

/// Which axes of the pointer position an anchor follows.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Follow the horizontal position only; the anchor spans the reference height.
    X,
    /// Follow the vertical position only; the anchor spans the reference width.
    Y,
    /// Follow both coordinates; the anchor is a point.
    #[default]
    Both,
}

impl Axis {
    /// Whether the horizontal coordinate is tracked.
    pub const fn tracks_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    /// Whether the vertical coordinate is tracked.
    pub const fn tracks_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// A rectangle in client coordinates, shaped like a DOM `DOMRect`.
///
/// The edge fields are always derived from the origin and size:
/// `top = y`, `left = x`, `right = x + width`, `bottom = y + height`.
/// Construct values with [`ClientRect::new`] or from a [`kurbo::Rect`] to keep
/// them consistent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ClientRect {
    /// Horizontal origin.
    pub x: f64,
    /// Vertical origin.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Top edge; equal to `y`.
    pub top: f64,
    /// Right edge; equal to `x + width`.
    pub right: f64,
    /// Bottom edge; equal to `y + height`.
    pub bottom: f64,
    /// Left edge; equal to `x`.
    pub left: f64,
}

impl ClientRect {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Create a rectangle from its origin and size, deriving the edges.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y,
            right: x + width,
            bottom: y + height,
            left: x,
        }
    }

    /// The origin as a point.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Convert to a [`kurbo::Rect`] spanning the same area.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

impl From<Rect> for ClientRect {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

impl From<ClientRect> for Rect {
    fn from(rect: ClientRect) -> Self {
        rect.to_rect()
    }
}
