//! Rolling waveform trace buffer
//!
//! Bounded FIFO of plotted points forming the visible sweep. The x cursor
//! advances a fixed number of pixels per frame and wraps at the right edge;
//! rendering must skip the wrap seam, so segment iteration only yields pairs
//! whose x is strictly increasing.

use std::collections::VecDeque;

/// Horizontal pixels the sweep advances each frame.
pub const ADVANCE_SPEED: f32 = 2.6;

/// One plotted sample of the trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformPoint {
    pub x: f32,
    pub y: f32,
}

/// Bounded sweep buffer. Capacity is however many points fit across the
/// surface at the advance speed; the oldest point is evicted first.
#[derive(Debug, Clone)]
pub struct TraceBuffer {
    points: VecDeque<WaveformPoint>,
    capacity: usize,
    width: f32,
    advance: f32,
    cursor_x: f32,
}

impl TraceBuffer {
    pub fn new(width: f32) -> Self {
        Self::with_advance(width, ADVANCE_SPEED)
    }

    pub fn with_advance(width: f32, advance: f32) -> Self {
        let capacity = (width / advance).ceil() as usize;
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
            width,
            advance,
            cursor_x: 0.0,
        }
    }

    /// Append the next sample at the advancing (wrapping) x cursor.
    pub fn push(&mut self, y: f32) -> WaveformPoint {
        self.cursor_x = (self.cursor_x + self.advance) % self.width;
        let point = WaveformPoint { x: self.cursor_x, y };
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
        point
    }

    /// Consecutive point pairs with strictly increasing x. The pair that
    /// straddles the wrap seam is skipped so no line is drawn back across
    /// the full surface width.
    pub fn segments(&self) -> impl Iterator<Item = (WaveformPoint, WaveformPoint)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .filter(|(a, b)| b.x > a.x)
            .map(|(a, b)| (*a, *b))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
