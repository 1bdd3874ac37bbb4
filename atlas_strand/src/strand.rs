// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The strand buffer itself.

use alloc::vec::Vec;
use core::ops::Range;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::predicate::intersects;
use crate::projection::Projection;

/// Number of `f64` values per record: `kind, x1, y1, x2, y2`.
pub const STRIDE: usize = 5;

/// Numeric type tag stored in the first slot of every record.
///
/// The tag is open-ended: [`Kind::HIDDEN`] and [`Kind::VISIBLE`] are the only
/// values this crate interprets, callers may use any other value for their own
/// purposes. Hidden records are skipped by [`Strand::bounds`] and
/// [`Strand::cull`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(pub u32);

impl Kind {
    /// Record does not participate in bounds or culling.
    pub const HIDDEN: Self = Self(0);
    /// Plain visible box.
    pub const VISIBLE: Self = Self(1);

    /// Returns `true` unless this is [`Kind::HIDDEN`].
    #[must_use]
    pub const fn is_visible(self) -> bool {
        self.0 != Self::HIDDEN.0
    }

    fn to_f64(self) -> f64 {
        f64::from(self.0)
    }

    fn from_f64(v: f64) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Kind tags are only ever written from u32 values."
        )]
        Self(v as u32)
    }
}

/// One decoded strand record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    /// Type tag.
    pub kind: Kind,
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl Record {
    /// The record as a Kurbo rect.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// The record as a projection.
    #[must_use]
    pub fn projection(&self) -> Projection {
        Projection::from_corners(self.x1, self.y1, self.x2, self.y2)
    }
}

/// Errors returned by strand writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StrandError {
    /// The record index is past the end of the strand.
    #[error("record index {index} out of bounds for strand of length {len}")]
    IndexOutOfBounds {
        /// Requested record index.
        index: usize,
        /// Number of records in the strand.
        len: usize,
    },
}

/// Contiguous buffer of `[kind, x1, y1, x2, y2]` records.
///
/// See the [crate docs](crate) for the layout and the rationale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Strand {
    data: Vec<f64>,
}

impl Strand {
    /// Creates an empty strand.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an empty strand with room for `records` records.
    #[must_use]
    pub fn with_capacity(records: usize) -> Self {
        Self {
            data: Vec::with_capacity(records * STRIDE),
        }
    }

    /// Creates a strand of `n` zeroed, hidden records.
    #[must_use]
    pub fn allocate(n: usize) -> Self {
        Self {
            data: alloc::vec![0.0; n * STRIDE],
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / STRIDE
    }

    /// Returns `true` if the strand has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw backing buffer, `STRIDE` values per record.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Grows the strand with hidden records until it holds at least `n` records.
    pub fn ensure_len(&mut self, n: usize) {
        if self.len() < n {
            self.data.resize(n * STRIDE, 0.0);
        }
    }

    /// Appends a record and returns its index.
    pub fn push(&mut self, kind: Kind, rect: Rect) -> usize {
        let rect = rect.abs();
        let index = self.len();
        self.data
            .extend_from_slice(&[kind.to_f64(), rect.x0, rect.y0, rect.x1, rect.y1]);
        index
    }

    /// Overwrites record `index`.
    ///
    /// Corners are normalized so that `x2 >= x1` and `y2 >= y1`.
    pub fn write(
        &mut self,
        index: usize,
        kind: Kind,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> Result<(), StrandError> {
        let len = self.len();
        let slot = self
            .data
            .get_mut(index * STRIDE..(index + 1) * STRIDE)
            .ok_or(StrandError::IndexOutOfBounds { index, len })?;
        slot[0] = kind.to_f64();
        slot[1] = x1.min(x2);
        slot[2] = y1.min(y2);
        slot[3] = x1.max(x2);
        slot[4] = y1.max(y2);
        Ok(())
    }

    /// Overwrites record `index` from a rect.
    pub fn write_rect(&mut self, index: usize, kind: Kind, rect: Rect) -> Result<(), StrandError> {
        self.write(index, kind, rect.x0, rect.y0, rect.x1, rect.y1)
    }

    /// Changes only the kind tag of record `index`.
    pub fn set_kind(&mut self, index: usize, kind: Kind) -> Result<(), StrandError> {
        let len = self.len();
        let slot = self
            .data
            .get_mut(index * STRIDE)
            .ok_or(StrandError::IndexOutOfBounds { index, len })?;
        *slot = kind.to_f64();
        Ok(())
    }

    /// Marks record `index` hidden. Out-of-range indices are ignored.
    pub fn hide(&mut self, index: usize) {
        let _ = self.set_kind(index, Kind::HIDDEN);
    }

    /// Decodes record `index`.
    #[must_use]
    pub fn record(&self, index: usize) -> Option<Record> {
        let r = self.data.get(index * STRIDE..(index + 1) * STRIDE)?;
        Some(Record {
            kind: Kind::from_f64(r[0]),
            x1: r[1],
            y1: r[2],
            x2: r[3],
            y2: r[4],
        })
    }

    /// Kind tag of record `index`.
    #[must_use]
    pub fn kind(&self, index: usize) -> Option<Kind> {
        self.data.get(index * STRIDE).copied().map(Kind::from_f64)
    }

    /// Record `index` as a rect.
    #[must_use]
    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.record(index).map(|r| r.rect())
    }

    /// Record `index` as a projection.
    #[must_use]
    pub fn projection(&self, index: usize) -> Option<Projection> {
        self.record(index).map(|r| r.projection())
    }

    /// Iterates over all records in index order.
    pub fn iter(&self) -> impl Iterator<Item = Record> + '_ {
        self.data.chunks_exact(STRIDE).map(|r| Record {
            kind: Kind::from_f64(r[0]),
            x1: r[1],
            y1: r[2],
            x2: r[3],
            y2: r[4],
        })
    }

    /// Scales every record about `origin`: `p' = origin + (p - origin) * factor`.
    ///
    /// This is a single pass over the buffer. A negative factor mirrors the
    /// boxes; corners are re-normalized afterwards.
    pub fn scale_at(&mut self, factor: f64, origin: Point) {
        for r in self.data.chunks_exact_mut(STRIDE) {
            r[1] = origin.x + (r[1] - origin.x) * factor;
            r[2] = origin.y + (r[2] - origin.y) * factor;
            r[3] = origin.x + (r[3] - origin.x) * factor;
            r[4] = origin.y + (r[4] - origin.y) * factor;
            if factor < 0.0 {
                normalize(r);
            }
        }
    }

    /// Translates every record by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for r in self.data.chunks_exact_mut(STRIDE) {
            r[1] += delta.x;
            r[2] += delta.y;
            r[3] += delta.x;
            r[4] += delta.y;
        }
    }

    /// Rotates the two stored corners of every record about `pivot`.
    ///
    /// Only `(x1, y1)` and `(x2, y2)` are rotated and the result is
    /// re-normalized into an axis-aligned box, so this is an approximation:
    /// it is exact only for multiples of 180 degrees. Callers needing true
    /// oriented boxes must keep their own representation.
    pub fn rotate(&mut self, degrees: f64, pivot: Point) {
        let tf = Affine::rotate_about(degrees.to_radians(), pivot);
        for r in self.data.chunks_exact_mut(STRIDE) {
            let a = tf * Point::new(r[1], r[2]);
            let b = tf * Point::new(r[3], r[4]);
            r[1] = a.x;
            r[2] = a.y;
            r[3] = b.x;
            r[4] = b.y;
            normalize(r);
        }
    }

    /// Appends every record of `other`, mapped through `p' = offset + p * scale`.
    ///
    /// Returns the index range of the appended records. Used to flatten a
    /// child strand into its parent's coordinate space in one pass.
    pub fn extend_transformed(&mut self, other: &Self, scale: f64, offset: Vec2) -> Range<usize> {
        let start = self.len();
        self.data.reserve(other.data.len());
        for r in other.data.chunks_exact(STRIDE) {
            let mut out = [
                r[0],
                offset.x + r[1] * scale,
                offset.y + r[2] * scale,
                offset.x + r[3] * scale,
                offset.y + r[4] * scale,
            ];
            if scale < 0.0 {
                normalize(&mut out);
            }
            self.data.extend_from_slice(&out);
        }
        start..self.len()
    }

    /// Union of all non-hidden records, or `None` if there are none.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.iter()
            .filter(|r| r.kind.is_visible())
            .map(|r| r.rect())
            .reduce(|acc, r| acc.union(r))
    }

    /// Indices of non-hidden records intersecting `area` (edges inclusive).
    pub fn cull(&self, area: Rect) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .enumerate()
            .filter(move |(_, r)| r.kind.is_visible() && intersects(r.rect(), area))
            .map(|(i, _)| i)
    }
}

fn normalize(r: &mut [f64]) {
    if r[1] > r[3] {
        r.swap(1, 3);
    }
    if r[2] > r[4] {
        r.swap(2, 4);
    }
}
