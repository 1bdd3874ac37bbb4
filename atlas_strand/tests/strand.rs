// Copyright 2025 the Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-module checks for `atlas_strand`: predicate symmetry over a grid of
//! boxes and bulk transforms agreeing with per-record projections.

use atlas_strand::{Kind, Projection, Strand, intersects};
use kurbo::{Point, Rect, Vec2};

fn sample_boxes() -> Vec<Rect> {
    let mut out = Vec::new();
    for x in [-10.0, 0.0, 5.0, 10.0] {
        for y in [-10.0, 0.0, 5.0, 10.0] {
            for (w, h) in [(0.0, 0.0), (5.0, 5.0), (10.0, 2.5)] {
                out.push(Rect::new(x, y, x + w, y + h));
            }
        }
    }
    out
}

#[test]
fn intersects_is_symmetric() {
    let boxes = sample_boxes();
    for a in &boxes {
        for b in &boxes {
            assert_eq!(
                intersects(*a, *b),
                intersects(*b, *a),
                "asymmetric result for {a:?} / {b:?}"
            );
        }
    }
}

#[test]
fn every_box_intersects_itself() {
    for r in sample_boxes() {
        assert!(intersects(r, r), "{r:?} should intersect itself");
    }
}

#[test]
fn bulk_transform_matches_per_record_math() {
    let boxes = sample_boxes();
    let mut strand = Strand::with_capacity(boxes.len());
    for r in &boxes {
        strand.push(Kind::VISIBLE, *r);
    }

    let origin = Point::new(3.0, -2.0);
    strand.scale_at(1.5, origin);
    strand.translate(Vec2::new(7.0, 1.0));

    for (i, r) in boxes.iter().enumerate() {
        let expected = Projection::new(
            origin.x + (r.x0 - origin.x) * 1.5 + 7.0,
            origin.y + (r.y0 - origin.y) * 1.5 + 1.0,
            r.width() * 1.5,
            r.height() * 1.5,
        );
        let got = strand.projection(i).unwrap();
        assert!((got.x - expected.x).abs() < 1e-9, "x mismatch at {i}");
        assert!((got.y - expected.y).abs() < 1e-9, "y mismatch at {i}");
        assert!((got.width - expected.width).abs() < 1e-9, "w mismatch at {i}");
        assert!(
            (got.height - expected.height).abs() < 1e-9,
            "h mismatch at {i}"
        );
    }
}
