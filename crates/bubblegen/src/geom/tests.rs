use super::*;
use nalgebra::vector;
use proptest::prelude::*;

const EPS: f64 = 1e-9;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, w, h).unwrap()
}

/// Closed-segment intersection (touching and collinear overlap count).
fn segments_touch(a: Point, b: Point, c: Point, d: Point) -> bool {
    fn orient(a: Point, b: Point, c: Point) -> i8 {
        let v = (b - a).perp(&(c - a));
        if v > 1e-9 {
            1
        } else if v < -1e-9 {
            -1
        } else {
            0
        }
    }
    fn on_seg(a: Point, b: Point, p: Point) -> bool {
        p.x >= a.x.min(b.x) - 1e-9
            && p.x <= a.x.max(b.x) + 1e-9
            && p.y >= a.y.min(b.y) - 1e-9
            && p.y <= a.y.max(b.y) + 1e-9
    }
    let (o1, o2, o3, o4) = (orient(a, b, c), orient(a, b, d), orient(c, d, a), orient(c, d, b));
    if o1 != o2 && o3 != o4 && o1 != 0 && o2 != 0 && o3 != 0 && o4 != 0 {
        return true;
    }
    (o1 == 0 && on_seg(a, b, c))
        || (o2 == 0 && on_seg(a, b, d))
        || (o3 == 0 && on_seg(c, d, a))
        || (o4 == 0 && on_seg(c, d, b))
}

/// Flattened outline of a single closed subpath with near-duplicate points merged.
fn ring(path: &Path) -> Vec<Point> {
    let lines = path.flatten(8);
    assert_eq!(lines.len(), 1, "expected a single subpath");
    let mut pts: Vec<Point> = Vec::new();
    for p in &lines[0] {
        if pts.last().map_or(true, |q| (p - q).norm() > EPS) {
            pts.push(*p);
        }
    }
    while pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() <= EPS {
        pts.pop();
    }
    pts
}

/// No two non-adjacent edges of the closed ring touch.
fn is_simple(path: &Path) -> bool {
    let pts = ring(path);
    let n = pts.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = (pts[i], pts[(i + 1) % n]);
            let (c, d) = (pts[j], pts[(j + 1) % n]);
            if segments_touch(a, b, c, d) {
                return false;
            }
        }
    }
    true
}

fn apex_count(path: &Path, anchor: Point) -> usize {
    path.vertices().iter().filter(|v| **v == anchor).count()
}

fn speech_box() -> Rect {
    rect(100.0, 150.0, 240.0, 120.0)
}

#[test]
fn cardinal_anchors_pick_expected_side_and_stay_simple() {
    let r = speech_box();
    let cfg = BubbleCfg::default();
    let cases = [
        (vector![220.0, 50.0], Side::Top),
        (vector![220.0, 180.0], Side::Top),
        (vector![400.0, 210.0], Side::Right),
        (vector![300.0, 210.0], Side::Right),
        (vector![220.0, 350.0], Side::Bottom),
        (vector![220.0, 250.0], Side::Bottom),
        (vector![50.0, 210.0], Side::Left),
        (vector![130.0, 210.0], Side::Left),
    ];
    for (anchor, side) in cases {
        let tail = tail_geometry(&r, anchor, 16.0, &cfg);
        assert_eq!(tail.side, side, "anchor {anchor:?}");
        let path = bubble_path(&r, anchor, 16.0, &cfg).unwrap();
        assert_eq!(apex_count(&path, anchor), 1, "anchor {anchor:?}");
        assert_eq!(path.segs.len(), 13);
        assert!(is_simple(&path), "self-intersecting outline for {anchor:?}");
    }
}

#[test]
fn base_vertices_follow_edge_traversal_direction() {
    let r = speech_box();
    let cfg = BubbleCfg::default();
    let top = tail_geometry(&r, vector![220.0, 0.0], 16.0, &cfg);
    assert!(top.base_a.x < top.base_b.x);
    let right = tail_geometry(&r, vector![600.0, 210.0], 16.0, &cfg);
    assert!(right.base_a.y < right.base_b.y);
    let bottom = tail_geometry(&r, vector![220.0, 600.0], 16.0, &cfg);
    assert!(bottom.base_a.x > bottom.base_b.x);
    let left = tail_geometry(&r, vector![-200.0, 210.0], 16.0, &cfg);
    assert!(left.base_a.y > left.base_b.y);

    for t in [top, right, bottom, left] {
        assert!(((t.base_a - t.base_b).norm() - TAIL_WIDTH).abs() < EPS);
    }
}

const TAIL_WIDTH: f64 = cfg::TAIL_BASE_WIDTH;

#[test]
fn reversed_base_order_is_caught_as_bow_tie() {
    // Same outline as the builder but with the bottom tail vertices swapped.
    let r = speech_box();
    let anchor = vector![220.0, 350.0];
    let good = bubble_path(&r, anchor, 16.0, &BubbleCfg::default()).unwrap();
    let mut bad = good.clone();
    let idx = bad
        .segs
        .iter()
        .position(|s| *s == PathSeg::LineTo(anchor))
        .unwrap();
    bad.segs.swap(idx - 1, idx + 1);
    assert!(is_simple(&good));
    assert!(!is_simple(&bad));
}

#[test]
fn diagonal_tie_goes_to_vertical_edges() {
    let sq = rect(0.0, 0.0, 100.0, 100.0);
    let cfg = BubbleCfg::default();
    assert_eq!(hit_side(&sq, vector![150.0, 150.0], &cfg).0, Side::Right);
    assert_eq!(hit_side(&sq, vector![-50.0, -50.0], &cfg).0, Side::Left);
    assert_eq!(hit_side(&sq, vector![-50.0, 150.0], &cfg).0, Side::Left);
    // within tolerance of the diagonal: still a tie
    assert_eq!(hit_side(&sq, vector![1050.0, 1051.0], &cfg).0, Side::Right);
    // clearly steeper than the diagonal
    assert_eq!(hit_side(&sq, vector![150.0, 151.0], &cfg).0, Side::Bottom);
    assert_eq!(hit_side(&sq, vector![150.0, -51.0], &cfg).0, Side::Top);
    // a zero tolerance disables the tie-break
    let strict = BubbleCfg {
        side_tie_eps: 0.0,
        ..cfg
    };
    assert_eq!(hit_side(&sq, vector![1050.0, 1051.0], &strict).0, Side::Bottom);
}

#[test]
fn narrow_box_keeps_base_on_the_edge() {
    // straight part 40 - 2 * 16 = 8 < TAIL_BASE_WIDTH
    let r = rect(10.0, 10.0, 40.0, 100.0);
    let cfg = BubbleCfg::default();
    for anchor in [vector![30.0, 300.0], vector![45.0, -100.0], vector![80.0, 500.0]] {
        let t = tail_geometry(&r, anchor, 16.0, &cfg);
        assert!(t.side.is_horizontal());
        assert!(t.base_center.x >= r.x + 16.0 - EPS && t.base_center.x <= r.right() - 16.0 + EPS);
        for v in [t.base_a, t.base_b] {
            assert!(v.x >= r.x - EPS && v.x <= r.right() + EPS);
        }
        assert!(((t.base_a - t.base_b).norm() - TAIL_WIDTH).abs() < EPS);
    }
}

#[test]
fn near_corner_anchor_keeps_full_base_width() {
    let t = tail_geometry(&speech_box(), vector![-20.0, 92.0], 16.0, &BubbleCfg::default());
    assert_eq!(t.side, Side::Left);
    assert_eq!(t.base_center, vector![100.0, 166.0]);
    assert_eq!(t.base_a, vector![100.0, 176.0]);
    assert_eq!(t.base_b, vector![100.0, 156.0]);
}

#[test]
fn pill_end_still_gets_a_visible_tail() {
    let pill = rect(0.0, 0.0, 220.0, 100.0);
    let anchor = vector![-200.0, 50.0];
    let t = tail_geometry(&pill, anchor, 50.0, &BubbleCfg::default());
    assert_eq!(t.side, Side::Left);
    assert_eq!(t.base_a, vector![0.0, 60.0]);
    assert_eq!(t.base_b, vector![0.0, 40.0]);
    let area = (t.base_a - anchor).perp(&(t.base_b - anchor)).abs() / 2.0;
    assert!(area > 1000.0);
    let path = bubble_path(&pill, anchor, 50.0, &BubbleCfg::default()).unwrap();
    assert_eq!(apex_count(&path, anchor), 1);
}

#[test]
fn radius_is_clamped_to_half_the_short_side() {
    let r = rect(0.0, 0.0, 100.0, 60.0);
    let path = bubble_path(&r, vector![50.0, 200.0], 1000.0, &BubbleCfg::default()).unwrap();
    assert_eq!(path.segs[0], PathSeg::MoveTo(vector![30.0, 0.0]));
    assert_eq!(clamp_radius(100.0, 60.0, 10.0), 10.0);
}

#[test]
fn anchor_at_center_degenerates_without_nan() {
    let r = speech_box();
    let c = r.center();
    let t = tail_geometry(&r, c, 16.0, &BubbleCfg::default());
    assert_eq!(t.side, Side::Top);
    assert_eq!(t.base_center, vector![c.x, r.y]);
    let path = bubble_path(&r, c, 16.0, &BubbleCfg::default()).unwrap();
    assert!(path.vertices().iter().all(|v| v.x.is_finite() && v.y.is_finite()));
}

#[test]
fn bubble_rejects_misuse() {
    let cfg = BubbleCfg::default();
    let flat = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 10.0,
    };
    assert!(bubble_path(&flat, vector![0.0, 50.0], 4.0, &cfg).is_err());
    let negative = Rect {
        x: 0.0,
        y: 0.0,
        width: -5.0,
        height: 10.0,
    };
    assert!(bubble_path(&negative, vector![0.0, 50.0], 4.0, &cfg).is_err());
    let r = speech_box();
    assert!(bubble_path(&r, vector![f64::NAN, 0.0], 4.0, &cfg).is_err());
    assert!(bubble_path(&r, vector![0.0, 0.0], -1.0, &cfg).is_err());
    assert!(Rect::new(0.0, 0.0, -1.0, 1.0).is_err());
}

#[test]
fn equal_thickness_taper_is_centered_rectangle() {
    let (p1, p2) = (vector![0.0, 0.0], vector![30.0, 40.0]);
    let path = tapered_segment(p1, p2, 6.0, 6.0).unwrap();
    let v = path.vertices();
    assert_eq!(v.len(), 4);
    let len = (p2 - p1).norm();
    for c in &v {
        let dist = (p2 - p1).perp(&(c - p1)).abs() / len;
        assert!((dist - 3.0).abs() < EPS);
    }
    assert!(((v[0] - v[3]).norm() - 6.0).abs() < EPS);
    assert!(((v[1] - v[2]).norm() - 6.0).abs() < EPS);
    // opposite sides are parallel and equal
    assert!(((v[1] - v[0]) - (v[2] - v[3])).norm() < EPS);
}

#[test]
fn taper_widths_follow_endpoints() {
    let c = tapered_corners(vector![0.0, 0.0], vector![100.0, 0.0], 4.0, 10.0).unwrap();
    assert_eq!(c[0], vector![0.0, 2.0]);
    assert_eq!(c[1], vector![100.0, 5.0]);
    assert_eq!(c[2], vector![100.0, -5.0]);
    assert_eq!(c[3], vector![0.0, -2.0]);
}

#[test]
fn taper_degenerate_and_invalid_inputs() {
    let p = vector![5.0, 5.0];
    assert!(tapered_segment(p, p, 10.0, 10.0).unwrap().is_empty());
    let zero = tapered_segment(p, vector![10.0, 5.0], 0.0, 0.0).unwrap();
    assert_eq!(zero.vertices().len(), 4);
    assert!(tapered_segment(p, vector![10.0, 5.0], -1.0, 2.0).is_err());
    assert!(tapered_segment(p, vector![f64::INFINITY, 5.0], 1.0, 2.0).is_err());
}

#[test]
fn half_plane_points_away_from_keep() {
    let (p1, p2) = (vector![0.0, 0.0], vector![100.0, 0.0]);
    let below = half_plane_mask(p1, p2, vector![50.0, 50.0]);
    let v = below.vertices();
    assert_eq!(v.len(), 4);
    assert!(v.iter().all(|p| p.y <= 0.0));
    assert!(v.iter().any(|p| p.y <= -cfg::HALF_PLANE_EXTENT + EPS));

    let above = half_plane_mask(p1, p2, vector![50.0, -50.0]);
    assert!(above.vertices().iter().all(|p| p.y >= 0.0));

    // the line is extended well past both endpoints
    let xs: Vec<f64> = v.iter().map(|p| p.x).collect();
    assert!(xs.iter().cloned().fold(f64::INFINITY, f64::min) <= -cfg::HALF_PLANE_EXTENT + EPS);
    assert!(xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) >= 100.0 + cfg::HALF_PLANE_EXTENT - EPS);
}

#[test]
fn half_plane_degenerate_inputs() {
    let p = vector![3.0, 4.0];
    let mask = half_plane_mask(p, p, vector![0.0, 0.0]);
    assert!(mask.vertices().iter().all(|v| *v == p));
    // keep point on the line: unflipped normal (-dy, dx)
    let n = away_normal(vector![0.0, 0.0], vector![10.0, 0.0], vector![5.0, 0.0]);
    assert_eq!(n, vector![0.0, 1.0]);
    let small = half_plane_mask_with_extent(vector![0.0, 0.0], vector![10.0, 0.0], vector![5.0, 1.0], 5.0);
    assert_eq!(
        small.vertices(),
        vec![
            vector![-5.0, 0.0],
            vector![15.0, 0.0],
            vector![15.0, -5.0],
            vector![-5.0, -5.0]
        ]
    );
}

#[test]
fn segment_rect_reference_cases() {
    let r = rect(50.0, 50.0, 10.0, 10.0);
    assert!(segment_intersects_rect(vector![0.0, 0.0], vector![200.0, 200.0], &r));
    assert!(!segment_intersects_rect(vector![0.0, 0.0], vector![10.0, 0.0], &r));
    assert!(segment_intersects_rect(vector![55.0, 55.0], vector![900.0, -40.0], &r));
    assert!(segment_intersects_rect(vector![0.0, 55.0], vector![100.0, 55.0], &r));
    // corner to corner through the interior, both directions
    assert!(segment_intersects_rect(vector![200.0, 200.0], vector![0.0, 0.0], &r));
    assert!(segment_intersects_rect(vector![0.0, 110.0], vector![110.0, 0.0], &r));
    // in through the top-left corner, out through the bottom edge
    assert!(segment_intersects_rect(vector![40.0, 30.0], vector![60.0, 70.0], &r));
    // endpoint exactly on the boundary counts
    assert!(segment_intersects_rect(vector![60.0, 60.0], vector![90.0, 90.0], &r));
}

#[test]
fn grazing_and_collinear_segments_are_not_detected() {
    let r = rect(50.0, 50.0, 10.0, 10.0);
    // touches only the top-left corner
    assert!(!segment_intersects_rect(vector![40.0, 60.0], vector![60.0, 40.0], &r));
    // runs along the top edge with both endpoints outside
    assert!(!segment_intersects_rect(vector![40.0, 50.0], vector![70.0, 50.0], &r));
    // along the left edge, and touching the bottom-right corner only
    assert!(!segment_intersects_rect(vector![50.0, 0.0], vector![50.0, 100.0], &r));
    assert!(!segment_intersects_rect(vector![70.0, 50.0], vector![50.0, 70.0], &r));
}

#[test]
fn builders_are_idempotent() {
    let r = speech_box();
    let cfg = BubbleCfg::default();
    let a = vector![400.0, 350.0];
    assert_eq!(
        bubble_path(&r, a, 16.0, &cfg).unwrap().to_svg_data(),
        bubble_path(&r, a, 16.0, &cfg).unwrap().to_svg_data()
    );
    let (p1, p2) = (vector![1.0, 2.0], vector![30.0, 70.0]);
    assert_eq!(
        tapered_segment(p1, p2, 3.0, 9.0).unwrap(),
        tapered_segment(p1, p2, 3.0, 9.0).unwrap()
    );
    assert_eq!(half_plane_mask(p1, p2, a), half_plane_mask(p1, p2, a));
}

#[test]
fn emitted_path_data_parses_back() {
    let path = bubble_path(&speech_box(), vector![400.0, 350.0], 16.0, &BubbleCfg::default())
        .unwrap();
    let back = Path::parse_svg_data(&path.to_svg_data()).unwrap();
    assert_eq!(back, path);
}

proptest! {
    #[test]
    fn outside_anchor_gives_simple_outline(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        w in 30.0f64..400.0,
        h in 30.0f64..400.0,
        r_frac in 0.0f64..1.0,
        ax in -1500.0f64..1500.0,
        ay in -1500.0f64..1500.0,
    ) {
        let r = rect(x, y, w, h);
        let anchor = vector![ax, ay];
        let margin = rect(x - 1.0, y - 1.0, w + 2.0, h + 2.0);
        prop_assume!(!margin.contains(anchor));
        // keep the straight part of every edge wider than the tail base
        let radius = r_frac * (w.min(h) - 22.0) / 2.0;
        let path = bubble_path(&r, anchor, radius, &BubbleCfg::default()).unwrap();
        prop_assert_eq!(apex_count(&path, anchor), 1);
        prop_assert!(is_simple(&path));
    }

    #[test]
    fn tail_base_is_full_width_or_held_on_the_edge(
        w in 1.0f64..120.0,
        h in 1.0f64..120.0,
        radius in 0.0f64..80.0,
        ax in -400.0f64..400.0,
        ay in -400.0f64..400.0,
    ) {
        let r = rect(0.0, 0.0, w, h);
        let cfg = BubbleCfg::default();
        let t = tail_geometry(&r, vector![ax, ay], radius, &cfg);
        let edge = if t.side.is_horizontal() { w } else { h };
        let straight = edge - 2.0 * t.radius;
        let width = (t.base_a - t.base_b).norm();
        if straight >= cfg.tail_base_width {
            prop_assert!((width - cfg.tail_base_width).abs() < 1e-6);
        } else {
            prop_assert!(width > 0.0 && width <= cfg.tail_base_width + EPS);
            for v in [t.base_a, t.base_b] {
                let along = if t.side.is_horizontal() { v.x } else { v.y };
                prop_assert!(along >= -EPS && along <= edge + EPS);
            }
        }
    }

    #[test]
    fn equal_taper_corners_sit_half_thickness_off_the_line(
        x1 in -300.0f64..300.0,
        y1 in -300.0f64..300.0,
        x2 in -300.0f64..300.0,
        y2 in -300.0f64..300.0,
        t in 0.0f64..50.0,
    ) {
        let (p1, p2) = (vector![x1, y1], vector![x2, y2]);
        let len = (p2 - p1).norm();
        prop_assume!(len > 1e-3);
        let corners = tapered_corners(p1, p2, t, t).unwrap();
        for c in corners {
            let dist = (p2 - p1).perp(&(c - p1)).abs() / len;
            prop_assert!((dist - t / 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn half_plane_never_covers_the_keep_side(
        x1 in -300.0f64..300.0,
        y1 in -300.0f64..300.0,
        x2 in -300.0f64..300.0,
        y2 in -300.0f64..300.0,
        kx in -300.0f64..300.0,
        ky in -300.0f64..300.0,
    ) {
        let (p1, p2, keep) = (vector![x1, y1], vector![x2, y2], vector![kx, ky]);
        let d = p2 - p1;
        let len = d.norm();
        prop_assume!(len > 1e-3);
        let keep_side = d.perp(&(keep - p1)) / len;
        prop_assume!(keep_side.abs() > 1e-3);
        for v in half_plane_mask(p1, p2, keep).vertices() {
            let side = d.perp(&(v - p1)) / len;
            prop_assert!(side * keep_side.signum() <= 1e-6);
        }
    }

    #[test]
    fn segment_with_endpoint_inside_always_hits(
        x in -100.0f64..100.0,
        y in -100.0f64..100.0,
        w in 0.0f64..100.0,
        h in 0.0f64..100.0,
        u in 0.0f64..1.0,
        v in 0.0f64..1.0,
        ox in -1000.0f64..1000.0,
        oy in -1000.0f64..1000.0,
    ) {
        let r = rect(x, y, w, h);
        let inside = vector![x + u * w, y + v * h];
        prop_assert!(segment_intersects_rect(inside, vector![ox, oy], &r));
        prop_assert!(segment_intersects_rect(vector![ox, oy], inside, &r));
    }
}
