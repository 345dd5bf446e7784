//! End-to-end behaviour of a polygon voice over whole cycles

use approx::assert_abs_diff_eq;
use polygen::params;
use polygen::prelude::*;

const SR: f32 = 48000.0;

/// Engine state after pushing raw parameter values through the host
fn configured(settings: &[(ParamId, i16)]) -> EngineState {
    let mut poly = PolyGen::new();
    for &(id, raw) in settings {
        poly.set_parameter(&SR, id, raw);
    }
    *poly.state()
}

/// Run until `corners` vertex changes have been seen, returning each corner's
/// vertex index and emitted point
fn collect_corners(state: &mut EngineState, corners: usize, sample_rate: f32) -> Vec<(usize, Point)> {
    let mut seen = Vec::with_capacity(corners);
    let mut guard = 0;
    while seen.len() < corners {
        let before = state.curr_vertex;
        let point = state.tick(0.0, sample_rate);
        if state.curr_vertex != before {
            seen.push((state.curr_vertex, point));
        }
        guard += 1;
        assert!(guard < 10_000_000, "tracer never reached a new corner");
    }
    seen
}

#[test]
fn test_triangle_visits_corners_in_order() {
    let mut state = configured(&[]);
    let corners = collect_corners(&mut state, 7, SR);

    let expected = [
        Point::new(0.0, 5.0),
        Point::new(4.330127, -2.5),
        Point::new(-4.330127, -2.5),
    ];

    // Starts at vertex 0, so the first change lands on vertex 1
    for (k, &(vertex, point)) in corners.iter().enumerate() {
        assert_eq!(vertex, (k + 1) % 3, "corner skipped");
        assert_abs_diff_eq!(point.x, expected[vertex].x, epsilon = 1e-4);
        assert_abs_diff_eq!(point.y, expected[vertex].y, epsilon = 1e-4);
    }
}

#[test]
fn test_square_wrap_emits_exact_first_vertex() {
    let mut state = configured(&[(ParamId::NumSides, 4)]);
    let corners = collect_corners(&mut state, 8, SR);

    let wraps: Vec<_> = corners.iter().filter(|(v, _)| *v == 0).collect();
    assert_eq!(wraps.len(), 2);
    for (_, point) in wraps {
        assert_eq!(*point, Point::new(0.0, 5.0));
    }
}

#[test]
fn test_star_passes_through_every_inner_vertex() {
    let mut state = configured(&[(ParamId::NumSides, 5), (ParamId::InnerRadius, 40)]);
    assert!(state.shape.use_inner_vertices);
    assert_eq!(state.shape.corner_count(), 10);

    // About a thousand samples per edge
    let sample_rate = state.frequency(0.0) * 1000.0;
    let inner: Vec<Point> = (0..5).map(|i| state.shape.inner_vertex(i)).collect();
    let mut closest = [f32::MAX; 5];

    for _ in 0..5 * 1000 + 10 {
        let point = state.tick(0.0, sample_rate);
        for (best, vertex) in closest.iter_mut().zip(&inner) {
            *best = best.min((point - *vertex).length());
        }
    }

    for (i, distance) in closest.iter().enumerate() {
        assert!(*distance < 0.05, "inner vertex {} missed by {}", i, distance);
        // Pulled in well inside the outline
        assert!(inner[i].length() < 2.5);
    }
}

#[test]
fn test_star_gate_at_full_radius() {
    let plain = configured(&[(ParamId::InnerRadius, 100)]);
    assert!(!plain.shape.use_inner_vertices);

    let star = configured(&[(ParamId::InnerRadius, 99)]);
    assert!(star.shape.use_inner_vertices);
}

#[test]
fn test_full_turn_rotation_is_bit_exact() {
    let mut reference = configured(&[(ParamId::NumSides, 7), (ParamId::InnerRadius, 60)]);
    let mut zero = configured(&[
        (ParamId::NumSides, 7),
        (ParamId::InnerRadius, 60),
        (ParamId::Rotation, 360),
    ]);
    let mut full = configured(&[
        (ParamId::NumSides, 7),
        (ParamId::InnerRadius, 60),
        (ParamId::Rotation, -360),
        (ParamId::XRotationCenter, 30),
    ]);
    assert_eq!(zero.rotation.degrees(), 0.0);
    assert_eq!(full.rotation.degrees(), 360.0);

    for _ in 0..2000 {
        let expected = reference.tick(0.3, SR);
        assert_eq!(zero.tick(0.3, SR), expected);
        assert_eq!(full.tick(0.3, SR), expected);
    }
}

#[test]
fn test_offset_applied_after_rotation() {
    let mut centered = configured(&[(ParamId::Rotation, 90)]);
    let mut shifted = configured(&[
        (ParamId::Rotation, 90),
        (ParamId::XOffset, 20),
        (ParamId::YOffset, -10),
    ]);

    for _ in 0..500 {
        let a = centered.tick(0.0, SR);
        let b = shifted.tick(0.0, SR);
        assert_abs_diff_eq!(b.x, a.x + 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(b.y, a.y - 1.0, epsilon = 1e-5);
    }
}

#[test]
fn test_counters_stay_in_range_at_extreme_pitch() {
    let mut state = configured(&[(ParamId::NumSides, 36), (ParamId::Frequency, 500)]);

    // Zero sample rate falls back to 1 kHz: hundreds of edges per sample
    for step in 0..5000 {
        let cv = if step % 2 == 0 { 10.0 } else { -10.0 };
        let point = state.tick(cv, 0.0);
        assert!((0.0..1.0).contains(&state.phase), "phase {}", state.phase);
        assert!((0.0..1.0).contains(&state.inner_phase));
        assert!(state.curr_vertex < 36 && state.next_vertex < 36);
        assert!(point.x.is_finite() && point.y.is_finite());
    }
}

#[test]
fn test_live_side_count_reduction() {
    let mut state = configured(&[(ParamId::NumSides, 36)]);
    let mut values = ParamValues::default();
    values.set(ParamId::NumSides, 36);

    while state.curr_vertex < 20 {
        state.tick(0.0, SR);
    }

    values.set(ParamId::NumSides, 4);
    params::apply(&mut state, &values, ParamId::NumSides, SR);
    state.tick(0.0, SR);
    assert!(state.curr_vertex < 4);
    assert!(state.next_vertex < 4);
}

#[test]
fn test_spin_angle_stays_normalized() {
    let mut state = configured(&[(ParamId::Spin, 1), (ParamId::Rotation, -720)]);
    for _ in 0..20_000 {
        state.tick(0.0, 0.0);
        let deg = state.rotation.degrees();
        assert!(deg > -360.0 && deg <= 360.0, "angle {}", deg);
    }

    for raw in -720..=720 {
        let absolute = configured(&[(ParamId::Rotation, raw)]);
        let deg = absolute.rotation.degrees();
        assert!(deg > -360.0 && deg <= 360.0, "angle {} for {}", deg, raw);
    }
}

#[test]
fn test_entering_spin_continues_from_current_angle() {
    let mut poly = PolyGen::new();
    poly.set_parameter(&SR, ParamId::OutputX, 2);
    poly.set_parameter(&SR, ParamId::OutputY, 3);
    poly.set_parameter(&SR, ParamId::Rotation, 45);
    assert_eq!(poly.state().rotation.degrees(), -45.0);

    poly.set_parameter(&SR, ParamId::Spin, 1);
    assert_eq!(poly.state().rotation.degrees(), -45.0);

    let frames = 256;
    let mut bus = vec![0.0_f32; 3 * frames];
    poly.step(&SR, &mut bus, frames).unwrap();
    let spun = poly.state().rotation.degrees();
    assert_abs_diff_eq!(spun, -45.0 - 45.0 * frames as f32 / SR, epsilon = 1e-3);

    // Back to absolute snaps to the parameter, and re-entering spin keeps it
    poly.set_parameter(&SR, ParamId::Spin, 0);
    assert_eq!(poly.state().rotation.degrees(), -45.0);
    poly.set_parameter(&SR, ParamId::Spin, 1);
    assert_eq!(poly.state().rotation.degrees(), -45.0);
}

#[test]
fn test_every_side_count_visits_corners_in_order() {
    for sides in 3..=36_i16 {
        for inner_radius in [100_i16, 40] {
            let mut state = configured(&[
                (ParamId::NumSides, sides),
                (ParamId::InnerRadius, inner_radius),
            ]);
            let n = sides as usize;
            let corners = collect_corners(&mut state, 2 * n, SR);
            for (k, &(vertex, point)) in corners.iter().enumerate() {
                assert_eq!(vertex, (k + 1) % n, "{} sides, radius {}", sides, inner_radius);
                let expected = state.shape.outer_vertex(vertex);
                assert_abs_diff_eq!(point.x, expected.x, epsilon = 1e-5);
                assert_abs_diff_eq!(point.y, expected.y, epsilon = 1e-5);
            }
        }
    }
}

#[test]
fn test_star_edges_pass_outer_inner_outer() {
    for sides in [3_i16, 5, 12, 36] {
        let mut state = configured(&[(ParamId::NumSides, sides), (ParamId::InnerRadius, 40)]);
        let n = sides as usize;
        assert_eq!(state.shape.corner_count(), 2 * n);

        // About four hundred samples per edge
        let sample_rate = state.frequency(0.0) * 400.0;
        let tolerance = 0.05;

        // Sequence of corners (outer index, is_inner) the trace passes near, in order
        let mut visited: Vec<(usize, bool)> = Vec::new();
        for _ in 0..n * 410 + 50 {
            let point = state.tick(0.0, sample_rate);
            let v = state.curr_vertex;
            let candidates = [
                ((v, false), state.shape.outer_vertex(v)),
                ((v, true), state.shape.inner_vertex(v)),
                ((state.next_vertex, false), state.shape.outer_vertex(state.next_vertex)),
            ];
            for (corner, position) in candidates {
                if (point - position).length() < tolerance && visited.last() != Some(&corner) {
                    visited.push(corner);
                }
            }
        }

        // One full cycle starting from the first corner after vertex 0
        let expected: Vec<(usize, bool)> = (0..n)
            .flat_map(|v| [(v, true), ((v + 1) % n, false)])
            .collect();
        let start = visited
            .iter()
            .position(|c| *c == (0, true))
            .unwrap_or(usize::MAX);
        assert!(start != usize::MAX, "{} sides: inner vertex 0 never reached", sides);
        assert!(
            visited.len() >= start + expected.len(),
            "{} sides: only {} corners seen",
            sides,
            visited.len()
        );
        assert_eq!(&visited[start..start + expected.len()], &expected[..], "{} sides", sides);
    }
}

#[test]
fn test_preview_matches_audio_corners() {
    struct Lines(Vec<(f32, f32)>);

    impl Canvas for Lines {
        fn draw_line(&mut self, _x0: f32, _y0: f32, x1: f32, y1: f32, _color: u8) {
            self.0.push((x1, y1));
        }

        fn draw_text(&mut self, _x: i32, _y: i32, _text: &str) {}
    }

    let mut poly = PolyGen::new();
    poly.set_parameter(&SR, ParamId::NumSides, 6);
    poly.set_parameter(&SR, ParamId::InnerRadius, 50);

    let mut canvas = Lines(Vec::new());
    assert!(poly.draw(&mut canvas));
    assert_eq!(canvas.0.len(), 12);

    // Default canvas: 256x64, 2px padding, so 3px per volt around (128, 32)
    let (x, y) = canvas.0[0];
    assert_abs_diff_eq!(x, 128.0, epsilon = 1e-4);
    assert_abs_diff_eq!(y, 32.0 - 5.0 * 3.0, epsilon = 1e-4);
}
