// tests/test_tessellation.rs
// Properties of the KISS surface tessellator: vertex counts by integer
// stepping, position/UV lockstep, determinism, wholesale regeneration.
// RELEVANT FILES:src/geometry/kiss.rs,src/geometry/mod.rs

use std::f32::consts::TAU;

use kissview::{tessellate, StripLayout};

/// Expected count from the integer stepping rule: n-1 angular samples
/// (u strictly below 360 degrees), n radial samples (v through 1), two
/// vertices per lattice point.
fn expected_vertex_count(n: u32) -> usize {
    (2 * n * (n - 1)) as usize
}

#[test]
fn parallel_arrays_have_identical_integer_derived_lengths() {
    for n in [2_u32, 3, 5, 20, 40, 99] {
        let buffers = tessellate(n).unwrap();
        let expected = expected_vertex_count(n);
        assert_eq!(buffers.positions.len(), expected, "positions at n={}", n);
        assert_eq!(buffers.uvs.len(), expected, "uvs at n={}", n);
        assert_eq!(buffers.normals.len(), expected, "normals at n={}", n);
    }
}

#[test]
fn degenerate_resolutions_fail_fast() {
    assert!(tessellate(0).is_err());
    assert!(tessellate(1).is_err());
}

#[test]
fn vertex_and_texcoord_reconstruct_the_same_sample() {
    let n = 20;
    let buffers = tessellate(n).unwrap();
    for i in 0..buffers.vertex_count() {
        let pos = buffers.positions[i];
        let uv = buffers.uvs[i];

        // v is stored directly as the z coordinate and encoded in uv.y
        let v_from_uv = uv[1] * 2.0 - 1.0;
        assert!(
            (pos[2] - v_from_uv).abs() < 1e-5,
            "v mismatch at index {}: {} vs {}",
            i,
            pos[2],
            v_from_uv
        );

        // where the radius is meaningful, the angle must agree too
        let radius = (pos[0] * pos[0] + pos[1] * pos[1]).sqrt();
        if radius > 1e-4 {
            let u_from_pos = pos[1].atan2(pos[0]).rem_euclid(TAU);
            let u_from_uv = (uv[0] * TAU).rem_euclid(TAU);
            let mut delta = (u_from_pos - u_from_uv).abs();
            if delta > TAU / 2.0 {
                delta = TAU - delta;
            }
            assert!(
                delta < 1e-3,
                "angle mismatch at index {}: {} vs {}",
                i,
                u_from_pos,
                u_from_uv
            );
        }
    }
}

#[test]
fn vertices_come_in_current_next_pairs() {
    let n = 12;
    let buffers = tessellate(n).unwrap();
    let step_u = TAU / (n - 1) as f32;
    // each even/odd pair shares v and differs by exactly one angular step
    for i in (0..buffers.vertex_count()).step_by(2) {
        let a = buffers.uvs[i];
        let b = buffers.uvs[i + 1];
        assert!((a[1] - b[1]).abs() < 1e-6, "pair at {} split across v", i);
        let du = (b[0] - a[0]) * TAU;
        assert!(
            (du - step_u).abs() < 1e-4,
            "pair at {} not one angular step apart: {}",
            i,
            du
        );
    }
}

#[test]
fn tessellation_is_deterministic() {
    let first = tessellate(33).unwrap();
    let second = tessellate(33).unwrap();
    assert_eq!(first, second);
}

#[test]
fn resolution_change_fully_replaces_geometry() {
    let coarse = tessellate(20).unwrap();
    let fine = tessellate(40).unwrap();
    assert_eq!(coarse.vertex_count(), expected_vertex_count(20));
    assert_eq!(fine.vertex_count(), expected_vertex_count(40));
    // the new buffer length matches the new resolution exactly, never a
    // max of old and new
    assert_ne!(coarse.vertex_count(), fine.vertex_count());
}

#[test]
fn strip_table_partitions_the_buffer_exactly() {
    for n in [2_u32, 20, 40] {
        let buffers = tessellate(n).unwrap();
        let strips = StripLayout::for_vertex_count(buffers.vertex_count(), n);
        assert_eq!(
            (strips.strip_count * strips.strip_len) as usize,
            buffers.vertex_count()
        );
        let last = strips.ranges().last().unwrap();
        assert_eq!(last.end as usize, buffers.vertex_count());
    }
}

#[test]
fn surface_stays_inside_the_unit_profile() {
    let buffers = tessellate(30).unwrap();
    for pos in &buffers.positions {
        let radius = (pos[0] * pos[0] + pos[1] * pos[1]).sqrt();
        // r(v) = v^2 * sqrt(1 - v) peaks well below 2 on [-1, 1]
        assert!(radius < 2.0);
        assert!((-1.0..=1.0).contains(&pos[2]));
    }
}
