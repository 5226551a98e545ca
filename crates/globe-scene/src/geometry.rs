//! Icosahedral sphere geometry shared by every globe layer.
//!
//! Each of the twenty icosahedron faces is split into `(detail + 1)²`
//! triangles and every vertex is pushed out to the sphere. Triangles are
//! not indexed: every triangle owns its three vertices so texture
//! coordinates can be corrected per triangle along the map seam.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use globe_config::MAX_DETAIL;
use globe_render::VertexPositionNormalUv;

/// Corners of the unit-edge icosahedron before projection onto the sphere.
fn base_vertices() -> [Vec3; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
}

/// Counter-clockwise faces seen from outside.
const BASE_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn clamp_detail(detail: u32) -> u32 {
    if detail > MAX_DETAIL {
        log::warn!("Icosphere detail {detail} clamped to {MAX_DETAIL}");
        MAX_DETAIL
    } else {
        detail
    }
}

/// Points closer than this to the polar axis count as poles.
const POLE_EPSILON: f32 = 1e-6;

/// Sphere mesh approximated by a subdivided icosahedron.
#[derive(Debug, Clone)]
pub struct Geometry {
    vertices: Vec<VertexPositionNormalUv>,
    indices: Vec<u32>,
    detail: u32,
}

impl Geometry {
    /// Build an icosphere of `radius` with `detail` extra subdivisions per edge.
    ///
    /// `detail` above [`MAX_DETAIL`] is clamped so vertex indices fit in `u32`.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let detail = clamp_detail(detail);
        let corners = base_vertices();

        let mut positions = Vec::with_capacity(Self::triangles_for(detail) * 3);
        for [a, b, c] in BASE_FACES {
            subdivide_face(corners[a], corners[b], corners[c], detail, &mut positions);
        }
        for p in &mut positions {
            *p = p.normalize() * radius;
        }

        let mut uvs: Vec<[f32; 2]> = positions.iter().map(|&p| sphere_uv(p)).collect();
        correct_pole_and_wrap(&positions, &mut uvs);
        correct_seam(&mut uvs);

        // Subdivided spheres get smooth normals; the bare icosahedron stays faceted.
        let normals: Vec<Vec3> = if detail == 0 {
            positions
                .chunks_exact(3)
                .flat_map(|tri| {
                    let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize();
                    [n; 3]
                })
                .collect()
        } else {
            positions.iter().map(|p| p.normalize()).collect()
        };

        let vertices: Vec<VertexPositionNormalUv> = positions
            .iter()
            .zip(&normals)
            .zip(&uvs)
            .map(|((p, n), uv)| VertexPositionNormalUv {
                position: p.to_array(),
                normal: n.to_array(),
                uv: *uv,
            })
            .collect();
        let indices = (0..vertices.len() as u32).collect();

        Self {
            vertices,
            indices,
            detail,
        }
    }

    /// Triangle count of an icosphere with the given detail (before clamping).
    pub fn triangles_for(detail: u32) -> usize {
        let per_edge = detail as usize + 1;
        20 * per_edge * per_edge
    }

    pub fn vertices(&self) -> &[VertexPositionNormalUv] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn detail(&self) -> u32 {
        self.detail
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Split triangle `abc` into a `(detail + 1)`-row lattice and append its triangles.
fn subdivide_face(a: Vec3, b: Vec3, c: Vec3, detail: u32, out: &mut Vec<Vec3>) {
    let cols = detail as usize + 1;

    // rows[i] walks from the a-c edge to the b-c edge, one row closer to c each step.
    let rows: Vec<Vec<Vec3>> = (0..=cols)
        .map(|i| {
            let t = i as f32 / cols as f32;
            let start = a.lerp(c, t);
            let end = b.lerp(c, t);
            let len = cols - i;
            if len == 0 {
                vec![start]
            } else {
                (0..=len)
                    .map(|j| start.lerp(end, j as f32 / len as f32))
                    .collect()
            }
        })
        .collect();

    for i in 0..cols {
        for j in 0..2 * (cols - i) - 1 {
            let k = j / 2;
            if j % 2 == 0 {
                out.extend([rows[i][k + 1], rows[i + 1][k], rows[i][k]]);
            } else {
                out.extend([rows[i][k + 1], rows[i + 1][k + 1], rows[i + 1][k]]);
            }
        }
    }
}

/// Longitude around Y, zero facing -X.
fn azimuth(p: Vec3) -> f32 {
    p.z.atan2(-p.x)
}

/// Equirectangular coordinates with the north pole at the top row (`v = 0`).
fn sphere_uv(p: Vec3) -> [f32; 2] {
    let inclination = p.y.atan2((p.x * p.x + p.z * p.z).sqrt());
    [azimuth(p) / TAU + 0.5, 0.5 - inclination / PI]
}

/// Pole vertices take their longitude from the triangle they belong to, and
/// `u = 1` is folded back to 0 on triangles west of the prime meridian.
fn correct_pole_and_wrap(positions: &[Vec3], uvs: &mut [[f32; 2]]) {
    for (tri, tri_uvs) in positions.chunks_exact(3).zip(uvs.chunks_exact_mut(3)) {
        let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
        let centroid_azimuth = azimuth(centroid);
        for (p, uv) in tri.iter().zip(tri_uvs.iter_mut()) {
            if centroid_azimuth < 0.0 && uv[0] == 1.0 {
                uv[0] -= 1.0;
            }
            if p.x.abs() < POLE_EPSILON && p.z.abs() < POLE_EPSILON {
                uv[0] = centroid_azimuth / TAU + 0.5;
            }
        }
    }
}

/// Triangles straddling the seam have their low side shifted past 1 so they
/// interpolate across the seam instead of across the whole map.
fn correct_seam(uvs: &mut [[f32; 2]]) {
    for tri in uvs.chunks_exact_mut(3) {
        let max = tri.iter().map(|uv| uv[0]).fold(f32::MIN, f32::max);
        let min = tri.iter().map(|uv| uv[0]).fold(f32::MAX, f32::min);
        if max > 0.9 && min < 0.1 {
            for uv in tri.iter_mut().filter(|uv| uv[0] < 0.2) {
                uv[0] += 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_clamped_to_index_range() {
        assert_eq!(clamp_detail(3), 3);
        assert_eq!(clamp_detail(MAX_DETAIL), MAX_DETAIL);
        assert_eq!(clamp_detail(u32::MAX), MAX_DETAIL);
        let max_vertices = Geometry::triangles_for(MAX_DETAIL) * 3;
        assert!(u32::try_from(max_vertices).is_ok());
    }

    #[test]
    fn test_triangle_count_follows_detail() {
        for detail in [0, 1, 2, 5, 12] {
            let geometry = Geometry::icosahedron(1.0, detail);
            let expected = 20 * (detail as usize + 1).pow(2);
            assert_eq!(geometry.triangle_count(), expected, "detail {detail}");
            assert_eq!(Geometry::triangles_for(detail), expected);
            assert_eq!(geometry.vertices().len(), expected * 3);
        }
    }

    #[test]
    fn test_vertices_on_sphere_of_radius() {
        for radius in [1.0, 2.5] {
            let geometry = Geometry::icosahedron(radius, 4);
            for v in geometry.vertices() {
                let len = Vec3::from_array(v.position).length();
                assert!(
                    (len - radius).abs() < 1e-5,
                    "vertex at {len}, expected {radius}"
                );
            }
        }
    }

    #[test]
    fn test_indices_are_sequential() {
        let geometry = Geometry::icosahedron(1.0, 2);
        for (i, &index) in geometry.indices().iter().enumerate() {
            assert_eq!(index as usize, i);
        }
    }

    #[test]
    fn test_uv_ranges() {
        let geometry = Geometry::icosahedron(1.0, 12);
        for v in geometry.vertices() {
            let [u, w] = v.uv;
            assert!((0.0..1.2).contains(&u), "u out of range: {u}");
            assert!((0.0..=1.0).contains(&w), "v out of range: {w}");
        }
    }

    #[test]
    fn test_no_triangle_spans_whole_map() {
        let geometry = Geometry::icosahedron(1.0, 12);
        // Triangles touching the poles legitimately fan across many longitudes.
        let away_from_poles = |tri: &&[VertexPositionNormalUv]| {
            tri.iter().all(|v| v.position[1].abs() < 0.95)
        };
        for tri in geometry.vertices().chunks_exact(3).filter(away_from_poles) {
            let us: Vec<f32> = tri.iter().map(|v| v.uv[0]).collect();
            let span = us.iter().copied().fold(f32::MIN, f32::max)
                - us.iter().copied().fold(f32::MAX, f32::min);
            assert!(span < 0.5, "triangle spans {span} of the map: {us:?}");
        }
    }

    #[test]
    fn test_north_pole_maps_to_top_row() {
        let geometry = Geometry::icosahedron(1.0, 12);
        let top = geometry
            .vertices()
            .iter()
            .max_by(|a, b| a.position[1].total_cmp(&b.position[1]))
            .unwrap();
        assert!(top.uv[1] < 0.05, "topmost vertex at v = {}", top.uv[1]);
    }

    #[test]
    fn test_smooth_normals_point_outward() {
        let geometry = Geometry::icosahedron(2.0, 3);
        for v in geometry.vertices() {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((n - p / 2.0).length() < 1e-5);
        }
    }

    #[test]
    fn test_flat_normals_at_detail_zero() {
        let geometry = Geometry::icosahedron(1.0, 0);
        for tri in geometry.vertices().chunks_exact(3) {
            let centroid = tri
                .iter()
                .map(|v| Vec3::from_array(v.position))
                .sum::<Vec3>()
                / 3.0;
            for v in tri {
                let n = Vec3::from_array(v.normal);
                assert_eq!(n, Vec3::from_array(tri[0].normal));
                assert!(n.dot(centroid) > 0.0, "face normal points inward");
            }
        }
    }

    #[test]
    fn test_winding_is_counter_clockwise_from_outside() {
        let geometry = Geometry::icosahedron(1.0, 3);
        for tri in geometry.vertices().chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|i| Vec3::from_array(tri[i].position));
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.dot(a + b + c) > 0.0);
        }
    }
}
