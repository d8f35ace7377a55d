/// ASCII rasterizer backend for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use offview_core::geometry::INTERLEAVED_STRIDE;
use offview_core::{Backend, Color as FaceColor, PrimitiveKind, Transform, Vertex};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide. Viewport
/// heights are given in half-cells so the projection keeps square pixels.
pub const CELL_ASPECT: u32 = 2;

/// Directional light shining from (5, 5, 5) towards the origin
const LIGHT_POSITION: [f32; 3] = [5.0, 5.0, 5.0];

/// Floor for the color intensity so unlit faces stay visible
const AMBIENT: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Option<(u8, u8, u8)>,
}

impl Cell {
    const BLANK: Cell = Cell {
        character: ' ',
        color: None,
    };
}

/// Screen-space vertex: cell coordinates, NDC depth, world-space normal
type Projected = (f32, f32, f32, Vector3<f32>);

/// Backend that rasterizes triangles into a character grid
pub struct AsciiBackend {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    back_buffer: Vec<Cell>,
    front_buffer: Vec<Cell>,
    projection: Matrix4<f32>,
    view: Matrix4<f32>,
    mvp: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    culling: bool,
    vertex_buffer: Vec<Vertex>,
    scratch: Vec<Vertex>,
    frames_presented: u64,
}

impl AsciiBackend {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            depth_buffer: Vec::new(),
            back_buffer: Vec::new(),
            front_buffer: Vec::new(),
            projection: Matrix4::identity(),
            view: Matrix4::identity(),
            mvp: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            culling: false,
            vertex_buffer: Vec::new(),
            scratch: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Grid size in character cells
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Character shown at a cell of the last presented frame
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.front_buffer[y * self.width + x].character)
    }

    /// Number of non-blank cells in the last presented frame
    pub fn covered_cells(&self) -> usize {
        self.front_buffer
            .iter()
            .filter(|cell| cell.character != ' ')
            .count()
    }

    fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.back_buffer.fill(Cell::BLANK);
    }

    fn project(&self, vertex: &Vertex) -> Option<Projected> {
        let clip = self.mvp * vertex.position.to_homogeneous();

        // Behind the eye or on the eye plane
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = Point3::from_homogeneous(clip)?;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        let screen_x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let screen_y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        let normal = self.normal_matrix * vertex.normal;

        Some((screen_x, screen_y, ndc.z, normal))
    }

    /// Split a primitive list into triangles and rasterize each one
    fn draw_primitives(&mut self, kind: PrimitiveKind, color: FaceColor, vertices: &[Vertex]) {
        let projected: Vec<Option<Projected>> =
            vertices.iter().map(|v| self.project(v)).collect();

        let mut triangle = |a: usize, b: usize, c: usize| {
            if let (Some(pa), Some(pb), Some(pc)) = (projected[a], projected[b], projected[c]) {
                self.render_triangle([pa, pb, pc], color);
            }
        };

        match kind {
            PrimitiveKind::Triangle => {
                for base in (0..vertices.len() / 3).map(|i| i * 3) {
                    triangle(base, base + 1, base + 2);
                }
            }
            PrimitiveKind::Quad => {
                for base in (0..vertices.len() / 4).map(|i| i * 4) {
                    triangle(base, base + 1, base + 2);
                    triangle(base, base + 2, base + 3);
                }
            }
            PrimitiveKind::Polygon => {
                for i in 1..vertices.len().saturating_sub(1) {
                    triangle(0, i, i + 1);
                }
            }
        }
    }

    fn render_triangle(&mut self, coords: [Projected; 3], color: FaceColor) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Counter-clockwise on screen (with y pointing up) faces the viewer
        let area = (v1.0 - v0.0) * (v0.1 - v2.1) - (v2.0 - v0.0) * (v0.1 - v1.1);
        if self.culling && area <= 0.0 {
            return;
        }

        // Smooth normals averaged into one flat shade per triangle
        let normal = v0.3 + v1.3 + v2.3;
        let brightness = normal
            .try_normalize(f32::MIN_POSITIVE)
            .map(|n| n.dot(&Vector3::from(LIGHT_POSITION).normalize()).max(0.0))
            .unwrap_or(0.0);

        // Covered cells always get at least the dimmest visible character
        let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
        let char_index = 1 + (brightness * steps).round() as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        let intensity = AMBIENT + (1.0 - AMBIENT) * brightness;
        let channel = |c: f32| ((c * intensity).clamp(0.0, 1.0) * 255.0).round() as u8;
        let cell = Cell {
            character,
            color: Some((channel(color.r), channel(color.g), channel(color.b))),
        };

        let screen = [(v0.0, v0.1, v0.2), (v1.0, v1.1, v1.2), (v2.0, v2.1, v2.2)];
        self.rasterize_triangle(&screen, cell);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.back_buffer[idx] = cell;
                        }
                    }
                }
            }
        }
    }

    /// Write the last presented frame, starting at the top-left corner
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.front_buffer[y * self.width + x];
                let color = match cell.color {
                    Some((r, g, b)) => Color::Rgb { r, g, b },
                    None => Color::Reset,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Default for AsciiBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for AsciiBackend {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.width = width as usize;
        self.height = (height / CELL_ASPECT) as usize;
        let size = self.width * self.height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.back_buffer = vec![Cell::BLANK; size];
        self.front_buffer = vec![Cell::BLANK; size];
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.projection = *projection;
    }

    fn set_culling(&mut self, cull_back_faces: bool) {
        self.culling = cull_back_faces;
    }

    fn begin_frame(&mut self, view: &Matrix4<f32>, model: &Matrix4<f32>) {
        self.clear();
        self.view = *view;
        self.mvp = Transform::mvp_matrix(model, &self.view, &self.projection);
        self.normal_matrix = model.fixed_view::<3, 3>(0, 0).into_owned();
    }

    fn draw_vertices(&mut self, kind: PrimitiveKind, color: FaceColor, vertices: &[Vertex]) {
        self.draw_primitives(kind, color, vertices);
    }

    fn bind_vertex_buffer(&mut self, interleaved: &[f32]) {
        self.vertex_buffer = interleaved
            .chunks_exact(INTERLEAVED_STRIDE)
            .filter_map(|chunk| <&[f32; INTERLEAVED_STRIDE]>::try_from(chunk).ok())
            .map(Vertex::from_interleaved)
            .collect();
    }

    fn draw_elements(&mut self, kind: PrimitiveKind, color: FaceColor, indices: &[u32]) {
        let mut scratch = std::mem::take(&mut self.scratch);
        scratch.clear();
        for &index in indices {
            match self.vertex_buffer.get(index as usize) {
                Some(vertex) => scratch.push(*vertex),
                None => {
                    log::warn!("index {} past the bound vertex buffer, skipping draw", index);
                    self.scratch = scratch;
                    return;
                }
            }
        }
        self.draw_primitives(kind, color, &scratch);
        self.scratch = scratch;
    }

    fn end_frame(&mut self) {
        std::mem::swap(&mut self.front_buffer, &mut self.back_buffer);
        self.frames_presented += 1;
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use offview_core::{Axis, DrawStrategy, Face, Mesh, Renderer};

    /// A unit square facing +Z, wound counter-clockwise
    fn square(winding_ccw: bool) -> Mesh {
        let mut mesh = Mesh::new(4, 1).unwrap();
        mesh.append_vertex(Vertex::new(-1.0, -1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(1.0, -1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(1.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(-1.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        let indices = if winding_ccw {
            vec![0, 1, 2, 3]
        } else {
            vec![3, 2, 1, 0]
        };
        mesh.append_face(Face::new(indices, FaceColor::new(0.0, 1.0, 0.0, 0.0)));
        mesh
    }

    fn covered(mesh: &Mesh, strategy: DrawStrategy, cull: bool) -> usize {
        let mut renderer =
            Renderer::bind(mesh, AsciiBackend::new(), cull, strategy, 40, 40).unwrap();
        renderer.render().unwrap();
        renderer.backend().covered_cells()
    }

    #[test]
    fn test_viewport_halves_rows() {
        let mut backend = AsciiBackend::new();
        backend.set_viewport(80, 48);
        assert_eq!(backend.size(), (80, 24));
    }

    #[test]
    fn test_square_covers_center() {
        let mesh = square(true);
        let mut renderer =
            Renderer::bind(&mesh, AsciiBackend::new(), false, DrawStrategy::Immediate, 40, 40)
                .unwrap();
        renderer.render().unwrap();

        let backend = renderer.backend();
        assert_eq!(backend.frames_presented(), 1);
        assert_ne!(backend.char_at(20, 10), Some(' '));
        assert_eq!(backend.char_at(0, 0), Some(' '));
        assert_eq!(backend.char_at(40, 0), None);
    }

    #[test]
    fn test_all_strategies_cover_the_same_cells() {
        let mesh = square(true);
        let immediate = covered(&mesh, DrawStrategy::Immediate, false);
        assert!(immediate > 0);
        assert_eq!(covered(&mesh, DrawStrategy::Precompiled, false), immediate);
        assert_eq!(covered(&mesh, DrawStrategy::Batched, false), immediate);
    }

    #[test]
    fn test_culling_drops_back_faces() {
        let front = square(true);
        let back = square(false);
        assert!(covered(&front, DrawStrategy::Immediate, true) > 0);
        assert_eq!(covered(&back, DrawStrategy::Immediate, true), 0);
        assert!(covered(&back, DrawStrategy::Immediate, false) > 0);
    }

    #[test]
    fn test_edge_on_square_is_invisible() {
        let mesh = square(true);
        let mut renderer =
            Renderer::bind(&mesh, AsciiBackend::new(), false, DrawStrategy::Immediate, 40, 40)
                .unwrap();
        renderer.orientation_mut().advance_automatic(90.0, Axis::Y);
        renderer.render().unwrap();
        assert!(renderer.backend().covered_cells() <= 20);
    }

    #[test]
    fn test_bad_index_in_buffer_is_skipped() {
        let mut backend = AsciiBackend::new();
        backend.set_viewport(10, 10);
        backend.bind_vertex_buffer(&Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0).interleaved());
        backend.begin_frame(&Matrix4::identity(), &Matrix4::identity());
        backend.draw_elements(PrimitiveKind::Triangle, FaceColor::default(), &[0, 0, 5]);
        backend.end_frame();
        assert_eq!(backend.covered_cells(), 0);
    }
}
