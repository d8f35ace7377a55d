/// Renderer: binds a mesh to a backend and decides what to draw each frame.
///
/// The renderer never touches pixels. It keeps the orientation state, picks
/// one of three ways of submitting the mesh, and hands the resulting draw
/// calls to a [`Backend`].
use std::ops::Range;

use nalgebra::Matrix4;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Color, Face, Mesh, PrimitiveKind, Vertex};
use crate::projection::Camera;
use crate::transform::{OrientationState, Transform};

/// Smallest zoom factor used when scaling the model
pub const MIN_ZOOM: f32 = 0.05;

/// How mesh geometry is submitted to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawStrategy {
    /// Look up every vertex of every face each frame
    #[default]
    Immediate,
    /// Record the immediate draw calls once and replay them
    Precompiled,
    /// Upload one interleaved vertex buffer and draw faces by index
    Batched,
}

/// The host graphics layer.
///
/// Draw calls pass a primitive kind with a variable number of vertices or
/// indices: triangles come in groups of three, quads in groups of four, and
/// a polygon is one fan over everything passed.
pub trait Backend {
    fn set_viewport(&mut self, width: u32, height: u32);

    fn set_projection(&mut self, projection: &Matrix4<f32>);

    fn set_culling(&mut self, cull_back_faces: bool);

    /// Start a frame with the given view and model transforms.
    fn begin_frame(&mut self, view: &Matrix4<f32>, model: &Matrix4<f32>);

    fn draw_vertices(&mut self, kind: PrimitiveKind, color: Color, vertices: &[Vertex]);

    /// Replace the vertex buffer used by [`Backend::draw_elements`].
    ///
    /// The data holds `[nx, ny, nz, x, y, z]` per vertex.
    fn bind_vertex_buffer(&mut self, interleaved: &[f32]);

    fn draw_elements(&mut self, kind: PrimitiveKind, color: Color, indices: &[u32]);

    /// Finish and present the frame.
    fn end_frame(&mut self);
}

/// One recorded draw call with its vertices already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub kind: PrimitiveKind,
    pub color: Color,
    pub vertices: Vec<Vertex>,
}

/// A replayable recording of the immediate draw calls for a mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Record one command per face.
    pub fn record(mesh: &Mesh) -> RenderResult<Self> {
        let commands = mesh
            .faces()
            .iter()
            .enumerate()
            .map(|(face_index, face)| {
                let mut vertices = Vec::with_capacity(face.indices().len());
                resolve_face(mesh, face_index, face, &mut vertices)?;
                Ok(DrawCommand {
                    kind: face.kind(),
                    color: face.color(),
                    vertices,
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn replay<B: Backend>(&self, backend: &mut B) {
        for command in &self.commands {
            backend.draw_vertices(command.kind, command.color, &command.vertices);
        }
    }
}

#[derive(Debug, Clone)]
struct BatchedDraw {
    kind: PrimitiveKind,
    color: Color,
    range: Range<usize>,
}

/// Interleaved vertex data plus one index slice per face
#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    interleaved: Vec<f32>,
    indices: Vec<u32>,
    draws: Vec<BatchedDraw>,
}

impl VertexBatch {
    /// Flatten a mesh, checking every face index against the vertex count.
    pub fn build(mesh: &Mesh) -> RenderResult<Self> {
        let interleaved = mesh
            .vertices()
            .iter()
            .flat_map(|vertex| vertex.interleaved())
            .collect();

        let mut indices = Vec::new();
        let mut draws = Vec::with_capacity(mesh.face_count());
        for (face_index, face) in mesh.faces().iter().enumerate() {
            check_indices(mesh, face_index, face)?;
            let start = indices.len();
            indices.extend_from_slice(face.indices());
            draws.push(BatchedDraw {
                kind: face.kind(),
                color: face.color(),
                range: start..indices.len(),
            });
        }

        Ok(Self {
            interleaved,
            indices,
            draws,
        })
    }

    pub fn interleaved(&self) -> &[f32] {
        &self.interleaved
    }

    pub fn draw_count(&self) -> usize {
        self.draws.len()
    }

    fn draw<B: Backend>(&self, backend: &mut B) {
        for draw in &self.draws {
            backend.draw_elements(draw.kind, draw.color, &self.indices[draw.range.clone()]);
        }
    }
}

/// Strategy-specific state built when a mesh is bound
#[derive(Debug, Clone)]
enum Prepared {
    Immediate,
    Precompiled(DrawList),
    Batched(VertexBatch),
}

/// Draws one bound mesh through a backend.
///
/// The mesh is borrowed for the renderer's whole life and cannot change
/// underneath it. To draw different data, hand the renderer the new mesh
/// with [`Renderer::rebind`], which rebuilds any precomputed state.
pub struct Renderer<'a, B: Backend> {
    mesh: &'a Mesh,
    backend: B,
    strategy: DrawStrategy,
    prepared: Prepared,
    culling: bool,
    width: u32,
    height: u32,
    camera: Camera,
    orientation: OrientationState,
    scratch: Vec<Vertex>,
}

impl<'a, B: Backend> Renderer<'a, B> {
    /// Bind a mesh and prepare the chosen strategy.
    pub fn bind(
        mesh: &'a Mesh,
        backend: B,
        cull_back_faces: bool,
        strategy: DrawStrategy,
        width: u32,
        height: u32,
    ) -> RenderResult<Self> {
        let mut renderer = Self {
            mesh,
            backend,
            strategy,
            prepared: Prepared::Immediate,
            culling: cull_back_faces,
            width,
            height,
            camera: Camera::new(width, height),
            orientation: OrientationState::new(),
            scratch: Vec::new(),
        };

        renderer.rebuild()?;
        renderer.resize(width, height);
        renderer.backend.set_culling(cull_back_faces);

        log::info!(
            "bound mesh with {} vertices and {} faces using {:?}",
            mesh.vertex_count(),
            mesh.face_count(),
            strategy
        );
        Ok(renderer)
    }

    /// Rebuild the active strategy's precomputed state from the mesh.
    ///
    /// Every strategy checks the face indices here, so a mesh that binds
    /// under one strategy binds under all of them.
    pub fn rebuild(&mut self) -> RenderResult<()> {
        self.prepared = match self.strategy {
            DrawStrategy::Immediate => {
                for (face_index, face) in self.mesh.faces().iter().enumerate() {
                    check_indices(self.mesh, face_index, face)?;
                }
                Prepared::Immediate
            }
            DrawStrategy::Precompiled => {
                let list = DrawList::record(self.mesh)?;
                log::debug!("recorded draw list with {} commands", list.commands().len());
                Prepared::Precompiled(list)
            }
            DrawStrategy::Batched => {
                let batch = VertexBatch::build(self.mesh)?;
                self.backend.bind_vertex_buffer(batch.interleaved());
                log::debug!("built vertex batch with {} draws", batch.draw_count());
                Prepared::Batched(batch)
            }
        };
        Ok(())
    }

    /// Draw a different mesh from now on, keeping orientation and viewport.
    pub fn rebind(&mut self, mesh: &'a Mesh) -> RenderResult<()> {
        let previous = std::mem::replace(&mut self.mesh, mesh);
        if let Err(err) = self.rebuild() {
            self.mesh = previous;
            self.rebuild()?;
            return Err(err);
        }
        Ok(())
    }

    /// Switch strategy and rebuild its state.
    ///
    /// On failure the previous strategy stays active.
    pub fn set_strategy(&mut self, strategy: DrawStrategy) -> RenderResult<()> {
        let previous = self.strategy;
        self.strategy = strategy;
        if let Err(err) = self.rebuild() {
            self.strategy = previous;
            self.rebuild()?;
            return Err(err);
        }
        Ok(())
    }

    /// Track a new viewport size and recompute the projection.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.camera.set_viewport(width, height);
        self.backend.set_viewport(width, height);
        self.backend.set_projection(&self.camera.projection_matrix());
    }

    pub fn set_culling(&mut self, cull_back_faces: bool) {
        self.culling = cull_back_faces;
        self.backend.set_culling(cull_back_faces);
    }

    /// Return the view to its starting orientation and zoom.
    pub fn reset(&mut self) {
        self.orientation.reset();
    }

    /// Model transform for the next frame: zoom, then orientation.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Transform::scale_matrix(self.orientation.zoom().max(MIN_ZOOM))
            * self.orientation.composed_transform()
    }

    /// Draw one frame.
    ///
    /// A frame that was begun is always ended, even when a face lookup
    /// fails part way through.
    pub fn render(&mut self) -> RenderResult<()> {
        self.backend.set_culling(self.culling);
        let model = self.model_matrix();
        self.backend.begin_frame(&self.camera.view_matrix(), &model);

        let drawn = match &self.prepared {
            Prepared::Immediate => draw_immediate(self.mesh, &mut self.backend, &mut self.scratch),
            Prepared::Precompiled(list) => {
                list.replay(&mut self.backend);
                Ok(())
            }
            Prepared::Batched(batch) => {
                batch.draw(&mut self.backend);
                Ok(())
            }
        };

        self.backend.end_frame();
        drawn
    }

    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    pub fn strategy(&self) -> DrawStrategy {
        self.strategy
    }

    pub fn culling(&self) -> bool {
        self.culling
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn orientation(&self) -> &OrientationState {
        &self.orientation
    }

    pub fn orientation_mut(&mut self) -> &mut OrientationState {
        &mut self.orientation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn draw_immediate<B: Backend>(
    mesh: &Mesh,
    backend: &mut B,
    scratch: &mut Vec<Vertex>,
) -> RenderResult<()> {
    for (face_index, face) in mesh.faces().iter().enumerate() {
        scratch.clear();
        resolve_face(mesh, face_index, face, scratch)?;
        backend.draw_vertices(face.kind(), face.color(), scratch);
    }
    Ok(())
}

fn check_indices(mesh: &Mesh, face_index: usize, face: &Face) -> RenderResult<()> {
    let vertex_count = mesh.vertex_count();
    match face
        .indices()
        .iter()
        .find(|&&index| index as usize >= vertex_count)
    {
        Some(&index) => Err(RenderError::IndexOutOfRange {
            face: face_index,
            index,
            vertex_count,
        }),
        None => Ok(()),
    }
}

fn resolve_face(
    mesh: &Mesh,
    face_index: usize,
    face: &Face,
    out: &mut Vec<Vertex>,
) -> RenderResult<()> {
    for &index in face.indices() {
        let vertex = mesh
            .vertex_at(index as usize)
            .map_err(|_| RenderError::IndexOutOfRange {
                face: face_index,
                index,
                vertex_count: mesh.vertex_count(),
            })?;
        out.push(*vertex);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::FaceMerger;
    use crate::transform::Axis;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Viewport(u32, u32),
        Projection,
        Culling(bool),
        Begin(Matrix4<f32>),
        Vertices(PrimitiveKind, Color, Vec<Vertex>),
        Bind(Vec<f32>),
        Elements(PrimitiveKind, Color, Vec<u32>),
        End,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        buffer: Vec<f32>,
    }

    impl Recorder {
        /// Vertices drawn since the last `Begin`, resolved through the
        /// bound buffer for indexed draws.
        fn drawn(&self) -> Vec<(PrimitiveKind, Color, Vec<Vertex>)> {
            let start = self
                .calls
                .iter()
                .rposition(|c| matches!(c, Call::Begin(_)))
                .unwrap();
            self.calls[start..]
                .iter()
                .filter_map(|call| match call {
                    Call::Vertices(kind, color, vertices) => {
                        Some((*kind, *color, vertices.clone()))
                    }
                    Call::Elements(kind, color, indices) => Some((
                        *kind,
                        *color,
                        indices
                            .iter()
                            .map(|&i| {
                                let at = i as usize * 6;
                                let chunk: [f32; 6] =
                                    self.buffer[at..at + 6].try_into().unwrap();
                                Vertex::from_interleaved(&chunk)
                            })
                            .collect(),
                    )),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(*c)).count()
        }
    }

    impl Backend for Recorder {
        fn set_viewport(&mut self, width: u32, height: u32) {
            self.calls.push(Call::Viewport(width, height));
        }

        fn set_projection(&mut self, _projection: &Matrix4<f32>) {
            self.calls.push(Call::Projection);
        }

        fn set_culling(&mut self, cull_back_faces: bool) {
            self.calls.push(Call::Culling(cull_back_faces));
        }

        fn begin_frame(&mut self, _view: &Matrix4<f32>, model: &Matrix4<f32>) {
            self.calls.push(Call::Begin(*model));
        }

        fn draw_vertices(&mut self, kind: PrimitiveKind, color: Color, vertices: &[Vertex]) {
            self.calls.push(Call::Vertices(kind, color, vertices.to_vec()));
        }

        fn bind_vertex_buffer(&mut self, interleaved: &[f32]) {
            self.buffer = interleaved.to_vec();
            self.calls.push(Call::Bind(interleaved.to_vec()));
        }

        fn draw_elements(&mut self, kind: PrimitiveKind, color: Color, indices: &[u32]) {
            self.calls.push(Call::Elements(kind, color, indices.to_vec()));
        }

        fn end_frame(&mut self) {
            self.calls.push(Call::End);
        }
    }

    fn square_mesh() -> Mesh {
        let mut mesh = Mesh::new(5, 3).unwrap();
        mesh.append_vertex(Vertex::new(-1.0, -1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(1.0, -1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(1.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(-1.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(0.0, 2.0, 0.0, 0.0, 0.0, 1.0));
        let red = Color::new(1.0, 0.0, 0.0, 0.0);
        mesh.append_face(Face::new(vec![0, 1, 2], red));
        mesh.append_face(Face::new(vec![0, 2, 3], red));
        mesh.append_face(Face::new(vec![3, 2, 4, 0, 1], Color::default()));
        mesh
    }

    fn frame(mesh: &Mesh, strategy: DrawStrategy) -> Vec<(PrimitiveKind, Color, Vec<Vertex>)> {
        let mut renderer =
            Renderer::bind(mesh, Recorder::default(), false, strategy, 64, 64).unwrap();
        renderer.render().unwrap();
        renderer.backend().drawn()
    }

    #[test]
    fn test_strategies_draw_the_same_geometry() {
        let mesh = square_mesh();
        let immediate = frame(&mesh, DrawStrategy::Immediate);
        assert_eq!(immediate.len(), 3);
        assert_eq!(immediate[0].2.len(), 3);
        assert_eq!(immediate[2].0, PrimitiveKind::Polygon);

        assert_eq!(frame(&mesh, DrawStrategy::Precompiled), immediate);
        assert_eq!(frame(&mesh, DrawStrategy::Batched), immediate);
    }

    #[test]
    fn test_render_sequence() {
        let mesh = square_mesh();
        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), true, DrawStrategy::Immediate, 80, 40)
                .unwrap();
        assert!(renderer
            .backend()
            .calls
            .contains(&Call::Viewport(80, 40)));

        renderer.backend_mut().calls.clear();
        renderer.render().unwrap();

        let calls = &renderer.backend().calls;
        assert_eq!(calls[0], Call::Culling(true));
        assert!(matches!(calls[1], Call::Begin(_)));
        assert_eq!(calls.last(), Some(&Call::End));
        assert_eq!(calls.len(), 2 + 3 + 1);
    }

    #[test]
    fn test_precompiled_does_not_touch_mesh_per_frame() {
        let mesh = square_mesh();
        let mut renderer = Renderer::bind(
            &mesh,
            Recorder::default(),
            false,
            DrawStrategy::Precompiled,
            64,
            64,
        )
        .unwrap();
        match &renderer.prepared {
            Prepared::Precompiled(list) => assert_eq!(list.commands().len(), 3),
            other => panic!("unexpected state {other:?}"),
        }
        renderer.render().unwrap();
        renderer.render().unwrap();
        assert_eq!(renderer.backend().count(|c| matches!(c, Call::End)), 2);
    }

    #[test]
    fn test_batched_uploads_buffer_once() {
        let mesh = square_mesh();
        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), false, DrawStrategy::Batched, 64, 64)
                .unwrap();
        renderer.render().unwrap();
        renderer.render().unwrap();

        let backend = renderer.backend();
        assert_eq!(backend.count(|c| matches!(c, Call::Bind(_))), 1);
        assert_eq!(backend.buffer.len(), 5 * 6);
        assert_eq!(backend.count(|c| matches!(c, Call::Elements(..))), 6);
    }

    #[test]
    fn test_batched_after_merge_uses_fewer_draws() {
        let mut mesh = square_mesh();
        FaceMerger::optimize(&mut mesh);

        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), false, DrawStrategy::Batched, 64, 64)
                .unwrap();
        renderer.render().unwrap();

        let drawn = renderer.backend().drawn();
        assert_eq!(drawn.len(), 2);
        assert_eq!(drawn[0].0, PrimitiveKind::Triangle);
        assert_eq!(drawn[0].2.len(), 6);
    }

    #[test]
    fn test_set_strategy_rebuilds() {
        let mesh = square_mesh();
        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), false, DrawStrategy::Immediate, 64, 64)
                .unwrap();
        assert_eq!(renderer.backend().count(|c| matches!(c, Call::Bind(_))), 0);

        renderer.set_strategy(DrawStrategy::Batched).unwrap();
        assert_eq!(renderer.strategy(), DrawStrategy::Batched);
        assert_eq!(renderer.backend().count(|c| matches!(c, Call::Bind(_))), 1);

        renderer.set_strategy(DrawStrategy::Precompiled).unwrap();
        assert!(matches!(renderer.prepared, Prepared::Precompiled(_)));
    }

    fn broken_mesh() -> Mesh {
        let mut mesh = Mesh::new(3, 2).unwrap();
        mesh.append_vertex(Vertex::new(0.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(1.0, 0.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_vertex(Vertex::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0));
        mesh.append_face(Face::new(vec![0, 1, 2], Color::default()));
        mesh.append_face(Face::new(vec![0, 1, 7], Color::default()));
        mesh
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let mesh = broken_mesh();

        for strategy in [
            DrawStrategy::Immediate,
            DrawStrategy::Precompiled,
            DrawStrategy::Batched,
        ] {
            let result = Renderer::bind(&mesh, Recorder::default(), false, strategy, 64, 64);
            assert!(matches!(
                result,
                Err(RenderError::IndexOutOfRange {
                    face: 1,
                    index: 7,
                    vertex_count: 3
                })
            ));
        }
    }

    #[test]
    fn test_failed_frame_is_still_ended() {
        let square = square_mesh();
        let broken = broken_mesh();
        let mut renderer =
            Renderer::bind(&square, Recorder::default(), false, DrawStrategy::Immediate, 64, 64)
                .unwrap();

        // Swap the mesh without the rebuild that would reject it
        renderer.mesh = &broken;
        assert!(matches!(
            renderer.render(),
            Err(RenderError::IndexOutOfRange { face: 1, index: 7, .. })
        ));

        let backend = renderer.backend();
        assert_eq!(backend.count(|c| matches!(c, Call::Begin(_))), 1);
        assert_eq!(backend.count(|c| matches!(c, Call::End)), 1);
        assert_eq!(backend.calls.last(), Some(&Call::End));
    }

    #[test]
    fn test_rebind_rebuilds_for_new_mesh() {
        let square = square_mesh();
        let broken = broken_mesh();
        let mut merged = square_mesh();
        FaceMerger::optimize(&mut merged);

        let mut renderer = Renderer::bind(
            &square,
            Recorder::default(),
            false,
            DrawStrategy::Precompiled,
            64,
            64,
        )
        .unwrap();
        renderer.orientation_mut().zoom_by(0.5);

        renderer.rebind(&merged).unwrap();
        renderer.render().unwrap();

        assert_eq!(renderer.backend().drawn().len(), 2);
        assert_eq!(renderer.orientation().zoom(), 1.5);

        assert!(renderer.rebind(&broken).is_err());
        assert_eq!(renderer.mesh().face_count(), 2);
    }

    #[test]
    fn test_failed_rebind_keeps_previous_state() {
        let square = square_mesh();
        let broken = broken_mesh();
        let mut renderer =
            Renderer::bind(&square, Recorder::default(), false, DrawStrategy::Batched, 64, 64)
                .unwrap();

        assert!(renderer.rebind(&broken).is_err());
        assert_eq!(renderer.strategy(), DrawStrategy::Batched);
        renderer.render().unwrap();
        assert_eq!(renderer.backend().drawn().len(), 3);
    }

    #[test]
    fn test_model_matrix_follows_orientation_and_zoom() {
        let mesh = square_mesh();
        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), false, DrawStrategy::Immediate, 64, 64)
                .unwrap();
        assert_eq!(renderer.model_matrix(), Matrix4::identity());

        renderer.orientation_mut().advance_automatic(90.0, Axis::Z);
        renderer.orientation_mut().zoom_by(1.0);
        let expected =
            Transform::scale_matrix(2.0) * Transform::axis_rotation(90.0, Axis::Z);
        assert!((renderer.model_matrix() - expected).norm() < 1e-5);

        renderer.orientation_mut().zoom_by(-10.0);
        let clamped =
            Transform::scale_matrix(MIN_ZOOM) * Transform::axis_rotation(90.0, Axis::Z);
        assert!((renderer.model_matrix() - clamped).norm() < 1e-6);

        renderer.reset();
        assert!((renderer.model_matrix() - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_resize_leaves_orientation_alone() {
        let mesh = square_mesh();
        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), false, DrawStrategy::Immediate, 64, 64)
                .unwrap();
        renderer.orientation_mut().advance_automatic(30.0, Axis::Y);
        let before = renderer.orientation().clone();

        renderer.resize(120, 60);

        assert_eq!(renderer.viewport(), (120, 60));
        assert_eq!(renderer.orientation(), &before);
        assert!((renderer.camera().aspect - 2.0).abs() < 1e-6);
        assert!(renderer
            .backend()
            .calls
            .ends_with(&[Call::Viewport(120, 60), Call::Projection]));
    }

    #[test]
    fn test_set_culling_forwards() {
        let mesh = square_mesh();
        let mut renderer =
            Renderer::bind(&mesh, Recorder::default(), false, DrawStrategy::Immediate, 64, 64)
                .unwrap();
        renderer.set_culling(true);
        assert!(renderer.culling());
        assert_eq!(renderer.backend().calls.last(), Some(&Call::Culling(true)));
    }
}
