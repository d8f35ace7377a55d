/// Geometry primitives: vertices, faces and the fixed-capacity mesh
use nalgebra::{Point3, Vector3};

use crate::error::{MeshError, MeshResult};

/// Gray used for faces that carry no color channels
pub const DEFAULT_GRAY: f32 = 0.6;

/// Floats per vertex in the interleaved layout (normal then position)
pub const INTERLEAVED_STRIDE: usize = 6;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    /// The vertex as `[nx, ny, nz, x, y, z]`
    pub fn interleaved(&self) -> [f32; INTERLEAVED_STRIDE] {
        [
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.position.x,
            self.position.y,
            self.position.z,
        ]
    }

    /// Inverse of [`Vertex::interleaved`]
    pub fn from_interleaved(data: &[f32; INTERLEAVED_STRIDE]) -> Self {
        Self::new(data[3], data[4], data[5], data[0], data[1], data[2])
    }
}

/// Flat RGBA face color, channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from however many channels a source supplied.
    ///
    /// No channels gives [`DEFAULT_GRAY`]. Missing RGB channels are copied
    /// from the first one, and alpha is 0 unless a fourth channel is given.
    /// Anything past four channels is ignored.
    pub fn from_channels(channels: &[f32]) -> Self {
        let mut rgba = [0.0; 4];
        let supplied = channels.len().min(4);
        rgba[..supplied].copy_from_slice(&channels[..supplied]);

        if supplied == 0 {
            rgba[0] = DEFAULT_GRAY;
        }
        for i in supplied.max(1)..3 {
            rgba[i] = rgba[0];
        }

        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Exact equality on red, green and blue. Alpha is not compared.
    pub fn same_rgb(&self, other: &Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_channels(&[])
    }
}

/// How a face's index list is submitted to the graphics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Triangle,
    Quad,
    Polygon,
}

impl PrimitiveKind {
    pub fn from_index_count(count: usize) -> Self {
        match count {
            3 => PrimitiveKind::Triangle,
            4 => PrimitiveKind::Quad,
            _ => PrimitiveKind::Polygon,
        }
    }

    /// Whether faces of this kind can be concatenated into one draw call.
    pub fn is_mergeable(&self) -> bool {
        !matches!(self, PrimitiveKind::Polygon)
    }
}

/// A face: an ordered list of vertex indices drawn with one flat color.
///
/// The primitive kind is fixed from the index count at construction and
/// stays the same even after other faces' indices are merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    indices: Vec<u32>,
    kind: PrimitiveKind,
    color: Color,
}

impl Face {
    pub fn new(indices: Vec<u32>, color: Color) -> Self {
        let kind = PrimitiveKind::from_index_count(indices.len());
        Self {
            indices,
            kind,
            color,
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Move another face's indices onto the end of this one.
    pub(crate) fn absorb(&mut self, other: Face) {
        self.indices.extend(other.indices);
    }
}

/// A growable array that never grows past the capacity it was created with.
///
/// Pushing into a full store is a silent no-op.
#[derive(Debug, Clone)]
pub struct Store<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Store<T> {
    /// Create a store and reserve all of its capacity up front.
    pub fn with_capacity(capacity: usize, what: &'static str) -> MeshResult<Self> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| MeshError::Allocation {
                what,
                requested: capacity,
            })?;
        Ok(Self { items, capacity })
    }

    /// Append unless full. Returns whether the item was stored.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn get(&self, index: usize) -> MeshResult<&T> {
        self.items.get(index).ok_or(MeshError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.items.len()
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Take every item out, leaving the store empty with its capacity intact.
    fn take(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    /// Refill an emptied store. Items past the capacity are dropped.
    fn refill(&mut self, mut items: Vec<T>) {
        items.truncate(self.capacity);
        self.items = items;
    }
}

pub type VertexStore = Store<Vertex>;
pub type FaceStore = Store<Face>;

/// A polygonal mesh with declared vertex and face capacities
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: VertexStore,
    faces: FaceStore,
}

impl Mesh {
    /// Create an empty mesh sized for exactly this many vertices and faces.
    pub fn new(vertex_capacity: usize, face_capacity: usize) -> MeshResult<Self> {
        Ok(Self {
            vertices: Store::with_capacity(vertex_capacity, "vertices")?,
            faces: Store::with_capacity(face_capacity, "faces")?,
        })
    }

    /// Append a vertex. Ignored once the vertex capacity is reached.
    pub fn append_vertex(&mut self, vertex: Vertex) {
        if !self.vertices.push(vertex) {
            log::trace!("vertex store full, dropping vertex");
        }
    }

    /// Append a face. Ignored once the face capacity is reached.
    pub fn append_face(&mut self, face: Face) {
        if !self.faces.push(face) {
            log::trace!("face store full, dropping face");
        }
    }

    pub fn vertex_at(&self, index: usize) -> MeshResult<&Vertex> {
        self.vertices.get(index)
    }

    pub fn face_at(&self, index: usize) -> MeshResult<&Face> {
        self.faces.get(index)
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    pub fn faces(&self) -> &[Face] {
        self.faces.as_slice()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn face_capacity(&self) -> usize {
        self.faces.capacity()
    }

    pub fn remaining_vertices(&self) -> usize {
        self.vertices.remaining()
    }

    pub fn remaining_faces(&self) -> usize {
        self.faces.remaining()
    }

    /// Scale every vertex normal to unit length.
    ///
    /// Fails without modifying the mesh if any normal has zero length.
    pub fn normalize_normals(&mut self) -> MeshResult<()> {
        let normals = self
            .vertices
            .as_slice()
            .iter()
            .enumerate()
            .map(|(index, vertex)| {
                vertex
                    .normal
                    .try_normalize(f32::MIN_POSITIVE)
                    .ok_or(MeshError::DegenerateNormal { index })
            })
            .collect::<MeshResult<Vec<_>>>()?;

        for (vertex, normal) in self.vertices.as_mut_slice().iter_mut().zip(normals) {
            vertex.normal = normal;
        }
        Ok(())
    }

    /// Remove the whole face list, leaving the face store empty.
    pub(crate) fn take_faces(&mut self) -> Vec<Face> {
        self.faces.take()
    }

    /// Install a replacement face list produced from [`Mesh::take_faces`].
    pub(crate) fn replace_faces(&mut self, faces: Vec<Face>) {
        self.faces.refill(faces);
    }
}
