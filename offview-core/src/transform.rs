/// Transformation matrices and the accumulated orientation of the model
use nalgebra::{Matrix4, Quaternion, Unit, UnitQuaternion, Vector3};

/// Degrees in one full turn
pub const DEGREES_PER_REV: f32 = 360.0;

/// Coordinate axis for incremental rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Unit<Vector3<f32>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'x' | 'X' => Some(Axis::X),
            'y' | 'Y' => Some(Axis::Y),
            'z' | 'Z' => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation by `degrees` about a coordinate axis
    pub fn axis_rotation(degrees: f32, axis: Axis) -> Matrix4<f32> {
        Matrix4::from_axis_angle(&axis.unit(), degrees.to_radians())
    }

    /// Rotation matrix for an accumulated drag quaternion.
    ///
    /// The all-zero quaternion means "no drag yet" and maps to the identity.
    pub fn quaternion_matrix(q: &Quaternion<f32>) -> Matrix4<f32> {
        if is_zero_sentinel(q) {
            return Matrix4::identity();
        }
        UnitQuaternion::from_quaternion(*q).to_homogeneous()
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

fn is_zero_sentinel(q: &Quaternion<f32>) -> bool {
    q.coords.iter().all(|c| *c == 0.0)
}

/// Everything that decides how the model is turned and scaled.
///
/// Rotation comes from three places, composed as
/// `R(angle, axis) · history · Q(quaternion)`:
/// the live incremental rotation about the current axis, the rotation baked
/// from every previously active axis, and the accumulated arcball drags.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationState {
    quaternion: Quaternion<f32>,
    rotation_axis: Axis,
    angle: f32,
    rotation_history: Matrix4<f32>,
    zoom: f32,
}

impl OrientationState {
    pub fn new() -> Self {
        Self {
            quaternion: Quaternion::new(0.0, 0.0, 0.0, 0.0),
            rotation_axis: Axis::default(),
            angle: 0.0,
            rotation_history: Matrix4::identity(),
            zoom: 1.0,
        }
    }

    /// Accumulated drag rotation, all zeros until the first drag
    pub fn quaternion(&self) -> &Quaternion<f32> {
        &self.quaternion
    }

    pub fn rotation_axis(&self) -> Axis {
        self.rotation_axis
    }

    /// Incremental angle about the current axis, in `[0, 360)` degrees
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotation_history(&self) -> &Matrix4<f32> {
        &self.rotation_history
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Compose a drag rotation in front of everything dragged so far.
    pub fn apply_drag(&mut self, q: &UnitQuaternion<f32>) {
        if is_zero_sentinel(&self.quaternion) {
            self.quaternion = *q.quaternion();
            return;
        }
        // Renormalize so long drags do not drift off the unit sphere
        self.quaternion = (q.quaternion() * self.quaternion).normalize();
    }

    /// Advance the incremental rotation by `delta_deg` about `axis`.
    ///
    /// Switching to a different axis first bakes the current incremental
    /// rotation into the history and restarts the angle at zero.
    pub fn advance_automatic(&mut self, delta_deg: f32, axis: Axis) {
        if axis != self.rotation_axis {
            self.bake();
            self.rotation_axis = axis;
        }
        self.angle = wrap_degrees(self.angle + delta_deg);
    }

    fn bake(&mut self) {
        let live = Transform::axis_rotation(self.angle, self.rotation_axis);
        self.rotation_history = live * self.rotation_history;
        self.angle = 0.0;
        log::trace!("baked rotation about {:?}", self.rotation_axis);
    }

    /// The rotation to apply to the model before drawing.
    pub fn composed_transform(&self) -> Matrix4<f32> {
        Transform::axis_rotation(self.angle, self.rotation_axis)
            * self.rotation_history
            * Transform::quaternion_matrix(&self.quaternion)
    }

    /// Add to the zoom factor. No bounds are applied here.
    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom += delta;
    }

    /// Drop all accumulated rotation and zoom.
    ///
    /// The current rotation axis is kept so the next automatic advance
    /// continues about it without a bake.
    pub fn reset(&mut self) {
        self.quaternion = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        self.angle = 0.0;
        self.rotation_history = Matrix4::identity();
        self.zoom = 1.0;
    }
}

impl Default for OrientationState {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(DEGREES_PER_REV);
    // rem_euclid can round up to exactly one turn for tiny negative inputs
    if wrapped >= DEGREES_PER_REV {
        0.0
    } else {
        wrapped
    }
}
