/// Face merging: fold faces of the same kind and color into one draw call
use crate::geometry::{Face, Mesh};

/// Counts reported after a merge pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeStats {
    pub faces_before: usize,
    pub faces_after: usize,
}

/// Merges faces that share a primitive kind and an exact RGB color.
///
/// Each input face is compared against the faces already in the output, in
/// output order, and joins the first one with the same mergeable kind and
/// color. Polygons never merge. Index order is preserved: a merged face
/// holds its own indices followed by every absorbed face's indices in
/// input order.
///
/// The scan is linear in the number of distinct (kind, color) groups seen
/// so far, so a mesh where every face has its own color costs O(n²).
pub struct FaceMerger;

impl FaceMerger {
    /// Merge a face list, consuming it.
    pub fn merge(faces: Vec<Face>) -> Vec<Face> {
        let mut merged: Vec<Face> = Vec::new();

        for face in faces {
            let target = merged.iter().position(|existing| {
                existing.kind().is_mergeable()
                    && existing.kind() == face.kind()
                    && existing.color().same_rgb(&face.color())
            });

            match target {
                Some(index) => merged[index].absorb(face),
                None => merged.push(face),
            }
        }

        merged
    }

    /// Replace a mesh's faces with their merged form.
    pub fn optimize(mesh: &mut Mesh) -> MergeStats {
        let faces = mesh.take_faces();
        let faces_before = faces.len();

        let merged = Self::merge(faces);
        let faces_after = merged.len();
        mesh.replace_faces(merged);

        log::debug!("merged {} faces into {}", faces_before, faces_after);
        MergeStats {
            faces_before,
            faces_after,
        }
    }
}
