//! Scene module
//!
//! Provides scene objects, the octree spatial index, and culling
//! strategies.

mod object;
mod octree;
mod scene;
mod scene_index;
mod culler;

pub use object::{ObjectKey, ModelKey, SceneObject, ObjectSource, AABB};
pub use octree::{Octree, OctreeStats};
pub use scene::Scene;
pub use scene_index::SpatialIndex;
pub use culler::{CameraCuller, BruteForceCuller, FrustumCuller};
