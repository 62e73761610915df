/*!
# Galaxy 3D Visibility

Spatial visibility and level-of-detail core for the Galaxy 3D engine.

Decides, once per rendered frame, which objects are worth drawing and at
what detail. The crate owns no GPU resources: objects and models are
referenced by generational keys and the result is a draw list handed to
the renderer.

## Architecture

- **Frustum**: six inward-facing planes built from a Camera; classifies
  points, spheres and AABBs as Inside / Outside / Intersect
- **Octree**: dynamic spatial index over object world AABBs, subdividing
  on overflow
- **LodSystem**: distance-based discrete LOD selection with per-model
  level tables
- **Scene**: slotmap arena of objects, keeping its Octree in sync
- **VisibilityPipeline**: per-frame driver (cull, then LOD resolution)
  producing a RenderView
*/

// Internal modules
mod error;
mod engine;
mod config;
mod visibility;
pub mod log;
pub mod camera;
pub mod scene;
pub mod lod;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine services (logging)
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::{LodSettings, OctreeConfig, VisibilityConfig};

    // Per-frame driver
    pub use crate::visibility::VisibilityPipeline;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Camera sub-module (camera, frustum, render view)
    pub mod camera {
        pub use crate::camera::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // LOD sub-module
    pub mod lod {
        pub use crate::lod::*;
    }
}

// Re-export math library at crate root
pub use glam;
