/// Octree: dynamic octree spatial index for frustum culling.
///
/// Single-node placement: each object is stored in exactly one node, the
/// deepest existing node whose cube fully contains the object's world AABB.
/// An object straddling a child boundary stays in the parent. Objects that
/// overlap the root cube without fitting inside it stay at the root.
///
/// The tree starts as a single leaf and grows on demand: when an object
/// lands in a leaf already holding `max_objects_per_node` objects, the leaf
/// splits into 8 children and its objects are pushed down where they fit.
/// Splitting stops at `max_depth`; deeper leaves simply hold more objects.
///
/// Nodes live in a flat arena; the 8 children of a node are contiguous.
/// Nodes are only released by `clear` / `rebuild`.

use rustc_hash::{FxHashMap, FxHashSet};
use glam::Vec3;
use crate::camera::{Frustum, FrustumTest};
use crate::config::OctreeConfig;
use crate::error::{Error, Result};
use crate::{engine_debug, engine_trace};
use super::object::{ObjectKey, ObjectSource, AABB};
use super::scene_index::SpatialIndex;

/// Index of the root node in the flat node array.
const ROOT: usize = 0;

const SOURCE: &str = "galaxy3d::Octree";

/// `InvalidInput` for an object the index refuses, logged at debug level.
fn refused(message: String) -> Error {
    engine_debug!(SOURCE, "{}", message);
    Error::InvalidInput(message)
}

/// A single node in the octree.
#[derive(Debug)]
struct OctreeNode {
    /// Center of this node's cube
    center: Vec3,
    /// Half the cube's edge length
    half_size: f32,
    /// Root = 0
    depth: u32,
    /// Index of the first of 8 contiguous children (`None` = leaf)
    first_child: Option<usize>,
    /// Objects stored at this node
    objects: Vec<ObjectKey>,
}

impl OctreeNode {
    fn new(center: Vec3, half_size: f32, depth: u32) -> Self {
        Self {
            center,
            half_size,
            depth,
            first_child: None,
            objects: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    fn aabb(&self) -> AABB {
        AABB::from_center_half_extents(self.center, Vec3::splat(self.half_size))
    }
}

/// Octree shape and occupancy, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OctreeStats {
    /// Total allocated nodes (including empty ones)
    pub node_count: usize,
    /// Nodes without children
    pub leaf_count: usize,
    /// Objects stored across all nodes
    pub object_count: usize,
    /// Depth of the deepest node (root = 0)
    pub depth: u32,
    /// Most objects held by a single node
    pub max_objects_in_node: usize,
}

/// Dynamic octree over object world AABBs.
///
/// Does not own the objects: it stores keys and the AABB each object had
/// when it was inserted.
pub struct Octree {
    /// Flat array of nodes (root at index 0)
    nodes: Vec<OctreeNode>,
    /// Construction parameters
    config: OctreeConfig,
    /// Reverse lookup: object key → (node index, world AABB at insert time)
    object_locations: FxHashMap<ObjectKey, (usize, AABB)>,
}

impl Octree {
    /// Create an empty octree (a single leaf root).
    ///
    /// # Arguments
    ///
    /// * `center` - Center of the root cube
    /// * `size` - Edge length of the root cube
    /// * `max_depth` - Maximum node depth (root = 0)
    /// * `max_objects_per_node` - Leaf capacity before subdivision
    pub fn new(center: Vec3, size: f32, max_depth: u32, max_objects_per_node: usize) -> Result<Self> {
        Self::from_config(OctreeConfig {
            center,
            size,
            max_depth,
            max_objects_per_node,
        })
    }

    /// Create an empty octree from a validated config.
    pub fn from_config(config: OctreeConfig) -> Result<Self> {
        config.validate()?;
        engine_debug!(
            SOURCE,
            "Created octree: size {}, max_depth {}, max_objects_per_node {}",
            config.size, config.max_depth, config.max_objects_per_node
        );
        Ok(Self {
            nodes: vec![OctreeNode::new(config.center, config.size * 0.5, 0)],
            config,
            object_locations: FxHashMap::default(),
        })
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// World-space cube covered by the root node.
    pub fn bounds(&self) -> AABB {
        self.nodes[ROOT].aabb()
    }

    /// Number of indexed objects.
    pub fn len(&self) -> usize {
        self.object_locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_locations.is_empty()
    }

    pub fn contains(&self, key: ObjectKey) -> bool {
        self.object_locations.contains_key(&key)
    }

    /// AABB recorded for an object when it was inserted.
    pub fn stored_aabb(&self, key: ObjectKey) -> Option<AABB> {
        self.object_locations.get(&key).map(|&(_, aabb)| aabb)
    }

    /// Number of allocated nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest existing node (0 for a single root).
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    pub fn stats(&self) -> OctreeStats {
        let mut stats = OctreeStats {
            node_count: self.nodes.len(),
            ..Default::default()
        };
        for node in &self.nodes {
            if node.is_leaf() {
                stats.leaf_count += 1;
            }
            stats.object_count += node.objects.len();
            stats.depth = stats.depth.max(node.depth);
            stats.max_objects_in_node = stats.max_objects_in_node.max(node.objects.len());
        }
        stats
    }

    // ===== MUTATION =====

    /// Insert an object into the deepest node that fully contains it.
    ///
    /// Re-inserting an indexed object moves it (the old entry is removed
    /// first). Fails with `Error::InvalidInput` if the object has no usable
    /// world AABB or if its AABB does not touch the root cube; the caller
    /// must then treat the object as always visible.
    pub fn insert(&mut self, key: ObjectKey, objects: &dyn ObjectSource) -> Result<()> {
        self.remove(key);

        let world_aabb = objects.world_aabb(key)
            .filter(AABB::is_valid)
            .ok_or_else(|| refused(format!("Object {:?} has no usable AABB, it cannot be culled", key)))?;

        self.insert_aabb(key, world_aabb)
    }

    /// Insert with an explicit world AABB.
    pub fn insert_aabb(&mut self, key: ObjectKey, world_aabb: AABB) -> Result<()> {
        self.remove(key);

        if !world_aabb.is_valid() {
            return Err(refused(format!("Object {:?} has an invalid AABB {:?}", key, world_aabb)));
        }
        if !self.nodes[ROOT].aabb().intersects(&world_aabb) {
            return Err(refused(format!(
                "Object {:?} AABB {:?} lies outside the octree bounds {:?}",
                key, world_aabb, self.bounds()
            )));
        }

        let node_idx = self.sink(key, &world_aabb);
        self.object_locations.insert(key, (node_idx, world_aabb));
        Ok(())
    }

    /// Re-insert an object after its bounds changed.
    ///
    /// Cheap when the object stays in the same node: only the stored AABB
    /// is refreshed.
    pub fn update(&mut self, key: ObjectKey, objects: &dyn ObjectSource) -> Result<()> {
        let Some(world_aabb) = objects.world_aabb(key).filter(AABB::is_valid) else {
            return self.insert(key, objects);
        };

        if let Some(&(node_idx, _)) = self.object_locations.get(&key) {
            if self.find_target_node(&world_aabb) == Some(node_idx) {
                self.object_locations.insert(key, (node_idx, world_aabb));
                return Ok(());
            }
        }
        self.insert_aabb(key, world_aabb)
    }

    /// Remove an object in O(1) via the reverse index.
    ///
    /// Returns `false` if the object was not indexed.
    pub fn remove(&mut self, key: ObjectKey) -> bool {
        let Some((node_idx, _)) = self.object_locations.remove(&key) else {
            return false;
        };
        let objects = &mut self.nodes[node_idx].objects;
        if let Some(pos) = objects.iter().position(|&k| k == key) {
            objects.swap_remove(pos);
        }
        true
    }

    /// Drop every node and object, leaving a single empty leaf root.
    pub fn clear(&mut self) {
        let root = &self.nodes[ROOT];
        let fresh_root = OctreeNode::new(root.center, root.half_size, 0);
        self.nodes.clear();
        self.nodes.push(fresh_root);
        self.object_locations.clear();
    }

    /// Clear, then insert every object in `keys`.
    ///
    /// Returns the keys that could not be indexed (always-visible objects).
    pub fn rebuild(
        &mut self,
        keys: impl IntoIterator<Item = ObjectKey>,
        objects: &dyn ObjectSource,
    ) -> Vec<ObjectKey> {
        self.clear();
        let rejected: Vec<ObjectKey> = keys
            .into_iter()
            .filter(|&key| self.insert(key, objects).is_err())
            .collect();
        engine_debug!(
            SOURCE,
            "Rebuilt octree: {} objects indexed, {} rejected, {} nodes",
            self.len(), rejected.len(), self.nodes.len()
        );
        rejected
    }

    // ===== PLACEMENT =====

    /// Octant of a point relative to a center.
    ///
    /// Bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    fn point_octant(center: Vec3, point: Vec3) -> usize {
        (point.x >= center.x) as usize
            | (((point.y >= center.y) as usize) << 1)
            | (((point.z >= center.z) as usize) << 2)
    }

    /// Center of child `octant` given the child's half size.
    fn child_center(center: Vec3, child_half: f32, octant: usize) -> Vec3 {
        let sign = |bit: usize| if octant & bit == 0 { -1.0 } else { 1.0 };
        center + Vec3::new(sign(1), sign(2), sign(4)) * child_half
    }

    /// Octant of the child that would fully contain `aabb`, if any.
    ///
    /// Requires the node itself to contain the AABB; then both corners
    /// falling in the same octant means the AABB fits in that child.
    fn fitting_octant(node: &OctreeNode, aabb: &AABB) -> Option<usize> {
        if !node.aabb().contains(aabb) {
            return None;
        }
        let min_oct = Self::point_octant(node.center, aabb.min);
        let max_oct = Self::point_octant(node.center, aabb.max);
        (min_oct == max_oct).then_some(min_oct)
    }

    /// Descend to the deepest existing node containing `aabb`, splitting a
    /// full leaf on the way, and store the key there.
    fn sink(&mut self, key: ObjectKey, aabb: &AABB) -> usize {
        let mut node_idx = ROOT;

        loop {
            let node = &self.nodes[node_idx];
            match node.first_child {
                Some(first_child) => match Self::fitting_octant(node, aabb) {
                    Some(octant) => node_idx = first_child + octant,
                    None => break,
                },
                None => {
                    let full = node.objects.len() >= self.config.max_objects_per_node;
                    if !full || node.depth >= self.config.max_depth {
                        break;
                    }
                    self.subdivide(node_idx);
                }
            }
        }

        self.nodes[node_idx].objects.push(key);
        node_idx
    }

    /// Same descent as `sink`, without modifying the tree.
    fn find_target_node(&self, aabb: &AABB) -> Option<usize> {
        let root = &self.nodes[ROOT];
        if !root.aabb().intersects(aabb) {
            return None;
        }
        let mut node_idx = ROOT;
        while let Some(first_child) = self.nodes[node_idx].first_child {
            match Self::fitting_octant(&self.nodes[node_idx], aabb) {
                Some(octant) => node_idx = first_child + octant,
                None => break,
            }
        }
        Some(node_idx)
    }

    /// Split a leaf into 8 children and push its objects down where they fit.
    fn subdivide(&mut self, node_idx: usize) {
        let (center, half_size, depth) = {
            let node = &self.nodes[node_idx];
            (node.center, node.half_size, node.depth)
        };
        let child_half = half_size * 0.5;
        let first_child = self.nodes.len();

        for octant in 0..8 {
            self.nodes.push(OctreeNode::new(
                Self::child_center(center, child_half, octant),
                child_half,
                depth + 1,
            ));
        }
        self.nodes[node_idx].first_child = Some(first_child);

        let objects = std::mem::take(&mut self.nodes[node_idx].objects);
        let mut retained = Vec::new();
        for key in objects {
            let Some(location) = self.object_locations.get_mut(&key) else {
                continue;
            };
            match Self::fitting_octant(&self.nodes[node_idx], &location.1) {
                Some(octant) => {
                    let child_idx = first_child + octant;
                    location.0 = child_idx;
                    self.nodes[child_idx].objects.push(key);
                }
                None => retained.push(key),
            }
        }

        engine_trace!(
            SOURCE,
            "Subdivided node {} at depth {}: {} objects kept, pushed down the rest",
            node_idx, depth, retained.len()
        );
        self.nodes[node_idx].objects = retained;
    }

    // ===== QUERIES =====

    /// Active objects in nodes intersecting the frustum.
    ///
    /// Subtrees whose cube is outside the frustum are skipped. Objects of a
    /// visited node are collected without testing them individually; a
    /// node fully inside the frustum contributes its whole subtree without
    /// further plane tests. An uninitialized frustum returns every active
    /// indexed object.
    pub fn query_frustum(&self, frustum: &Frustum, objects: &dyn ObjectSource) -> Vec<ObjectKey> {
        let mut candidates = Vec::new();
        let root = &self.nodes[ROOT];
        match frustum.classify_aabb(&root.aabb()) {
            FrustumTest::Outside => {
                // Objects overhanging the root cube may still reach the frustum
                self.collect_overhanging(&mut candidates, |aabb| frustum.is_visible(aabb));
            }
            classification => self.query_frustum_recursive(ROOT, frustum, classification, &mut candidates),
        }
        Self::finish(candidates, objects)
    }

    /// Active objects whose stored AABB overlaps the query box.
    ///
    /// A box with non-finite corners matches nothing.
    pub fn query_aabb(&self, min: Vec3, max: Vec3, objects: &dyn ObjectSource) -> Vec<ObjectKey> {
        if !(min.is_finite() && max.is_finite()) {
            return Vec::new();
        }
        let query = AABB::new(min, max);
        let mut candidates = Vec::new();
        if self.nodes[ROOT].aabb().intersects(&query) {
            self.query_box_recursive(ROOT, &query, &mut candidates);
        } else {
            self.collect_overhanging(&mut candidates, |aabb| aabb.intersects(&query));
        }
        Self::finish(candidates, objects)
    }

    /// Active objects whose stored AABB overlaps the sphere's enclosing box.
    pub fn query_sphere(&self, center: Vec3, radius: f32, objects: &dyn ObjectSource) -> Vec<ObjectKey> {
        if !(center.is_finite() && radius.is_finite()) {
            return Vec::new();
        }
        let query = AABB::from_sphere(center, radius);
        self.query_aabb(query.min, query.max, objects)
    }

    fn query_frustum_recursive(
        &self,
        node_idx: usize,
        frustum: &Frustum,
        classification: FrustumTest,
        results: &mut Vec<ObjectKey>,
    ) {
        let node = &self.nodes[node_idx];

        match classification {
            FrustumTest::Outside => {}

            FrustumTest::Inside => self.collect_all(node_idx, results),

            FrustumTest::Intersect => {
                results.extend_from_slice(&node.objects);
                if let Some(first_child) = node.first_child {
                    for child_idx in first_child..first_child + 8 {
                        let child_class = frustum.classify_aabb(&self.nodes[child_idx].aabb());
                        self.query_frustum_recursive(child_idx, frustum, child_class, results);
                    }
                }
            }
        }
    }

    fn query_box_recursive(&self, node_idx: usize, query: &AABB, results: &mut Vec<ObjectKey>) {
        let node = &self.nodes[node_idx];
        if !node.aabb().intersects(query) {
            return;
        }

        results.extend(node.objects.iter().copied().filter(|key| {
            self.object_locations
                .get(key)
                .is_some_and(|(_, aabb)| aabb.intersects(query))
        }));

        if let Some(first_child) = node.first_child {
            for child_idx in first_child..first_child + 8 {
                self.query_box_recursive(child_idx, query, results);
            }
        }
    }

    /// Collect all objects from a node and its entire subtree (no test).
    fn collect_all(&self, node_idx: usize, results: &mut Vec<ObjectKey>) {
        let node = &self.nodes[node_idx];
        results.extend_from_slice(&node.objects);

        if let Some(first_child) = node.first_child {
            for child_idx in first_child..first_child + 8 {
                self.collect_all(child_idx, results);
            }
        }
    }

    /// Root objects extending past the root cube that pass `accept`.
    fn collect_overhanging(&self, results: &mut Vec<ObjectKey>, accept: impl Fn(&AABB) -> bool) {
        let root_aabb = self.nodes[ROOT].aabb();
        for &key in &self.nodes[ROOT].objects {
            if let Some((_, aabb)) = self.object_locations.get(&key) {
                if !root_aabb.contains(aabb) && accept(aabb) {
                    results.push(key);
                }
            }
        }
    }

    /// Deduplicate candidates and drop inactive objects.
    fn finish(candidates: Vec<ObjectKey>, objects: &dyn ObjectSource) -> Vec<ObjectKey> {
        let mut seen = FxHashSet::default();
        candidates
            .into_iter()
            .filter(|&key| objects.is_active(key) && seen.insert(key))
            .collect()
    }
}

// ===== SPATIAL INDEX TRAIT =====

impl SpatialIndex for Octree {
    fn insert(&mut self, key: ObjectKey, objects: &dyn ObjectSource) -> Result<()> {
        Octree::update(self, key, objects)
    }

    fn remove(&mut self, key: ObjectKey) -> bool {
        Octree::remove(self, key)
    }

    fn query_frustum(&self, frustum: &Frustum, objects: &dyn ObjectSource, results: &mut Vec<ObjectKey>) {
        results.extend(Octree::query_frustum(self, frustum, objects));
    }

    fn contains(&self, key: ObjectKey) -> bool {
        Octree::contains(self, key)
    }

    fn len(&self) -> usize {
        Octree::len(self)
    }

    fn clear(&mut self) {
        Octree::clear(self)
    }
}

#[cfg(test)]
#[path = "octree_tests.rs"]
mod tests;
