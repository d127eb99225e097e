//! Light aggregation for the render backend
//!
//! Each frame the 3D graph registers its light nodes with the
//! [`LightManager`], which then flattens them into parallel `f32` arrays a
//! shader can index with a single light number.
//!
//! The manager is single-threaded and frame-scoped: the graph must not be
//! mutated between registration and the moment the arrays are consumed.

use crate::foundation::math::Vector3;
use crate::render::lighting::Light;
use crate::scene::hierarchy::Node3Id;
use crate::scene::transform3::{Graph3, Transform3};

/// Borrowed view over the flattened light arrays of one frame
///
/// Entry `i` of `types` lines up with entries `3i..3i + 3` of every other
/// slice.
#[derive(Debug, Clone, Copy)]
pub struct LightArrays<'a> {
    /// One type code per light
    pub types: &'a [f32],
    /// World positions, three floats per light
    pub positions: &'a [f32],
    /// Ambient intensities, three floats per light
    pub ambient: &'a [f32],
    /// Diffuse intensities, three floats per light
    pub diffuse: &'a [f32],
    /// Specular intensities, three floats per light
    pub specular: &'a [f32],
}

impl LightArrays<'_> {
    /// Number of lights in the view
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the view holds no lights
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Per-frame registry of light nodes and their flattened data
#[derive(Debug, Default, Clone)]
pub struct LightManager {
    lights: Vec<Node3Id>,
    light_types: Vec<f32>,
    light_positions: Vec<f32>,
    ambient_intensities: Vec<f32>,
    diffuse_intensities: Vec<f32>,
    specular_intensities: Vec<f32>,
}

impl LightManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all registered lights and flattened data
    pub fn clear(&mut self) {
        self.lights.clear();
        self.light_types.clear();
        self.light_positions.clear();
        self.ambient_intensities.clear();
        self.diffuse_intensities.clear();
        self.specular_intensities.clear();
    }

    /// Register a light node; `false` if it was already registered
    pub fn add_light(&mut self, id: Node3Id) -> bool {
        if self.lights.contains(&id) {
            return false;
        }
        self.lights.push(id);
        true
    }

    /// Number of registered lights
    pub fn num_lights(&self) -> usize {
        self.lights.len()
    }

    /// Registered light nodes in registration order
    pub fn lights(&self) -> &[Node3Id] {
        &self.lights
    }

    /// Append one slot per registered light to every array
    ///
    /// Positions come from the world matrix of the last world pass. Hidden
    /// light nodes contribute zero intensities but keep their slot. Ids that
    /// no longer resolve to a light node are dropped from the registration
    /// list, so `lights()[i]` always describes slot `i` of every array.
    ///
    /// # Preconditions
    /// Call once per frame, after [`LightManager::clear`], the light
    /// registration and the world pass, and do not mutate `graph` until the
    /// arrays have been consumed. The arrays are empty between `clear` and
    /// this call and must not be read in that window.
    pub fn update_lights(&mut self, graph: &Graph3) {
        let mut lights = std::mem::take(&mut self.lights);
        lights.retain(|&id| {
            let Some((node, light)) = graph
                .get(id)
                .and_then(|node| node.light.as_ref().map(|light| (node, light)))
            else {
                log::warn!("Dropping registered light {:?}: node is gone or has no light", id);
                return false;
            };
            self.push_slot(node, light);
            true
        });
        self.lights = lights;
        log::trace!("Flattened {} lights", self.light_types.len());
    }

    fn push_slot(&mut self, node: &Transform3, light: &Light) {
        let position = node.world_matrix().translation();
        self.light_types.push(light.light_type.as_f32());
        self.light_positions.extend_from_slice(&position.to_array());

        let (ambient, diffuse, specular) = if node.visible {
            (light.ambient_intensity, light.diffuse_intensity, light.specular_intensity)
        } else {
            (Vector3::ZERO, Vector3::ZERO, Vector3::ZERO)
        };
        self.ambient_intensities.extend_from_slice(&ambient.to_array());
        self.diffuse_intensities.extend_from_slice(&diffuse.to_array());
        self.specular_intensities.extend_from_slice(&specular.to_array());
    }

    /// Type codes, one per light
    pub fn light_types(&self) -> &[f32] {
        &self.light_types
    }

    /// World positions, three floats per light
    pub fn light_positions(&self) -> &[f32] {
        &self.light_positions
    }

    /// Ambient intensities, three floats per light
    pub fn ambient_intensities(&self) -> &[f32] {
        &self.ambient_intensities
    }

    /// Diffuse intensities, three floats per light
    pub fn diffuse_intensities(&self) -> &[f32] {
        &self.diffuse_intensities
    }

    /// Specular intensities, three floats per light
    pub fn specular_intensities(&self) -> &[f32] {
        &self.specular_intensities
    }

    /// All arrays as one borrowed view
    pub fn arrays(&self) -> LightArrays<'_> {
        LightArrays {
            types: &self.light_types,
            positions: &self.light_positions,
            ambient: &self.ambient_intensities,
            diffuse: &self.diffuse_intensities,
            specular: &self.specular_intensities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::lighting::LightType;

    fn lit_graph() -> (Graph3, Node3Id, Node3Id) {
        let mut graph = Graph3::new();
        let root = graph.insert(Transform3::new());
        let lamp = graph.insert(
            Transform3::from_light(Light::point(Vector3::new(1.0, 0.5, 0.25), 1.0).with_ambient(Vector3::ONE))
                .with_position(Vector3::new(1.0, 2.0, 3.0)),
        );
        graph.add_child(root, lamp).unwrap();
        graph.compute_world_transform(root);
        (graph, root, lamp)
    }

    #[test]
    fn test_add_light_deduplicates() {
        let (_, _, lamp) = lit_graph();
        let mut manager = LightManager::new();

        assert!(manager.add_light(lamp));
        assert!(!manager.add_light(lamp));
        assert_eq!(manager.num_lights(), 1);
    }

    #[test]
    fn test_update_lights_flattens_slots() {
        let (graph, _, lamp) = lit_graph();
        let mut manager = LightManager::new();
        manager.add_light(lamp);
        manager.update_lights(&graph);

        assert_eq!(manager.light_types(), &[LightType::Point.as_f32()]);
        assert_eq!(manager.light_positions(), &[1.0, 2.0, 3.0]);
        assert_eq!(manager.ambient_intensities(), &[1.0, 1.0, 1.0]);
        assert_eq!(manager.diffuse_intensities(), &[1.0, 0.5, 0.25]);
        assert_eq!(manager.specular_intensities(), &[1.0, 0.5, 0.25]);
        assert_eq!(manager.arrays().len(), 1);
    }

    #[test]
    fn test_hidden_light_keeps_zeroed_slot() {
        let (mut graph, _, lamp) = lit_graph();
        graph.get_mut(lamp).unwrap().visible = false;

        let mut manager = LightManager::new();
        manager.add_light(lamp);
        manager.update_lights(&graph);

        assert_eq!(manager.light_positions(), &[1.0, 2.0, 3.0]);
        assert_eq!(manager.ambient_intensities(), &[0.0; 3]);
        assert_eq!(manager.diffuse_intensities(), &[0.0; 3]);
        assert_eq!(manager.specular_intensities(), &[0.0; 3]);
    }

    #[test]
    fn test_stale_ids_are_dropped_and_slots_stay_aligned() {
        let (mut graph, root, lamp) = lit_graph();
        let plain = graph.insert(Transform3::new());
        graph.add_child(root, plain).unwrap();
        let gone = graph.insert(Transform3::from_light(Light::spot(Vector3::ONE, 1.0)));
        graph.add_child(root, gone).unwrap();
        graph.compute_world_transform(root);

        let mut manager = LightManager::new();
        manager.add_light(gone);
        manager.add_light(plain);
        manager.add_light(lamp);
        graph.despawn(gone);
        manager.update_lights(&graph);

        assert_eq!(manager.lights(), &[lamp]);
        assert_eq!(manager.num_lights(), 1);
        let arrays = manager.arrays();
        assert_eq!(arrays.len(), manager.num_lights());
        assert_eq!(arrays.types, &[LightType::Point.as_f32()]);
        assert_eq!(arrays.positions, &[1.0, 2.0, 3.0]);
        for slice in [arrays.ambient, arrays.diffuse, arrays.specular] {
            assert_eq!(slice.len(), 3 * manager.num_lights());
        }
    }

    #[test]
    fn test_clear_empties_everything() {
        let (graph, _, lamp) = lit_graph();
        let mut manager = LightManager::new();
        manager.add_light(lamp);
        manager.update_lights(&graph);

        manager.clear();

        assert_eq!(manager.num_lights(), 0);
        let arrays = manager.arrays();
        for slice in [arrays.types, arrays.positions, arrays.ambient, arrays.diffuse, arrays.specular] {
            assert!(slice.is_empty());
        }
    }
}
