//! Part resolution and selection highlighting
//!
//! Both pieces are generic over the node handle so they can run against the
//! ECS hierarchy in the viewer and against plain ids in tests. The scene
//! graph is never owned here; nodes are looked up through closures or the
//! [`Appearance`] trait.

use bevy::prelude::*;
use boat_core::PartRegistry;
use std::collections::HashMap;
use std::hash::Hash;

/// Walk from `hit` up through its ancestors to the first node whose name is
/// a registered part identifier.
///
/// The walk never goes above `root`. Returns the matching node and its
/// identifier, or `None` if no node on the chain is registered.
pub fn resolve_part<N, NameFn, ParentFn>(
    hit: N,
    root: N,
    registry: &PartRegistry,
    name_of: NameFn,
    parent_of: ParentFn,
) -> Option<(N, String)>
where
    N: Copy + PartialEq,
    NameFn: Fn(N) -> Option<String>,
    ParentFn: Fn(N) -> Option<N>,
{
    let mut node = hit;
    loop {
        if let Some(name) = name_of(node) {
            if registry.contains(&name) {
                return Some((node, name));
            }
        }
        if node == root {
            return None;
        }
        node = parent_of(node)?;
    }
}

/// Mutable appearance of scene nodes, as seen by the highlighter
pub trait Appearance<N> {
    /// Whatever is needed to put a node's look back
    type Saved: Clone;

    /// Snapshot the node's current look. `None` if it has nothing to tint.
    fn capture(&mut self, node: N) -> Option<Self::Saved>;

    fn restore(&mut self, node: N, saved: &Self::Saved);

    fn tint(&mut self, node: N, saved: &Self::Saved, emissive: LinearRgba);
}

/// Currently highlighted node plus the cached original look of every node
/// that has ever been highlighted
#[derive(Debug, Clone)]
pub struct HighlightState<N, S> {
    current: Option<N>,
    originals: HashMap<N, S>,
    color: LinearRgba,
}

impl<N, S> HighlightState<N, S>
where
    N: Copy + Eq + Hash,
    S: Clone,
{
    pub fn new(color: LinearRgba) -> Self {
        Self {
            current: None,
            originals: HashMap::new(),
            color,
        }
    }

    pub fn current(&self) -> Option<N> {
        self.current
    }

    /// Restore the previous selection, then tint `node` (if any)
    ///
    /// A node's original look is captured the first time it is highlighted
    /// and reused afterwards, so repeated selection never compounds.
    pub fn select<A>(&mut self, appearance: &mut A, node: Option<N>)
    where
        A: Appearance<N, Saved = S>,
    {
        if let Some(previous) = self.current.take() {
            if let Some(saved) = self.originals.get(&previous) {
                appearance.restore(previous, saved);
            }
        }

        let Some(node) = node else {
            return;
        };

        if !self.originals.contains_key(&node) {
            if let Some(saved) = appearance.capture(node) {
                self.originals.insert(node, saved);
            }
        }

        if let Some(saved) = self.originals.get(&node) {
            appearance.tint(node, saved, self.color);
        }
        self.current = Some(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boat_core::PartEntry;

    /// Tiny scene graph: id -> (name, parent)
    struct Graph(HashMap<u32, (&'static str, Option<u32>)>);

    impl Graph {
        fn boat() -> Self {
            // 0 Scene
            // └ 1 Boat
            //   ├ 2 Hull
            //   │ └ 3 Hull.0 (mesh)
            //   ├ 4 Console
            //   │ └ 5 Wheel
            //   │   └ 6 Wheel.0 (mesh)
            //   └ 7 Cleat (mesh)
            let mut nodes = HashMap::new();
            nodes.insert(0, ("Scene", None));
            nodes.insert(1, ("Boat", Some(0)));
            nodes.insert(2, ("Hull", Some(1)));
            nodes.insert(3, ("Hull.0", Some(2)));
            nodes.insert(4, ("Console", Some(1)));
            nodes.insert(5, ("Wheel", Some(4)));
            nodes.insert(6, ("Wheel.0", Some(5)));
            nodes.insert(7, ("Cleat", Some(1)));
            Self(nodes)
        }

        fn resolve(&self, hit: u32, root: u32, registry: &PartRegistry) -> Option<(u32, String)> {
            resolve_part(
                hit,
                root,
                registry,
                |n| self.0.get(&n).map(|(name, _)| name.to_string()),
                |n| self.0.get(&n).and_then(|(_, parent)| *parent),
            )
        }
    }

    fn hull_only() -> PartRegistry {
        PartRegistry::new(vec![PartEntry {
            id: "Hull".to_string(),
            camera_position: [8.0, 3.0, 0.0],
            look_at: [0.0, 0.5, 0.0],
            title: "Hull".to_string(),
            description: "Hull".to_string(),
        }])
        .unwrap()
    }

    #[test]
    fn test_direct_hit() {
        let graph = Graph::boat();
        let registry = hull_only();
        assert_eq!(graph.resolve(2, 1, &registry), Some((2, "Hull".to_string())));
    }

    #[test]
    fn test_ancestor_hit() {
        let graph = Graph::boat();
        let registry = PartRegistry::builtin().unwrap();
        assert_eq!(graph.resolve(3, 1, &registry), Some((2, "Hull".to_string())));
        assert_eq!(graph.resolve(6, 1, &registry), Some((4, "Console".to_string())));
    }

    #[test]
    fn test_unresolvable_chain() {
        let graph = Graph::boat();
        let registry = PartRegistry::builtin().unwrap();
        assert_eq!(graph.resolve(7, 1, &registry), None);
    }

    #[test]
    fn test_walk_stops_at_root() {
        let mut graph = Graph::boat();
        // A registered name above the asset root must not match
        graph.0.insert(0, ("Hull", None));
        let registry = hull_only();
        assert_eq!(graph.resolve(7, 1, &registry), None);
    }

    #[test]
    fn test_missing_parent_ends_walk() {
        let graph = Graph::boat();
        let registry = hull_only();
        // Root id that is not an ancestor: walk runs out of parents
        assert_eq!(graph.resolve(6, 42, &registry), None);
    }

    /// Emissive per node; nodes without an entry have no material
    #[derive(Default)]
    struct Materials(HashMap<u32, LinearRgba>);

    impl Appearance<u32> for Materials {
        type Saved = LinearRgba;

        fn capture(&mut self, node: u32) -> Option<LinearRgba> {
            self.0.get(&node).copied()
        }

        fn restore(&mut self, node: u32, saved: &LinearRgba) {
            self.0.insert(node, *saved);
        }

        fn tint(&mut self, node: u32, _saved: &LinearRgba, emissive: LinearRgba) {
            self.0.insert(node, emissive);
        }
    }

    const ORANGE: LinearRgba = LinearRgba::new(1.0, 0.376, 0.0, 1.0);

    fn materials() -> Materials {
        let mut m = Materials::default();
        m.0.insert(2, LinearRgba::new(0.1, 0.1, 0.1, 1.0));
        m.0.insert(4, LinearRgba::BLACK);
        m
    }

    #[test]
    fn test_select_tints_and_replaces() {
        let mut m = materials();
        let mut state = HighlightState::new(ORANGE);

        state.select(&mut m, Some(2));
        assert_eq!(m.0[&2], ORANGE);
        assert_eq!(state.current(), Some(2));

        state.select(&mut m, Some(4));
        assert_eq!(m.0[&2], LinearRgba::new(0.1, 0.1, 0.1, 1.0));
        assert_eq!(m.0[&4], ORANGE);
        assert_eq!(state.current(), Some(4));

        let tinted = m.0.values().filter(|c| **c == ORANGE).count();
        assert_eq!(tinted, 1);
    }

    #[test]
    fn test_repeated_selection_does_not_drift() {
        let mut m = materials();
        let mut state = HighlightState::new(ORANGE);

        for _ in 0..50 {
            state.select(&mut m, Some(2));
            state.select(&mut m, Some(4));
            state.select(&mut m, Some(2));
            // Re-selecting the highlighted node must not capture orange as original
            state.select(&mut m, Some(2));
        }

        state.select(&mut m, Some(4));
        assert_eq!(m.0[&2], LinearRgba::new(0.1, 0.1, 0.1, 1.0));
        assert_eq!(m.0[&4], ORANGE);
    }

    #[test]
    fn test_node_without_material_is_skipped() {
        let mut m = materials();
        let mut state = HighlightState::new(ORANGE);

        state.select(&mut m, Some(2));
        state.select(&mut m, Some(7));

        // Previous selection restored, new one recorded, nothing tinted
        assert_eq!(m.0[&2], LinearRgba::new(0.1, 0.1, 0.1, 1.0));
        assert!(!m.0.contains_key(&7));
        assert_eq!(state.current(), Some(7));
    }
}
