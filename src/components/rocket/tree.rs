use std::f64::consts::PI;

use super::component::{AxialPosition, ComponentId, ComponentKind, DragOverride, RocketComponent};
use crate::components::{ModId, Transformation};
use crate::utils::{AeroError, AeroResult};

/// Arena-allocated rocket component tree.
///
/// Component `#0` is always the root. Two change tokens are maintained:
/// one for the tree structure and one for aerodynamically relevant
/// properties (geometry, finish, overrides).
#[derive(Debug, Clone)]
pub struct Rocket {
    components: Vec<RocketComponent>,
    perfect_finish: bool,
    tree_mod_id: ModId,
    aero_mod_id: ModId,
}

impl Rocket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            components: vec![RocketComponent::new(name, ComponentKind::Rocket)],
            perfect_finish: false,
            tree_mod_id: ModId::new(),
            aero_mod_id: ModId::new(),
        }
    }

    pub fn root(&self) -> ComponentId {
        ComponentId::from_index(0)
    }

    pub fn name(&self) -> &str {
        &self.components[0].name
    }

    pub fn tree_mod_id(&self) -> ModId {
        self.tree_mod_id
    }

    pub fn aero_mod_id(&self) -> ModId {
        self.aero_mod_id
    }

    fn structure_changed(&mut self) {
        self.tree_mod_id = ModId::new();
        self.aero_mod_id = ModId::new();
    }

    fn aero_changed(&mut self) {
        self.aero_mod_id = ModId::new();
    }

    /// Whether skin friction uses the partially-laminar perfect-finish model.
    pub fn is_perfect_finish(&self) -> bool {
        self.perfect_finish
    }

    pub fn set_perfect_finish(&mut self, perfect: bool) {
        if self.perfect_finish != perfect {
            self.perfect_finish = perfect;
            self.aero_changed();
        }
    }

    /// Append `component` as the last child of `parent`.
    pub fn add(&mut self, parent: ComponentId, mut component: RocketComponent) -> AeroResult<ComponentId> {
        if parent.index() >= self.components.len() {
            return Err(AeroError::UnknownComponent(parent));
        }
        let id = ComponentId::from_index(self.components.len());
        component.parent = Some(parent);
        component.children.clear();
        self.components.push(component);
        self.components[parent.index()].children.push(id);
        self.structure_changed();
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn component(&self, id: ComponentId) -> Option<&RocketComponent> {
        self.components.get(id.index())
    }

    pub fn get(&self, id: ComponentId) -> AeroResult<&RocketComponent> {
        self.component(id).ok_or(AeroError::UnknownComponent(id))
    }

    /// Mutable access; always counts as an aerodynamic and structural change.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut RocketComponent> {
        if id.index() >= self.components.len() {
            return None;
        }
        self.structure_changed();
        self.components.get_mut(id.index())
    }

    pub fn set_drag_override(&mut self, id: ComponentId, drag_override: Option<DragOverride>) -> AeroResult<()> {
        let component = self
            .components
            .get_mut(id.index())
            .ok_or(AeroError::UnknownComponent(id))?;
        if component.drag_override != drag_override {
            component.drag_override = drag_override;
            self.aero_changed();
        }
        Ok(())
    }

    fn node(&self, id: ComponentId) -> &RocketComponent {
        &self.components[id.index()]
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.component(id).and_then(|c| c.parent)
    }

    pub fn children(&self, id: ComponentId) -> &[ComponentId] {
        self.component(id).map(|c| c.children.as_slice()).unwrap_or(&[])
    }

    /// All component ids in depth-first pre-order, root first.
    pub fn ids(&self) -> Vec<ComponentId> {
        let mut order = Vec::with_capacity(self.components.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev());
        }
        order
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            ancestors.push(p);
            current = self.parent(p);
        }
        ancestors
    }

    pub fn is_descendant(&self, id: ComponentId, ancestor: ComponentId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    pub fn is_cd_overridden(&self, id: ComponentId) -> bool {
        self.component(id).map_or(false, |c| c.drag_override.is_some())
    }

    /// Whether an ancestor's override covers this component.
    pub fn is_cd_overridden_by_ancestor(&self, id: ComponentId) -> bool {
        self.ancestors(id).into_iter().any(|a| {
            self.node(a)
                .drag_override
                .map_or(false, |o| o.covers_subcomponents)
        })
    }

    /// Nearest stage containing the component (itself if it is a stage).
    pub fn stage_of(&self, id: ComponentId) -> Option<ComponentId> {
        let mut current = Some(id);
        while let Some(c) = current {
            if self.component(c)?.is_stage() {
                return Some(c);
            }
            current = self.parent(c);
        }
        None
    }

    /// Stages below `id` that are not nested inside another stage below `id`.
    pub fn top_level_child_stages(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut stages = Vec::new();
        let mut stack: Vec<ComponentId> = self.children(id).iter().rev().copied().collect();
        while let Some(c) = stack.pop() {
            if self.node(c).is_stage() {
                stages.push(c);
            } else {
                stack.extend(self.node(c).children.iter().rev());
            }
        }
        stages
    }

    /// Axial length; assemblies span their forward-placed children.
    pub fn length(&self, id: ComponentId) -> f64 {
        let component = self.node(id);
        if let Some(length) = component.own_length() {
            return length;
        }

        let mut cursor: f64 = 0.0;
        let mut extent: f64 = 0.0;
        for &child in &component.children {
            let start = match self.node(child).position {
                AxialPosition::After => cursor,
                AxialPosition::Top(offset) => offset,
                AxialPosition::Middle(_) | AxialPosition::Bottom(_) => continue,
            };
            cursor = start + self.length(child);
            extent = extent.max(cursor);
        }
        extent
    }

    /// Fore-end position relative to the parent's fore end.
    pub fn relative_x(&self, id: ComponentId) -> f64 {
        let component = self.node(id);
        let parent = match component.parent {
            Some(p) => p,
            None => return 0.0,
        };

        match component.position {
            AxialPosition::After => {
                let siblings = &self.node(parent).children;
                match siblings.iter().position(|&s| s == id) {
                    Some(i) if i > 0 => {
                        let prev = siblings[i - 1];
                        self.relative_x(prev) + self.length(prev)
                    }
                    _ => 0.0,
                }
            }
            AxialPosition::Top(offset) => offset,
            AxialPosition::Middle(offset) => {
                (self.length(parent) - self.length(id)) / 2.0 + offset
            }
            AxialPosition::Bottom(offset) => self.length(parent) - self.length(id) + offset,
        }
    }

    /// Fore-end position in vehicle coordinates.
    pub fn absolute_x(&self, id: ComponentId) -> f64 {
        let mut x = self.relative_x(id);
        for ancestor in self.ancestors(id) {
            x += self.relative_x(ancestor);
        }
        x
    }

    /// Per-instance transforms from component-local to vehicle coordinates.
    pub fn instance_transforms(&self, id: ComponentId) -> Vec<Transformation> {
        let component = self.node(id);
        let parents = match component.parent {
            Some(p) => self.instance_transforms(p),
            None => vec![Transformation::identity()],
        };

        let locals: Vec<Transformation> = match &component.kind {
            ComponentKind::FinSet(fins) => (0..fins.fin_count.max(1))
                .map(|i| {
                    Transformation::rotate_x(
                        fins.base_rotation + 2.0 * PI * i as f64 / fins.fin_count.max(1) as f64,
                    )
                })
                .collect(),
            ComponentKind::TubeFinSet(tubes) => (0..tubes.fin_count.max(1))
                .map(|i| {
                    Transformation::rotate_x(
                        tubes.base_rotation + 2.0 * PI * i as f64 / tubes.fin_count.max(1) as f64,
                    )
                })
                .collect(),
            ComponentKind::PodSet(ring) | ComponentKind::ParallelStage(ring) => (0..ring.count.max(1))
                .map(|i| {
                    let angle = ring.angle_offset + 2.0 * PI * i as f64 / ring.count.max(1) as f64;
                    Transformation::rotate_x(angle)
                        .then(&Transformation::translation(0.0, ring.radial_offset, 0.0))
                })
                .collect(),
            _ => vec![Transformation::identity()],
        };

        let offset = Transformation::translation(self.relative_x(id), 0.0, 0.0);
        parents
            .iter()
            .flat_map(|parent| {
                let base = parent.then(&offset);
                locals.iter().map(move |local| base.then(local))
            })
            .collect()
    }

    /// Radius of the body a fin set is mounted on, at the fin root.
    pub fn body_radius_at(&self, id: ComponentId) -> f64 {
        self.parent(id)
            .and_then(|p| self.node(p).profile())
            .map(|profile| profile.radius(self.relative_x(id)))
            .unwrap_or(0.0)
    }

    /// Closest preceding body component along the airframe.
    ///
    /// The search runs backwards over siblings, descending into axial stages,
    /// and climbs through axial stages. Pod sets and parallel stages begin a
    /// separate airframe, so the search stops at their boundary.
    pub fn previous_symmetric(&self, id: ComponentId) -> Option<ComponentId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            let siblings = &self.node(parent).children;
            let index = siblings.iter().position(|&s| s == current)?;
            for &sibling in siblings[..index].iter().rev() {
                if let Some(found) = self.last_symmetric_within(sibling) {
                    return Some(found);
                }
            }
            let parent_node = self.node(parent);
            if !matches!(parent_node.kind, ComponentKind::AxialStage | ComponentKind::Rocket) {
                return None;
            }
            current = parent;
        }
    }

    /// Closest following body component along the airframe.
    pub fn next_symmetric(&self, id: ComponentId) -> Option<ComponentId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            let siblings = &self.node(parent).children;
            let index = siblings.iter().position(|&s| s == current)?;
            for &sibling in siblings[index + 1..].iter() {
                if let Some(found) = self.first_symmetric_within(sibling) {
                    return Some(found);
                }
            }
            let parent_node = self.node(parent);
            if !matches!(parent_node.kind, ComponentKind::AxialStage | ComponentKind::Rocket) {
                return None;
            }
            current = parent;
        }
    }

    fn last_symmetric_within(&self, id: ComponentId) -> Option<ComponentId> {
        let node = self.node(id);
        if node.is_symmetric() {
            return Some(id);
        }
        if matches!(node.kind, ComponentKind::AxialStage) {
            return node
                .children
                .iter()
                .rev()
                .find_map(|&c| self.last_symmetric_within(c));
        }
        None
    }

    fn first_symmetric_within(&self, id: ComponentId) -> Option<ComponentId> {
        let node = self.node(id);
        if node.is_symmetric() {
            return Some(id);
        }
        if matches!(node.kind, ComponentKind::AxialStage) {
            return node
                .children
                .iter()
                .find_map(|&c| self.first_symmetric_within(c));
        }
        None
    }
}
