//! sceneflow orchestrator
//!
//! Ties the core crates together into one declarative session: hosts declare
//! objects and the actions that move elements between them, and the
//! orchestrator answers with per-section schedules: ordered batches of
//! internally-parallel actions plus the placement table their objects live
//! at. The orchestrator owns the id allocator, the flow graph, the placement
//! map and the element tracker; hosts never touch those directly.

pub mod section;

use anyhow::{Context, Result};

use sceneflow_api_core::{
    ActionId, ElemSignature, ElementId, IdAllocator, Key, ObjectCategory, ObjectId, Placement,
};
use sceneflow_layout_core::{CanvasConfig, PlacementMap};
use sceneflow_schedule_core::{ElementTracker, FlowGraph};

pub use crate::section::{PlacedObject, Section, SectionSchedule};

/// One action to register, before id resolution.
///
/// `consumed` lists original element ids; the orchestrator substitutes
/// duplicates for all but the first consumer of each element. `writes_into`
/// names containers whose cached reads become stale after the action.
/// `serialize_on` forces this action after the previous action that named
/// the same object, independent of data flow.
#[derive(Clone, Debug, Default)]
pub struct ActionSpec {
    pub consumed: Vec<ElementId>,
    pub produced: Vec<ElementId>,
    pub writes_into: Vec<ObjectId>,
    pub serialize_on: Option<ObjectId>,
}

/// What the host gets back for one registered action.
#[derive(Clone, Debug)]
pub struct ActionOutcome {
    pub action: ActionId,
    /// Resolved ids in `consumed` order: the original for the first consumer
    /// of each element, a freshly minted duplicate for every later one.
    pub consumed: Vec<ElementId>,
}

#[derive(Debug)]
pub struct Orchestrator {
    ids: IdAllocator,
    graph: FlowGraph,
    map: PlacementMap,
    tracker: ElementTracker,
    schedule: SectionSchedule,
    /// Objects carried into the current section from the previous one.
    retained: Vec<ObjectId>,
}

impl Orchestrator {
    pub fn new(cfg: CanvasConfig) -> Self {
        Self {
            ids: IdAllocator::new(),
            graph: FlowGraph::new(),
            map: PlacementMap::new(cfg),
            tracker: ElementTracker::new(),
            schedule: SectionSchedule::default(),
            retained: Vec::new(),
        }
    }

    /// Declare one object: allocate its id, find it a spot on the grid and
    /// register its creation action. Returns the id and its cell origin.
    pub fn declare_object(
        &mut self,
        category: ObjectCategory,
        width: usize,
        height: usize,
        align_with: Option<ObjectId>,
    ) -> Result<(ObjectId, (usize, usize))> {
        let object = self.ids.alloc_object();
        let origin = self
            .map
            .place(object, category, width, height, align_with)
            .context("declaring object")?;
        self.graph.register(&[], &[Key::Object(object)], None)?;
        Ok((object, origin))
    }

    /// Declare one object at fixed coordinates. The grid still grows if the
    /// pinned rectangle does not fit yet.
    pub fn declare_object_at(
        &mut self,
        category: ObjectCategory,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    ) -> Result<ObjectId> {
        let object = self.ids.alloc_object();
        self.map
            .place_at(object, category, row, col, width, height)
            .context("declaring pinned object")?;
        self.graph.register(&[], &[Key::Object(object)], None)?;
        Ok(object)
    }

    /// Declare a same-category group placed as one sub-grid, one creation
    /// action per member. Returns ids and origins in `sizes` order.
    pub fn declare_object_group(
        &mut self,
        category: ObjectCategory,
        sizes: &[(usize, usize)],
        force_columns: Option<usize>,
    ) -> Result<Vec<(ObjectId, (usize, usize))>> {
        let members: Vec<(ObjectId, usize, usize)> = sizes
            .iter()
            .map(|&(w, h)| (self.ids.alloc_object(), w, h))
            .collect();
        let origins = self
            .map
            .place_group(category, &members, force_columns)
            .context("declaring object group")?;
        for (object, _, _) in &members {
            self.graph.register(&[], &[Key::Object(*object)], None)?;
        }
        Ok(members
            .into_iter()
            .map(|(object, _, _)| object)
            .zip(origins)
            .collect())
    }

    /// Mint an element id with tracker bookkeeping. The element enters the
    /// flow graph when an action lists it as produced.
    pub fn new_element(&mut self) -> ElementId {
        let element = self.ids.alloc_element();
        self.tracker.register_producer(element);
        element
    }

    /// Element for a read from a container position.
    ///
    /// A repeated read with an identical signature (and no intervening write
    /// into the container) reuses the cached element and registers no new
    /// action. A miss mints a fresh element and registers a read action that
    /// depends on the container.
    pub fn read_element(&mut self, signature: ElemSignature) -> Result<ElementId> {
        if let Some(element) = self.tracker.lookup(&signature) {
            log::trace!("signature cache hit for {element:?}");
            return Ok(element);
        }
        let element = self.new_element();
        self.tracker.record_source(signature, element);
        self.graph.register(
            &[Key::Object(signature.container)],
            &[Key::Element(element)],
            None,
        )?;
        Ok(element)
    }

    /// Cached element for a signature, if the container has not been written
    /// since it was recorded.
    pub fn lookup_cached_read(&self, signature: &ElemSignature) -> Option<ElementId> {
        self.tracker.lookup(signature)
    }

    /// Record the element a fresh read produced, for later reuse.
    pub fn record_read(&mut self, signature: ElemSignature, element: ElementId) {
        self.tracker.record_source(signature, element);
    }

    /// Drop every cached read signature for a container.
    pub fn invalidate_container(&mut self, container: ObjectId) {
        self.tracker.invalidate_container(container);
    }

    /// Count a consumer and resolve the id it should move: the original for
    /// the first consumer, a minted duplicate for every later one.
    /// [`perform`](Self::perform) does this for each listed element; this is
    /// the low-level path for hosts registering actions via
    /// [`begin_action`](Self::begin_action).
    pub fn consume(&mut self, element: ElementId) -> Result<ElementId> {
        self.tracker.register_consumer(element)?;
        Ok(self.tracker.resolve_for_consumption(element, &mut self.ids)?)
    }

    /// Register an action over raw dependency keys, without element
    /// resolution or cache invalidation.
    pub fn begin_action(
        &mut self,
        consumed: &[Key],
        produced: &[Key],
        serialization: Option<Key>,
    ) -> Result<ActionId> {
        Ok(self.graph.register(consumed, produced, serialization)?)
    }

    /// Retire an element right after the given action plays.
    pub fn finalize_after(&mut self, action: ActionId, element: ElementId) {
        self.graph.finalize_after(action, element);
    }

    /// Register one action: resolve its consumed elements, wire its
    /// dependency edges and record which duplicates retire right after it.
    ///
    /// The registered descriptor lists the resolved ids, so fan-out
    /// consumers of one element stay key-disjoint within a batch; each
    /// duplicate is aliased to its root for edge wiring.
    pub fn perform(&mut self, spec: ActionSpec) -> Result<ActionOutcome> {
        let mut consumed_keys: Vec<Key> = Vec::with_capacity(spec.consumed.len());
        let mut resolved: Vec<ElementId> = Vec::with_capacity(spec.consumed.len());
        for &element in &spec.consumed {
            self.tracker.register_consumer(element)?;
            let id = self.tracker.resolve_for_consumption(element, &mut self.ids)?;
            if id != element {
                self.graph.add_alias(Key::Element(id), Key::Element(element));
            }
            consumed_keys.push(Key::Element(id));
            resolved.push(id);
        }

        let produced_keys: Vec<Key> = spec
            .produced
            .iter()
            .map(|&element| Key::Element(element))
            .collect();

        let action = self.graph.register(
            &consumed_keys,
            &produced_keys,
            spec.serialize_on.map(Key::Object),
        )?;

        for &id in &resolved {
            self.tracker.note_consumer_action(id, action);
            if self.tracker.is_duplicate(id) {
                self.graph.finalize_after(action, id);
            }
        }
        for &container in &spec.writes_into {
            self.tracker.invalidate_container(container);
        }

        Ok(ActionOutcome {
            action,
            consumed: resolved,
        })
    }

    /// Close the current section and open the next one.
    ///
    /// Drains the registered actions into batches, snapshots the placement
    /// table, and resets the grid and tracker, keeping only the listed
    /// objects (at their recorded coordinates when `retain_positions`).
    /// Retained objects are consumable in the next section without a new
    /// producer. With no registered actions no section is recorded; the
    /// boundary still narrows retention to the intersection of the previous
    /// retain-set and `retain`, updating the previous section's record.
    pub fn end_section(
        &mut self,
        retain: &[ObjectId],
        retain_positions: bool,
    ) -> Result<Option<Section>> {
        if self.graph.is_empty() {
            let narrowed: Vec<ObjectId> = self
                .retained
                .iter()
                .copied()
                .filter(|object| retain.contains(object))
                .collect();
            if narrowed.len() != self.retained.len() {
                if let Some(last) = self.schedule.sections.last_mut() {
                    last.retained = narrowed.clone();
                }
                self.map
                    .reset(&narrowed, retain_positions)
                    .context("narrowing retained objects")?;
                self.graph = FlowGraph::new();
                for object in &narrowed {
                    self.graph.add_external(Key::Object(*object));
                }
                self.retained = narrowed;
            }
            return Ok(None);
        }

        // Originals with consumers retire only after their designated last
        // consumer; duplicates were already attached at registration.
        for (element, action) in self.tracker.consumed_originals() {
            self.graph.finalize_after(action, element);
        }

        let graph = std::mem::take(&mut self.graph);
        let batches = graph.drain().context("closing section")?;

        let placements: Vec<PlacedObject> = self
            .map
            .items()
            .map(|item| PlacedObject {
                object: item.object,
                placement: item.placement(),
            })
            .collect();

        let retained: Vec<ObjectId> = retain
            .iter()
            .copied()
            .filter(|object| self.map.contains(*object))
            .collect();

        let (grid_width, grid_height) = self.map.grid_size();
        let id = self.ids.alloc_section();
        log::debug!(
            "section {id:?} closed: {} batches, {} placements, {} retained",
            batches.len(),
            placements.len(),
            retained.len()
        );
        let section = Section {
            id,
            batches,
            placements,
            retained: retained.clone(),
            grid_width,
            grid_height,
        };
        self.schedule.sections.push(section.clone());

        self.map
            .reset(&retained, retain_positions)
            .context("resetting placement for next section")?;
        self.tracker.reset();
        for object in &retained {
            self.graph.add_external(Key::Object(*object));
        }
        self.retained = retained;
        Ok(Some(section))
    }

    /// Placement of an object in the section under construction.
    pub fn placement_of(&self, object: ObjectId) -> Option<Placement> {
        self.map.placement_of(object)
    }

    pub fn canvas_size(&self) -> (usize, usize) {
        self.map.grid_size()
    }

    /// ASCII rendering of the current grid, for logs.
    pub fn dump_grid(&self) -> String {
        self.map.dump()
    }

    pub fn retained(&self) -> &[ObjectId] {
        &self.retained
    }

    pub fn schedule(&self) -> &SectionSchedule {
        &self.schedule
    }

    pub fn into_schedule(self) -> SectionSchedule {
        self.schedule
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
