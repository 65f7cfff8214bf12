//! Element reuse and duplication tracking.

use hashbrown::HashMap;
use sceneflow_api_core::{ActionId, CoreError, CoreResult, ElemSignature, ElementId, IdAllocator, ObjectId};

#[derive(Debug, Default)]
struct RefRecord {
    /// Number of consumers registered so far. 0 means produced but unused.
    pending: u32,
    /// Most recently registered consumer; the original element stays in the
    /// scene until this action has played.
    last_consumer: Option<ActionId>,
}

/// Signature cache and pending-consumer bookkeeping for elements.
///
/// Deduplicates repeated reads (same signature, no intervening write into the
/// container) and fans a produced value out to several consumers: the first
/// resolution hands out the original id, every later one mints an independent
/// duplicate. Duplicates retire right after their own consuming action; the
/// original only after the designated last consumer's action.
#[derive(Debug, Default)]
pub struct ElementTracker {
    sources: HashMap<ElemSignature, ElementId>,
    refs: HashMap<ElementId, RefRecord>,
    /// Duplicate id → original id.
    dup_parent: HashMap<ElementId, ElementId>,
}

impl ElementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached element for a signature, on an exact field-wise match only.
    pub fn lookup(&self, signature: &ElemSignature) -> Option<ElementId> {
        self.sources.get(signature).copied()
    }

    /// Record the source of a freshly read element.
    pub fn record_source(&mut self, signature: ElemSignature, element: ElementId) {
        self.sources.insert(signature, element);
    }

    /// Drop every cached signature for a container. Called when an action
    /// writes into it; later reads must be fresh.
    pub fn invalidate_container(&mut self, container: ObjectId) {
        self.sources.retain(|sig, _| sig.container != container);
    }

    /// Initialize bookkeeping for a newly produced element.
    pub fn register_producer(&mut self, element: ElementId) {
        self.refs.insert(element, RefRecord::default());
    }

    pub fn is_tracked(&self, element: ElementId) -> bool {
        self.refs.contains_key(&element)
    }

    /// Count one more consumer of the element.
    pub fn register_consumer(&mut self, element: ElementId) -> CoreResult<()> {
        let rec = self
            .refs
            .get_mut(&element)
            .ok_or(CoreError::UnknownElement { element })?;
        rec.pending += 1;
        Ok(())
    }

    /// Id the current consumer should use. The sole (or first) consumer gets
    /// the original; later consumers each get a freshly minted duplicate.
    pub fn resolve_for_consumption(
        &mut self,
        element: ElementId,
        ids: &mut IdAllocator,
    ) -> CoreResult<ElementId> {
        let rec = self
            .refs
            .get(&element)
            .ok_or(CoreError::UnknownElement { element })?;
        if rec.pending <= 1 {
            Ok(element)
        } else {
            let dup = ids.alloc_element();
            self.dup_parent.insert(dup, element);
            Ok(dup)
        }
    }

    /// Original element behind an id, whether it is the original itself or a
    /// minted duplicate.
    pub fn root_of(&self, element: ElementId) -> ElementId {
        self.dup_parent.get(&element).copied().unwrap_or(element)
    }

    pub fn is_duplicate(&self, element: ElementId) -> bool {
        self.dup_parent.contains_key(&element)
    }

    /// Update the designated last consumer of the element behind `resolved`.
    pub fn note_consumer_action(&mut self, resolved: ElementId, action: ActionId) {
        let root = self.root_of(resolved);
        if let Some(rec) = self.refs.get_mut(&root) {
            rec.last_consumer = Some(action);
        }
    }

    pub fn pending(&self, element: ElementId) -> u32 {
        self.refs.get(&element).map(|r| r.pending).unwrap_or(0)
    }

    pub fn last_consumer(&self, element: ElementId) -> Option<ActionId> {
        self.refs.get(&element).and_then(|r| r.last_consumer)
    }

    /// Consumed originals and the action each one must outlive, sorted by
    /// element id for deterministic finalize attachment.
    pub fn consumed_originals(&self) -> Vec<(ElementId, ActionId)> {
        let mut out: Vec<(ElementId, ActionId)> = self
            .refs
            .iter()
            .filter(|(_, rec)| rec.pending > 0)
            .filter_map(|(elem, rec)| rec.last_consumer.map(|a| (*elem, a)))
            .collect();
        out.sort_unstable();
        out
    }

    /// Clear all transient state at a section boundary.
    pub fn reset(&mut self) {
        self.sources.clear();
        self.refs.clear();
        self.dup_parent.clear();
    }
}
