//! Dependency graph construction and batched drain.

use crate::action::{ActionDescriptor, ActionRecord};
use crate::batch::Batch;
use hashbrown::{HashMap, HashSet};
use sceneflow_api_core::{ActionId, CoreError, CoreResult, ElementId, Key};

/// Graph of registered actions for one section.
///
/// Edges are created when an action consumes a key most recently produced by
/// another action, or when two actions share a serialization key (second
/// depends on first, by registration order). A key consumed with no producer
/// must have been declared external beforehand, otherwise registration fails.
///
/// A consumed key may be an alias for another key: the edge is wired from
/// the aliased key's producer, but the action's own descriptor keeps the
/// alias. Fan-out consumers use this so each one declares the duplicate it
/// actually moves, keeping batch-mates key-disjoint.
#[derive(Debug, Default)]
pub struct FlowGraph {
    actions: Vec<ActionRecord>,
    /// Successor adjacency, indexed by registration index.
    succs: Vec<Vec<usize>>,
    /// Incoming edge count per action.
    indeg: Vec<usize>,
    /// Latest producer per key.
    producers: HashMap<Key, usize>,
    /// Current holder per serialization key.
    serial_holders: HashMap<Key, usize>,
    /// Keys supplied from outside the section (retained objects).
    external: HashSet<Key>,
    /// Alias key -> the key whose producer it depends on.
    aliases: HashMap<Key, Key>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Exempt a key from the producer check. Used for objects carried over a
    /// section boundary.
    pub fn add_external(&mut self, key: Key) {
        self.external.insert(key);
    }

    /// Declare `key` as standing in for `root`: consuming `key` depends on
    /// the producer of `root` while the consuming action's descriptor keeps
    /// `key` itself.
    pub fn add_alias(&mut self, key: Key, root: Key) {
        self.aliases.insert(key, root);
    }

    /// Register one action, wiring edges from the latest producers of its
    /// consumed keys and from the current holder of its serialization key.
    pub fn register(
        &mut self,
        consumed: &[Key],
        produced: &[Key],
        serialization: Option<Key>,
    ) -> CoreResult<ActionId> {
        for key in produced {
            if self.producers.contains_key(key) {
                return Err(CoreError::DuplicateProducer { key: *key });
            }
        }

        let index = self.actions.len();
        let mut preds: HashSet<usize> = HashSet::new();

        for key in consumed {
            let root = self.aliases.get(key).unwrap_or(key);
            match self.producers.get(root) {
                Some(&producer) => {
                    preds.insert(producer);
                }
                None if self.external.contains(root) => {}
                None => return Err(CoreError::UnknownObjectReference { key: *key }),
            }
        }

        if let Some(serial) = serialization {
            if let Some(&holder) = self.serial_holders.get(&serial) {
                preds.insert(holder);
            }
            self.serial_holders.insert(serial, index);
        }

        for key in produced {
            self.producers.insert(*key, index);
        }

        let id = ActionId(index as u32);
        self.actions.push(ActionRecord {
            id,
            index,
            consumed: consumed.to_vec(),
            produced: produced.to_vec(),
            serialization,
            finalize_after: Vec::new(),
        });
        self.succs.push(Vec::new());
        self.indeg.push(preds.len());
        for pred in preds {
            self.succs[pred].push(index);
        }

        Ok(id)
    }

    /// Attach an element to the action's finalize list; the element is
    /// retired from the scene right after the action plays.
    pub fn finalize_after(&mut self, action: ActionId, element: ElementId) {
        if let Some(rec) = self.actions.get_mut(action.0 as usize) {
            if !rec.finalize_after.contains(&element) {
                rec.finalize_after.push(element);
            }
        }
    }

    /// Drain the graph into ordered, internally-parallel batches.
    ///
    /// Layered Kahn traversal: every action whose predecessors are all in
    /// earlier batches joins the current batch; within a batch actions keep
    /// registration order. O(actions + edges). If no progress can be made
    /// while actions remain, `DependencyCycle` is returned; it is
    /// unreachable when edges only point backwards.
    pub fn drain(self) -> CoreResult<Vec<Batch>> {
        let FlowGraph {
            actions,
            succs,
            mut indeg,
            ..
        } = self;

        let total = actions.len();
        let mut batches: Vec<Batch> = Vec::new();
        let mut frontier: Vec<usize> = (0..total).filter(|&i| indeg[i] == 0).collect();
        let mut batched = 0usize;

        while !frontier.is_empty() {
            let mut next: Vec<usize> = Vec::new();
            for &idx in &frontier {
                for &succ in &succs[idx] {
                    indeg[succ] -= 1;
                    if indeg[succ] == 0 {
                        next.push(succ);
                    }
                }
            }
            batched += frontier.len();
            batches.push(Batch {
                actions: frontier
                    .iter()
                    .map(|&idx| ActionDescriptor::from(&actions[idx]))
                    .collect(),
            });
            next.sort_unstable();
            frontier = next;
        }

        if batched != total {
            return Err(CoreError::DependencyCycle {
                remaining: total - batched,
            });
        }

        log::debug!("drained {} actions into {} batches", total, batches.len());
        Ok(batches)
    }
}
