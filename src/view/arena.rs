use std::collections::{BTreeMap, HashSet};

use tracing::{debug, error};

use super::{View, ViewId};

/// Owns every live view. Frames and editing views refer to views by id.
#[derive(Debug, Default)]
pub struct ViewArena {
    views: BTreeMap<ViewId, View>,
    next_id: u64,
}

impl ViewArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, view: View) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        debug!(target: "views", "registered {} view {}", view.kind(), id);
        self.views.insert(id, view);
        id
    }

    pub fn get(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// `id` followed by its underlying view, that view's underlying, and so
    /// on. An id that is no longer registered ends the chain.
    pub fn chain(&self, id: ViewId) -> Vec<ViewId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(next) = self.views.get(&current).and_then(View::underlying) {
            if chain.contains(&next) {
                error!(target: "views", "cycle in underlying chain of {} at {}", id, next);
                debug_assert!(false, "cycle in underlying chain of {} at {}", id, next);
                break;
            }
            chain.push(next);
            current = next;
        }
        chain
    }

    /// Dead-view check for the view `id`: true when `dead` appears below it
    /// in its underlying chain. Every editing view between `id` and `dead`
    /// drops its underlying reference.
    pub fn handle_dead_view(&mut self, id: ViewId, dead: ViewId) -> bool {
        let chain = self.chain(id);
        let Some(position) = chain.iter().skip(1).position(|v| *v == dead) else {
            return false;
        };
        for view in &chain[..=position] {
            if let Some(View::Edit(edit)) = self.views.get_mut(view) {
                edit.detach();
            }
        }
        true
    }

    /// Drop every view not reachable from `roots` through underlying links.
    pub fn retain_reachable(&mut self, roots: impl IntoIterator<Item = ViewId>) -> Vec<ViewId> {
        let mut reachable = HashSet::new();
        for root in roots {
            reachable.extend(self.chain(root));
        }
        let released: Vec<ViewId> = self
            .views
            .keys()
            .filter(|id| !reachable.contains(id))
            .copied()
            .collect();
        for id in &released {
            self.views.remove(id);
        }
        if !released.is_empty() {
            debug!(target: "views", "released {} view(s): {:?}", released.len(), released);
        }
        released
    }
}
