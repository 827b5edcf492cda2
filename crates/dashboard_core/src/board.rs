//! Render-pass generations and progressive status updates

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::status::BadgeStatus;
use crate::types::WorkflowId;

/// Generation number of a render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Epoch(self.0 + 1)
    }
}

/// A settled badge resolution, tagged with the pass that requested it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub epoch: Epoch,
    pub workflow_id: WorkflowId,
    pub status: BadgeStatus,
}

/// Status of each card in the current render pass.
///
/// Starting a new pass invalidates every outstanding resolution; updates that
/// arrive late carry an older epoch and are discarded instead of being
/// applied to cards that no longer exist.
#[derive(Debug, Default)]
pub struct StatusBoard {
    epoch: Epoch,
    statuses: HashMap<WorkflowId, BadgeStatus>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_pass(&mut self) -> Epoch {
        self.epoch = self.epoch.next();
        self.statuses.clear();
        debug!("Starting render pass {}", self.epoch.value());
        self.epoch
    }

    pub fn current_epoch(&self) -> Epoch {
        self.epoch
    }

    /// Records an update; returns false when it belongs to a stale pass
    pub fn apply(&mut self, update: StatusUpdate) -> bool {
        if update.epoch != self.epoch {
            debug!(
                "Discarding stale status for workflow {} (pass {}, current {})",
                update.workflow_id,
                update.epoch.value(),
                self.epoch.value()
            );
            return false;
        }
        self.statuses.insert(update.workflow_id, update.status);
        true
    }

    pub fn status(&self, id: &WorkflowId) -> Option<&BadgeStatus> {
        self.statuses.get(id)
    }

    pub fn settled_count(&self) -> usize {
        self.statuses.len()
    }

    /// Settled statuses of the current pass, in no particular order
    pub fn statuses(&self) -> impl Iterator<Item = &BadgeStatus> {
        self.statuses.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(epoch: Epoch, id: u64, label: &str) -> StatusUpdate {
        StatusUpdate {
            epoch,
            workflow_id: WorkflowId::from(id),
            status: BadgeStatus::from_label(label),
        }
    }

    #[test]
    fn test_current_updates_are_applied() {
        let mut board = StatusBoard::new();
        let epoch = board.begin_pass();

        assert!(board.apply(update(epoch, 1, "passing")));
        assert_eq!(
            board.status(&WorkflowId::from(1)).unwrap().label.as_deref(),
            Some("passing")
        );
        assert_eq!(board.settled_count(), 1);
    }

    #[test]
    fn test_stale_updates_are_discarded() {
        let mut board = StatusBoard::new();
        let first = board.begin_pass();
        let second = board.begin_pass();
        assert!(second > first);

        assert!(!board.apply(update(first, 1, "failing")));
        assert!(board.status(&WorkflowId::from(1)).is_none());

        assert!(board.apply(update(second, 1, "passing")));
        assert_eq!(board.current_epoch(), second);
    }

    #[test]
    fn test_new_pass_clears_statuses() {
        let mut board = StatusBoard::new();
        let epoch = board.begin_pass();
        board.apply(update(epoch, 1, "passing"));

        board.begin_pass();
        assert_eq!(board.settled_count(), 0);
    }
}
