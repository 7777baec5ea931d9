//! Client-side ordering state for one panel.
//!
//! A [`PanelOrder`] holds the visible sequence of one kind's records and
//! walks `Idle -> Dragging -> Reordered -> PersistRequested -> Idle`. The
//! local sequence is rewritten synchronously on drop; persistence is handed
//! out as a [`ReorderRequest`] for the caller to send, and its outcome is fed
//! back through [`PanelOrder::reconcile`].

use crate::{
  Error, Result,
  kind::{EntityKind, ReorderTarget},
  record::{Record, RecordId},
};

/// Anything that can be placed in a panel.
pub trait HasId {
  fn id(&self) -> &RecordId;
}

impl HasId for Record {
  fn id(&self) -> &RecordId { &self.id }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
  Idle,
  Dragging { from: usize },
  /// The local sequence changed and has not been handed out for persistence.
  Reordered,
  PersistRequested { seq: u64 },
}

/// What to do with the local sequence when persistence fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Reconcile {
  /// Log the failure and keep the optimistic order.
  #[default]
  FireAndForget,
  /// Restore the order from before the failed drag, unless a newer request
  /// has been issued since.
  Rollback,
}

/// The body of one `POST /api/reorder`, tagged with a local sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderRequest {
  pub target: ReorderTarget,
  pub items:  Vec<RecordId>,
  pub seq:    u64,
}

pub struct PanelOrder<T> {
  kind:      EntityKind,
  items:     Vec<T>,
  phase:     Phase,
  policy:    Reconcile,
  /// Sequence as it was when the current drag began.
  pre_drag:  Option<Vec<T>>,
  /// Sequence as it was before the latest in-flight request's drag.
  snapshot:  Option<(u64, Vec<T>)>,
  /// Request still in flight when the current drag began.
  in_flight: Option<u64>,
  next_seq:  u64,
}

impl<T: HasId + Clone> PanelOrder<T> {
  pub fn new(kind: EntityKind, items: Vec<T>) -> Self {
    Self {
      kind,
      items,
      phase: Phase::Idle,
      policy: Reconcile::default(),
      pre_drag: None,
      snapshot: None,
      in_flight: None,
      next_seq: 1,
    }
  }

  pub fn with_policy(mut self, policy: Reconcile) -> Self {
    self.policy = policy;
    self
  }

  pub fn kind(&self) -> EntityKind { self.kind }

  pub fn items(&self) -> &[T] { &self.items }

  pub fn phase(&self) -> Phase { self.phase }

  /// Replace the sequence with a fresh server listing.
  pub fn replace(&mut self, items: Vec<T>) {
    self.items = items;
    self.phase = Phase::Idle;
    self.pre_drag = None;
    self.snapshot = None;
    self.in_flight = None;
  }

  /// Pick up the item at `from`.
  ///
  /// Allowed while idle or while an earlier request is still in flight.
  pub fn begin_drag(&mut self, from: usize) -> Result<()> {
    if !self.kind.is_ordered() {
      return Err(Error::InvalidKind(self.kind.to_string()));
    }
    let in_flight = match self.phase {
      Phase::Idle => None,
      Phase::PersistRequested { seq } => Some(seq),
      phase => {
        return Err(Error::Ordering(format!("cannot start a drag while {phase:?}")));
      }
    };
    if from >= self.items.len() {
      return Err(Error::Ordering(format!(
        "drag source {from} out of range for {} items",
        self.items.len()
      )));
    }
    self.pre_drag = Some(self.items.clone());
    self.in_flight = in_flight;
    self.phase = Phase::Dragging { from };
    Ok(())
  }

  /// Abandon the drag. A request that was in flight when it began is still
  /// awaited.
  pub fn cancel_drag(&mut self) {
    if let Phase::Dragging { .. } = self.phase {
      self.settle();
    }
  }

  fn settle(&mut self) {
    self.pre_drag = None;
    self.phase = match self.in_flight.take() {
      Some(seq) => Phase::PersistRequested { seq },
      None => Phase::Idle,
    };
  }

  /// Drop the dragged item at `to` (clamped to the last index).
  ///
  /// Returns `false` and leaves the drag without a new request when the
  /// position did not change.
  pub fn drop_at(&mut self, to: usize) -> Result<bool> {
    let Phase::Dragging { from } = self.phase else {
      return Err(Error::Ordering("drop without a drag".into()));
    };
    let to = to.min(self.items.len().saturating_sub(1));
    if to == from {
      self.settle();
      return Ok(false);
    }
    move_item(&mut self.items, from, to);
    self.in_flight = None;
    self.phase = Phase::Reordered;
    Ok(true)
  }

  /// Hand out the full new sequence for persistence.
  pub fn take_request(&mut self) -> Option<ReorderRequest> {
    if self.phase != Phase::Reordered {
      return None;
    }
    let target = ReorderTarget::new(self.kind)?;
    let seq = self.next_seq;
    self.next_seq += 1;

    if let Some(before) = self.pre_drag.take() {
      self.snapshot = Some((seq, before));
    }
    self.phase = Phase::PersistRequested { seq };
    Some(ReorderRequest {
      target,
      items: self.items.iter().map(|i| i.id().clone()).collect(),
      seq,
    })
  }

  /// Feed back the outcome of request `seq`. Returns `true` when the local
  /// sequence was rolled back.
  pub fn reconcile(
    &mut self,
    seq: u64,
    outcome: std::result::Result<(), String>,
  ) -> bool {
    let latest = matches!(self.phase, Phase::PersistRequested { seq: s } if s == seq);
    let mut rolled_back = false;

    if let Err(error) = outcome {
      tracing::warn!(kind = %self.kind, seq, %error, "reorder not persisted");
      if self.policy == Reconcile::Rollback && latest {
        if let Some((_, before)) = self.snapshot.take_if(|(s, _)| *s == seq) {
          self.items = before;
          rolled_back = true;
        }
      }
    }

    if latest {
      self.snapshot = None;
      self.phase = Phase::Idle;
    }
    rolled_back
  }
}

/// Remove the item at `from` and insert it at `to`, both indices relative
/// to the sequence before the move.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
  if from >= items.len() || from == to {
    return;
  }
  let item = items.remove(from);
  let to = to.min(items.len());
  items.insert(to, item);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Item(RecordId);

  impl HasId for Item {
    fn id(&self) -> &RecordId { &self.0 }
  }

  fn panel(kind: EntityKind) -> PanelOrder<Item> {
    PanelOrder::new(kind, ["a", "b", "c", "d"].map(|s| Item(s.into())).to_vec())
  }

  fn ids(panel: &PanelOrder<Item>) -> Vec<&str> {
    panel.items().iter().map(|i| i.0.as_str()).collect()
  }

  #[test]
  fn move_item_moves_down_and_up() {
    let mut v = vec![1, 2, 3, 4];
    move_item(&mut v, 0, 2);
    assert_eq!(v, vec![2, 3, 1, 4]);
    move_item(&mut v, 3, 0);
    assert_eq!(v, vec![4, 2, 3, 1]);
    move_item(&mut v, 9, 0);
    assert_eq!(v, vec![4, 2, 3, 1]);
  }

  #[test]
  fn drop_in_place_returns_to_idle_without_request() {
    let mut p = panel(EntityKind::Projects);
    p.begin_drag(1).unwrap();
    assert!(!p.drop_at(1).unwrap());
    assert_eq!(p.phase(), Phase::Idle);
    assert!(p.take_request().is_none());
  }

  #[test]
  fn drop_rewrites_sequence_before_request() {
    let mut p = panel(EntityKind::Experiences);
    p.begin_drag(3).unwrap();
    assert!(p.drop_at(0).unwrap());
    assert_eq!(ids(&p), vec!["d", "a", "b", "c"]);
    assert_eq!(p.phase(), Phase::Reordered);

    let req = p.take_request().unwrap();
    assert_eq!(req.target.kind(), EntityKind::Experiences);
    assert_eq!(
      req.items.iter().map(RecordId::as_str).collect::<Vec<_>>(),
      vec!["d", "a", "b", "c"]
    );
    assert_eq!(p.phase(), Phase::PersistRequested { seq: req.seq });

    assert!(!p.reconcile(req.seq, Ok(())));
    assert_eq!(p.phase(), Phase::Idle);
  }

  #[test]
  fn failure_keeps_optimistic_order_by_default() {
    let mut p = panel(EntityKind::Education);
    p.begin_drag(0).unwrap();
    p.drop_at(3).unwrap();
    let req = p.take_request().unwrap();

    assert!(!p.reconcile(req.seq, Err("boom".into())));
    assert_eq!(ids(&p), vec!["b", "c", "d", "a"]);
    assert_eq!(p.phase(), Phase::Idle);
  }

  #[test]
  fn rollback_policy_restores_pre_drag_order() {
    let mut p = panel(EntityKind::Publications).with_policy(Reconcile::Rollback);
    p.begin_drag(0).unwrap();
    p.drop_at(2).unwrap();
    let req = p.take_request().unwrap();

    assert!(p.reconcile(req.seq, Err("boom".into())));
    assert_eq!(ids(&p), vec!["a", "b", "c", "d"]);
  }

  #[test]
  fn stale_failure_does_not_roll_back_newer_order() {
    let mut p = panel(EntityKind::Projects).with_policy(Reconcile::Rollback);
    p.begin_drag(0).unwrap();
    p.drop_at(1).unwrap();
    let first = p.take_request().unwrap();

    p.begin_drag(3).unwrap();
    p.drop_at(0).unwrap();
    let second = p.take_request().unwrap();

    assert!(!p.reconcile(first.seq, Err("late".into())));
    assert_eq!(ids(&p), vec!["d", "b", "a", "c"]);
    assert_eq!(p.phase(), Phase::PersistRequested { seq: second.seq });
  }

  #[test]
  fn abandoned_drag_still_awaits_in_flight_request() {
    let mut p = panel(EntityKind::Projects).with_policy(Reconcile::Rollback);
    p.begin_drag(0).unwrap();
    p.drop_at(2).unwrap();
    let req = p.take_request().unwrap();

    p.begin_drag(1).unwrap();
    p.cancel_drag();
    assert_eq!(p.phase(), Phase::PersistRequested { seq: req.seq });

    p.begin_drag(1).unwrap();
    assert!(!p.drop_at(1).unwrap());
    assert_eq!(p.phase(), Phase::PersistRequested { seq: req.seq });

    assert!(p.reconcile(req.seq, Err("boom".into())));
    assert_eq!(ids(&p), vec!["a", "b", "c", "d"]);
    assert_eq!(p.phase(), Phase::Idle);
  }

  #[test]
  fn skills_cannot_be_dragged() {
    let mut p = panel(EntityKind::Skills);
    assert!(matches!(p.begin_drag(0), Err(Error::InvalidKind(_))));
  }

  #[test]
  fn one_drag_at_a_time() {
    let mut p = panel(EntityKind::Certifications);
    p.begin_drag(0).unwrap();
    assert!(matches!(p.begin_drag(1), Err(Error::Ordering(_))));
    p.cancel_drag();
    assert_eq!(p.phase(), Phase::Idle);
    assert!(matches!(p.begin_drag(4), Err(Error::Ordering(_))));
  }
}
