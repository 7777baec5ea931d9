//! Application state machine and event dispatcher.
//!
//! One [`PanelOrder`] per kind holds the visible sequence. Moving an item
//! rewrites the panel immediately; the reorder request runs on a spawned
//! task and reports back over a channel drained by the event loop.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use strum::IntoEnumIterator as _;
use tokio::sync::mpsc;
use vitae_core::{
  EntityKind, Record,
  ordering::{PanelOrder, Phase, Reconcile, ReorderRequest},
};

use crate::client::ApiClient;

/// Outcome of one spawned reorder request.
#[derive(Debug)]
pub struct Persisted {
  pub kind:    EntityKind,
  pub seq:     u64,
  pub outcome: Result<(), String>,
}

// ─── App ─────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// One panel per kind, in tab order.
  pub panels: Vec<PanelOrder<Record>>,

  /// Index of the visible panel.
  pub active: usize,

  /// Cursor position within the visible panel. While moving, this is the
  /// drop target.
  pub cursor: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,

  persisted_tx: mpsc::UnboundedSender<Persisted>,
  persisted_rx: mpsc::UnboundedReceiver<Persisted>,
}

impl App {
  /// Create an [`App`] with one empty panel per kind.
  pub fn new(client: ApiClient, policy: Reconcile) -> Self {
    let (persisted_tx, persisted_rx) = mpsc::unbounded_channel();
    Self {
      panels: EntityKind::iter()
        .map(|kind| PanelOrder::new(kind, Vec::new()).with_policy(policy))
        .collect(),
      active: 0,
      cursor: 0,
      status_msg: String::new(),
      client: Arc::new(client),
      persisted_tx,
      persisted_rx,
    }
  }

  pub fn panel(&self) -> &PanelOrder<Record> { &self.panels[self.active] }

  fn panel_mut(&mut self) -> &mut PanelOrder<Record> { &mut self.panels[self.active] }

  /// The source index of the item being moved, if any.
  pub fn moving_from(&self) -> Option<usize> {
    match self.panel().phase() {
      Phase::Dragging { from } => Some(from),
      _ => None,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch every kind from the API.
  pub async fn load_all(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading…".into();
    for i in 0..self.panels.len() {
      let kind = self.panels[i].kind();
      match self.client.list(kind).await {
        Ok(records) => self.panels[i].replace(records),
        Err(e) => {
          self.status_msg = format!("Error: {e}");
          return Err(e);
        }
      }
    }
    self.status_msg = String::new();
    Ok(())
  }

  /// Refetch the visible panel.
  async fn reload(&mut self) {
    let kind = self.panel().kind();
    match self.client.list(kind).await {
      Ok(records) => {
        self.panel_mut().replace(records);
        self.clamp_cursor();
        self.status_msg = String::new();
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }

  fn clamp_cursor(&mut self) {
    let len = self.panel().items().len();
    self.cursor = self.cursor.min(len.saturating_sub(1));
  }

  // ── Persistence ───────────────────────────────────────────────────────────

  /// Send `request` without waiting for it.
  fn persist(&self, request: ReorderRequest) {
    let client = Arc::clone(&self.client);
    let tx = self.persisted_tx.clone();
    let kind = request.target.kind();
    tokio::spawn(async move {
      let outcome = client
        .reorder(request.target, &request.items)
        .await
        .map_err(|e| e.to_string());
      // The receiver is gone only when the app is shutting down.
      let _ = tx.send(Persisted { kind, seq: request.seq, outcome });
    });
  }

  /// Feed every finished request back into its panel.
  pub fn drain_persisted(&mut self) {
    while let Ok(done) = self.persisted_rx.try_recv() {
      self.apply_persisted(done);
    }
  }

  /// Wait for the next finished request and apply it.
  #[cfg(test)]
  pub async fn next_persisted(&mut self) -> Option<()> {
    let done = self.persisted_rx.recv().await?;
    self.apply_persisted(done);
    Some(())
  }

  fn apply_persisted(&mut self, done: Persisted) {
    if let Some(panel) = self.panels.iter_mut().find(|p| p.kind() == done.kind) {
      if panel.reconcile(done.seq, done.outcome) {
        self.status_msg = format!("{}: order restored", done.kind.label());
      }
    }
    self.clamp_cursor();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if self.moving_from().is_some() {
      self.handle_move_key(key);
      return Ok(true);
    }
    self.handle_browse_key(key).await
  }

  async fn handle_browse_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let len = self.panel().items().len();
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      // Panels
      KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
        self.active = (self.active + 1) % self.panels.len();
        self.cursor = 0;
      }
      KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
        self.active = (self.active + self.panels.len() - 1) % self.panels.len();
        self.cursor = 0;
      }

      // Cursor
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }

      // Pick up for moving
      KeyCode::Char(' ') | KeyCode::Char('m') => {
        let cursor = self.cursor;
        if let Err(e) = self.panel_mut().begin_drag(cursor) {
          self.status_msg = match e {
            vitae_core::Error::InvalidKind(_) => {
              format!("{} cannot be reordered", self.panel().kind().label())
            }
            other => other.to_string(),
          };
        } else {
          self.status_msg = String::new();
        }
      }

      // Delete
      KeyCode::Char('d') => {
        let kind = self.panel().kind();
        if let Some(id) = self.panel().items().get(self.cursor).map(|r| r.id.clone()) {
          match self.client.delete(kind, &id).await {
            Ok(()) => self.reload().await,
            Err(e) => self.status_msg = format!("Error: {e}"),
          }
        }
      }

      KeyCode::Char('r') => self.reload().await,

      _ => {}
    }
    Ok(true)
  }

  fn handle_move_key(&mut self, key: KeyEvent) {
    let len = self.panel().items().len();
    match key.code {
      KeyCode::Down | KeyCode::Char('j') => {
        if self.cursor + 1 < len {
          self.cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.cursor = self.cursor.saturating_sub(1);
      }
      KeyCode::Esc => {
        if let Some(from) = self.moving_from() {
          self.cursor = from;
        }
        self.panel_mut().cancel_drag();
      }
      KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('m') => {
        let cursor = self.cursor;
        match self.panel_mut().drop_at(cursor) {
          Ok(true) => {
            if let Some(request) = self.panel_mut().take_request() {
              self.persist(request);
            }
          }
          Ok(false) => {}
          Err(e) => self.status_msg = e.to_string(),
        }
      }
      _ => {}
    }
  }
}
