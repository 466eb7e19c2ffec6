/// Canvas-wide lifecycle state.
///
/// ```text
///   Synced ──update──► Updating ──draw──► Drawing
///     ▲  └────────draw────────────────────▲  │
///     └──────────────────sync─────────────┴──┘
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum CanvasStatus {
    /// No frame in flight; the backend has caught up.
    #[default]
    Synced,
    /// Paints were updated since the last sync.
    Updating,
    /// A frame was submitted and not yet joined.
    Drawing,
}

impl CanvasStatus {
    /// Whether the canvas may move from `self` to `next`.
    pub fn can_transition_to(self, next: CanvasStatus) -> bool {
        use CanvasStatus::*;

        matches!(
            (self, next),
            (Synced | Updating, Updating) | (Synced | Updating, Drawing) | (Updating | Drawing, Synced)
        )
    }
}
