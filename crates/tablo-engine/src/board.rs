use tablo_types::{ColumnSpec, FieldPath, Key, Record};

/// Pointer drags shorter than this (in cells, Chebyshev distance) stay
/// clicks, so selecting a card never accidentally starts a move.
pub const DRAG_THRESHOLD: u16 = 2;

/// Caller-declared board shape: the columns and the grouping field.
///
/// Columns are never derived from data; an empty column still renders
/// and still accepts drops. Records whose grouping key matches no
/// declared column land in the *first* declared column; that fallback
/// is deliberate (nothing is ever silently dropped) and callers who
/// want a visible "unassigned" bucket can simply declare one first.
#[derive(Debug, Clone)]
pub struct BoardSpec {
    pub columns: Vec<ColumnSpec>,
    pub group_by: FieldPath,
}

impl BoardSpec {
    pub fn new(columns: Vec<ColumnSpec>, group_by: impl Into<FieldPath>) -> Self {
        Self {
            columns,
            group_by: group_by.into(),
        }
    }

    pub fn column_index(&self, key: &Key) -> Option<usize> {
        self.columns.iter().position(|c| c.id.coerced_eq(key))
    }
}

/// Column a record renders in: its derived column when the grouping
/// key matches a declared column, the first declared column otherwise.
pub fn displayed_column_index(record: &Record, spec: &BoardSpec) -> usize {
    record
        .key_at(&spec.group_by)
        .and_then(|key| spec.column_index(&key))
        .unwrap_or(0)
}

/// Partition records into one bucket per declared column.
///
/// Total and idempotent: every record lands in exactly one bucket, and
/// membership depends only on each record's grouping key, never on
/// input order. Bucket order within a column follows input order.
pub fn partition<'a>(items: &'a [Record], spec: &BoardSpec) -> Vec<Vec<&'a Record>> {
    let mut buckets: Vec<Vec<&Record>> = vec![Vec::new(); spec.columns.len()];
    if buckets.is_empty() {
        return buckets;
    }
    for record in items {
        buckets[displayed_column_index(record, spec)].push(record);
    }
    buckets
}

/// What the pointer (or keyboard focus) was over when the drop landed.
#[derive(Debug, Clone, PartialEq)]
pub enum DropTarget {
    /// A column container; the only hit in an empty column.
    Column(Key),
    /// Another card; resolves to that card's containing column, never
    /// to the card itself.
    Card(Key),
}

/// Resolve a drop target to a declared column id.
///
/// Returns `None` when the target matches neither a declared column nor
/// a visible card; such drops are no-ops, not errors.
pub fn resolve_drop_target(
    target: &DropTarget,
    spec: &BoardSpec,
    items: &[Record],
) -> Option<Key> {
    match target {
        DropTarget::Column(id) => spec
            .column_index(id)
            .map(|index| spec.columns[index].id.clone()),
        DropTarget::Card(card_id) => {
            let record = items.iter().find(|r| r.id().coerced_eq(card_id))?;
            if spec.columns.is_empty() {
                return None;
            }
            let index = displayed_column_index(record, spec);
            Some(spec.columns[index].id.clone())
        }
    }
}

/// The move the host must perform: set `id`'s grouping field to `to`,
/// then invalidate the cache. The engine never patches the record
/// locally; the next grouping pass over fresh data reflects the move,
/// so a failed or slow server update can never leave a card duplicated
/// or reverted on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub id: Key,
    pub to: Key,
}

/// Result of releasing a drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Press and release without crossing the activation threshold.
    Click(Key),
    /// Destination column differs from the record's current column.
    Moved(StatusChange),
    /// Same column, unresolved target, or nothing was being dragged.
    NoOp,
}

#[derive(Debug, Clone, PartialEq)]
enum DragPhase {
    Idle,
    /// Pressed on a card but not yet past the activation threshold.
    Armed { id: Key, origin: (u16, u16) },
    Dragging { id: Key, at: (u16, u16) },
}

/// Drag gesture lifecycle: `Idle -> Armed -> Dragging -> Idle`.
///
/// Pointer and keyboard input both funnel into [`DragGesture::release`]
/// and therefore into the same [`resolve_drop_target`], so the two
/// input paths cannot diverge in behavior.
#[derive(Debug, Clone)]
pub struct DragGesture {
    phase: DragPhase,
    threshold: u16,
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new()
    }
}

impl DragGesture {
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }

    pub fn with_threshold(threshold: u16) -> Self {
        Self {
            phase: DragPhase::Idle,
            threshold,
        }
    }

    /// Pointer pressed on a card. Arms the gesture; the drag proper
    /// starts only once the pointer travels past the threshold.
    pub fn press(&mut self, id: Key, position: (u16, u16)) {
        self.phase = DragPhase::Armed {
            id,
            origin: position,
        };
    }

    /// Keyboard path: an explicit pick-up command has no accidental
    /// movement to debounce, so it enters Dragging directly.
    pub fn pick_up(&mut self, id: Key, position: (u16, u16)) {
        self.phase = DragPhase::Dragging { id, at: position };
    }

    pub fn move_to(&mut self, position: (u16, u16)) {
        match &mut self.phase {
            DragPhase::Armed { id, origin } => {
                let dx = position.0.abs_diff(origin.0);
                let dy = position.1.abs_diff(origin.1);
                if dx.max(dy) >= self.threshold {
                    self.phase = DragPhase::Dragging {
                        id: id.clone(),
                        at: position,
                    };
                }
            }
            DragPhase::Dragging { at, .. } => *at = position,
            DragPhase::Idle => {}
        }
    }

    /// The card being dragged and its current overlay position, if a
    /// drag is active.
    pub fn dragging(&self) -> Option<(&Key, (u16, u16))> {
        match &self.phase {
            DragPhase::Dragging { id, at } => Some((id, *at)),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DragPhase::Idle
    }

    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }

    /// Finish the gesture and decide what, if anything, happened.
    ///
    /// Fires a [`DropOutcome::Moved`] exactly once, and only when the
    /// resolved destination column coerced-differs from the dragged
    /// record's currently-displayed column. Everything else (same
    /// column, unrecognized target, release without a drag) is a
    /// no-op and returns the gesture to Idle.
    pub fn release(
        &mut self,
        target: Option<&DropTarget>,
        spec: &BoardSpec,
        items: &[Record],
    ) -> DropOutcome {
        let phase = std::mem::replace(&mut self.phase, DragPhase::Idle);
        match phase {
            DragPhase::Idle => DropOutcome::NoOp,
            DragPhase::Armed { id, .. } => DropOutcome::Click(id),
            DragPhase::Dragging { id, .. } => {
                let Some(target) = target else {
                    return DropOutcome::NoOp;
                };
                let Some(dest) = resolve_drop_target(target, spec, items) else {
                    return DropOutcome::NoOp;
                };
                let Some(record) = items.iter().find(|r| r.id().coerced_eq(&id)) else {
                    return DropOutcome::NoOp;
                };
                let current = &spec.columns[displayed_column_index(record, spec)].id;
                if dest.coerced_eq(current) {
                    DropOutcome::NoOp
                } else {
                    DropOutcome::Moved(StatusChange { id, to: dest })
                }
            }
        }
    }
}
