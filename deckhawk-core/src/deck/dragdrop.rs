//! Drag identity parsing and the modal drag state.
//!
//! Element ids on the canvas follow three conventions: `search-<cardId>`
//! for cards dragged out of the search results, `column-<key>` for a column
//! header, and a bare entry id for a card already in the deck. Drop targets
//! add `slot-<row>-<col>` for the empty "plus" placement cells. The editor
//! facade interprets a finished drag against the deck and layout models.

/// What is being dragged, decoded from the dragged element's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A card from the search results, by card id.
    SearchCard(String),
    /// A column header, by category key.
    Column(String),
    /// An existing deck entry, by entry id.
    Entry(String),
}

impl DragSource {
    pub fn parse(raw: &str) -> DragSource {
        if let Some(card_id) = raw.strip_prefix("search-") {
            DragSource::SearchCard(card_id.to_string())
        } else if let Some(key) = raw.strip_prefix("column-") {
            DragSource::Column(key.to_string())
        } else {
            DragSource::Entry(raw.to_string())
        }
    }
}

/// Where the drag ended, decoded from the drop element's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// An empty placement cell in the column grid.
    Slot { row: u32, col: u32 },
    /// A column header.
    Column(String),
    /// A category drop zone (the bare category key).
    Category(String),
}

impl DropTarget {
    pub fn parse(raw: &str) -> Option<DropTarget> {
        if let Some(rest) = raw.strip_prefix("slot-") {
            let (row, col) = rest.split_once('-')?;
            return Some(DropTarget::Slot {
                row: row.parse().ok()?,
                col: col.parse().ok()?,
            });
        }
        if let Some(key) = raw.strip_prefix("column-") {
            return Some(DropTarget::Column(key.to_string()));
        }
        if raw.is_empty() {
            return None;
        }
        Some(DropTarget::Category(raw.to_string()))
    }
}

/// Drags are modal: at most one active id at a time, cleared on drag-end
/// regardless of outcome.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    active: Option<DragSource>,
}

impl DragState {
    pub fn new() -> DragState {
        DragState::default()
    }

    pub fn begin(&mut self, raw_id: &str) {
        self.active = Some(DragSource::parse(raw_id));
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragSource> {
        self.active.as_ref()
    }

    /// Ends the drag and hands back what was being dragged.
    pub fn end(&mut self) -> Option<DragSource> {
        self.active.take()
    }
}
