pub mod deck;
pub mod decklist;
pub mod draft;
pub mod error;
pub mod export;
pub mod globals;
pub mod persistence;
pub mod scryfall;
pub mod source;

pub use deck::{
    BuiltinCategory, CategoryKind, ColumnLayout, ColumnOption, DeckBucket, DeckCounts, DeckEntry,
    DeckState, DragSource, DragState, DropTarget, GridPosition, Rect, Selection, kind_of,
};
pub use decklist::{
    DecklistEntry, FailedImport, ImportReport, ImportedEntry, ParsedDecklistLine, import_decklist,
    parse_decklist, parse_line,
};
pub use draft::{Draft, DraftStore};
pub use error::DeckError;
pub use export::{ExportGrouping, ExportOptions, export_decklist};
pub use globals::get_scryfall_client;
pub use persistence::{
    DeckApiClient, DeckCardPayload, DeckPayload, decode_description, encode_description,
    hydrate_deck, to_payload,
};
pub use scryfall::{CardReference, CardSearchResult, ScryfallClient, SetReference};
pub use source::CardSource;

use log::warn;

struct DraftSession {
    store: DraftStore,
    id: String,
}

/// One deck-editing session: the deck, its column layout, the multi-select
/// set, the modal drag state and the latest search results, behind a single
/// mutation surface. Every mutation autosaves when a draft session is
/// attached.
pub struct DeckEditor {
    deck: DeckState,
    layout: ColumnLayout,
    selection: Selection,
    drag: DragState,
    search_results: Vec<CardReference>,
    draft: Option<DraftSession>,
}

impl DeckEditor {
    pub fn new() -> DeckEditor {
        DeckEditor {
            deck: DeckState::new(),
            layout: ColumnLayout::default(),
            selection: Selection::new(),
            drag: DragState::new(),
            search_results: Vec::new(),
            draft: None,
        }
    }

    /// Editor over already-hydrated state (a deck loaded from the backend).
    pub fn from_parts(deck: DeckState, layout: ColumnLayout) -> DeckEditor {
        DeckEditor {
            deck,
            layout,
            ..DeckEditor::new()
        }
    }

    pub fn deck(&self) -> &DeckState {
        &self.deck
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    // ---- deck metadata -------------------------------------------------

    pub fn set_name(&mut self, name: &str) {
        self.deck.name = name.to_string();
        self.autosave();
    }

    pub fn set_description(&mut self, description: &str) {
        self.deck.description = description.to_string();
        self.autosave();
    }

    pub fn set_format(&mut self, format: &str) {
        self.deck.format = format.to_string();
        self.autosave();
    }

    // ---- card operations -----------------------------------------------

    pub fn add_card(&mut self, card: CardReference, target: Option<&str>) -> Option<String> {
        let id = self.deck.add_card(card, target);
        if id.is_some() {
            self.autosave();
        }
        id
    }

    pub fn remove_card(&mut self, entry_id: &str, category: &str) -> bool {
        let removed = self.deck.remove_card(entry_id, category);
        if removed {
            self.autosave();
        }
        removed
    }

    pub fn set_quantity(&mut self, entry_id: &str, category: &str, quantity: u32) -> bool {
        let changed = self.deck.set_quantity(entry_id, category, quantity);
        if changed {
            self.autosave();
        }
        changed
    }

    pub fn change_card_face(
        &mut self,
        entry_id: &str,
        category: &str,
        new_card: CardReference,
    ) -> bool {
        let changed = self.deck.change_card_face(entry_id, category, new_card);
        if changed {
            self.autosave();
        }
        changed
    }

    pub fn move_card(&mut self, entry_id: &str, from: &str, to: &str) -> Option<String> {
        let moved = self.deck.move_card(entry_id, from, to);
        if moved.is_some() {
            self.autosave();
        }
        moved
    }

    // ---- column operations ---------------------------------------------

    /// Creates a custom column and its (empty) card list. The caller places
    /// the column afterwards.
    pub fn add_column(&mut self, label: &str) -> String {
        let key = self.layout.add_column(label);
        self.deck.ensure_category(&key);
        self.autosave();
        key
    }

    pub fn place_column(&mut self, key: &str, row: u32, col: u32) -> bool {
        let placed = self.layout.place_column(key, row, col);
        if placed {
            self.autosave();
        }
        placed
    }

    pub fn swap_columns(&mut self, a: &str, b: &str) -> bool {
        let swapped = self.layout.swap_columns(a, b);
        if swapped {
            self.autosave();
        }
        swapped
    }

    /// Hides a built-in column and discards its cards. The cards are not
    /// moved anywhere; restoration yields an empty column.
    pub fn hide_builtin_column(&mut self, key: &str) -> bool {
        if !self.layout.hide_builtin_column(key) {
            return false;
        }
        self.deck.clear_category(key);
        self.autosave();
        true
    }

    pub fn restore_builtin_column(&mut self, key: &str, row: u32, col: u32) -> bool {
        let restored = self.layout.restore_builtin_column(key, row, col);
        if restored {
            self.autosave();
        }
        restored
    }

    /// Permanently removes a custom column and discards its cards.
    pub fn remove_column(&mut self, key: &str) -> bool {
        if !self.layout.remove_column(key) {
            return false;
        }
        self.deck.drop_category(key);
        self.autosave();
        true
    }

    pub fn rename_column(&mut self, key: &str, label: &str) -> bool {
        let renamed = self.layout.rename_column(key, label);
        if renamed {
            self.autosave();
        }
        renamed
    }

    pub fn set_column_option(&mut self, key: &str, option: ColumnOption) {
        self.layout.set_column_option(key, option);
        self.autosave();
    }

    // ---- search results ------------------------------------------------

    /// The latest search result set; search-result drags resolve against it.
    pub fn set_search_results(&mut self, cards: Vec<CardReference>) {
        self.search_results = cards;
    }

    pub fn search_results(&self) -> &[CardReference] {
        &self.search_results
    }

    // ---- selection -----------------------------------------------------

    pub fn toggle_select(&mut self, entry_id: &str) {
        self.selection.toggle(entry_id);
    }

    pub fn rubber_band(&mut self, rect: &Rect, entry_boxes: &[(String, Rect)]) {
        self.selection.apply_rubber_band(rect, entry_boxes);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Batch-removes every selected entry, then clears the selection.
    pub fn remove_selected(&mut self) {
        for id in self.selection.ids() {
            if let Some((category, _)) = self.deck.find_entry(&id) {
                let category = category.to_string();
                self.deck.remove_card(&id, &category);
            }
        }
        self.selection.clear();
        self.autosave();
    }

    /// Batch-moves every selected entry into the target category, then
    /// clears the selection (move-to-sideboard, move-to-main, drop-move).
    pub fn move_selected_to(&mut self, category: &str) {
        if !self.deck.has_category(category) {
            warn!("move_selected_to unknown category '{}', ignoring", category);
            return;
        }
        for id in self.selection.ids() {
            if let Some((from, _)) = self.deck.find_entry(&id) {
                let from = from.to_string();
                self.deck.move_card(&id, &from, category);
            }
        }
        self.selection.clear();
        self.autosave();
    }

    // ---- drag lifecycle ------------------------------------------------

    pub fn drag_start(&mut self, raw_id: &str) {
        self.drag.begin(raw_id);
    }

    /// Finishes the active drag against the drop target's element id (None
    /// when the pointer was released outside every drop zone) and applies
    /// the resulting mutation. The drag state always clears.
    pub fn drag_end(&mut self, over: Option<&str>) {
        let Some(source) = self.drag.end() else {
            return;
        };
        let target = over.and_then(DropTarget::parse);

        match source {
            DragSource::Column(key) => match target {
                Some(DropTarget::Slot { row, col }) => {
                    self.place_column(&key, row, col);
                }
                Some(DropTarget::Column(other)) => {
                    self.swap_columns(&key, &other);
                }
                _ => {}
            },
            DragSource::SearchCard(card_id) => {
                // Search cards dropped outside a category are discarded
                let Some(category) = self.category_target(target) else {
                    return;
                };
                match self
                    .search_results
                    .iter()
                    .find(|c| c.id == card_id)
                    .cloned()
                {
                    Some(card) => {
                        self.add_card(card, Some(&category));
                    }
                    None => {
                        warn!("dragged card '{}' is not in the current search results", card_id)
                    }
                }
            }
            DragSource::Entry(entry_id) => match self.category_target(target) {
                Some(category) => {
                    if self.selection.len() > 1 && self.selection.contains(&entry_id) {
                        self.move_selected_to(&category);
                    } else if let Some((from, _)) = self.deck.find_entry(&entry_id) {
                        let from = from.to_string();
                        self.move_card(&entry_id, &from, &category);
                    }
                }
                None => {
                    // Dragged off every drop zone: the entry is deleted,
                    // quantity and all
                    if let Some((category, _)) = self.deck.find_entry(&entry_id) {
                        let category = category.to_string();
                        self.remove_card(&entry_id, &category);
                    }
                }
            },
        }
    }

    /// Normalizes a drop target to a live category key for card drags. A
    /// column-header drop counts as its category; placement slots do not
    /// accept cards.
    fn category_target(&self, target: Option<DropTarget>) -> Option<String> {
        let key = match target? {
            DropTarget::Category(key) | DropTarget::Column(key) => key,
            DropTarget::Slot { .. } => return None,
        };
        if self.layout.is_live(&key) && self.deck.has_category(&key) {
            Some(key)
        } else {
            None
        }
    }

    // ---- counting, import, export --------------------------------------

    pub fn counts(&self) -> DeckCounts {
        self.deck.counts(&self.layout)
    }

    pub fn total_price(&self) -> f64 {
        self.deck.total_price(&self.layout)
    }

    /// Imports a pasted decklist; each line resolves independently through
    /// the card source.
    pub async fn import<S: CardSource>(&mut self, decklist: &str, source: &S) -> ImportReport {
        let report = import_decklist(&mut self.deck, decklist, source).await;
        self.autosave();
        report
    }

    pub fn export(&self, options: &ExportOptions) -> String {
        export_decklist(&self.deck, &self.layout, options)
    }

    /// The wire payload for a server-side save.
    pub fn to_payload(&self, id: Option<String>, is_public: bool) -> Result<DeckPayload, DeckError> {
        persistence::to_payload(&self.deck, &self.layout, id, is_public)
    }

    // ---- draft mode ----------------------------------------------------

    /// Attaches a draft session: the current state snapshots immediately
    /// and every later mutation autosaves under the new draft id.
    pub fn begin_draft(&mut self, store: DraftStore) -> String {
        let draft = store.create_draft();
        let id = draft.id;
        self.draft = Some(DraftSession {
            store,
            id: id.clone(),
        });
        self.autosave();
        id
    }

    /// Reopens a stored draft, or None if it is absent or corrupt.
    pub fn resume_draft(store: DraftStore, id: &str) -> Option<DeckEditor> {
        let draft = store.load_draft(id)?;
        Some(DeckEditor {
            deck: draft.deck,
            layout: draft.layout,
            selection: Selection::new(),
            drag: DragState::new(),
            search_results: Vec::new(),
            draft: Some(DraftSession {
                store,
                id: draft.id,
            }),
        })
    }

    pub fn draft_id(&self) -> Option<&str> {
        self.draft.as_ref().map(|s| s.id.as_str())
    }

    /// Ends draft mode and deletes the stored draft (after a successful
    /// server-side save or an explicit discard).
    pub fn finish_draft(&mut self) {
        if let Some(session) = self.draft.take() {
            session.store.delete_draft(&session.id);
        }
    }

    fn autosave(&self) {
        let Some(session) = &self.draft else {
            return;
        };
        let draft = Draft {
            id: session.id.clone(),
            deck: self.deck.clone(),
            layout: self.layout.clone(),
        };
        // Fire and forget: a failed write only costs durability
        session.store.auto_save(&draft);
    }
}

impl Default for DeckEditor {
    fn default() -> Self {
        Self::new()
    }
}
