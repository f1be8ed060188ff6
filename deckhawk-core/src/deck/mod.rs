pub mod category;
pub mod collection;
pub mod dragdrop;
pub mod entry;
pub mod layout;
pub mod selection;

pub use category::{BuiltinCategory, CategoryKind, ColumnOption, DeckBucket, kind_of};
pub use collection::{DeckCounts, DeckState};
pub use dragdrop::{DragSource, DragState, DropTarget};
pub use entry::DeckEntry;
pub use layout::{ColumnLayout, GridPosition};
pub use selection::{Rect, Selection};
