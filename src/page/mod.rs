/*!
 * Page reconstruction engine.
 *
 * Turns the raw, visually ordered lines extracted from one dictionary page
 * into a root and an ordered list of entries:
 * - `page::script`: Hebrew/Latin/whitespace classification
 * - `page::graphemes`: mark-preserving right-to-left reordering
 * - `page::segmenter`: line classification and entry accumulation
 * - `page::model`: result types
 *
 * Everything here is pure and synchronous; pages can be segmented in
 * parallel without coordination.
 */

pub mod graphemes;
pub mod model;
pub mod script;
pub mod segmenter;

pub use graphemes::reassemble;
pub use model::{EntryRecord, LineKind, PageResult};
pub use script::{HebrewRanges, ScriptClass};
pub use segmenter::{PageSegmenter, SegmenterOptions};
