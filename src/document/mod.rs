//! The viewed document and the mod contributions applied to it.

mod edit;
mod footnotes;
mod model;
mod pipeline;

pub use edit::{DocumentEdit, EditError, EditOp, EditScript, ModEdit};
pub use footnotes::{
    FootnoteGroup, RawNote, UNDEFINED_AUTHOR, merge_footnotes, parse_footnote_groups,
};
pub use model::{Attribution, Document, Footnote, FootnoteTable};
pub use pipeline::DocumentPipeline;
