//! # Quest Imgdir
//!
//! Typed, order-preserving model of the "imgdir" XML document format.
//!
//! ## Model
//!
//! ```text
//! Document
//!     │
//!     └──> Node "QuestInfo.img"          (<imgdir name=..>)
//!            ├─ Entry::Dir(Node "1000")
//!            │     ├─ Entry::Leaf(string "name")
//!            │     ├─ Entry::Leaf(int "area")
//!            │     └─ Entry::Raw(<float ..>)   kept verbatim
//!            └─ Entry::Dir(Node "1001")
//! ```
//!
//! Entries keep their document order, so a load/save cycle only changes
//! whitespace. Lookups on missing names return `None`; nothing here panics
//! on odd input.
//!
//! ## Example
//!
//! ```rust
//! use quest_imgdir::{Document, Leaf};
//!
//! let mut doc = Document::new("Act.img");
//! let stage = doc.root_mut().ensure_child("1000").ensure_child("1");
//! stage.push_leaf(Leaf::int("exp", 1000));
//!
//! let xml = doc.to_xml_string().unwrap();
//! let reparsed = Document::parse(&xml).unwrap();
//! assert_eq!(reparsed, doc);
//! ```

mod document;
mod error;
mod node;
mod xml;

pub use document::Document;
pub use error::{ImgdirError, Result};
pub use node::{Entry, Leaf, LeafKind, Node, RawElement, DIR_TAG};
pub use xml::{parse_document, write_document};
