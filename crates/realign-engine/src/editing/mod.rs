/*!
 * # Editing
 *
 * A rope-backed [`Document`] that plays the part of a host editor.
 *
 * ## Buffer
 * - The whole text lives in one **`xi_rope::Rope`**
 * - Every commit compiles to an xi-rope **Delta** and is applied to the rope
 * - Saving writes the rope bytes back verbatim
 *
 * ## Host state
 * - Selection, focus and scroll position are tracked so callers can observe
 *   what a selection request did
 * - A document can be detached or hidden, in which case it refuses selection
 *   and commits the way a real editor that left the page would
 *
 * ## Usage Pattern
 *
 * ```rust
 * use realign_engine::editing::Document;
 * use realign_engine::{EditorSurface, Span};
 *
 * let mut doc = Document::from_bytes(b"wordOne wordTwo").unwrap();
 * let patch = doc.replace(Span::new(8, 15), "X").unwrap();
 * assert_eq!(doc.text(), "wordOne X");
 * assert_eq!(patch.version, 1);
 *
 * doc.commit(Span::new(0, 7), "A").unwrap();
 * assert_eq!(doc.text(), "A X");
 * ```
 */

pub mod document;
pub mod patch;

pub use document::Document;
pub use patch::Patch;
