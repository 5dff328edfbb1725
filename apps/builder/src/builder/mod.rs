// Résumé builder core: ordered sections, drop resolution, registry,
// persistence and template state.
// All state lives in `Editor`; handlers run it inside tokio::task::spawn_blocking
// because storage I/O is synchronous.

pub mod drop_position;
pub mod editor;
pub mod errors;
pub mod handlers;
pub mod kind;
pub mod persistence;
pub mod registry;
pub mod section;
pub mod store;
pub mod template;

pub use editor::Editor;
pub use errors::SectionError;
