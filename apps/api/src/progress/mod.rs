// Progression engine: leveling, streaks, badges and task completion,
// persisted through a pluggable ProgressStore.
// Completion is the only writer; it retries on revision conflicts.

pub mod badges;
pub mod clock;
pub mod completion;
pub mod file_store;
pub mod handlers;
pub mod leveling;
pub mod memory_store;
pub mod pg_store;
pub mod store;
pub mod ui_meter;

pub use clock::{Clock, SystemClock};
pub use file_store::JsonFileProgressStore;
pub use memory_store::InMemoryProgressStore;
pub use pg_store::PgProgressStore;
pub use store::ProgressStore;
