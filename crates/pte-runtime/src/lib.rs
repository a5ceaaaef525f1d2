//! The async event loop that turns `pte-table`'s pure reducers into a
//! running game: one Tokio task per table, a process-wide registry
//! of those tasks, and the Tokio-backed timers/countdowns the reducers
//! only describe but never schedule themselves.
mod registry;
mod table_task;
mod timer_manager;

pub use registry::Registry;
pub use table_task::{Inbound, TableHandle};
