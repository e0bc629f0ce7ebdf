//! State-transition core
//!
//! Pure operations over an explicit `AppState`: the day store and the
//! preset registry. No I/O happens here; persistence and sync are layered
//! on top by the journal controller.

pub mod days;
pub mod presets;
