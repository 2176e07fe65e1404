//! egui widgets. They only read the session state and feed user choices back
//! through `AppState` methods.

pub mod panels;
pub mod plot;
pub mod table;
