//! # Presentation Layer
//!
//! User interface logic for the CLI, an adaptation of the
//! **MVVM (Model-View-ViewModel)** pattern with component-based state
//! for the interactive TUI.
//!
//! ## Data Flow
//!
//! ### Console output (plain/JSON):
//! ```text
//! [ Handler ] --> [ Presenter ] --> [ ViewModel ] ==(json)==> serde_json --> Output
//!                                                ==(plain)==> console     --> Output
//! ```
//!
//! ### Interactive TUI:
//! ```text
//! [ Browser ] --> [ Presenter ] --> [ ViewModel ] --> [ View (Widget) ]
//!                                                            ^
//!                                       [ Component ] -------+
//!                                       (input + hit-testing)
//! ```
//!
//! ## Rules
//!
//! 1. **ViewModels carry raw data, not formatted strings.** JSON output
//!    is an API; clients need numbers, not prose.
//! 2. **`--format json` dumps the complete ViewModel.** The view mode
//!    only affects plain/TUI rendering, never the JSON shape.
//! 3. **Views are stateless projections.** All interaction state
//!    (selection, focus, drag, search input) lives in the component.

pub mod components;
pub mod console;
pub mod presenters;
pub mod view_models;
pub mod views;
