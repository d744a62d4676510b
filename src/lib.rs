//! Interaction engine for placing backing annotations on construction drawings.
//!
//! The crate owns everything between raw pointer/keyboard events and edits to
//! the placement list: coordinate conversion between screen pixels and drawing
//! units, pan/zoom, selection, drag/resize/rotate with snapping, group
//! transforms, two-click measurement and bounded undo/redo. Rendering is left
//! to the host, which draws the document plus the [`overlay::Overlay`] the
//! engine describes and reacts to the [`engine::Action`]s it returns.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: event routing and editing commands |
//! | [`doc`] | Placements, measurements and the host-owned [`doc::DocStore`] |
//! | [`coords`] | Points, rectangles and screen/stage/drawing conversions |
//! | [`viewport`] | Zoom, pan and fit-to-view |
//! | [`selection`] | Ordered selection set |
//! | [`input`] | Tools, pointer events and the gesture state machine |
//! | [`hit`] | Hit-testing placements, handles and measurements |
//! | [`manipulate`] | Resize/rotate geometry and group transforms |
//! | [`snap`] | Entity, wall and grid snapping with guides |
//! | [`measure`] | Measuring protocol and feet-and-inches labels |
//! | [`history`] | Bounded undo/redo of placement snapshots |
//! | [`keys`] | Keyboard shortcut table |
//! | [`overlay`] | Render-agnostic overlay description |
//! | [`project`] | Project file load/save |
//! | [`config`] | Engine configuration from the environment |
//! | [`consts`] | Shared numeric constants (minimum sizes, zoom limits, etc.) |

pub mod config;
pub mod consts;
pub mod coords;
pub mod doc;
pub mod engine;
pub mod history;
pub mod hit;
pub mod input;
pub mod keys;
pub mod manipulate;
pub mod measure;
pub mod overlay;
pub mod project;
pub mod selection;
pub mod snap;
pub mod viewport;
