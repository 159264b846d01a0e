//! Core pieces of the sprig UI toolkit: the value-typed node model, the
//! call-order hook store, and the per-mount runtime that schedules render
//! passes. Realizing trees and diffing them lives in `sprig-dom`.

pub mod event;
pub mod hooks;
pub mod runtime;
pub mod vnode;

pub use event::{Event, EventTarget, KeyCode};
pub use hooks::{use_effect, use_effect_always, use_state, Cleanup, IntoCleanup, SetState};
pub use runtime::{Runtime, RuntimeHandle};
pub use vnode::{
    attr, element, on, style, text, Attr, AttrMap, AttrValue, Child, EventHandler, StyleMap,
    VElement, VNode,
};
