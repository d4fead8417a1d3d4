//! Terminal renderer for crtscene.
//!
//! Draws the CRT monitor and the dialogue overlay with ratatui, and feeds
//! keyboard, mouse and resize input to the playback engine through a
//! [`RendererBridge`](cs_engine::RendererBridge).

pub mod app;
pub mod cv;
pub mod dialogue;
pub mod input;
pub mod logging;
pub mod monitor;
pub mod shared;
pub mod terminal;
