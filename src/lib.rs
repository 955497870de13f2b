//! Markup and review core for proofing rendered assets.
//!
//! Reviewers draw shapes over an image or video frame and leave threaded
//! comments, optionally pinned to a spot on the surface or a moment in the
//! video. This crate owns the state behind that: the shape store and its
//! undo history, the pointer/keyboard gesture machine, time-based shape
//! visibility, and the comment model with its derived pin numbers. The host
//! supplies surface size, playback time, lock state and persistence; it
//! draws the [`render::DrawCommand`]s and mirrors the [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Gesture controller ([`engine::EngineCore`]) |
//! | [`shape`] | Shape types and the shape store |
//! | [`geometry`] | Bounding boxes, hit-testing, arrowheads |
//! | [`history`] | Bounded snapshot undo/redo |
//! | [`visibility`] | Shapes shown at a playback time |
//! | [`input`] | Tools, keys, buttons, gesture state |
//! | [`render`] | Backend-agnostic display list |
//! | [`surface`] | Pixel and percentage coordinates |
//! | [`comment`] | Comment records, threads, pins, filters |
//! | [`composer`] | Rich-text draft with mention tokens |
//! | [`mention`] | `@query` detection |
//! | [`store`] | Persistence contract and in-memory store |
//! | [`review`] | Guarded comment mutations with re-fetch |
//! | [`error`] | Error kinds and codes |
//! | [`config`] | Environment configuration |
//! | [`logging`] | Tracing subscriber setup |
//! | [`consts`] | Shared numeric constants |

pub mod comment;
pub mod composer;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod logging;
pub mod mention;
pub mod render;
pub mod review;
pub mod shape;
pub mod store;
pub mod surface;
pub mod visibility;
