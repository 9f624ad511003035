#![doc(html_root_url = "https://docs.rs/stage-host/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)] // Only stale scene handles panic.

//! A reconciler host for retained 2D scene graphs.
//!
//! [`SceneHost`](`adapter::SceneHost`) implements the host contract a declarative reconciliation engine drives
//! ([`HostConfig`](`host::HostConfig`)) on top of any [`SceneGraph`](`scene::SceneGraph`),
//! and [`StageRoot`](`root::StageRoot`) mounts one stage per root.
//!
//! Mutations are kept minimal: attributes are diffed against both the previous descriptor and the node's stored
//! values, event handlers are only (un)subscribed when they actually change, and every affected layer is repainted
//! once per commit.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod adapter;
pub mod apply;
pub mod diagnostics;
pub mod element;
pub mod error;
pub mod factory;
pub mod host;
pub mod kind;
pub mod listeners;
pub mod load;
pub mod props;
pub mod redraw;
pub mod root;
pub mod schedule;
pub mod scene;

mod rc_hash_map;

pub use adapter::{HostOptions, SceneHost};
pub use element::Element;
pub use error::{Error, Result};
pub use host::HostConfig;
pub use kind::NodeKind;
pub use props::{Event, Handler, Props, Value};
pub use root::{Reconciler, StageConfig, StageRoot};
pub use scene::{NodeId, Scene, SceneGraph};
