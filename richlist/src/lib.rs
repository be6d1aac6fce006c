//! KSS rich list publisher.
//!
//! Pulls the node's balance snapshot, ranks holders and publishes the result
//! as a console table and a JSON artifact.

pub mod artifact;
pub mod config;
pub mod publisher;
pub mod ranking;
pub mod report;

pub use config::RichListConfig;
pub use publisher::{CycleReport, PublishError, Publisher, Schedule};
pub use ranking::{build_rich_list, Holder, RichList};
