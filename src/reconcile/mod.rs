//! Per-resource reconcilers.
//!
//! Each module converges one family of dependent resources toward the
//! deployment spec: compare desired vs. observed, issue the minimal
//! create/update calls, tolerate the failures that are benign for that
//! resource. The workflow spine decides ordering and retry wrapping; the
//! reconcilers decide what "converged" means.
//!
//! Every reconciler returns the resources it touched so the workflow can
//! fold them into the deploy report.

pub mod events;
pub mod logs;
pub mod push;
pub mod role;
pub mod schedule;
pub mod versions;

/// The invoke action granted to every external trigger.
pub(crate) const INVOKE_ACTION: &str = "lambda:InvokeFunction";
