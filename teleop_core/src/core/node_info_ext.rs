//! Logging helpers on `Option<&mut NodeInfo>`
//!
//! `Node::tick` receives its context as an `Option`; these let a node write
//! `ctx.log_debug("...")` without unwrapping first. Calls on `None` are no-ops.

use super::node::LogSummary;
use super::NodeInfo;

pub trait NodeInfoExt {
    fn log_debug(&mut self, message: &str);

    fn log_info(&mut self, message: &str);

    fn log_warning(&mut self, message: &str);

    fn log_error(&mut self, message: &str);

    /// Record a published message against `topic`
    fn log_pub<T: LogSummary>(&mut self, topic: &str, data: &T);
}

impl NodeInfoExt for Option<&mut NodeInfo> {
    #[inline]
    fn log_debug(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_debug(message);
        }
    }

    #[inline]
    fn log_info(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_info(message);
        }
    }

    #[inline]
    fn log_warning(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_warning(message);
        }
    }

    #[inline]
    fn log_error(&mut self, message: &str) {
        if let Some(ctx) = self {
            ctx.log_error(message);
        }
    }

    #[inline]
    fn log_pub<T: LogSummary>(&mut self, topic: &str, data: &T) {
        if let Some(ctx) = self {
            ctx.log_pub(topic, data);
        }
    }
}
