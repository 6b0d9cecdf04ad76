//! Caller classification by origin equality.

use crate::domain::entities::CallContext;
use crate::ports::outbound::CallerClassifier;

/// Treats a call as direct when the immediate caller originated it.
///
/// A contract relaying a call has its own address as `caller` while
/// `origin` stays the signing account, so the two differ.
#[derive(Clone, Copy, Debug, Default)]
pub struct OriginCallerClassifier;

impl CallerClassifier for OriginCallerClassifier {
    fn is_direct_caller(&self, ctx: &CallContext) -> bool {
        ctx.caller == ctx.origin
    }
}
