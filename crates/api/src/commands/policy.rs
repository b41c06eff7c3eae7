//! Policy inspection command

use retrylab_domain::RetryPolicy;

use crate::AppContext;

/// The effective retry policy
pub fn get_policy(ctx: &AppContext) -> RetryPolicy {
    ctx.policy.as_ref().clone()
}
