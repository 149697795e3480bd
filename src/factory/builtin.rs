use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{backend::soft::SoftwareFactory, factory::registry, foundation::error::R3dResult};

static BUILTIN: OnceCell<()> = OnceCell::new();

/// Register the factories compiled into this crate with the process-wide
/// registry. Succeeds at most once per process; repeated calls are no-ops.
pub fn register_builtin_factories() -> R3dResult<()> {
    BUILTIN
        .get_or_try_init(|| {
            tracing::debug!("registering built-in factories");
            registry::register(Arc::new(SoftwareFactory))
        })
        .map(|_| ())
}

#[cfg(test)]
#[path = "../../tests/unit/factory/builtin.rs"]
mod tests;
