//! Animation modules and the guarded load step.

use crate::error::RegistryError;
use crate::registry::AnimationRegistry;
use crate::runtime::AnimationRuntime;

/// A separately-authored unit that contributes definitions to the registry.
pub trait AnimationModule<D> {
    fn name(&self) -> &str;

    /// Register this module's definitions. Returns how many were registered.
    fn register_into(&self, registry: &mut AnimationRegistry<D>) -> Result<usize, RegistryError>;
}

/// Register `modules` into the runtime's registry, in order.
///
/// Without a namespace to install into this aborts before touching any module
/// and registers nothing. A failing module stops the load; definitions from
/// modules before it stay registered.
pub fn load_modules<D>(
    namespace: Option<&mut AnimationRuntime<D>>,
    modules: &[&dyn AnimationModule<D>],
) -> Result<usize, RegistryError> {
    let runtime = namespace.ok_or(RegistryError::NamespaceUnavailable)?;

    let mut total = 0;
    for module in modules {
        let n = module
            .register_into(runtime.registry_mut())
            .map_err(|e| match e {
                RegistryError::Module { .. } => e,
                other => RegistryError::Module {
                    module: module.name().to_string(),
                    reason: other.to_string(),
                },
            })?;
        log::debug!("animation module '{}' registered {n} definitions", module.name());
        total += n;
    }
    Ok(total)
}
