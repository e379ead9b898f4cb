//! Extension activation
//!
//! Activation of a single extension:
//! 1. Ensure the extension has a bag in the namespace
//! 2. Load its native library and bind declared functions and serialization hooks
//! 3. Run its entry module and wait for it to finish
//!
//! Nothing here fails the run. Missing libraries, unbindable functions and
//! failing entry modules are reported as warnings and activation moves on.

use crate::loader::{ModuleContext, ModuleLoader};
use crate::namespace::{Binding, SharedNamespace};
use crate::native::{self, LibraryHandle, NativeBindingService};
use crate::serialization::{hook_callable, SerializationService};
use std::sync::Arc;
use titan_core::types::{
    DiscoveredExtension, FunctionSpec, NativeBindingSpec, NativeType, SerializationHook,
};
use titan_core::Reporter;
use tracing::debug;

/// Binds and initializes extensions into a namespace
pub struct ActivationEngine {
    binding_service: Arc<dyn NativeBindingService>,
    module_loader: Arc<dyn ModuleLoader>,
    serializer: Arc<dyn SerializationService>,
    reporter: Reporter,
}

impl ActivationEngine {
    pub fn new(
        binding_service: Arc<dyn NativeBindingService>,
        module_loader: Arc<dyn ModuleLoader>,
        serializer: Arc<dyn SerializationService>,
        reporter: Reporter,
    ) -> Self {
        Self {
            binding_service,
            module_loader,
            serializer,
            reporter,
        }
    }

    /// Activate extensions one after another, in the given order
    pub async fn activate_all(&self, order: &[DiscoveredExtension], namespace: &SharedNamespace) {
        for ext in order {
            self.activate(ext, namespace).await;
        }
    }

    /// Activate a single extension
    pub async fn activate(&self, ext: &DiscoveredExtension, namespace: &SharedNamespace) {
        let name = ext.name();
        debug!("Activating extension '{}' from {:?}", name, ext.path);

        let has_bag = namespace.write().ensure_bag(name).is_some();

        if !has_bag {
            self.reporter.warn(format!(
                "Extension '{}' collides with a reserved namespace entry; skipping its bindings",
                name
            ));
        } else if let Some(spec) = &ext.descriptor.native_binding {
            self.bind_native(ext, spec, namespace);
        }

        self.run_entry_module(ext, namespace).await;

        self.reporter.info(format!("Activated extension '{}'", name));
    }

    fn bind_native(
        &self,
        ext: &DiscoveredExtension,
        spec: &NativeBindingSpec,
        namespace: &SharedNamespace,
    ) {
        let name = ext.name();
        let location = ext.resolve(&spec.location);

        if !location.exists() {
            self.reporter.warn(format!(
                "Native library for '{}' not found at {}; skipping native binding",
                name,
                location.display()
            ));
            return;
        }

        let handle = match self.binding_service.load(&location) {
            Ok(handle) => handle,
            Err(e) => {
                self.reporter.warn(format!(
                    "Failed to load native library for '{}': {}",
                    name, e
                ));
                return;
            }
        };
        native::retain(Arc::clone(&handle));

        for (export, function) in &spec.functions {
            self.bind_function(name, export, function, handle.as_ref(), namespace);
        }

        self.bind_hooks(name, spec, namespace);
    }

    fn bind_function(
        &self,
        name: &str,
        export: &str,
        function: &FunctionSpec,
        handle: &dyn LibraryHandle,
        namespace: &SharedNamespace,
    ) {
        let params = NativeType::from_aliases(&function.parameters);
        let result = NativeType::from_alias(&function.result);

        match handle.bind(&function.symbol, &result, &params) {
            Ok(callable) => {
                namespace
                    .write()
                    .bind(name, export, Binding::function(callable));
                self.reporter.debug(format!(
                    "Bound {}.{} -> {}",
                    name, export, function.symbol
                ));
            }
            Err(e) => {
                self.reporter.warn(format!(
                    "Failed to bind {}.{} ({}): {}",
                    name, export, function.symbol, e
                ));
            }
        }
    }

    fn bind_hooks(&self, name: &str, spec: &NativeBindingSpec, namespace: &SharedNamespace) {
        for (hook_name, enabled) in &spec.hooks {
            if !enabled {
                continue;
            }
            let Some(hook) = SerializationHook::from_name(hook_name) else {
                self.reporter.warn(format!(
                    "Ignoring unknown serialization hook '{}' on '{}'",
                    hook_name, name
                ));
                continue;
            };

            let callable = hook_callable(Arc::clone(&self.serializer), hook);
            namespace
                .write()
                .bind(name, hook.as_str(), Binding::function(callable));
        }
    }

    async fn run_entry_module(&self, ext: &DiscoveredExtension, namespace: &SharedNamespace) {
        let module = ext.entry_module_path();
        if !module.is_file() {
            debug!("No entry module for '{}' at {:?}", ext.name(), module);
            return;
        }

        let ctx = ModuleContext {
            extension: ext.name().to_string(),
            extension_dir: ext.path.clone(),
            namespace: namespace.clone(),
        };

        match self.module_loader.run(&module, ctx).await {
            Ok(()) => debug!("Entry module for '{}' completed", ext.name()),
            Err(e) => self.reporter.warn(format!(
                "Entry module {} for '{}' failed: {:#}",
                module.display(),
                ext.name(),
                e
            )),
        }
    }
}
