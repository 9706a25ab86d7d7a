//! Process-wide engine registry with memoized activation.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::contract::{
    EngineHandle, EngineProvider, MarkdownRenderer, ModuleCodec, ModuleOptimizer,
};
use crate::error::{EngineError, EngineResult};
use crate::id::CapabilityId;
use crate::lean::LeanOptimizer;
use crate::markdown::CommonMarkRenderer;
use crate::text::WatToolkit;

struct Slot {
    provider: Box<dyn EngineProvider>,
    engine: OnceCell<EngineHandle>,
}

/// Registry status for one capability, as reported by
/// [`EngineRegistry::capabilities`].
#[derive(Debug, Clone, Copy)]
pub struct CapabilityStatus<'a> {
    pub id: CapabilityId,
    pub label: &'a str,
    pub ready: bool,
}

/// Holds one provider per capability and at most one activated engine each.
///
/// Activation is memoized through a [`OnceCell`]: concurrent requests for a
/// capability that is still loading await the same in-flight activation, and
/// exactly one activation can succeed per registry. A failed activation
/// leaves the capability unloaded, so a later request retries.
pub struct EngineRegistry {
    slots: Vec<Slot>,
}

impl EngineRegistry {
    /// An empty registry with no providers.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// A registry with the built-in engines registered for every capability.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(WatToolkit));
        registry.register(Box::new(LeanOptimizer));
        registry.register(Box::new(CommonMarkRenderer));
        registry
    }

    /// Registers a provider, replacing any existing provider for the same
    /// capability along with its activated engine.
    pub fn register(&mut self, provider: Box<dyn EngineProvider>) {
        let capability = provider.capability();
        let slot = Slot {
            provider,
            engine: OnceCell::new(),
        };
        match self
            .slots
            .iter_mut()
            .find(|slot| slot.provider.capability() == capability)
        {
            Some(existing) => *existing = slot,
            None => self.slots.push(slot),
        }
    }

    /// Status of every registered capability, in registration order.
    pub fn capabilities(&self) -> impl Iterator<Item = CapabilityStatus<'_>> {
        self.slots.iter().map(|slot| CapabilityStatus {
            id: slot.provider.capability(),
            label: slot.provider.label(),
            ready: slot.engine.initialized(),
        })
    }

    /// Whether the capability's engine has been activated.
    pub fn is_ready(&self, id: CapabilityId) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.provider.capability() == id && slot.engine.initialized())
    }

    /// Makes sure the capability's engine is activated. Idempotent; after
    /// the engine is ready this does no work.
    pub async fn ensure(&self, id: CapabilityId) -> EngineResult<()> {
        let slot = self.slot(id)?;
        self.activated(slot).await.map(|_| ())
    }

    /// The disassembler/assembler engine, activating it if needed.
    pub async fn codec(&self) -> EngineResult<Arc<dyn ModuleCodec>> {
        let slot = self.slot(CapabilityId::ModuleText)?;
        match self.activated(slot).await? {
            EngineHandle::Codec(codec) => Ok(Arc::clone(codec)),
            other => Err(wrong_kind(slot.provider.label(), "codec", other)),
        }
    }

    /// The optimizer/converter engine, activating it if needed.
    pub async fn optimizer(&self) -> EngineResult<Arc<dyn ModuleOptimizer>> {
        let slot = self.slot(CapabilityId::ModuleOpt)?;
        match self.activated(slot).await? {
            EngineHandle::Optimizer(optimizer) => Ok(Arc::clone(optimizer)),
            other => Err(wrong_kind(slot.provider.label(), "optimizer", other)),
        }
    }

    /// The markdown engine, activating it if needed.
    pub async fn renderer(&self) -> EngineResult<Arc<dyn MarkdownRenderer>> {
        let slot = self.slot(CapabilityId::Markdown)?;
        match self.activated(slot).await? {
            EngineHandle::Renderer(renderer) => Ok(Arc::clone(renderer)),
            other => Err(wrong_kind(slot.provider.label(), "renderer", other)),
        }
    }

    /// Label of the provider registered for a capability, for provenance
    /// descriptions.
    pub fn label(&self, id: CapabilityId) -> EngineResult<&str> {
        self.slot(id).map(|slot| slot.provider.label())
    }

    fn slot(&self, id: CapabilityId) -> EngineResult<&Slot> {
        self.slots
            .iter()
            .find(|slot| slot.provider.capability() == id)
            .ok_or(EngineError::Unregistered(id))
    }

    async fn activated<'a>(&self, slot: &'a Slot) -> EngineResult<&'a EngineHandle> {
        slot.engine
            .get_or_try_init(|| async {
                debug!(
                    capability = %slot.provider.capability(),
                    label = slot.provider.label(),
                    "activating engine"
                );
                let handle = slot.provider.activate().await?;
                info!(
                    capability = %slot.provider.capability(),
                    label = slot.provider.label(),
                    "engine ready"
                );
                Ok(handle)
            })
            .await
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn wrong_kind(label: &str, wanted: &str, got: &EngineHandle) -> EngineError {
    EngineError::Load {
        label: label.to_string(),
        reason: format!("provider yielded a {} handle, expected {wanted}", got.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct SlowProvider {
        activations: Arc<AtomicUsize>,
        delay: Duration,
    }

    #[async_trait]
    impl EngineProvider for SlowProvider {
        fn capability(&self) -> CapabilityId {
            CapabilityId::Markdown
        }

        fn label(&self) -> &str {
            "slow test renderer"
        }

        async fn activate(&self) -> EngineResult<EngineHandle> {
            tokio::time::sleep(self.delay).await;
            self.activations.fetch_add(1, Ordering::SeqCst);
            Ok(EngineHandle::Renderer(Arc::new(CommonMarkRenderer)))
        }
    }

    struct FlakyProvider {
        failures_left: AtomicUsize,
    }

    #[async_trait]
    impl EngineProvider for FlakyProvider {
        fn capability(&self) -> CapabilityId {
            CapabilityId::ModuleOpt
        }

        fn label(&self) -> &str {
            "flaky optimizer"
        }

        async fn activate(&self) -> EngineResult<EngineHandle> {
            if self.failures_left.load(Ordering::SeqCst) > 0 {
                self.failures_left.fetch_sub(1, Ordering::SeqCst);
                return Err(EngineError::Load {
                    label: "flaky optimizer".to_string(),
                    reason: "transient".to_string(),
                });
            }
            Ok(EngineHandle::Optimizer(Arc::new(LeanOptimizer)))
        }
    }

    struct MislabeledProvider;

    #[async_trait]
    impl EngineProvider for MislabeledProvider {
        fn capability(&self) -> CapabilityId {
            CapabilityId::ModuleText
        }

        fn label(&self) -> &str {
            "mislabeled"
        }

        async fn activate(&self) -> EngineResult<EngineHandle> {
            Ok(EngineHandle::Renderer(Arc::new(CommonMarkRenderer)))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_ensure_activates_exactly_once() {
        let activations = Arc::new(AtomicUsize::new(0));
        let mut registry = EngineRegistry::new();
        registry.register(Box::new(SlowProvider {
            activations: Arc::clone(&activations),
            delay: Duration::from_millis(50),
        }));

        let results =
            futures::future::join_all((0..8).map(|_| registry.ensure(CapabilityId::Markdown)))
                .await;
        assert!(results.into_iter().all(|result| result.is_ok()));
        assert_eq!(activations.load(Ordering::SeqCst), 1);
        assert!(registry.is_ready(CapabilityId::Markdown));
    }

    #[tokio::test]
    async fn repeated_ensure_does_no_further_work() {
        let activations = Arc::new(AtomicUsize::new(0));
        let mut registry = EngineRegistry::new();
        registry.register(Box::new(SlowProvider {
            activations: Arc::clone(&activations),
            delay: Duration::ZERO,
        }));

        registry.ensure(CapabilityId::Markdown).await.unwrap();
        registry.ensure(CapabilityId::Markdown).await.unwrap();
        assert_eq!(activations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_activation_stays_retryable() {
        let mut registry = EngineRegistry::new();
        registry.register(Box::new(FlakyProvider {
            failures_left: AtomicUsize::new(1),
        }));

        let err = registry.ensure(CapabilityId::ModuleOpt).await.unwrap_err();
        assert!(matches!(err, EngineError::Load { .. }));
        assert!(!registry.is_ready(CapabilityId::ModuleOpt));

        registry.ensure(CapabilityId::ModuleOpt).await.unwrap();
        assert!(registry.is_ready(CapabilityId::ModuleOpt));
    }

    #[tokio::test]
    async fn missing_provider_is_a_configuration_error() {
        let registry = EngineRegistry::new();
        let err = registry.ensure(CapabilityId::ModuleText).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Unregistered(CapabilityId::ModuleText)
        ));
    }

    #[tokio::test]
    async fn wrong_handle_kind_is_a_load_error() {
        let mut registry = EngineRegistry::new();
        registry.register(Box::new(MislabeledProvider));

        // unwrap_err would need the handle to be Debug; destructure instead.
        let Err(err) = registry.codec().await else {
            panic!("a renderer handle should not satisfy a codec request");
        };
        match err {
            EngineError::Load { reason, .. } => assert!(reason.contains("renderer")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn defaults_cover_every_capability() {
        let registry = EngineRegistry::with_defaults();
        for id in CapabilityId::ALL {
            assert!(!registry.is_ready(id));
            registry.ensure(id).await.unwrap();
            assert!(registry.is_ready(id));
        }

        let statuses: Vec<_> = registry.capabilities().collect();
        assert_eq!(statuses.len(), 3);
        assert!(statuses.iter().all(|status| status.ready));
    }
}
