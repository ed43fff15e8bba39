use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::decision::EntitlementDecision;
use super::prompt::UpgradePrompt;
use super::providers::GateBackend;
use super::resolve;

/// Inputs of a gate. `C` is whatever the host renders (markup, JSON, a view).
#[derive(Debug, Clone, PartialEq)]
pub struct GateProps<C> {
    pub feature_key: String,
    pub children: C,
    pub fallback: Option<C>,
    pub show_upgrade_cta: bool,
    pub plan_tier: Option<String>,
    pub addon: Option<String>,
}

impl<C> GateProps<C> {
    pub fn new(feature_key: impl Into<String>, children: C) -> Self {
        Self {
            feature_key: feature_key.into(),
            children,
            fallback: None,
            show_upgrade_cta: true,
            plan_tier: None,
            addon: None,
        }
    }

    pub fn with_fallback(mut self, fallback: C) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_upgrade_cta(mut self, show: bool) -> Self {
        self.show_upgrade_cta = show;
        self
    }

    pub fn with_plan_tier(mut self, tier: impl Into<String>) -> Self {
        self.plan_tier = Some(tier.into());
        self
    }

    pub fn with_addon(mut self, addon: impl Into<String>) -> Self {
        self.addon = Some(addon.into());
        self
    }

    /// What the gate shows for a given decision
    pub fn render(&self, decision: EntitlementDecision) -> Rendered<'_, C> {
        match decision {
            EntitlementDecision::Undetermined => Rendered::Loading,
            EntitlementDecision::Entitled => Rendered::Content(&self.children),
            EntitlementDecision::NotEntitled => match &self.fallback {
                Some(fallback) => Rendered::Fallback(fallback),
                None if self.show_upgrade_cta => Rendered::UpgradePrompt(UpgradePrompt::compose(
                    &self.feature_key,
                    self.plan_tier.as_deref(),
                    self.addon.as_deref(),
                )),
                None => Rendered::Nothing,
            },
        }
    }
}

/// Exactly one of these is on screen at any time
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered<'a, C> {
    Loading,
    Content(&'a C),
    Fallback(&'a C),
    UpgradePrompt(UpgradePrompt),
    Nothing,
}

impl<C> Rendered<'_, C> {
    pub fn kind(&self) -> RenderedKind {
        match self {
            Rendered::Loading => RenderedKind::Loading,
            Rendered::Content(_) => RenderedKind::Content,
            Rendered::Fallback(_) => RenderedKind::Fallback,
            Rendered::UpgradePrompt(_) => RenderedKind::UpgradePrompt,
            Rendered::Nothing => RenderedKind::Nothing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderedKind {
    Loading,
    Content,
    Fallback,
    UpgradePrompt,
    Nothing,
}

#[derive(Debug, Clone, Copy)]
struct GateState {
    /// Bumped on every feature key change; results from older generations are dropped
    generation: u64,
    decision: EntitlementDecision,
}

/// A mounted gate.
///
/// Resolution runs once on mount and once per feature key change, on a task
/// spawned onto the current Tokio runtime. Changing the key aborts the task in
/// flight, and a result that lands for a superseded key is discarded.
/// Dropping the gate aborts any resolution still running.
pub struct EntitlementGate<C> {
    backend: GateBackend,
    props: GateProps<C>,
    state: Arc<watch::Sender<GateState>>,
    in_flight: Option<JoinHandle<()>>,
}

impl<C> EntitlementGate<C> {
    /// Must be called within a Tokio runtime.
    pub fn mount(backend: GateBackend, props: GateProps<C>) -> Self {
        let (state, _) = watch::channel(GateState {
            generation: 0,
            decision: EntitlementDecision::Undetermined,
        });

        let mut gate = Self {
            backend,
            props,
            state: Arc::new(state),
            in_flight: None,
        };
        gate.start_resolution();
        gate
    }

    pub fn props(&self) -> &GateProps<C> {
        &self.props
    }

    pub fn decision(&self) -> EntitlementDecision {
        self.state.borrow().decision
    }

    /// Synchronous snapshot of what the gate shows right now
    pub fn render(&self) -> Rendered<'_, C> {
        self.props.render(self.decision())
    }

    /// Re-resolve for a new key. Same key is a no-op.
    pub fn set_feature_key(&mut self, feature_key: impl Into<String>) {
        let feature_key = feature_key.into();
        if feature_key == self.props.feature_key {
            return;
        }
        self.props.feature_key = feature_key;
        self.start_resolution();
    }

    /// Replace props; only a feature key change triggers a new resolution
    pub fn set_props(&mut self, props: GateProps<C>) {
        let key_changed = props.feature_key != self.props.feature_key;
        self.props = props;
        if key_changed {
            self.start_resolution();
        }
    }

    /// Wait until the current key's decision is known
    pub async fn settled(&self) -> EntitlementDecision {
        let mut rx = self.state.subscribe();
        let settled = rx.wait_for(|state| state.decision.is_settled()).await;
        match settled {
            Ok(state) => state.decision,
            Err(_) => EntitlementDecision::NotEntitled,
        }
    }

    pub fn unmount(self) {}

    fn start_resolution(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.decision = EntitlementDecision::Undetermined;
            generation = state.generation;
        });

        let backend = self.backend.clone();
        let feature_key = self.props.feature_key.clone();
        let state = Arc::clone(&self.state);

        self.in_flight = Some(tokio::spawn(async move {
            let decision = match AssertUnwindSafe(resolve::decide(&backend, &feature_key))
                .catch_unwind()
                .await
            {
                Ok(decision) => decision,
                Err(_) => {
                    error!(feature_key = %feature_key, "Entitlement resolution panicked, failing closed");
                    EntitlementDecision::NotEntitled
                }
            };

            state.send_if_modified(|current| {
                if current.generation != generation {
                    debug!(feature_key = %feature_key, "Discarding stale entitlement result");
                    return false;
                }
                current.decision = decision;
                true
            });
        }));
    }
}

impl<C> Drop for EntitlementGate<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_table() {
        let props = GateProps::new("loads.ocean", "manifest")
            .with_plan_tier("enterprise")
            .with_addon("ocean");

        assert_eq!(props.render(EntitlementDecision::Undetermined), Rendered::Loading);
        assert_eq!(props.render(EntitlementDecision::Entitled), Rendered::Content(&"manifest"));

        match props.render(EntitlementDecision::NotEntitled) {
            Rendered::UpgradePrompt(prompt) => assert_eq!(prompt.title, "Ocean Freight Not Available"),
            other => panic!("expected upgrade prompt, got {:?}", other),
        }

        let quiet = props.clone().with_upgrade_cta(false);
        assert_eq!(quiet.render(EntitlementDecision::NotEntitled), Rendered::Nothing);
    }

    #[test]
    fn fallback_wins_over_prompt() {
        for cta in [true, false] {
            let props = GateProps::new("loads.air", "manifest")
                .with_fallback("contact sales")
                .with_upgrade_cta(cta);
            assert_eq!(
                props.render(EntitlementDecision::NotEntitled),
                Rendered::Fallback(&"contact sales")
            );
        }
    }
}
