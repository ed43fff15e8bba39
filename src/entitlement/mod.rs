// Entitlement gating: decide whether an organization may use a feature and
// what a page shell should show for it.
//
// Lookup chain is identity -> organization membership -> entitlement oracle.
// Every failure along the chain folds to "not entitled".

pub mod catalog;
pub mod decision;
pub mod error;
pub mod gate;
pub mod presets;
pub mod prompt;
pub mod providers;
pub mod resolve;

pub use catalog::{feature_display_name, humanize_key, plan_display_name, FeatureKey, PlanTier};
pub use decision::EntitlementDecision;
pub use error::{GateError, OracleError, ProviderError};
pub use gate::{EntitlementGate, GateProps, Rendered, RenderedKind};
pub use presets::GatePreset;
pub use prompt::UpgradePrompt;
pub use providers::{
    Anonymous, EntitlementOracle, GateBackend, IdentityProvider, MembershipLookup,
    MembershipStatus, OrganizationMembership, Principal, SessionIdentity,
};
pub use resolve::{decide, resolve};
