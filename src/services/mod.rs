pub mod entitlement_service;
pub mod membership_service;
pub mod rpc_oracle;

pub use entitlement_service::EntitlementService;
pub use membership_service::MembershipService;
pub use rpc_oracle::{RpcEntitlementOracle, RpcOracleError};
