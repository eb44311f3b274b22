pub mod account;
pub mod agent_cert;
pub mod amm;
pub mod app;
pub mod block;
pub mod claim;
pub mod namespace;
pub mod token;
pub mod transaction;

pub use account::{Account, LockId};
pub use agent_cert::{AgentCertificate, Capability, SignedAgentCertificate};
pub use amm::{canonical_pair, compute_pool_id, AmmPool, AMM_FEE_BPS, BPS_DENOM};
pub use app::AppMeta;
pub use block::{Block, BlockHeader, GenesisConfig, QuorumCertificate, ValidatorSignature};
pub use claim::{calculate_settlement, Attestation, Claim, ClaimStatus, Vote, SLASH_PERCENTAGE};
pub use namespace::{KvData, KvValue, NamespaceMeta, NamespacePolicy};
pub use token::{compute_token_id, TokenMeta, NATIVE_TOKEN_ID};
pub use transaction::{Op, Transaction};
