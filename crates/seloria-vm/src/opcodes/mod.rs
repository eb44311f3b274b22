pub mod agent_cert;
pub mod claim;
pub mod kv;
pub mod transfer;

pub use agent_cert::execute_agent_cert_register;
pub use claim::{execute_attest, execute_claim_create};
pub use kv::{execute_kv_append, execute_kv_del, execute_kv_put, execute_namespace_create};
pub use transfer::execute_transfer;
