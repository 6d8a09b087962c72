pub mod common;
pub mod registry;

pub use common::{
    CandidateTemplate, ChatMessage, ChatRole, Origin, ProcessAction, ProcessRecord,
    ProcessStatus, Protocol, RiskLevel,
};
pub use registry::{BENIGN_TEMPLATES, SUSPICIOUS_TEMPLATES, find_template};
