mod backend;
mod client;
mod detection;
mod provider;
mod version;

pub use backend::{NODE_CANDIDATE, NvmBackend};
pub use client::NvmClient;
pub use detection::{NvmDetection, detect_nvm_dir};
pub use provider::NvmProvider;
pub use version::{mark_default, parse_node_installed, parse_node_remote};
