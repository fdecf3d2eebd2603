//! Server configuration.
//!
//! Settings are read once from `PAYSLIP_*` environment variables at
//! start-up.  Unset variables fall back to the defaults below.

use crate::session::FailurePolicy;
use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;

pub const BIND_ADDR_VAR: &str = "PAYSLIP_BIND_ADDR";
pub const FAILURE_POLICY_VAR: &str = "PAYSLIP_FAILURE_POLICY";
pub const MAX_BODY_BYTES_VAR: &str = "PAYSLIP_MAX_BODY_BYTES";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Applied to the shared session when a submission fails.
    pub failure_policy: FailurePolicy,
    /// Request bodies larger than this are refused.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            failure_policy: FailurePolicy::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("{} is not a socket address: {}", BIND_ADDR_VAR, bind_addr))?;

        let failure_policy = match lookup(FAILURE_POLICY_VAR) {
            Some(value) => value
                .parse::<FailurePolicy>()
                .map_err(|err| anyhow!("{}: {}", FAILURE_POLICY_VAR, err))?,
            None => FailurePolicy::default(),
        };

        let max_body_bytes = match lookup(MAX_BODY_BYTES_VAR) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{} must be a byte count: {}", MAX_BODY_BYTES_VAR, value))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            bind_addr,
            failure_policy,
            max_body_bytes,
        })
    }
}
