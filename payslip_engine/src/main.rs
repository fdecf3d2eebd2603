//! Entry point for the Payslip Engine binary.
//!
//! Running this binary starts an HTTP server exposing the payslip
//! validator and summaries.  Configuration comes from `PAYSLIP_*`
//! environment variables (see `payslip_engine::config`); log output
//! is controlled with `RUST_LOG` and defaults to `info`.

use env_logger::Env;
use payslip_engine::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = ServerConfig::from_env()?;
    payslip_engine::api::serve(config).await
}
