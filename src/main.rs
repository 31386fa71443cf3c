mod config;
mod core;
mod credentials;
mod errors;
mod providers;
mod resolvers;

// Avoid musl's default allocator due to lackluster performance
// https://nickb.dev/blog/default-musl-allocator-considered-harmful-to-performance
#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use crate::config::{AzureEnv, CliOverrides};
use crate::credentials::TokenClient;
use crate::providers::AzureDnsStore;
use crate::resolvers::IfconfigResolver;
use clap::Parser;
use log::{LevelFilter, error, info};
use std::error;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Opt {
    /// ID of the subscription where the Azure DNS zone is located
    #[arg(short = 's', long)]
    subscription_id: Option<String>,

    /// Name of the resource group where the Azure DNS zone is located
    #[arg(short = 'g', long)]
    resource_group: Option<String>,

    /// Name of the Azure DNS zone
    #[arg(short = 'z', long)]
    zone: Option<String>,

    /// Name of the DNS record to create or update
    #[arg(short = 'r', long)]
    record: Option<String>,

    /// Azure tenant ID (or set AZURE_TENANT_ID)
    #[arg(short = 't', long)]
    tenant_id: Option<String>,

    /// Service principal client ID (or set AZURE_CLIENT_ID)
    #[arg(short = 'c', long)]
    client_id: Option<String>,

    /// Service principal client secret (or set AZURE_CLIENT_SECRET)
    #[arg(short = 'x', long)]
    client_secret: Option<String>,

    /// Sets a custom config file
    #[arg(short = 'f', long)]
    config: Option<PathBuf>,
}

fn log_err(context: &str, err: &dyn error::Error) {
    let mut msg = String::new();
    let _ = writeln!(msg, "{context} ");
    let _ = write!(msg, "\tcaused by: {err}");

    let mut ie = err.source();
    while let Some(cause) = ie {
        let _ = write!(msg, "\n\tcaused by: {cause}");
        ie = cause.source();
    }

    error!("{}", msg);
}

fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let opt = Opt::parse();
    let azure_env = AzureEnv::from_process();

    let overrides = CliOverrides {
        subscription_id: opt.subscription_id,
        resource_group: opt.resource_group,
        zone_name: opt.zone,
        record_name: opt.record,
        tenant_id: opt.tenant_id,
        client_id: opt.client_id,
        client_secret: opt.client_secret,
    };

    let request = match config::resolve_request(overrides, opt.config.as_deref(), &azure_env) {
        Ok(request) => request,
        Err(e) => {
            log_err("could not resolve configuration", &e);
            std::process::exit(1)
        }
    };

    let strategy = match credentials::select_credential_strategy(&azure_env, &request) {
        Ok(strategy) => strategy,
        Err(e) => {
            log_err("could not select a credential strategy", &e);
            std::process::exit(1)
        }
    };
    info!("authenticating with {} credentials", strategy.name());

    // Use a single HTTP client for the token, discovery, and update requests
    // so that connections can be reused
    let http_client = reqwest::Client::new();

    let token = match TokenClient::new(&http_client)
        .acquire(&strategy, &azure_env)
        .await
    {
        Ok(token) => token,
        Err(e) => {
            log_err("could not obtain a management api token", &e);
            std::process::exit(1)
        }
    };

    let resolver = IfconfigResolver::new(&http_client);
    let store = AzureDnsStore::new(&http_client, token);

    match core::run_update(&request, &resolver, &store).await {
        Ok(outcome) => println!("{outcome}"),
        Err(e) => {
            log_err(
                &format!("could not update {}.{}", request.record_name, request.zone_name),
                e.as_ref(),
            );
            std::process::exit(1)
        }
    }
}
