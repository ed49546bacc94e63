//!
//! strongbox binary
//! ----------------
//! Operator entry point: hash a password for a local directory entry, or check a
//! username/password against a federation config file.

use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

use strongbox::config::FederationConfig;
use strongbox::identity::{hash_password, AuthProvider, FederatedAuthProvider, LoginRequest};

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn usage() {
    println!("strongbox\n\nUSAGE:\n  strongbox hash --password P\n  strongbox check --config FILE --user U [--org O] [--password P]\n\nOPTIONS:\n  --config FILE   Federation config (JSON)\n  --user U        Username to check\n  --org O         Restrict resolution to entries mapped to org O\n  --password P    Password (env: STRONGBOX_PASSWORD)\n\nENV:\n  STRONGBOX_DIRECTORY_RETRIES, STRONGBOX_AUTH_RETRIES override the config's global retries.\n");
}

fn run_check(args: &[String]) -> Result<bool> {
    let config = arg_value(args, "--config").ok_or_else(|| anyhow!("--config is required"))?;
    let user = arg_value(args, "--user").ok_or_else(|| anyhow!("--user is required"))?;
    let password = arg_value(args, "--password")
        .or_else(|| env::var("STRONGBOX_PASSWORD").ok())
        .ok_or_else(|| anyhow!("--password or STRONGBOX_PASSWORD is required"))?;

    let cfg = FederationConfig::load_from_path(&PathBuf::from(config))?;
    let registry = cfg.build_registry()?;
    let global = cfg.global.clone().with_overrides(|k| env::var(k).ok());
    let mut provider = FederatedAuthProvider::new(registry, global);
    for (org, oc) in cfg.orgs.iter() {
        provider = provider.with_org_config(org.clone(), oc.clone());
    }

    let mut req = LoginRequest::new(user, password);
    req.org = arg_value(args, "--org");
    match provider.login(&req) {
        Ok(resp) => {
            println!("ok user={} directory={}", resp.principal.user_id, resp.principal.attrs.directory_id.unwrap_or_default());
            Ok(true)
        }
        Err(e) => {
            println!("{}", e);
            Ok(false)
        }
    }
}

fn main() -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() || has_flag(&args, "--help") || has_flag(&args, "-h") {
        usage();
        return Ok(ExitCode::SUCCESS);
    }

    match args[0].as_str() {
        "hash" => {
            let pw = arg_value(&args, "--password")
                .or_else(|| env::var("STRONGBOX_PASSWORD").ok())
                .ok_or_else(|| anyhow!("--password or STRONGBOX_PASSWORD is required"))?;
            println!("{}", hash_password(&pw)?);
            Ok(ExitCode::SUCCESS)
        }
        "check" => {
            if run_check(&args)? { Ok(ExitCode::SUCCESS) } else { Ok(ExitCode::from(1)) }
        }
        other => {
            usage();
            Err(anyhow!("unknown command '{}'", other))
        }
    }
}
