use anyhow::{Context, Result};
use clap::Parser;
use core_logic::{bind_proxies, setup_logger, AccountManager, CycleRunner, ProxyManager};
use dotenv::dotenv;
use pitchtalk::{
    FarmingDriver, HeaderProfile, HttpTransport, PitchtalkConfig, SessionOptions, Transport,
};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config.toml
    #[arg(short, long, default_value = "config/config.toml")]
    config: String,

    /// Credential list, one hash per line (overrides config)
    #[arg(short, long)]
    data: Option<String>,

    /// Proxy list, one proxy per account (overrides config)
    #[arg(long)]
    proxies: Option<String>,

    /// Route each account through its proxy
    #[arg(long, default_value = "false", conflicts_with = "no_proxy")]
    proxy: bool,

    /// Disable proxies (force direct connection)
    #[arg(long, default_value = "false")]
    no_proxy: bool,

    /// Run a single cycle and exit
    #[arg(long, default_value = "false")]
    once: bool,

    /// Seconds to wait between cycles (overrides config)
    #[arg(long)]
    wait: Option<u64>,
}

#[tokio::main]
async fn main() {
    let guard = setup_logger();
    dotenv().ok();

    if let Err(e) = run(Args::parse()).await {
        error!("{:#}", e);
        // flush the file log before exiting
        drop(guard);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = PitchtalkConfig::load_or_default(&args.config)?;
    if let Some(data) = args.data {
        config.data_file = data;
    }
    if let Some(proxies) = args.proxies {
        config.proxy_file = proxies;
    }
    if let Some(wait) = args.wait {
        config.cycle_wait_secs = wait;
    }
    if args.proxy {
        config.use_proxies = true;
    }
    if args.no_proxy {
        config.use_proxies = false;
    }
    config.validate()?;

    let accounts = AccountManager::load(&config.data_file)
        .with_context(|| format!("Failed to load accounts from {}", config.data_file))?;

    let proxies = if config.use_proxies {
        Some(ProxyManager::load_proxies(&config.proxy_file)?)
    } else {
        None
    };
    let bindings = bind_proxies(accounts.len(), proxies.as_deref())?;

    let headers = HeaderProfile::from_config(&config)?;
    let transports = bindings
        .into_iter()
        .map(|proxy| {
            HttpTransport::new(&config, headers.clone(), proxy)
                .map(|t| Box::new(t) as Box<dyn Transport>)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Accounts: {} | Proxies: {} | Wait: {}s | Re-arm: {} | Tasks: {}",
        accounts.len(),
        if config.use_proxies { "on" } else { "off" },
        config.cycle_wait_secs,
        config.rearm_farming,
        config.tasks_enabled
    );

    let driver = FarmingDriver::new(accounts, transports, SessionOptions::from(&config))?;

    let mut runner = CycleRunner::new(config.cycle_wait_secs).with_ctrl_c();
    if args.once {
        runner = runner.with_max_cycles(1);
    }

    let totals = runner.run(&driver).await?;
    info!(
        "Totals | Success: {} | Failed: {} | Skipped: {}",
        totals.success, totals.failed, totals.skipped
    );
    Ok(())
}
