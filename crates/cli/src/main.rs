use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use roles_bootstrap::{
    ArtifactStore, DeploymentRegistry, MigrationManager, RunOptions, WalletType, connect,
    types::config_wrapper::ConfigWrapper, utils::function_selector::function_selector,
};
use serde_json::json;
use std::fs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the migrations against a network
    Migrate {
        /// Network name, as in config.toml
        #[arg(long = "network", short = 'n')]
        network: String,

        /// Path to the config file
        #[arg(long = "config", short = 'c')]
        config: Option<String>,

        /// Path to a JSON migration manifest; defaults to the stock migrations
        #[arg(long = "manifest", short = 'm')]
        manifest: Option<String>,

        /// First migration id to run
        #[arg(long = "from")]
        from: Option<u32>,

        /// Last migration id to run
        #[arg(long = "to")]
        to: Option<u32>,

        /// Run migrations even if they are marked completed
        #[arg(long = "reset")]
        reset: bool,

        /// Use Trezor hardware wallet
        #[arg(long = "trezor", short = 't', conflicts_with = "ledger")]
        trezor: bool,

        /// Use Ledger hardware wallet
        #[arg(long = "ledger", short = 'l', conflicts_with = "trezor")]
        ledger: bool,
    },
    /// Print deployed contracts and completed migrations
    Status {
        /// Network name, as in config.toml
        #[arg(long = "network", short = 'n')]
        network: String,

        /// Path to the config file
        #[arg(long = "config", short = 'c')]
        config: Option<String>,

        /// Print as JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Print the 4-byte selector of a function signature
    Selector {
        /// Canonical signature, e.g. "setRoles2Library(address)"
        signature: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Migrate {
            network,
            config,
            manifest,
            from,
            to,
            reset,
            trezor,
            ledger,
        } => {
            let config = ConfigWrapper::from_file(config.as_deref())?;
            let wallet_type = match (*trezor, *ledger) {
                (true, _) => WalletType::Trezor,
                (_, true) => WalletType::Ledger,
                _ => WalletType::PrivateKey,
            };

            let rpc_url = config.get_rpc_url(network)?;
            let chain = connect(&rpc_url, wallet_type).await?;
            let registry =
                DeploymentRegistry::load(config.get_deployments_file(network), network)?;
            let artifacts = ArtifactStore::new(config.get_artifacts_dir(network));

            let mut manager = match manifest.clone().or_else(|| config.get_manifest(network)) {
                Some(path) => {
                    let json = fs::read_to_string(&path)?;
                    MigrationManager::from_str(chain, registry, artifacts, &json)?
                }
                None => MigrationManager::with_templates(chain, registry, artifacts),
            };
            if let Some(accounts) = config.get_accounts(network)? {
                manager = manager.with_accounts(accounts);
            }

            let reports = manager
                .run(RunOptions {
                    from: *from,
                    to: *to,
                    reset: *reset,
                })
                .await?;

            let executed = reports.iter().filter(|r| !r.skipped).count();
            let transactions: usize = reports.iter().map(|r| r.transactions).sum();
            println!(
                "{} of {} migrations executed, {} transactions sent",
                executed,
                reports.len(),
                transactions
            );
        }
        Commands::Status {
            network,
            config,
            json,
        } => {
            let config = ConfigWrapper::from_file(config.as_deref())?;
            let registry =
                DeploymentRegistry::load(config.get_deployments_file(network), network)?;

            if *json {
                let contracts: serde_json::Map<String, serde_json::Value> = registry
                    .contracts()
                    .map(|(name, address)| (name.to_string(), json!(address.to_string())))
                    .collect();
                let status = json!({
                    "network": registry.network(),
                    "contracts": contracts,
                    "completed": registry.completed().collect::<Vec<_>>(),
                    "last_run": registry.last_run(),
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
                return Ok(());
            }

            println!("Network: {}", registry.network());
            if let Some(run_id) = registry.last_run() {
                println!("Last run: {}", run_id);
            }
            println!("\nContracts:");
            for (name, address) in registry.contracts() {
                println!("  {:<24} {}", name, address);
            }
            let completed: Vec<String> = registry.completed().map(|id| id.to_string()).collect();
            println!("\nCompleted migrations: [{}]", completed.join(", "));
        }
        Commands::Selector { signature } => {
            println!("{}", function_selector(signature));
        }
    }

    Ok(())
}
