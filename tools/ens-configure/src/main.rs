use std::{fs, path::PathBuf, sync::Arc};

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ens_resolution::{
    config::DEFAULT_BASE_DOMAIN,
    records,
    utils::validate,
    CancelToken, ConfigureResolution, ResolutionConfig, ResolutionRequest, Step, SummaryReducer,
    TxOptions, WorkflowEvent, WorkflowOutcome,
};

mod ethers_client;
mod report;

use ethers_client::EthersChainClient;
use report::write_resolution_report;

/// Configure and inspect ENS name resolution for accounts and contracts.
///
/// `configure` plans only the transactions still missing on-chain, so it can be re-run
/// safely after an interrupted run.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// RPC URL of the node.
    #[arg(long, env = "RPC_URL")]
    rpc_url: String,

    /// ENS registry address of the network.
    #[arg(long, env = "ENS_REGISTRY")]
    registry: String,

    /// Public resolver used by `configure`.
    #[arg(long, env = "ENS_PUBLIC_RESOLVER")]
    public_resolver: Option<String>,

    /// Path to a file containing the signer private key.
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    private_key_path: Option<String>,

    /// Private key (hex string, 0x...).
    #[arg(long, env = "PKEY", conflicts_with = "private_key_path")]
    private_key: Option<String>,

    /// Confirmations to wait for after each transaction.
    #[arg(long, env = "CONFIRMS", default_value_t = 1)]
    confirmations: usize,

    /// Gas price override, in wei.
    #[arg(long, env = "GAS_PRICE")]
    gas_price: Option<u128>,

    /// Network name recorded in reports (eg, devnet, mainnet).
    #[arg(long, default_value = "devnet")]
    network: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set forward and reverse resolution between a name and an address.
    Configure {
        /// Name to configure (eg, alice.users.iexec.eth).
        name: String,
        /// Address the name should resolve to; defaults to the signer.
        #[arg(long)]
        address: Option<String>,
        /// Write/update a JSON report of the sent transactions.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Claim `<label>.<domain>` through the domain's FIFS registrar.
    Register {
        label: String,
        #[arg(long, default_value = DEFAULT_BASE_DOMAIN)]
        domain: String,
    },
    /// Print the registry owner of a name.
    Owner { name: String },
    /// Resolve a name to an address.
    Resolve { name: String },
    /// Reverse-resolve an address to a name.
    Lookup { address: String },
    /// Read a text record.
    ReadText { name: String, key: String },
    /// Set a text record (empty value clears it).
    SetText {
        name: String,
        key: String,
        #[arg(default_value = "")]
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let private_key = load_private_key(&cli)?;
    let client = Arc::new(EthersChainClient::connect(&cli.rpc_url, private_key.as_deref()).await?);
    let config = resolution_config(&cli)?;

    match &cli.command {
        Command::Configure {
            name,
            address,
            report,
        } => {
            let mut request = ResolutionRequest::new(name.clone());
            if let Some(address) = address {
                request = request.with_address(validate::address(address)?);
            }
            let outcome = run_configure(client, config, request).await?;
            if let Some(path) = report {
                write_resolution_report(path, &cli.network, &cli.rpc_url, &outcome)?;
            }
            let summary = outcome.summary();
            if outcome.is_completed() {
                println!("Configured `{}` <-> {}", summary.name, summary.address);
            } else {
                println!("Aborted configuration of `{}`", summary.name);
            }
            for (kind, tx) in &summary.transactions {
                println!("  {kind}: {tx}");
            }
        }
        Command::Register { label, domain } => {
            let registration =
                records::register_fifs(client.as_ref(), &config, label, Some(domain)).await?;
            match registration.register_tx {
                Some(tx) => println!("Registered `{}` (tx {tx})", registration.name),
                None => println!("`{}` is already owned by the signer", registration.name),
            }
        }
        Command::Owner { name } => {
            let owner = records::owner_of_name(client.as_ref(), &config, name).await?;
            println!("{owner}");
        }
        Command::Resolve { name } => {
            match records::resolve_name(client.as_ref(), &config, name).await? {
                Some(address) => println!("{address}"),
                None => println!("`{name}` does not resolve to an address"),
            }
        }
        Command::Lookup { address } => {
            let address = validate::address(address)?;
            match records::lookup_address(client.as_ref(), &config, address).await? {
                Some(name) => println!("{name}"),
                None => println!("{address} has no reverse resolution"),
            }
        }
        Command::ReadText { name, key } => {
            let value = records::read_text_record(client.as_ref(), &config, name, key).await?;
            println!("{value}");
        }
        Command::SetText { name, key, value } => {
            let tx = records::set_text_record(client.as_ref(), &config, name, key, value).await?;
            println!("Set `{key}` on `{name}` (tx {tx})");
        }
    }
    Ok(())
}

fn load_private_key(cli: &Cli) -> Result<Option<String>> {
    if let Some(ref path) = cli.private_key_path {
        let key = fs::read_to_string(path)
            .with_context(|| format!("failed reading private key file {path}"))?;
        return Ok(Some(key.trim().to_string()));
    }
    Ok(cli.private_key.clone())
}

fn resolution_config(cli: &Cli) -> Result<ResolutionConfig> {
    let registry = validate::address(&cli.registry)?;
    let public_resolver = match cli.public_resolver.as_deref() {
        Some(resolver) => validate::address(resolver)?,
        None if matches!(cli.command, Command::Configure { .. }) => {
            return Err(anyhow!(
                "missing public resolver: provide --public-resolver (or set ENS_PUBLIC_RESOLVER)"
            ))
        }
        None => Address::ZERO,
    };
    Ok(
        ResolutionConfig::new(registry, public_resolver).with_tx_options(TxOptions {
            confirmations: cli.confirmations,
            gas_price: cli.gas_price.map(U256::from),
        }),
    )
}

/// Stream the workflow's progress to stdout and return its collapsed result.
///
/// Ctrl-C stops the workflow before its next transaction.
async fn run_configure(
    client: Arc<EthersChainClient>,
    config: ResolutionConfig,
    request: ResolutionRequest,
) -> Result<WorkflowOutcome> {
    let mut handle = ConfigureResolution::new(client, config, CancelToken::new()).start(request)?;

    let cancel = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Stopping after the current transaction...");
            cancel.cancel();
        }
    });

    let mut reducer = SummaryReducer::new();
    while let Some(event) = handle.next_event().await {
        print_event(&event);
        if reducer.apply(event) {
            break;
        }
    }
    Ok(reducer.finish()?)
}

fn print_event(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::Described { kind, steps } => {
            let steps: Vec<String> = steps.iter().map(|s| s.kind().to_string()).collect();
            if steps.is_empty() {
                println!("Nothing to do for {kind:?} target");
            } else {
                println!("Workflow for {kind:?} target: {}", steps.join(" -> "));
            }
        }
        WorkflowEvent::StepRequested { step } => println!("{}", describe(step)),
        WorkflowEvent::StepSubmitted { step, tx } => println!("  {} sent: {tx}", step.kind()),
        WorkflowEvent::StepConfirmed { step } => println!("  {} confirmed", step.kind()),
        WorkflowEvent::Completed { .. } | WorkflowEvent::Aborted { .. } => {}
        WorkflowEvent::Failed { error } => eprintln!("Failed: {error}"),
    }
}

fn describe(step: &Step) -> String {
    match step {
        Step::SetResolver { name, resolver } => format!("Setting resolver of {name} to {resolver}"),
        Step::SetAddr { name, address, .. } => format!("Setting address of {name} to {address}"),
        Step::ClaimReverse {
            address, resolver, ..
        } => format!("Claiming reverse record of {address} with resolver {resolver}"),
        Step::SetName { name, address, .. } => format!("Setting reverse name of {address} to {name}"),
    }
}
