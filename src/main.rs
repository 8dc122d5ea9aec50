//! cosmos-transfer
//!
//! Signs and broadcasts a single bank transfer, then prints its hash.
//!
//! # Architecture Overview
//!
//! ```text
//!   config (defaults | TOML)
//!        │
//!        ▼
//!   ┌─────────┐   ┌──────────┐   ┌───────────────┐   ┌──────────────┐
//!   │ keyring │──▶│  wallet  │──▶│  transaction  │──▶│ node client  │──▶ stdout
//!   │  (file) │   │ (secp256k1)  │ build/validate│   │ account +    │   "transaction sent: <HASH>"
//!   └─────────┘   └──────────┘   │ sign/encode   │   │ broadcast    │
//!                                └───────────────┘   └──────────────┘
//! ```
//!
//! Any failure prints `failed to <step>: <error>` and exits with status 1.

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cosmos_transfer::blockchain::wallet::generate_mnemonic;
use cosmos_transfer::blockchain::NodeClient;
use cosmos_transfer::config::{load_or_default, TransferConfig};
use cosmos_transfer::keyring::Keyring;
use cosmos_transfer::observability::init_logging;
use cosmos_transfer::prompt;
use cosmos_transfer::transfer::{execute, AtStep, Cause, Step, TransferError, TransferReceipt};

#[derive(Parser)]
#[command(name = "cosmos-transfer", version)]
#[command(about = "Sign and broadcast a bank transfer to a Cosmos SDK chain", long_about = None)]
struct Cli {
    /// TOML config file [default: built-in Osmosis testnet transfer]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Logging verbosity: error|warn|info|debug|trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send the configured transfer (default)
    Send,
    /// Manage keys in the keyring [alias: k]
    #[command(subcommand, alias = "k")]
    Keys(KeysCmd),
}

#[derive(Subcommand)]
enum KeysCmd {
    /// Create a new key, or recover one from a mnemonic
    Add {
        /// A human-readable name for the key
        name: String,
        /// Recover an existing seed phrase instead of generating a new one
        #[arg(long)]
        recover: bool,
    },
    /// Display the address and public key of a key
    Show {
        /// Name of the key to display
        name: String,
    },
    /// List all keys
    #[command(alias = "ls")]
    List,
    /// Delete a key by name
    #[command(alias = "rm")]
    Delete {
        /// Name of the key to delete
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()).at(Step::LoadConfig) {
        Ok(config) => config,
        Err(e) => {
            init_logging(cli.log_level.as_deref().unwrap_or("info"));
            println!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(
        cli.log_level
            .as_deref()
            .unwrap_or(&config.observability.log_level),
    );

    let result: Result<(), Box<dyn Error>> = match cli.command.unwrap_or(Command::Send) {
        Command::Send => match send(&config).await {
            Ok(receipt) => {
                println!("transaction sent: {}", receipt.tx_hash);
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        Command::Keys(cmd) => keys(cmd, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn send(config: &TransferConfig) -> Result<TransferReceipt, TransferError> {
    tracing::info!(
        chain_id = %config.chain.chain_id,
        rpc_url = %config.chain.rpc_url,
        key = %config.transfer.key_name,
        "Configuration loaded"
    );

    let keyring = Keyring::open(&config.keyring.dir).at(Step::CreateKeyring)?;

    // Fail on a missing key before touching the network or asking for a password.
    let key_name = &config.transfer.key_name;
    keyring.show(key_name).at(Step::GetSenderKey)?;

    let node = NodeClient::new(config.chain.clone())
        .await
        .at(Step::CreateNodeClient)?;

    let password = prompt::password_from_env_or_prompt(
        &config.keyring.password_env,
        &format!("Enter the password for key `{}`", key_name),
    )
    .map_err(|e| TransferError {
        step: Step::ReadPassword,
        cause: Cause::Prompt(e.to_string()),
    })?;

    execute(config, &keyring, &password, &node).await
}

fn keys(cmd: KeysCmd, config: &TransferConfig) -> Result<(), Box<dyn Error>> {
    let keyring = Keyring::open(&config.keyring.dir)?;
    let prefix = &config.chain.account_prefix;

    match cmd {
        KeysCmd::Add { name, recover } => {
            let mnemonic = if recover {
                prompt::read_text("Enter your BIP-39 mnemonic")?
            } else {
                generate_mnemonic()?
            };
            let password = prompt::read_new_password(format!("Enter a password to encrypt key `{}`", name))?;
            let info = keyring
                .add(&name, &mnemonic, &password, prefix)
                .map_err(|e| format!("failed to add key: {}", e))?;

            println!("{}", serde_json::to_string_pretty(&info)?);
            if !recover {
                println!("\nImportant: write this mnemonic phrase in a safe place!");
                println!("It is the only way to recover your account if you ever forget your password.");
                println!("\n{}", mnemonic);
            }
        }
        KeysCmd::Show { name } => {
            let info = keyring.show(&name).map_err(|e| format!("failed to show key: {}", e))?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        KeysCmd::List => {
            let keys = keyring.list().map_err(|e| format!("failed to list keys: {}", e))?;
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        KeysCmd::Delete { name, yes } => {
            keyring.show(&name).map_err(|e| format!("failed to delete key: {}", e))?;
            if yes || prompt::confirm(format!("Confirm deleting key `{}`?", name))? {
                keyring
                    .delete(&name)
                    .map_err(|e| format!("failed to delete key: {}", e))?;
                println!("Key `{}` deleted", name);
            }
        }
    }

    Ok(())
}
