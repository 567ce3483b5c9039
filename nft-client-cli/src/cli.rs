//! Command-line surface: argument definitions and dispatch.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use thiserror::Error;

use nft_client_core::encode::encode_instruction;
use nft_client_core::error::NftClientError;
use nft_client_core::pda::{collection_address, item_address};
use nft_client_core::schema::program_schema;
use nft_client_core::serial::SerialCounter;

use crate::config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
use crate::hex::{hex_encode, parse_address, parse_payload_hex};
use crate::inspect::describe_payload;
use crate::menu::run_menu;
use crate::metadata::NftMetadata;
use crate::parse::{parse_fields, parse_operation};
use crate::service::{NftService, Receipt, ServiceError};
use crate::submit::{lamports_to_sol, sol_to_lamports, BalanceProvider, DryRunSubmitter, SubmitError};

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Core(#[from] NftClientError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Input(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "nft-cli",
    version,
    about = "Create collections, mint, transfer and burn NFTs",
    long_about = "Create collections, mint, transfer and burn NFTs.\n\n\
        Transactions go to the in-process dry-run ledger, which logs each one \
        (RUST_LOG=info) and confirms it. Run without a command for the interactive menu."
)]
pub struct Cli {
    /// Config file, created interactively if missing
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Serial number for the next mint
    #[arg(long, global = true, default_value_t = 1)]
    pub next_serial: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the operation table as JSON
    Schema,
    /// Decode a hex instruction payload
    Inspect { payload: String },
    /// Encode an instruction from field values given in schema order
    Encode {
        operation: String,
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Derive a collection address
    DeriveCollection {
        #[arg(long)]
        name: String,
        /// Defaults to the configured wallet
        #[arg(long)]
        authority: Option<String>,
    },
    /// Derive an item address
    DeriveItem {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        serial: u64,
    },
    CreateCollection {
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        uri: String,
        /// Royalty percentage, 0-100
        #[arg(long, default_value_t = 0)]
        royalty: u8,
        #[arg(long)]
        immutable: bool,
    },
    /// Create a collection from an uploaded metadata document
    CreateCollectionFromMetadata {
        /// Local copy of the metadata JSON
        #[arg(long)]
        metadata: PathBuf,
        /// Where the document was uploaded
        #[arg(long)]
        uri: String,
        #[arg(long)]
        immutable: bool,
    },
    Mint {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        uri: String,
    },
    Transfer {
        #[arg(long)]
        nft: String,
        #[arg(long)]
        new_owner: String,
    },
    Burn {
        #[arg(long)]
        nft: String,
    },
    UpdateItemMetadata {
        #[arg(long)]
        nft: String,
        #[arg(long)]
        collection: String,
        #[arg(long)]
        uri: String,
    },
    UpdateCollectionMetadata {
        #[arg(long)]
        collection: String,
        #[arg(long)]
        uri: String,
    },
    /// Request an airdrop to the configured wallet
    Airdrop {
        #[arg(long, default_value_t = 1.0)]
        sol: f64,
    },
    /// Interactive numbered menu
    Menu,
}

pub(crate) fn address_arg(raw: &str) -> Result<nft_client_core::types::Address, CliError> {
    parse_address(raw).map_err(|e| CliError::Input(format!("'{}': {}", raw, e)))
}

fn load_config(path: &Path) -> Result<Config, CliError> {
    let stdin = io::stdin();
    let config = Config::load_or_create(path, &mut stdin.lock(), &mut io::stdout())?;
    Ok(config)
}

pub(crate) fn print_receipt<W: Write>(output: &mut W, label: &str, receipt: &Receipt) -> io::Result<()> {
    writeln!(output, "✅ {}", label)?;
    writeln!(output, "   account:   {}", receipt.account)?;
    if let Some(serial) = receipt.serial_number {
        writeln!(output, "   serial:    {}", serial)?;
    }
    writeln!(output, "   signature: {}", receipt.signature)
}

/// Commands that need neither configuration nor a ledger.
fn run_offline(command: &Command) -> Result<bool, CliError> {
    match command {
        Command::Schema => {
            println!("{}", program_schema().to_json_pretty()?);
        }
        Command::Inspect { payload } => {
            let bytes = parse_payload_hex(payload).map_err(CliError::Input)?;
            print!("{}", describe_payload(&bytes)?);
        }
        Command::Encode { operation, values } => {
            let tag = parse_operation(operation).map_err(CliError::Input)?;
            let fields = parse_fields(tag, values).map_err(CliError::Input)?;
            let payload = encode_instruction(tag, &fields)?;
            println!("{}", hex_encode(payload.as_bytes()));
        }
        _ => return Ok(false),
    }
    Ok(true)
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let command = cli.command.unwrap_or(Command::Menu);
    if run_offline(&command)? {
        return Ok(());
    }

    let config = load_config(&cli.config)?;
    let authority = config.wallet_address()?;
    let submitter = DryRunSubmitter::new(config.rpc_url());
    let serials = Arc::new(SerialCounter::starting_at(cli.next_serial));
    let service = NftService::new(submitter, config.program_id, authority, serials);
    let mut out = io::stdout();

    match command {
        Command::DeriveCollection { name, authority: owner } => {
            let owner = match owner {
                Some(raw) => address_arg(&raw)?,
                None => authority,
            };
            let derived = collection_address(&config.program_id, &owner, &name)?;
            println!("{} (bump {})", derived.address, derived.bump);
        }
        Command::DeriveItem { collection, serial } => {
            let derived = item_address(&config.program_id, &address_arg(&collection)?, serial)?;
            println!("{} (bump {})", derived.address, derived.bump);
        }
        Command::CreateCollection {
            name,
            symbol,
            uri,
            royalty,
            immutable,
        } => {
            let receipt = service
                .initialize_collection(&name, &symbol, &uri, royalty, !immutable)
                .await?;
            print_receipt(&mut out, "Collection initialized", &receipt)?;
        }
        Command::CreateCollectionFromMetadata { metadata, uri, immutable } => {
            let document = NftMetadata::from_json(&fs::read_to_string(&metadata)?)?;
            let royalty = document.royalty_percentage()?;
            let receipt = service
                .initialize_collection(&document.name, &document.symbol, &uri, royalty, !immutable)
                .await?;
            print_receipt(&mut out, "Collection initialized", &receipt)?;
        }
        Command::Mint { collection, uri } => {
            let receipt = service.mint(&address_arg(&collection)?, &uri).await?;
            print_receipt(&mut out, "NFT minted", &receipt)?;
        }
        Command::Transfer { nft, new_owner } => {
            let receipt = service
                .transfer(&address_arg(&nft)?, &address_arg(&new_owner)?)
                .await?;
            print_receipt(&mut out, "NFT transferred", &receipt)?;
        }
        Command::Burn { nft } => {
            let receipt = service.burn(&address_arg(&nft)?).await?;
            print_receipt(&mut out, "NFT burned", &receipt)?;
        }
        Command::UpdateItemMetadata { nft, collection, uri } => {
            let receipt = service
                .update_item_metadata(&address_arg(&nft)?, &address_arg(&collection)?, &uri)
                .await?;
            print_receipt(&mut out, "NFT metadata updated", &receipt)?;
        }
        Command::UpdateCollectionMetadata { collection, uri } => {
            let receipt = service
                .update_collection_metadata(&address_arg(&collection)?, &uri)
                .await?;
            print_receipt(&mut out, "Collection metadata updated", &receipt)?;
        }
        Command::Airdrop { sol } => {
            let lamports = sol_to_lamports(sol)
                .ok_or_else(|| CliError::Input(format!("Invalid SOL amount: {}", sol)))?;
            let signature = service.submitter().request_airdrop(&authority, lamports).await?;
            let balance = service.submitter().balance(&authority).await?;
            println!("✅ Airdrop {} ({} SOL)", signature, sol);
            println!("   balance: {} SOL", lamports_to_sol(balance));
        }
        Command::Menu => {
            let stdin = io::stdin();
            run_menu(&service, &mut stdin.lock(), &mut out).await?;
        }
        Command::Schema | Command::Inspect { .. } | Command::Encode { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["nft-cli"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.next_serial, 1);
    }

    #[test]
    fn parses_create_collection() {
        let cli = Cli::try_parse_from([
            "nft-cli", "create-collection", "--name", "Dragons", "--symbol", "DRG", "--uri", "ipfs://d",
            "--royalty", "5", "--immutable",
        ])
        .unwrap();
        match cli.command {
            Some(Command::CreateCollection { name, royalty, immutable, .. }) => {
                assert_eq!(name, "Dragons");
                assert_eq!(royalty, 5);
                assert!(immutable);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parses_create_collection_from_metadata() {
        let cli = Cli::try_parse_from([
            "nft-cli", "create-collection-from-metadata", "--metadata", "dragons.json", "--uri", "ipfs://d",
        ])
        .unwrap();
        match cli.command {
            Some(Command::CreateCollectionFromMetadata { metadata, uri, immutable }) => {
                assert_eq!(metadata, PathBuf::from("dragons.json"));
                assert_eq!(uri, "ipfs://d");
                assert!(!immutable);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn encode_accepts_negative_looking_values() {
        let cli = Cli::try_parse_from(["nft-cli", "encode", "update-item-metadata", "-x"]).unwrap();
        match cli.command {
            Some(Command::Encode { operation, values }) => {
                assert_eq!(operation, "update-item-metadata");
                assert_eq!(values, vec!["-x".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn offline_commands_skip_config() {
        assert!(run_offline(&Command::Schema).unwrap());
        assert!(run_offline(&Command::Inspect { payload: "03".to_string() }).unwrap());
        assert!(!run_offline(&Command::Menu).unwrap());
        assert!(matches!(
            run_offline(&Command::Inspect { payload: "zz".to_string() }),
            Err(CliError::Input(_))
        ));
    }
}
