//! Interactive numbered menu over the workflow service.

use std::io::{self, BufRead, Write};

use tracing::warn;

use nft_client_core::types::Address;

use crate::cli::{address_arg, print_receipt, CliError};
use crate::config::ask;
use crate::metadata::NftMetadata;
use crate::service::NftService;
use crate::submit::{lamports_to_sol, sol_to_lamports, BalanceProvider, TransactionSubmitter};

const MENU: &str = "\n=== NFT Client ===
1. Create collection
2. Mint NFT
3. Transfer NFT
4. Burn NFT
5. Update NFT metadata
6. Update collection metadata
7. Request airdrop
8. Exit";

enum Choice {
    Continue,
    Exit,
}

/// Loop until the user picks Exit or input ends. A failed action is reported
/// and the menu is shown again.
pub async fn run_menu<S, R, W>(service: &NftService<S>, input: &mut R, output: &mut W) -> Result<(), CliError>
where
    S: TransactionSubmitter + BalanceProvider,
    R: BufRead,
    W: Write,
{
    let balance = service.submitter().balance(service.authority()).await?;
    writeln!(output, "Wallet: {}", service.authority())?;
    writeln!(output, "Balance: {} SOL", lamports_to_sol(balance))?;
    loop {
        writeln!(output, "{}", MENU)?;
        let choice = match ask(input, output, "Select an option: ") {
            Ok(choice) => choice,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        match dispatch(service, choice.as_str(), input, output).await {
            Ok(Choice::Continue) => {}
            Ok(Choice::Exit) => break,
            Err(e) => {
                warn!(choice = %choice, error = %e, "menu action failed");
                writeln!(output, "❌ {}", e)?;
            }
        }
    }
    writeln!(output, "Goodbye!")?;
    Ok(())
}

async fn dispatch<S, R, W>(
    service: &NftService<S>,
    choice: &str,
    input: &mut R,
    output: &mut W,
) -> Result<Choice, CliError>
where
    S: TransactionSubmitter + BalanceProvider,
    R: BufRead,
    W: Write,
{
    match choice {
        "1" => create_collection(service, input, output).await?,
        "2" => mint(service, input, output).await?,
        "3" => {
            let nft = ask_address(input, output, "NFT address: ")?;
            let new_owner = ask_address(input, output, "New owner address: ")?;
            let receipt = service.transfer(&nft, &new_owner).await?;
            print_receipt(output, "NFT transferred", &receipt)?;
        }
        "4" => {
            let nft = ask_address(input, output, "NFT address: ")?;
            let receipt = service.burn(&nft).await?;
            print_receipt(output, "NFT burned", &receipt)?;
        }
        "5" => {
            let nft = ask_address(input, output, "NFT address: ")?;
            let collection = ask_address(input, output, "Collection address: ")?;
            let uri = ask(input, output, "New metadata URI: ")?;
            let receipt = service.update_item_metadata(&nft, &collection, &uri).await?;
            print_receipt(output, "NFT metadata updated", &receipt)?;
        }
        "6" => {
            let collection = ask_address(input, output, "Collection address: ")?;
            let uri = ask(input, output, "New collection URI: ")?;
            let receipt = service.update_collection_metadata(&collection, &uri).await?;
            print_receipt(output, "Collection metadata updated", &receipt)?;
        }
        "7" => airdrop(service, input, output).await?,
        "8" => return Ok(Choice::Exit),
        other => writeln!(output, "Invalid option '{}'", other)?,
    }
    Ok(Choice::Continue)
}

fn ask_address<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<Address, CliError> {
    let raw = ask(input, output, prompt)?;
    address_arg(&raw)
}

fn ask_optional<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Option<String>> {
    let value = ask(input, output, prompt)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

async fn create_collection<S, R, W>(service: &NftService<S>, input: &mut R, output: &mut W) -> Result<(), CliError>
where
    S: TransactionSubmitter,
    R: BufRead,
    W: Write,
{
    let name = ask(input, output, "Collection name: ")?;
    let symbol = ask(input, output, "Symbol: ")?;
    let description = ask(input, output, "Description: ")?;
    let image = ask(input, output, "Image URL: ")?;
    let external_url = ask_optional(input, output, "External URL (optional): ")?;
    let royalty = ask(input, output, "Royalty percentage (0-100): ")?;
    let royalty: u8 = royalty
        .parse()
        .map_err(|_| CliError::Input(format!("Invalid royalty percentage '{}'", royalty)))?;
    let mutable = ask(input, output, "Mutable (y/n) [y]: ")?;
    let is_mutable = !matches!(mutable.to_ascii_lowercase().as_str(), "n" | "no");

    let metadata = NftMetadata {
        name: name.clone(),
        symbol: symbol.clone(),
        description,
        image,
        external_url,
        seller_fee_basis_points: u16::from(royalty) * 100,
        ..NftMetadata::default()
    };
    writeln!(output, "Upload this metadata and enter its URI:\n{}", metadata.to_json_pretty()?)?;
    let uri = ask(input, output, "Metadata URI: ")?;

    let receipt = service
        .initialize_collection(&name, &symbol, &uri, royalty, is_mutable)
        .await?;
    print_receipt(output, "Collection initialized", &receipt)?;
    Ok(())
}

async fn mint<S, R, W>(service: &NftService<S>, input: &mut R, output: &mut W) -> Result<(), CliError>
where
    S: TransactionSubmitter,
    R: BufRead,
    W: Write,
{
    let collection = ask_address(input, output, "Collection address: ")?;
    let name = ask(input, output, "NFT name: ")?;
    let description = ask(input, output, "Description: ")?;
    let image = ask(input, output, "Image URL: ")?;

    let metadata = NftMetadata {
        name,
        description,
        image,
        ..NftMetadata::default()
    };
    writeln!(output, "Upload this metadata and enter its URI:\n{}", metadata.to_json_pretty()?)?;
    let uri = ask(input, output, "Metadata URI: ")?;

    let receipt = service.mint(&collection, &uri).await?;
    print_receipt(output, "NFT minted", &receipt)?;
    Ok(())
}

async fn airdrop<S, R, W>(service: &NftService<S>, input: &mut R, output: &mut W) -> Result<(), CliError>
where
    S: TransactionSubmitter + BalanceProvider,
    R: BufRead,
    W: Write,
{
    let amount = ask(input, output, "Amount (SOL): ")?;
    let lamports = amount
        .parse::<f64>()
        .ok()
        .and_then(sol_to_lamports)
        .ok_or_else(|| CliError::Input(format!("Invalid SOL amount '{}'", amount)))?;
    let wallet = *service.authority();
    let signature = service.submitter().request_airdrop(&wallet, lamports).await?;
    let balance = service.submitter().balance(&wallet).await?;
    writeln!(output, "✅ Airdrop {}", signature)?;
    writeln!(output, "   balance: {} SOL", lamports_to_sol(balance))?;
    Ok(())
}
