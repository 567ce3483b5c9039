//! Hex and address decoding for command-line input.

use nft_client_core::types::{Address, ADDRESS_LEN};

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn hex_decode(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err(format!("Hex string has odd length: {}", hex.len()));
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for i in (0..hex.len()).step_by(2) {
        let pair = hex
            .get(i..i + 2)
            .ok_or_else(|| format!("Invalid hex at position {}", i))?;
        let byte = u8::from_str_radix(pair, 16)
            .map_err(|e| format!("Invalid hex at position {}: {}", i, e))?;
        bytes.push(byte);
    }
    Ok(bytes)
}

fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decode an address from base58 or 64 hex chars (optionally `0x`-prefixed).
pub fn parse_address(input: &str) -> Result<Address, String> {
    let input = input.trim();
    let hex = strip_hex_prefix(input);
    if hex.len() == ADDRESS_LEN * 2 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let bytes = hex_decode(hex)?;
        return Address::try_from_slice(&bytes).map_err(|e| e.to_string());
    }
    input.parse::<Address>().map_err(|e| e.to_string())
}

/// Decode a payload given as hex, ignoring whitespace.
pub fn parse_payload_hex(input: &str) -> Result<Vec<u8>, String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    hex_decode(strip_hex_prefix(&compact))
}
