//! Payload inspection: decode instruction bytes and describe them.

use nft_client_core::encode::decode_instruction;
use nft_client_core::error::NftResult;

use crate::hex::hex_encode;

/// Human-readable description of an encoded instruction.
pub fn describe_payload(bytes: &[u8]) -> NftResult<String> {
    let (tag, fields) = decode_instruction(bytes)?;
    let schema = tag.schema();

    let mut out = format!("📦 {} (tag {}, {} bytes)\n", schema.name, tag.as_u8(), bytes.len());
    for (spec, value) in schema.fields.iter().zip(&fields) {
        out.push_str(&format!("   {:<20} {:<10} {}\n", spec.name, spec.ty.to_string(), value));
    }
    out.push_str(&format!("   raw: {}\n", hex_encode(bytes)));
    Ok(out)
}
