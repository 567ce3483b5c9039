//! Schema-aware parsing of field values from CLI strings.

use nft_client_core::schema::OperationTag;
use nft_client_core::types::{Field, FieldType};

use crate::hex::{hex_decode, parse_address};

/// Parse a CLI string value according to its field type.
pub fn parse_field(raw: &str, ty: FieldType) -> Result<Field, String> {
    match ty {
        FieldType::String => Ok(Field::Str(raw.to_string())),
        FieldType::U8 => match raw {
            "true" | "yes" => Ok(Field::U8(1)),
            "false" | "no" => Ok(Field::U8(0)),
            _ => raw.parse::<u8>().map(Field::U8).map_err(|e| format!("Invalid u8 '{}': {}", raw, e)),
        },
        FieldType::U16 => raw.parse::<u16>().map(Field::U16).map_err(|e| format!("Invalid u16 '{}': {}", raw, e)),
        FieldType::U32 => raw.parse::<u32>().map(Field::U32).map_err(|e| format!("Invalid u32 '{}': {}", raw, e)),
        FieldType::U64 => raw.parse::<u64>().map(Field::U64).map_err(|e| format!("Invalid u64 '{}': {}", raw, e)),
        FieldType::Bytes(32) => parse_address(raw).map(Field::from),
        FieldType::Bytes(size) => {
            let hex = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
            let bytes = hex_decode(hex)?;
            if bytes.len() != size {
                return Err(format!("Expected {} bytes from hex, got {}", size, bytes.len()));
            }
            Ok(Field::Bytes(bytes))
        }
    }
}

/// Look up an operation by its schema name (snake or kebab case).
pub fn parse_operation(name: &str) -> Result<OperationTag, String> {
    let wanted = name.replace('-', "_");
    OperationTag::ALL
        .iter()
        .copied()
        .find(|tag| tag.name() == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = OperationTag::ALL.iter().map(|t| t.name()).collect();
            format!("Unknown operation '{}', expected one of: {}", name, known.join(", "))
        })
}

/// Parse positional values for every field of `tag`, in schema order.
pub fn parse_fields(tag: OperationTag, raw: &[String]) -> Result<Vec<Field>, String> {
    let specs = tag.schema().fields;
    if raw.len() != specs.len() {
        let names: Vec<String> = specs.iter().map(|s| format!("<{}: {}>", s.name, s.ty)).collect();
        return Err(format!(
            "{} takes {} value(s): {}",
            tag,
            specs.len(),
            names.join(" ")
        ));
    }
    specs
        .iter()
        .zip(raw)
        .map(|(spec, value)| parse_field(value, spec.ty).map_err(|e| format!("{}: {}", spec.name, e)))
        .collect()
}
