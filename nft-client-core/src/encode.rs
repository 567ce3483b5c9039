//! Schema-driven instruction encoding and decoding.
//!
//! Produces: tag (u8), then each field in declaration order.
//! Strings are a u32 LE byte length followed by UTF-8 bytes; integers are
//! little-endian at their declared width; byte arrays are written verbatim.

use tracing::debug;

use crate::error::{NftClientError, NftResult};
use crate::schema::{FieldSpec, OperationTag};
use crate::types::{Field, FieldType};
use crate::validation::validate_fields;

/// An encoded instruction, ready to be handed to a transaction submitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPayload {
    tag: OperationTag,
    data: Vec<u8>,
}

impl InstructionPayload {
    pub fn tag(&self) -> OperationTag {
        self.tag
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[u8]> for InstructionPayload {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Encode `fields` under the schema selected by `tag`.
pub fn encode_instruction(tag: OperationTag, fields: &[Field]) -> NftResult<InstructionPayload> {
    let schema = tag.schema();
    validate_fields(tag, fields)?;

    let mut data = vec![tag.as_u8()];
    for (spec, value) in schema.fields.iter().zip(fields) {
        encode_field(&mut data, spec, value)?;
    }
    debug!(operation = schema.name, len = data.len(), "encoded instruction");
    Ok(InstructionPayload { tag, data })
}

fn encode_field(out: &mut Vec<u8>, spec: &FieldSpec, value: &Field) -> NftResult<()> {
    match value {
        Field::Str(s) => {
            let bytes = s.as_bytes();
            let len = u32::try_from(bytes.len()).map_err(|_| NftClientError::FieldTooLarge {
                field: spec.name.to_string(),
                len: bytes.len(),
            })?;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(bytes);
        }
        Field::U8(v) => out.push(*v),
        Field::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
        Field::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
        Field::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
        Field::Bytes(bytes) => out.extend_from_slice(bytes),
    }
    Ok(())
}

/// Decode a payload back into its operation and fields.
pub fn decode_instruction(bytes: &[u8]) -> NftResult<(OperationTag, Vec<Field>)> {
    let (&tag_byte, _) = bytes
        .split_first()
        .ok_or_else(|| NftClientError::malformed(0, "empty payload"))?;
    let tag = OperationTag::try_from(tag_byte)?;

    let mut reader = Reader { bytes, pos: 1 };
    let mut fields = Vec::with_capacity(tag.schema().fields.len());
    for spec in tag.schema().fields {
        fields.push(reader.read_field(spec)?);
    }
    if reader.pos != bytes.len() {
        return Err(NftClientError::malformed(
            reader.pos,
            format!("{} trailing byte(s) after {}", bytes.len() - reader.pos, tag),
        ));
    }
    Ok((tag, fields))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize, what: &str) -> NftResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                NftClientError::malformed(
                    self.pos,
                    format!("need {} byte(s) for '{}', {} left", n, what, self.bytes.len() - self.pos),
                )
            })?;
        let bytes = self.bytes;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, what: &str) -> NftResult<[u8; N]> {
        let mut arr = [0u8; N];
        arr.copy_from_slice(self.take(N, what)?);
        Ok(arr)
    }

    fn read_field(&mut self, spec: &FieldSpec) -> NftResult<Field> {
        let field = match spec.ty {
            FieldType::String => {
                let len = u32::from_le_bytes(self.take_array(spec.name)?) as usize;
                let start = self.pos;
                let raw = self.take(len, spec.name)?;
                let s = std::str::from_utf8(raw).map_err(|e| {
                    NftClientError::malformed(start, format!("'{}' is not UTF-8: {}", spec.name, e))
                })?;
                Field::Str(s.to_string())
            }
            FieldType::U8 => Field::U8(self.take_array::<1>(spec.name)?[0]),
            FieldType::U16 => Field::U16(u16::from_le_bytes(self.take_array(spec.name)?)),
            FieldType::U32 => Field::U32(u32::from_le_bytes(self.take_array(spec.name)?)),
            FieldType::U64 => Field::U64(u64::from_le_bytes(self.take_array(spec.name)?)),
            FieldType::Bytes(n) => Field::Bytes(self.take(n, spec.name)?.to_vec()),
        };
        Ok(field)
    }
}
