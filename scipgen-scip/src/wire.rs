//! Wire codec for the serialized SCIP index.
//!
//! The index is protobuf wire format. Only the messages and fields the
//! generators consume are materialized; every other field is skipped
//! according to its wire type, so indexes produced by newer tooling decode
//! cleanly. The encoder mirrors the decoder and exists for fixture
//! construction and round-trip tests.
//!
//! Field numbers, by message:
//!
//! ```text
//! Index              metadata=1  documents=2  external_symbols=3
//! Metadata           version=1  tool_info=2  project_root=3
//! ToolInfo           name=1  version=2  arguments=3
//! Document           relative_path=1  occurrences=2  symbols=3  language=4
//! Occurrence         range=1 (packed)  symbol=2  symbol_roles=3
//! SymbolInformation  symbol=1  kind=5  display_name=6  signature=9
//! Signature          class=1  method=2  type=3  value=4       (oneof)
//! ClassSignature     parents=2  declarations=4
//! TypeSignature      type_parameters=1  lower_bound=2
//! ValueSignature     tpe=1
//! MethodSignature    parameter_lists=2  return_type=3
//! Scope              symlinks=1
//! Type               type_ref=2  structural=7  union=16
//!                    intersection=17  constant=23  lambda=26   (oneof)
//! TypeRef            symbol=2  type_arguments=3
//! UnionType          types=1
//! IntersectionType   types=1
//! StructuralType     declarations=5
//! ConstantType       constant=1
//! Constant           boolean=2  int=6  long=7  double=9  string=10 (oneof)
//! ```

use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::DecodeError;
use crate::index::{
    ClassSignature, Constant, ConstantType, Document, Index, IntersectionType, Kind, Metadata,
    MethodSignature, Occurrence, Scope, Signature, StructuralType, SymbolInformation, ToolInfo,
    Type, TypeRef, TypeSignature, UnionType, ValueSignature,
};

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LEN: u8 = 2;
const WIRE_FIXED32: u8 = 5;

/// Decodes a complete index from its serialized bytes.
pub fn decode_index(bytes: &[u8]) -> Result<Index, DecodeError> {
    let mut reader = Reader::new(Bytes::copy_from_slice(bytes));
    decode_index_msg(&mut reader)
}

/// Encodes an index back to wire format.
#[must_use]
pub fn encode_index(index: &Index) -> Vec<u8> {
    encode_index_msg(index).to_vec()
}

impl Index {
    /// Reads and decodes an index file from disk.
    pub fn read_from(path: &Path) -> Result<Self, DecodeError> {
        let bytes = std::fs::read(path)?;
        decode_index(&bytes)
    }
}

/// Bounds-checked cursor over the input buffer.
struct Reader {
    buf: Bytes,
    len: usize,
}

impl Reader {
    fn new(buf: Bytes) -> Self {
        let len = buf.len();
        Self { buf, len }
    }

    fn offset(&self) -> usize {
        self.len - self.buf.remaining()
    }

    fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let offset = self.offset();
        let mut value: u64 = 0;
        for shift in 0..10 {
            if !self.buf.has_remaining() {
                return Err(DecodeError::Truncated { offset, needed: 1 });
            }
            let byte = self.buf.get_u8();
            value |= u64::from(byte & 0x7f) << (shift * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow { offset })
    }

    fn read_tag(&mut self) -> Result<(u32, u8), DecodeError> {
        let tag = self.read_varint()?;
        Ok(((tag >> 3) as u32, (tag & 0x7) as u8))
    }

    fn read_bytes(&mut self) -> Result<Bytes, DecodeError> {
        let length = self.read_varint()? as usize;
        if self.buf.remaining() < length {
            return Err(DecodeError::Truncated {
                offset: self.offset(),
                needed: length - self.buf.remaining(),
            });
        }
        Ok(self.buf.copy_to_bytes(length))
    }

    fn read_string(&mut self, message: &'static str, field: u32) -> Result<String, DecodeError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 {
            message,
            field_number: field,
        })
    }

    fn read_message(&mut self) -> Result<Reader, DecodeError> {
        Ok(Reader::new(self.read_bytes()?))
    }

    fn skip(
        &mut self,
        message: &'static str,
        field: u32,
        wire_type: u8,
    ) -> Result<(), DecodeError> {
        match wire_type {
            WIRE_VARINT => {
                self.read_varint()?;
            }
            WIRE_FIXED64 => {
                if self.buf.remaining() < 8 {
                    return Err(DecodeError::Truncated {
                        offset: self.offset(),
                        needed: 8 - self.buf.remaining(),
                    });
                }
                self.buf.advance(8);
            }
            WIRE_LEN => {
                self.read_bytes()?;
            }
            WIRE_FIXED32 => {
                if self.buf.remaining() < 4 {
                    return Err(DecodeError::Truncated {
                        offset: self.offset(),
                        needed: 4 - self.buf.remaining(),
                    });
                }
                self.buf.advance(4);
            }
            other => {
                return Err(DecodeError::InvalidWireType {
                    message,
                    field_number: field,
                    wire_type: other,
                });
            }
        }
        Ok(())
    }
}

fn decode_index_msg(reader: &mut Reader) -> Result<Index, DecodeError> {
    let mut index = Index::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => index.metadata = decode_metadata(&mut reader.read_message()?)?,
            (2, WIRE_LEN) => index
                .documents
                .push(decode_document(&mut reader.read_message()?)?),
            (3, WIRE_LEN) => index
                .external_symbols
                .push(decode_symbol_information(&mut reader.read_message()?)?),
            _ => reader.skip("Index", field, wire_type)?,
        }
    }
    Ok(index)
}

fn decode_metadata(reader: &mut Reader) -> Result<Metadata, DecodeError> {
    let mut metadata = Metadata::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_VARINT) => metadata.version = reader.read_varint()? as i32,
            (2, WIRE_LEN) => metadata.tool_info = decode_tool_info(&mut reader.read_message()?)?,
            (3, WIRE_LEN) => metadata.project_root = reader.read_string("Metadata", 3)?,
            _ => reader.skip("Metadata", field, wire_type)?,
        }
    }
    Ok(metadata)
}

fn decode_tool_info(reader: &mut Reader) -> Result<ToolInfo, DecodeError> {
    let mut tool_info = ToolInfo::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => tool_info.name = reader.read_string("ToolInfo", 1)?,
            (2, WIRE_LEN) => tool_info.version = reader.read_string("ToolInfo", 2)?,
            (3, WIRE_LEN) => tool_info.arguments.push(reader.read_string("ToolInfo", 3)?),
            _ => reader.skip("ToolInfo", field, wire_type)?,
        }
    }
    Ok(tool_info)
}

fn decode_document(reader: &mut Reader) -> Result<Document, DecodeError> {
    let mut document = Document::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => document.relative_path = reader.read_string("Document", 1)?,
            (2, WIRE_LEN) => document
                .occurrences
                .push(decode_occurrence(&mut reader.read_message()?)?),
            (3, WIRE_LEN) => document
                .symbols
                .push(decode_symbol_information(&mut reader.read_message()?)?),
            (4, WIRE_LEN) => document.language = reader.read_string("Document", 4)?,
            _ => reader.skip("Document", field, wire_type)?,
        }
    }
    Ok(document)
}

fn decode_occurrence(reader: &mut Reader) -> Result<Occurrence, DecodeError> {
    let mut occurrence = Occurrence::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => {
                let mut packed = reader.read_message()?;
                while !packed.is_empty() {
                    occurrence.range.push(packed.read_varint()? as i32);
                }
            }
            (1, WIRE_VARINT) => occurrence.range.push(reader.read_varint()? as i32),
            (2, WIRE_LEN) => occurrence.symbol = reader.read_string("Occurrence", 2)?,
            (3, WIRE_VARINT) => occurrence.symbol_roles = reader.read_varint()? as i32,
            _ => reader.skip("Occurrence", field, wire_type)?,
        }
    }
    Ok(occurrence)
}

fn decode_symbol_information(reader: &mut Reader) -> Result<SymbolInformation, DecodeError> {
    let mut info = SymbolInformation::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => info.symbol = reader.read_string("SymbolInformation", 1)?,
            (5, WIRE_VARINT) => info.kind = Kind::from_wire(reader.read_varint()? as i32),
            (6, WIRE_LEN) => info.display_name = reader.read_string("SymbolInformation", 6)?,
            (9, WIRE_LEN) => info.signature = Some(decode_signature(&mut reader.read_message()?)?),
            _ => reader.skip("SymbolInformation", field, wire_type)?,
        }
    }
    Ok(info)
}

fn decode_signature(reader: &mut Reader) -> Result<Signature, DecodeError> {
    let mut signature = None;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => {
                signature = Some(Signature::Class(decode_class_signature(
                    &mut reader.read_message()?,
                )?));
            }
            (2, WIRE_LEN) => {
                signature = Some(Signature::Method(decode_method_signature(
                    &mut reader.read_message()?,
                )?));
            }
            (3, WIRE_LEN) => {
                signature = Some(Signature::Type(decode_type_signature(
                    &mut reader.read_message()?,
                )?));
            }
            (4, WIRE_LEN) => {
                let mut value = reader.read_message()?;
                signature = Some(Signature::Value(ValueSignature {
                    tpe: decode_required_type(&mut value, "ValueSignature", "tpe", 1)?,
                }));
            }
            _ => reader.skip("Signature", field, wire_type)?,
        }
    }
    signature.ok_or(DecodeError::MissingField {
        message: "Signature",
        field: "signature",
    })
}

fn decode_class_signature(reader: &mut Reader) -> Result<ClassSignature, DecodeError> {
    let mut class = ClassSignature::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (2, WIRE_LEN) => class.parents.push(decode_type(&mut reader.read_message()?)?),
            (4, WIRE_LEN) => class.declarations = decode_scope(&mut reader.read_message()?)?,
            _ => reader.skip("ClassSignature", field, wire_type)?,
        }
    }
    Ok(class)
}

fn decode_type_signature(reader: &mut Reader) -> Result<TypeSignature, DecodeError> {
    let mut type_parameters = Scope::default();
    let mut lower_bound = None;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => type_parameters = decode_scope(&mut reader.read_message()?)?,
            (2, WIRE_LEN) => lower_bound = Some(decode_type(&mut reader.read_message()?)?),
            _ => reader.skip("TypeSignature", field, wire_type)?,
        }
    }
    Ok(TypeSignature {
        type_parameters,
        lower_bound: lower_bound.ok_or(DecodeError::MissingField {
            message: "TypeSignature",
            field: "lower_bound",
        })?,
    })
}

fn decode_method_signature(reader: &mut Reader) -> Result<MethodSignature, DecodeError> {
    let mut method = MethodSignature {
        parameter_lists: Vec::new(),
        return_type: None,
    };
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (2, WIRE_LEN) => method
                .parameter_lists
                .push(decode_scope(&mut reader.read_message()?)?),
            (3, WIRE_LEN) => method.return_type = Some(decode_type(&mut reader.read_message()?)?),
            _ => reader.skip("MethodSignature", field, wire_type)?,
        }
    }
    Ok(method)
}

fn decode_scope(reader: &mut Reader) -> Result<Scope, DecodeError> {
    let mut scope = Scope::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => scope.symlinks.push(reader.read_string("Scope", 1)?),
            _ => reader.skip("Scope", field, wire_type)?,
        }
    }
    Ok(scope)
}

fn decode_required_type(
    reader: &mut Reader,
    message: &'static str,
    field_name: &'static str,
    field: u32,
) -> Result<Type, DecodeError> {
    let mut tpe = None;
    while !reader.is_empty() {
        let (tag_field, wire_type) = reader.read_tag()?;
        if tag_field == field && wire_type == WIRE_LEN {
            tpe = Some(decode_type(&mut reader.read_message()?)?);
        } else {
            reader.skip(message, tag_field, wire_type)?;
        }
    }
    tpe.ok_or(DecodeError::MissingField {
        message,
        field: field_name,
    })
}

fn decode_type(reader: &mut Reader) -> Result<Type, DecodeError> {
    let mut tpe = None;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (2, WIRE_LEN) => tpe = Some(Type::Ref(decode_type_ref(&mut reader.read_message()?)?)),
            (7, WIRE_LEN) => {
                tpe = Some(Type::Structural(decode_structural_type(
                    &mut reader.read_message()?,
                )?));
            }
            (16, WIRE_LEN) => {
                tpe = Some(Type::Union(UnionType {
                    types: decode_type_list(&mut reader.read_message()?, "UnionType")?,
                }));
            }
            (17, WIRE_LEN) => {
                tpe = Some(Type::Intersection(IntersectionType {
                    types: decode_type_list(&mut reader.read_message()?, "IntersectionType")?,
                }));
            }
            (23, WIRE_LEN) => {
                tpe = Some(Type::Constant(decode_constant_type(
                    &mut reader.read_message()?,
                )?));
            }
            (26, WIRE_LEN) => {
                // The function shape itself carries nothing we can render.
                let mut lambda = reader.read_message()?;
                while !lambda.is_empty() {
                    let (lambda_field, lambda_wire) = lambda.read_tag()?;
                    lambda.skip("LambdaType", lambda_field, lambda_wire)?;
                }
                tpe = Some(Type::Lambda);
            }
            _ => reader.skip("Type", field, wire_type)?,
        }
    }
    tpe.ok_or(DecodeError::MissingField {
        message: "Type",
        field: "sealed_value",
    })
}

fn decode_type_list(reader: &mut Reader, message: &'static str) -> Result<Vec<Type>, DecodeError> {
    let mut types = Vec::new();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => types.push(decode_type(&mut reader.read_message()?)?),
            _ => reader.skip(message, field, wire_type)?,
        }
    }
    Ok(types)
}

fn decode_type_ref(reader: &mut Reader) -> Result<TypeRef, DecodeError> {
    let mut type_ref = TypeRef::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (2, WIRE_LEN) => type_ref.symbol = reader.read_string("TypeRef", 2)?,
            (3, WIRE_LEN) => type_ref
                .type_arguments
                .push(decode_type(&mut reader.read_message()?)?),
            _ => reader.skip("TypeRef", field, wire_type)?,
        }
    }
    Ok(type_ref)
}

fn decode_structural_type(reader: &mut Reader) -> Result<StructuralType, DecodeError> {
    let mut structural = StructuralType::default();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (5, WIRE_LEN) => structural.declarations = decode_scope(&mut reader.read_message()?)?,
            _ => reader.skip("StructuralType", field, wire_type)?,
        }
    }
    Ok(structural)
}

fn decode_constant_type(reader: &mut Reader) -> Result<ConstantType, DecodeError> {
    let mut constant = None;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => constant = Some(decode_constant(&mut reader.read_message()?)?),
            _ => reader.skip("ConstantType", field, wire_type)?,
        }
    }
    Ok(ConstantType {
        constant: constant.ok_or(DecodeError::MissingField {
            message: "ConstantType",
            field: "constant",
        })?,
    })
}

fn decode_constant(reader: &mut Reader) -> Result<Constant, DecodeError> {
    let mut constant = None;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (2, WIRE_LEN) => {
                let mut inner = reader.read_message()?;
                constant = Some(Constant::Boolean(decode_scalar_varint(&mut inner)? != 0));
            }
            (6, WIRE_LEN) | (7, WIRE_LEN) => {
                let mut inner = reader.read_message()?;
                constant = Some(Constant::Int(decode_scalar_varint(&mut inner)? as i64));
            }
            (9, WIRE_LEN) => {
                let mut inner = reader.read_message()?;
                constant = Some(Constant::Double(decode_scalar_double(&mut inner)?));
            }
            (10, WIRE_LEN) => {
                let mut inner = reader.read_message()?;
                constant = Some(Constant::String(decode_scalar_string(&mut inner)?));
            }
            _ => reader.skip("Constant", field, wire_type)?,
        }
    }
    constant.ok_or(DecodeError::MissingField {
        message: "Constant",
        field: "sealed_value",
    })
}

fn decode_scalar_varint(reader: &mut Reader) -> Result<u64, DecodeError> {
    let mut value = 0;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_VARINT) => value = reader.read_varint()?,
            _ => reader.skip("Constant", field, wire_type)?,
        }
    }
    Ok(value)
}

fn decode_scalar_double(reader: &mut Reader) -> Result<f64, DecodeError> {
    let mut value = 0.0;
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_FIXED64) => {
                if reader.buf.remaining() < 8 {
                    return Err(DecodeError::Truncated {
                        offset: reader.offset(),
                        needed: 8 - reader.buf.remaining(),
                    });
                }
                value = reader.buf.get_f64_le();
            }
            _ => reader.skip("Constant", field, wire_type)?,
        }
    }
    Ok(value)
}

fn decode_scalar_string(reader: &mut Reader) -> Result<String, DecodeError> {
    let mut value = String::new();
    while !reader.is_empty() {
        let (field, wire_type) = reader.read_tag()?;
        match (field, wire_type) {
            (1, WIRE_LEN) => value = reader.read_string("StringConstant", 1)?,
            _ => reader.skip("StringConstant", field, wire_type)?,
        }
    }
    Ok(value)
}

// --- encoding ---

fn put_varint(buf: &mut BytesMut, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

fn put_tag(buf: &mut BytesMut, field: u32, wire_type: u8) {
    put_varint(buf, (u64::from(field) << 3) | u64::from(wire_type));
}

fn put_message(buf: &mut BytesMut, field: u32, message: BytesMut) {
    put_tag(buf, field, WIRE_LEN);
    put_varint(buf, message.len() as u64);
    buf.extend_from_slice(&message);
}

fn put_string(buf: &mut BytesMut, field: u32, value: &str) {
    put_tag(buf, field, WIRE_LEN);
    put_varint(buf, value.len() as u64);
    buf.extend_from_slice(value.as_bytes());
}

fn encode_index_msg(index: &Index) -> BytesMut {
    let mut buf = BytesMut::new();
    put_message(&mut buf, 1, encode_metadata(&index.metadata));
    for document in &index.documents {
        put_message(&mut buf, 2, encode_document(document));
    }
    for info in &index.external_symbols {
        put_message(&mut buf, 3, encode_symbol_information(info));
    }
    buf
}

fn encode_metadata(metadata: &Metadata) -> BytesMut {
    let mut buf = BytesMut::new();
    if metadata.version != 0 {
        put_tag(&mut buf, 1, WIRE_VARINT);
        put_varint(&mut buf, metadata.version as u64);
    }
    put_message(&mut buf, 2, encode_tool_info(&metadata.tool_info));
    if !metadata.project_root.is_empty() {
        put_string(&mut buf, 3, &metadata.project_root);
    }
    buf
}

fn encode_tool_info(tool_info: &ToolInfo) -> BytesMut {
    let mut buf = BytesMut::new();
    if !tool_info.name.is_empty() {
        put_string(&mut buf, 1, &tool_info.name);
    }
    if !tool_info.version.is_empty() {
        put_string(&mut buf, 2, &tool_info.version);
    }
    for argument in &tool_info.arguments {
        put_string(&mut buf, 3, argument);
    }
    buf
}

fn encode_document(document: &Document) -> BytesMut {
    let mut buf = BytesMut::new();
    if !document.relative_path.is_empty() {
        put_string(&mut buf, 1, &document.relative_path);
    }
    for occurrence in &document.occurrences {
        put_message(&mut buf, 2, encode_occurrence(occurrence));
    }
    for info in &document.symbols {
        put_message(&mut buf, 3, encode_symbol_information(info));
    }
    if !document.language.is_empty() {
        put_string(&mut buf, 4, &document.language);
    }
    buf
}

fn encode_occurrence(occurrence: &Occurrence) -> BytesMut {
    let mut buf = BytesMut::new();
    if !occurrence.range.is_empty() {
        let mut packed = BytesMut::new();
        for value in &occurrence.range {
            put_varint(&mut packed, *value as u64);
        }
        put_message(&mut buf, 1, packed);
    }
    if !occurrence.symbol.is_empty() {
        put_string(&mut buf, 2, &occurrence.symbol);
    }
    if occurrence.symbol_roles != 0 {
        put_tag(&mut buf, 3, WIRE_VARINT);
        put_varint(&mut buf, occurrence.symbol_roles as u64);
    }
    buf
}

fn encode_symbol_information(info: &SymbolInformation) -> BytesMut {
    let mut buf = BytesMut::new();
    if !info.symbol.is_empty() {
        put_string(&mut buf, 1, &info.symbol);
    }
    if info.kind != Kind::Unspecified {
        put_tag(&mut buf, 5, WIRE_VARINT);
        put_varint(&mut buf, info.kind.to_wire() as u64);
    }
    if !info.display_name.is_empty() {
        put_string(&mut buf, 6, &info.display_name);
    }
    if let Some(signature) = &info.signature {
        put_message(&mut buf, 9, encode_signature(signature));
    }
    buf
}

fn encode_signature(signature: &Signature) -> BytesMut {
    let mut buf = BytesMut::new();
    match signature {
        Signature::Class(class) => put_message(&mut buf, 1, encode_class_signature(class)),
        Signature::Method(method) => put_message(&mut buf, 2, encode_method_signature(method)),
        Signature::Type(type_signature) => {
            put_message(&mut buf, 3, encode_type_signature(type_signature));
        }
        Signature::Value(value) => {
            let mut inner = BytesMut::new();
            put_message(&mut inner, 1, encode_type(&value.tpe));
            put_message(&mut buf, 4, inner);
        }
    }
    buf
}

fn encode_class_signature(class: &ClassSignature) -> BytesMut {
    let mut buf = BytesMut::new();
    for parent in &class.parents {
        put_message(&mut buf, 2, encode_type(parent));
    }
    put_message(&mut buf, 4, encode_scope(&class.declarations));
    buf
}

fn encode_type_signature(type_signature: &TypeSignature) -> BytesMut {
    let mut buf = BytesMut::new();
    if !type_signature.type_parameters.symlinks.is_empty() {
        put_message(&mut buf, 1, encode_scope(&type_signature.type_parameters));
    }
    put_message(&mut buf, 2, encode_type(&type_signature.lower_bound));
    buf
}

fn encode_method_signature(method: &MethodSignature) -> BytesMut {
    let mut buf = BytesMut::new();
    for parameters in &method.parameter_lists {
        put_message(&mut buf, 2, encode_scope(parameters));
    }
    if let Some(return_type) = &method.return_type {
        put_message(&mut buf, 3, encode_type(return_type));
    }
    buf
}

fn encode_scope(scope: &Scope) -> BytesMut {
    let mut buf = BytesMut::new();
    for symlink in &scope.symlinks {
        put_string(&mut buf, 1, symlink);
    }
    buf
}

fn encode_type(tpe: &Type) -> BytesMut {
    let mut buf = BytesMut::new();
    match tpe {
        Type::Ref(type_ref) => {
            let mut inner = BytesMut::new();
            if !type_ref.symbol.is_empty() {
                put_string(&mut inner, 2, &type_ref.symbol);
            }
            for argument in &type_ref.type_arguments {
                put_message(&mut inner, 3, encode_type(argument));
            }
            put_message(&mut buf, 2, inner);
        }
        Type::Structural(structural) => {
            let mut inner = BytesMut::new();
            put_message(&mut inner, 5, encode_scope(&structural.declarations));
            put_message(&mut buf, 7, inner);
        }
        Type::Union(union) => put_message(&mut buf, 16, encode_type_list(&union.types)),
        Type::Intersection(intersection) => {
            put_message(&mut buf, 17, encode_type_list(&intersection.types));
        }
        Type::Constant(constant_type) => {
            let mut inner = BytesMut::new();
            put_message(&mut inner, 1, encode_constant(&constant_type.constant));
            put_message(&mut buf, 23, inner);
        }
        Type::Lambda => put_message(&mut buf, 26, BytesMut::new()),
    }
    buf
}

fn encode_type_list(types: &[Type]) -> BytesMut {
    let mut buf = BytesMut::new();
    for tpe in types {
        put_message(&mut buf, 1, encode_type(tpe));
    }
    buf
}

fn encode_constant(constant: &Constant) -> BytesMut {
    let mut buf = BytesMut::new();
    match constant {
        Constant::Boolean(value) => {
            let mut inner = BytesMut::new();
            put_tag(&mut inner, 1, WIRE_VARINT);
            put_varint(&mut inner, u64::from(*value));
            put_message(&mut buf, 2, inner);
        }
        Constant::Int(value) => {
            let mut inner = BytesMut::new();
            put_tag(&mut inner, 1, WIRE_VARINT);
            put_varint(&mut inner, *value as u64);
            put_message(&mut buf, 7, inner);
        }
        Constant::Double(value) => {
            let mut inner = BytesMut::new();
            put_tag(&mut inner, 1, WIRE_FIXED64);
            inner.put_f64_le(*value);
            put_message(&mut buf, 9, inner);
        }
        Constant::String(value) => {
            let mut inner = BytesMut::new();
            put_string(&mut inner, 1, value);
            put_message(&mut buf, 10, inner);
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Signature;

    fn sample_index() -> Index {
        Index {
            metadata: Metadata {
                version: 1,
                tool_info: ToolInfo {
                    name: "scip-typescript".to_string(),
                    version: "0.3.14".to_string(),
                    arguments: vec!["index".to_string()],
                },
                project_root: "file:///work/protocol".to_string(),
            },
            documents: vec![Document {
                relative_path: "src/protocol.ts".to_string(),
                language: "typescript".to_string(),
                occurrences: vec![Occurrence {
                    range: vec![4, 10, 18],
                    symbol: "scip-typescript npm pkg 1.0.0 src/`protocol.ts`/Shape#".to_string(),
                    symbol_roles: 1,
                }],
                symbols: vec![SymbolInformation {
                    symbol: "scip-typescript npm pkg 1.0.0 src/`protocol.ts`/Shape#".to_string(),
                    display_name: "Shape".to_string(),
                    kind: Kind::TypeAlias,
                    signature: Some(Signature::Type(TypeSignature {
                        type_parameters: Scope::default(),
                        lower_bound: Type::union(vec![
                            Type::string_constant("circle"),
                            Type::string_constant("square"),
                        ]),
                    })),
                }],
            }],
            external_symbols: vec![SymbolInformation {
                symbol: "scip-typescript npm typescript . string#".to_string(),
                display_name: "string".to_string(),
                kind: Kind::Unspecified,
                signature: None,
            }],
        }
    }

    #[test]
    fn test_round_trip() {
        let index = sample_index();
        let bytes = encode_index(&index);
        let decoded = decode_index(&bytes).expect("decode");
        assert_eq!(decoded, index);
    }

    #[test]
    fn test_round_trip_all_type_shapes() {
        let tpe = Type::Union(UnionType {
            types: vec![
                Type::Ref(TypeRef {
                    symbol: "a#".to_string(),
                    type_arguments: vec![Type::reference("b#")],
                }),
                Type::Intersection(IntersectionType {
                    types: vec![Type::reference("c#"), Type::reference("d#")],
                }),
                Type::Structural(StructuralType {
                    declarations: Scope {
                        symlinks: vec!["e.".to_string()],
                    },
                }),
                Type::Constant(ConstantType {
                    constant: Constant::Int(42),
                }),
                Type::Constant(ConstantType {
                    constant: Constant::Boolean(true),
                }),
                Type::Constant(ConstantType {
                    constant: Constant::Double(1.5),
                }),
                Type::Lambda,
            ],
        });
        let index = Index {
            documents: vec![Document {
                symbols: vec![SymbolInformation::for_value("v.", "v", tpe)],
                ..Document::default()
            }],
            ..Index::default()
        };
        let decoded = decode_index(&encode_index(&index)).expect("decode");
        assert_eq!(decoded, index);
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let mut buf = BytesMut::new();
        // Unknown varint field 15, then a valid document.
        put_tag(&mut buf, 15, WIRE_VARINT);
        put_varint(&mut buf, 7);
        let document = Document {
            relative_path: "a.ts".to_string(),
            ..Document::default()
        };
        put_message(&mut buf, 2, encode_document(&document));
        let decoded = decode_index(&buf).expect("decode");
        assert_eq!(decoded.documents.len(), 1);
        assert_eq!(decoded.documents[0].relative_path, "a.ts");
    }

    #[test]
    fn test_truncated_input_fails() {
        let bytes = encode_index(&sample_index());
        let err = decode_index(&bytes[..bytes.len() - 3]).expect_err("truncated");
        assert!(matches!(
            err,
            DecodeError::Truncated { .. } | DecodeError::VarintOverflow { .. }
        ));
    }

    #[test]
    fn test_varint_boundaries() {
        let mut buf = BytesMut::new();
        for value in [0u64, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX] {
            put_varint(&mut buf, value);
        }
        let mut reader = Reader::new(buf.freeze());
        for expected in [0u64, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX] {
            assert_eq!(reader.read_varint().expect("varint"), expected);
        }
        assert!(reader.is_empty());
    }
}
