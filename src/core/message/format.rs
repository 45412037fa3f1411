/*!
Binary encoding of the session records.

Every record has the following format:
- Version (1 byte): wire format version, currently 0x01
- Kind (1 byte): record kind (see [`MessageKind`])
- Fields, in declaration order:
  - byte strings as a 4-byte big-endian length followed by the bytes
  - optional fields as a presence byte (0x00/0x01) followed by the field
  - message numbers as 8-byte big-endian integers

Trailing bytes after the last field are rejected.
*/

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::core::constants::VERSION;
use crate::core::error::{Error, Result, format_err};
use crate::core::message::types::{
    EncryptedEnvelope, HandshakeMessage, MessageKind, RatchetHandshake, RatchetMessage, RekeyToken,
};

/// Upper bound on a single encoded field (16 MiB)
pub const MAX_FIELD_LEN: usize = 16 * 1024 * 1024;

/// Records with a binary encoding
pub trait WireFormat: Sized {
    /// Kind byte written after the version
    const KIND: MessageKind;

    /// Write the record fields
    fn write_fields(&self, writer: &mut FieldWriter) -> Result<()>;

    /// Read the record fields
    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self>;

    /// Encode the record
    ///
    /// Fails with `InvalidFormat` when a field exceeds [`MAX_FIELD_LEN`], the
    /// same bound the decoder enforces.
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = FieldWriter::new(Self::KIND);
        self.write_fields(&mut writer)?;
        Ok(writer.finish())
    }

    /// Decode a record, checking version and kind
    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = FieldReader::new(bytes, Self::KIND)?;
        let record = Self::read_fields(&mut reader)?;
        reader.finish()?;
        Ok(record)
    }
}

/// Field encoder
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    fn new(kind: MessageKind) -> Self {
        let mut buf = Vec::with_capacity(256);
        buf.push(VERSION);
        buf.push(kind.as_u8());
        Self { buf }
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let len = match u32::try_from(bytes.len()) {
            Ok(len) if bytes.len() <= MAX_FIELD_LEN => len,
            _ => return format_err(format!("field of {} bytes exceeds limit", bytes.len())),
        };
        // Writing into a Vec cannot fail
        let _ = self.buf.write_u32::<BigEndian>(len);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    pub fn put_optional_bytes(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        match bytes {
            Some(bytes) => {
                self.buf.push(0x01);
                self.put_bytes(bytes)
            }
            None => {
                self.buf.push(0x00);
                Ok(())
            }
        }
    }

    pub fn put_u64(&mut self, value: u64) {
        let _ = self.buf.write_u64::<BigEndian>(value);
    }

    pub fn put_optional_u64(&mut self, value: Option<u64>) {
        match value {
            Some(value) => {
                self.buf.push(0x01);
                self.put_u64(value);
            }
            None => self.buf.push(0x00),
        }
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Field decoder
pub struct FieldReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> FieldReader<'a> {
    fn new(bytes: &'a [u8], expected: MessageKind) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let version = cursor.read_u8().map_err(|_| truncated("version"))?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let kind = cursor.read_u8().map_err(|_| truncated("kind"))?;
        match MessageKind::from_u8(kind) {
            Some(kind) if kind == expected => Ok(Self { cursor }),
            Some(kind) => format_err(format!("expected {} record, found {}", expected, kind)),
            None => format_err(format!("unknown record kind 0x{:02x}", kind)),
        }
    }

    fn remaining(&self) -> usize {
        let total = self.cursor.get_ref().len() as u64;
        total.saturating_sub(self.cursor.position()) as usize
    }

    pub fn bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.cursor.read_u32::<BigEndian>().map_err(|_| truncated("length"))? as usize;
        if len > MAX_FIELD_LEN {
            return format_err(format!("field of {} bytes exceeds limit", len));
        }
        if len > self.remaining() {
            return Err(truncated("field"));
        }

        let mut out = vec![0u8; len];
        self.cursor.read_exact(&mut out).map_err(|_| truncated("field"))?;
        Ok(out)
    }

    pub fn optional_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        match self.presence()? {
            true => self.bytes().map(Some),
            false => Ok(None),
        }
    }

    pub fn u64(&mut self) -> Result<u64> {
        self.cursor.read_u64::<BigEndian>().map_err(|_| truncated("integer"))
    }

    pub fn optional_u64(&mut self) -> Result<Option<u64>> {
        match self.presence()? {
            true => self.u64().map(Some),
            false => Ok(None),
        }
    }

    fn presence(&mut self) -> Result<bool> {
        match self.cursor.read_u8().map_err(|_| truncated("presence flag"))? {
            0x00 => Ok(false),
            0x01 => Ok(true),
            other => format_err(format!("invalid presence flag 0x{:02x}", other)),
        }
    }

    fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            extra => format_err(format!("{} trailing bytes", extra)),
        }
    }
}

fn truncated(what: &str) -> Error {
    Error::InvalidFormat(format!("record truncated while reading {}", what))
}

impl WireFormat for HandshakeMessage {
    const KIND: MessageKind = MessageKind::Handshake;

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<()> {
        writer.put_bytes(&self.ciphertext)?;
        writer.put_optional_bytes(self.signature.as_deref())?;
        writer.put_optional_bytes(self.signer_public_key.as_deref())
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            ciphertext: reader.bytes()?,
            signature: reader.optional_bytes()?,
            signer_public_key: reader.optional_bytes()?,
        })
    }
}

impl WireFormat for EncryptedEnvelope {
    const KIND: MessageKind = MessageKind::Envelope;

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<()> {
        writer.put_bytes(&self.ciphertext)?;
        writer.put_bytes(&self.nonce)?;
        writer.put_optional_bytes(self.signature.as_deref())?;
        writer.put_optional_u64(self.msg_num);
        writer.put_optional_bytes(self.signer_public_key.as_deref())
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            ciphertext: reader.bytes()?,
            nonce: reader.bytes()?,
            signature: reader.optional_bytes()?,
            msg_num: reader.optional_u64()?,
            signer_public_key: reader.optional_bytes()?,
        })
    }
}

impl WireFormat for RatchetHandshake {
    const KIND: MessageKind = MessageKind::RatchetHandshake;

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<()> {
        writer.put_bytes(&self.kem_ciphertext)?;
        writer.put_bytes(&self.kem_signature)?;
        writer.put_bytes(&self.sign_public_key)
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            kem_ciphertext: reader.bytes()?,
            kem_signature: reader.bytes()?,
            sign_public_key: reader.bytes()?,
        })
    }
}

impl WireFormat for RatchetMessage {
    const KIND: MessageKind = MessageKind::RatchetMessage;

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<()> {
        writer.put_bytes(&self.ciphertext)?;
        writer.put_bytes(&self.nonce)?;
        writer.put_bytes(&self.signature)?;
        writer.put_u64(self.msg_num);
        writer.put_bytes(&self.sign_public_key)
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            ciphertext: reader.bytes()?,
            nonce: reader.bytes()?,
            signature: reader.bytes()?,
            msg_num: reader.u64()?,
            sign_public_key: reader.bytes()?,
        })
    }
}

impl WireFormat for RekeyToken {
    const KIND: MessageKind = MessageKind::Rekey;

    fn write_fields(&self, writer: &mut FieldWriter) -> Result<()> {
        writer.put_bytes(&self.salt)
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self { salt: reader.bytes()? })
    }
}
