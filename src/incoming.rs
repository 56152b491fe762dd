//! The decoded message and the wire-format decoder behind it.
//!
//! [DnsIncoming] is the logic representation of an incoming DNS message.
//! [MsgDecoder] is the per-message decode state: the cursor over the raw
//! bytes, the name compression registry and the section counts from the
//! header. It lives for exactly one call to [DnsIncoming::decode].

#[cfg(feature = "logging")]
use crate::log::debug;
use crate::cursor::Cursor;
use crate::name::{DnsName, NameRegistry, MAX_LABEL_LEN, MAX_NAME_WIRE_LEN};
use crate::rdata::{rdata_schema, DnsRdata, FieldKind, FieldValue, RdataSchema};
use crate::{Error, Result};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str;

// Definitions for the DNS message header "flags" field
//
// The "flags" field is 16-bit long, in this format:
// (RFC 1035 section 4.1.1)
//
//   0  1  2  3  4  5  6  7  8  9  0  1  2  3  4  5
// |QR|   Opcode  |AA|TC|RD|RA|   Z    |   RCODE   |
//
// The Z bits are reserved and ignored on read.
const FLAGS_QR_MASK: u16 = 0x8000; // mask for query/response bit
const FLAGS_OPCODE_MASK: u16 = 0x7800;
const FLAGS_AA: u16 = 0x0400; // mask for Authoritative answer bit
const FLAGS_TC: u16 = 0x0200;
const FLAGS_RD: u16 = 0x0100;
const FLAGS_RA: u16 = 0x0080;
const FLAGS_RCODE_MASK: u16 = 0x000F;

// Label length octets use their top two bits as a tag: `00` for a literal
// label, `11` for a compression pointer. `01` and `10` are reserved.
const LABEL_TAG_MASK: u8 = 0xC0;
const LABEL_TAG_POINTER: u8 = 0xC0;

/// A DNS question entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnsQuestion {
    pub name: DnsName,
    pub ty: u16,
    pub class: u16,
}

/// A DNS Resource Record - like a question, but has a TTL and a payload.
/// RFC: https://www.rfc-editor.org/rfc/rfc1035#section-3.2.1
///      https://www.rfc-editor.org/rfc/rfc1035#section-4.1.3
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: DnsName,
    pub ty: u16,
    pub class: u16,
    /// In seconds. 0 means the record must not be cached.
    pub ttl: u32,
    pub rdata: DnsRdata,
}

/// The logic representation of one incoming DNS message.
///
/// Produced by [DnsIncoming::decode]; owns all of its data, so the input
/// buffer can be dropped as soon as the decode returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DnsIncoming {
    pub id: u16,
    /// The QR bit: false for a query, true for a response.
    pub is_response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub rcode: u8,
    pub questions: Vec<DnsQuestion>,
    pub answers: Vec<DnsRecord>,
    pub authorities: Vec<DnsRecord>,
    pub additionals: Vec<DnsRecord>,
}

impl DnsIncoming {
    /// Decodes one DNS message from `data`.
    ///
    /// The buffer must hold exactly one message: a decode that leaves
    /// bytes unread fails with [`Error::TrailingGarbage`], and any read
    /// past the end fails with [`Error::Incomplete`]. The first error
    /// encountered wins and no partial message is returned.
    pub fn decode(data: &[u8]) -> Result<Self> {
        MsgDecoder::new(data).decode()
    }

    pub fn is_query(&self) -> bool {
        !self.is_response
    }
}

/// Decode state for one message: cursor, name registry and the expected
/// record counts from the header.
struct MsgDecoder<'a> {
    cursor: Cursor<'a>,
    names: NameRegistry,
    num_questions: u16,
    num_answers: u16,
    num_authorities: u16,
    num_additionals: u16,
}

impl<'a> MsgDecoder<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
            names: NameRegistry::new(),
            num_questions: 0,
            num_answers: 0,
            num_authorities: 0,
            num_additionals: 0,
        }
    }

    fn decode(mut self) -> Result<DnsIncoming> {
        let mut msg = self.read_header()?;
        self.read_questions(&mut msg)?;

        // The three record sections, in their only permitted order.
        self.read_records(self.num_answers, &mut msg.answers)?;
        self.read_records(self.num_authorities, &mut msg.authorities)?;
        self.read_records(self.num_additionals, &mut msg.additionals)?;

        let remaining = self.cursor.remaining();
        if remaining != 0 {
            return Err(Error::TrailingGarbage { remaining });
        }

        Ok(msg)
    }

    /// Reads the fixed 12-byte header: id, flags and the four section
    /// counts. The counts stay on the decoder; the flag bits land on the
    /// message as plain booleans.
    fn read_header(&mut self) -> Result<DnsIncoming> {
        let id = self.read_u16()?;
        let flags = self.read_u16()?;
        self.num_questions = self.read_u16()?;
        self.num_answers = self.read_u16()?;
        self.num_authorities = self.read_u16()?;
        self.num_additionals = self.read_u16()?;

        debug!(
            "read_header: id {}, {} questions {} answers {} authorities {} additionals",
            id, self.num_questions, self.num_answers, self.num_authorities, self.num_additionals
        );

        Ok(DnsIncoming {
            id,
            is_response: (flags & FLAGS_QR_MASK) != 0,
            opcode: ((flags & FLAGS_OPCODE_MASK) >> 11) as u8,
            authoritative: (flags & FLAGS_AA) != 0,
            truncated: (flags & FLAGS_TC) != 0,
            recursion_desired: (flags & FLAGS_RD) != 0,
            recursion_available: (flags & FLAGS_RA) != 0,
            rcode: (flags & FLAGS_RCODE_MASK) as u8,
            questions: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        })
    }

    fn read_questions(&mut self, msg: &mut DnsIncoming) -> Result<()> {
        debug!("read_questions: {}", self.num_questions);
        for _ in 0..self.num_questions {
            let name = self.read_name()?;
            let ty = self.read_u16()?;
            let class = self.read_u16()?;

            msg.questions.push(DnsQuestion { name, ty, class });
        }
        Ok(())
    }

    /// Decodes `count` resource records into `dest`.
    ///
    /// RFC 1035: https://datatracker.ietf.org/doc/html/rfc1035#section-3.2.1
    ///
    /// All RRs have the same top level format:
    ///
    /// ```text
    /// NAME / TYPE (16) / CLASS (16) / TTL (32) / RDLENGTH (16) / RDATA
    /// ```
    fn read_records(&mut self, count: u16, dest: &mut Vec<DnsRecord>) -> Result<()> {
        debug!("read_records: {}", count);
        for _ in 0..count {
            let record = self.read_record()?;
            debug!("{:?}", &record);
            dest.push(record);
        }
        Ok(())
    }

    fn read_record(&mut self) -> Result<DnsRecord> {
        let name = self.read_name()?;
        let ty = self.read_u16()?;
        let class = self.read_u16()?;
        let ttl = self.read_u32()?;
        let rdlength = self.read_u16()? as usize;

        let rdata = self.read_rdata(ty, rdlength)?;

        Ok(DnsRecord {
            name,
            ty,
            class,
            ttl,
            rdata,
        })
    }

    /// Decodes one record's payload as its type's schema dictates, then
    /// verifies the payload consumed exactly `rdlength` bytes.
    fn read_rdata(&mut self, ty: u16, rdlength: usize) -> Result<DnsRdata> {
        let start = self.cursor.position();

        let rdata = match rdata_schema(ty) {
            RdataSchema::Single(kind) => DnsRdata::Single(self.read_field(kind, rdlength)?),
            RdataSchema::Composite(kinds) => {
                let mut fields = Vec::with_capacity(kinds.len());
                for kind in kinds {
                    // Only a length-bounded field consults this; the rest
                    // delimit themselves.
                    let remaining = rdlength.saturating_sub(self.cursor.position() - start);
                    fields.push(self.read_field(*kind, remaining)?);
                }
                DnsRdata::Composite(fields)
            }
            RdataSchema::Opaque => {
                debug!("unknown record type {}, keeping rdata opaque", ty);
                DnsRdata::Opaque(self.cursor.read(rdlength)?.to_vec())
            }
        };

        // sanity check.
        let consumed = self.cursor.position() - start;
        if consumed != rdlength {
            return Err(Error::RdataLengthMismatch {
                ty,
                declared: rdlength,
                consumed,
            });
        }

        Ok(rdata)
    }

    /// Decodes one primitive field. `len_bound` is the record's remaining
    /// data length and only [`FieldKind::BitMap`] reads it; every other
    /// field has a fixed width or carries its own length.
    fn read_field(&mut self, kind: FieldKind, len_bound: usize) -> Result<FieldValue> {
        let value = match kind {
            FieldKind::Byte => FieldValue::Byte(self.cursor.read(1)?[0]),
            FieldKind::Short => FieldValue::Short(self.read_u16()?),
            FieldKind::Long => FieldValue::Long(self.read_u32()?),
            FieldKind::Ipv4Addr => FieldValue::Ipv4Addr(self.read_ipv4()?),
            FieldKind::Ipv6Addr => FieldValue::Ipv6Addr(self.read_ipv6()?),
            FieldKind::CharString => FieldValue::CharString(self.read_char_string()?),
            FieldKind::DomainName => FieldValue::DomainName(self.read_name()?),
            FieldKind::BitMap => FieldValue::BitMap(self.cursor.read(len_bound)?.to_vec()),
        };
        Ok(value)
    }

    /// Reads a domain name at the cursor's current position.
    ///
    /// See https://datatracker.ietf.org/doc/html/rfc1035#section-3.1 for
    /// the label encoding and section 4.1.4 for message compression. The
    /// labels accumulate leaf first. A literal label is remembered in the
    /// name registry together with everything after it, so later pointers
    /// can reference it; a pointer ends the name with a suffix looked up
    /// in that registry.
    fn read_name(&mut self) -> Result<DnsName> {
        let mut labels: Vec<String> = Vec::new();
        let mut label_offsets: Vec<usize> = Vec::new();
        let mut wire_len = 1; // the terminating root label

        loop {
            let offset = self.cursor.position();
            let length = self.cursor.read(1)?[0];

            // "...a domain name is terminated by a length byte of zero."
            if length == 0 {
                break;
            }

            match length & LABEL_TAG_MASK {
                0x00 => {
                    let len = length as usize;
                    if len > MAX_LABEL_LEN {
                        // the tag match already excludes this
                        return Err(Error::LabelTooLong { len });
                    }
                    wire_len += 1 + len;
                    if wire_len > MAX_NAME_WIRE_LEN {
                        return Err(Error::NameTooLong { len: wire_len });
                    }

                    let text = self.cursor.read(len)?;
                    let label = str::from_utf8(text)
                        .map_err(|_| Error::InvalidLabel { offset })?
                        .to_string();
                    label_offsets.push(offset);
                    labels.push(label);
                }
                LABEL_TAG_POINTER => {
                    // Message compression: the low 6 bits and the next
                    // octet form a 14-bit offset from the message start.
                    let target = (usize::from(length & 0x3F) << 8)
                        | usize::from(self.cursor.read(1)?[0]);

                    // A pointer must land inside the message, on a label
                    // decoded before this one. The registry only holds
                    // completed literal labels, so a forward pointer, a
                    // pointer to another pointer and a pointer into the
                    // name still being decoded all miss.
                    if self.cursor.peek_at(target).is_none() {
                        return Err(Error::UnresolvedPointer { offset, target });
                    }
                    let suffix = self
                        .names
                        .resolve(target)
                        .ok_or(Error::UnresolvedPointer { offset, target })?;

                    for label in suffix {
                        wire_len += 1 + label.len();
                    }
                    if wire_len > MAX_NAME_WIRE_LEN {
                        return Err(Error::NameTooLong { len: wire_len });
                    }

                    labels.extend(suffix.iter().cloned());
                    break; // a pointer is always the last element of a name
                }
                _ => {
                    return Err(Error::InvalidLabelType {
                        offset,
                        octet: length,
                    });
                }
            }
        }

        // Each literal label starts a suffix that later pointers may
        // reference. Pointer-sourced labels were registered when first
        // decoded and add nothing here.
        for (i, offset) in label_offsets.iter().enumerate() {
            self.names.insert(*offset, labels[i..].to_vec());
        }

        Ok(DnsName::from_labels(labels))
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(u16_from_be_slice(self.cursor.read(2)?))
    }

    fn read_u32(&mut self) -> Result<u32> {
        Ok(u32_from_be_slice(self.cursor.read(4)?))
    }

    fn read_ipv4(&mut self) -> Result<Ipv4Addr> {
        let bytes: [u8; 4] = self.cursor.read(4)?.try_into().unwrap();
        Ok(Ipv4Addr::from(bytes))
    }

    fn read_ipv6(&mut self) -> Result<Ipv6Addr> {
        let bytes: [u8; 16] = self.cursor.read(16)?.try_into().unwrap();
        Ok(Ipv6Addr::from(bytes))
    }

    fn read_char_string(&mut self) -> Result<Vec<u8>> {
        let length = self.cursor.read(1)?[0] as usize;
        Ok(self.cursor.read(length)?.to_vec())
    }
}

fn u16_from_be_slice(bytes: &[u8]) -> u16 {
    let u8_array: [u8; 2] = [bytes[0], bytes[1]];
    u16::from_be_bytes(u8_array)
}

fn u32_from_be_slice(s: &[u8]) -> u32 {
    let u8_array: [u8; 4] = [s[0], s[1], s[2], s[3]];
    u32::from_be_bytes(u8_array)
}
