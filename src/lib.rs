//! A small and safe decoder for DNS wire-format messages.
//!
//! This library consumes a byte buffer holding one DNS message, as carried
//! over UDP or TCP, and produces a structured [`DnsIncoming`]: the header
//! fields and the four record sections (questions, answers, authorities,
//! additionals). It handles name compression, dispatches each resource
//! record's payload on its type code, and rejects malformed input with a
//! typed [`Error`]. Decoding is a single pass; the decoder neither blocks
//! nor retains references into the input buffer.
//!
//! Encoding, resolution logic and caching are out of scope: this is the
//! parsing half of a resolver or responder, meant to sit behind whatever
//! transport the caller runs.
//!
//! # Usage
//!
//! ```rust
//! use dns_wire::{DnsIncoming, CLASS_IN, TYPE_A};
//!
//! // A minimal query for the A record of example.com.
//! let packet = [
//!     0x12, 0x34, // id
//!     0x01, 0x00, // flags: recursion desired
//!     0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // one question
//!     7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0,
//!     0x00, 0x01, // type A
//!     0x00, 0x01, // class IN
//! ];
//!
//! let msg = DnsIncoming::decode(&packet).expect("valid DNS message");
//! assert!(msg.is_query());
//! assert!(msg.recursion_desired);
//! assert_eq!(msg.questions.len(), 1);
//! assert_eq!(msg.questions[0].name.to_string(), "example.com.");
//! assert_eq!(msg.questions[0].ty, TYPE_A);
//! assert_eq!(msg.questions[0].class, CLASS_IN);
//! ```
//!
//! # Limitations
//!
//! This implementation is based on [RFC 1035](https://tools.ietf.org/html/rfc1035).
//! Record types outside the base set (plus SRV and NSEC) are kept with
//! their payload bytes uninterpreted; EDNS(0) options and DNSSEC
//! validation are not implemented.

#![forbid(unsafe_code)]
#![allow(clippy::single_component_path_imports)]

// log for logging (optional).
#[cfg(feature = "logging")]
use log;

#[cfg(not(feature = "logging"))]
#[macro_use]
mod log {
    macro_rules! trace    ( ($($tt:tt)*) => {{}} );
    macro_rules! debug    ( ($($tt:tt)*) => {{}} );
    macro_rules! info     ( ($($tt:tt)*) => {{}} );
    macro_rules! warn     ( ($($tt:tt)*) => {{}} );
    macro_rules! error    ( ($($tt:tt)*) => {{}} );
}

mod cursor;
mod error;
mod incoming;
mod name;
mod rdata;

pub use error::{Error, Result};
pub use incoming::{DnsIncoming, DnsQuestion, DnsRecord};
pub use name::DnsName;
pub use rdata::{
    rdata_schema, DnsRdata, FieldKind, FieldValue, RdataSchema, CLASS_IN, TYPE_A, TYPE_AAAA,
    TYPE_ANY, TYPE_CNAME, TYPE_HINFO, TYPE_MX, TYPE_NS, TYPE_NSEC, TYPE_PTR, TYPE_SOA, TYPE_SRV,
    TYPE_TXT,
};
