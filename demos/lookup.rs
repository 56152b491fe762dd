//! A one-shot DNS lookup client.
//!
//! Run with:
//!
//!     cargo run --example lookup <hostname>
//!
//! Example:
//!
//!     cargo run --example lookup example.com
//!
//! Sends an A query for the hostname to a public resolver over UDP and
//! prints the decoded response. The query bytes are written by hand here
//! because encoding is not part of the library.

use dns_wire::{DnsIncoming, DnsRdata, FieldValue, CLASS_IN, TYPE_A};
use std::net::UdpSocket;

const RESOLVER: &str = "8.8.8.8:53";

fn main() {
    let hostname = std::env::args()
        .nth(1)
        .expect("it requires a hostname as argument");

    let mut query = Vec::new();
    query.extend(0x1234u16.to_be_bytes()); // id
    query.extend(0x0100u16.to_be_bytes()); // flags: recursion desired
    query.extend(1u16.to_be_bytes()); // one question
    query.extend([0u8; 6]); // no records
    for label in hostname.trim_end_matches('.').split('.') {
        query.push(label.len() as u8);
        query.extend(label.as_bytes());
    }
    query.push(0);
    query.extend(TYPE_A.to_be_bytes());
    query.extend(CLASS_IN.to_be_bytes());

    let socket = UdpSocket::bind("0.0.0.0:0").expect("Failed to bind a socket");
    socket
        .send_to(&query, RESOLVER)
        .expect("Failed to send the query");

    let mut buf = [0u8; 1500];
    let (len, _) = socket.recv_from(&mut buf).expect("Failed to receive a reply");

    let msg = DnsIncoming::decode(&buf[..len]).expect("Failed to decode the reply");
    println!(
        "id 0x{:04x} rcode {} with {} answer(s):",
        msg.id,
        msg.rcode,
        msg.answers.len()
    );

    for answer in msg.answers.iter() {
        match &answer.rdata {
            DnsRdata::Single(FieldValue::Ipv4Addr(addr)) => {
                println!("{} {}s {}", answer.name, answer.ttl, addr);
            }
            other => {
                println!("{} {}s {:?}", answer.name, answer.ttl, other);
            }
        }
    }
}
