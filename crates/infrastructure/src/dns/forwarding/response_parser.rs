use super::record_type_map::RecordTypeMapper;
use ferrous_resolv_application::ports::{DnsResponse, ResponseRecord};
use ferrous_resolv_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use std::fmt::Write;
use tracing::debug;

const HEADER_LEN: usize = 12;

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        if response_bytes.len() < HEADER_LEN {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response too short: {} bytes",
                response_bytes.len()
            )));
        }

        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = u16::from(message.response_code());
        let truncated = message.truncated();

        let answers: Vec<ResponseRecord> = message
            .answers()
            .iter()
            .filter_map(Self::to_response_record)
            .collect();

        debug!(
            id = message.id(),
            rcode = rcode,
            answers = answers.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        let mut response = DnsResponse {
            id: message.id(),
            rcode,
            truncated,
            answers,
            text: String::new(),
        };
        response.text = Self::render(&message, &response, response_bytes);
        Ok(response)
    }

    fn to_response_record(record: &Record) -> Option<ResponseRecord> {
        let record_type = RecordTypeMapper::from_hickory(record.record_type())?;
        Some(ResponseRecord {
            name: record.name().to_string(),
            ttl: record.ttl(),
            class: record.dns_class().to_string(),
            record_type,
            rdata: record.data().to_string(),
        })
    }

    /// Renders the message in the familiar dig layout.
    fn render(message: &Message, response: &DnsResponse, wire: &[u8]) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            ";; ->>HEADER<<- opcode: QUERY, status: {}, id: {}",
            response.rcode_name(),
            response.id
        );
        let _ = writeln!(
            out,
            ";; flags:{}; QUERY: {}, ANSWER: {}, AUTHORITY: {}, ADDITIONAL: {}",
            Self::flags(wire[2], wire[3]),
            message.queries().len(),
            message.answers().len(),
            message.name_servers().len(),
            message.additionals().len()
        );

        out.push_str("\n;; QUESTION SECTION:\n");
        for query in message.queries() {
            let _ = writeln!(
                out,
                ";{}\t{}\t{}",
                query.name(),
                query.query_class(),
                query.query_type()
            );
        }

        for (title, records) in [
            ("ANSWER", message.answers()),
            ("AUTHORITY", message.name_servers()),
            ("ADDITIONAL", message.additionals()),
        ] {
            if records.is_empty() {
                continue;
            }
            let _ = write!(out, "\n;; {} SECTION:\n", title);
            for record in records {
                let _ = writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    record.name(),
                    record.ttl(),
                    record.dns_class(),
                    record.record_type(),
                    record.data()
                );
            }
        }
        out
    }

    fn flags(b2: u8, b3: u8) -> String {
        [
            (b2 & 0x80 != 0, " qr"),
            (b2 & 0x04 != 0, " aa"),
            (b2 & 0x02 != 0, " tc"),
            (b2 & 0x01 != 0, " rd"),
            (b3 & 0x80 != 0, " ra"),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, name)| *name)
        .collect()
    }
}
