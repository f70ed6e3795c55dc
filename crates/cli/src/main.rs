use clap::{Parser, Subcommand};
use ferrous_resolv_application::Resolver;
use ferrous_resolv_domain::{CliOverrides, RecordType};
use std::net::IpAddr;
use tracing::debug;

mod bootstrap;

#[derive(Parser)]
#[command(name = "ferrous-resolv")]
#[command(version)]
#[command(about = "Ferrous Resolv - DNS lookups over UDP, TCP and pinned DNS-over-TLS")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Resolver address (ip, ip:port or host:port)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Use a known provider (google, cloudflare, quad9, ...)
    #[arg(long, global = true, conflicts_with = "server")]
    provider: Option<String>,

    /// Use DNS-over-TLS
    #[arg(long, global = true)]
    dot: bool,

    /// Expected base64 SHA-256 of the server's public key
    #[arg(long, global = true)]
    pin: Option<String>,

    /// Query timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    #[arg(long, global = true)]
    no_ip4: bool,

    #[arg(long, global = true)]
    no_ip6: bool,

    #[arg(long, global = true)]
    no_udp: bool,

    #[arg(long, global = true)]
    no_tcp: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print answer records of one type
    Lookup {
        name: String,
        #[arg(short = 't', long = "type", default_value = "A", value_parser = parse_record_type)]
        record_type: RecordType,
    },
    /// Print the addresses of a name
    Ip {
        name: String,
        /// IPv4 only
        #[arg(short = '4', conflicts_with = "v6")]
        v4: bool,
        /// IPv6 only
        #[arg(short = '6')]
        v6: bool,
    },
    /// Print the PTR name of an IPv4 address
    Reverse { ip: String },
    /// Query several record types at once (all types when none given)
    Exchange {
        name: String,
        /// Print full responses
        #[arg(long)]
        raw: bool,
        /// Print one line per answer record
        #[arg(long)]
        summary: bool,
        #[arg(short = 't', long = "type", value_parser = parse_record_type)]
        types: Vec<RecordType>,
    },
    /// Check that the selected resolver answers
    Probe,
}

fn parse_record_type(s: &str) -> Result<RecordType, String> {
    s.parse()
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            log_level: self.log_level.clone(),
            server: self.server.clone(),
            provider: self.provider.clone(),
            dot: self.dot,
            pin: self.pin.clone(),
            timeout_secs: self.timeout,
            no_ip4: self.no_ip4,
            no_ip6: self.no_ip6,
            no_udp: self.no_udp,
            no_tcp: self.no_tcp,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);
    debug!("Starting Ferrous Resolv v{}", env!("CARGO_PKG_VERSION"));

    let resolver = bootstrap::build_resolver(&config).await?;
    run(cli.command, &resolver).await
}

async fn run(command: Command, resolver: &Resolver) -> anyhow::Result<()> {
    match command {
        Command::Lookup { name, record_type } => {
            for line in resolver.lookup(&name, record_type).await? {
                println!("{}", line);
            }
        }
        Command::Ip { name, v4, v6 } => {
            let types: &[RecordType] = match (v4, v6) {
                (true, _) => &[RecordType::A],
                (_, true) => &[RecordType::AAAA],
                _ => &[RecordType::A, RecordType::AAAA],
            };
            let addresses: Vec<IpAddr> = resolver.lookup_addrs(&name, types).await?;
            for addr in addresses {
                println!("{}", addr);
            }
        }
        Command::Reverse { ip } => {
            println!("{}", resolver.reverse_lookup_ipv4(&ip).await?);
        }
        Command::Exchange {
            name,
            raw,
            summary,
            types,
        } => {
            let types = if types.is_empty() {
                RecordType::all().to_vec()
            } else {
                types
            };
            // summary by default
            let summary = summary || !raw;
            let answer = resolver.exchange(&name, raw, summary, &types).await?;

            let mut raw_types: Vec<&RecordType> = answer.raw.keys().collect();
            raw_types.sort();
            for rt in raw_types {
                println!(";; {} {}\n{}", name, rt, answer.raw[rt]);
            }
            print!("{}", answer.summary_text());
        }
        Command::Probe => {
            resolver.is_functional().await?;
            if let Some(config) = resolver.config() {
                println!("{} ({}) is reachable", config.display_name(), config.server);
            }
        }
    }
    Ok(())
}
