use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use facturark_core::config::{Config, SignerConfig};
use facturark_core::signer::engine::SignatureAlgorithm;
use facturark_core::signer::hasher::DigestAlgorithm;
use facturark_core::signer::{Signer, document_digest};
use facturark_core::validation::validate_xml_file;
use libxml::parser::Parser as XmlParser;
use libxml::tree::Document;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "facturark")]
#[command(about = "Signs DIAN electronic invoices with XAdES-BES")]
struct Cli {
    /// Repeat for more output on stderr (-v, -vv, -vvv); RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign an invoice with a PKCS#12 certificate.
    Sign {
        #[arg(long)]
        invoice: PathBuf,
        #[arg(long)]
        certificate: PathBuf,
        #[arg(long, env = "FACTURARK_PASSPHRASE", hide_env_values = true)]
        passphrase: String,
        /// Where to write the signed invoice; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long, default_value = "sha512")]
        digest_algorithm: DigestAlgorithm,
        #[arg(long, default_value = "rsa-sha512")]
        signature_algorithm: SignatureAlgorithm,
        #[arg(long, default_value = "xades-bes")]
        profile: String,
    },
    /// Print the digest carried by the document reference.
    Digest {
        #[arg(long)]
        invoice: PathBuf,
        #[arg(long, default_value = "sha512")]
        digest_algorithm: DigestAlgorithm,
    },
    /// Validate an invoice against an XSD.
    Validate {
        #[arg(long)]
        invoice: PathBuf,
        #[arg(long)]
        xsd: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn read_invoice(path: &Path) -> Result<Document> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read invoice {}", path.display()))?;
    XmlParser::default()
        .parse_string(&xml)
        .map_err(|e| anyhow!("failed to parse invoice {}: {e:?}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Sign {
            invoice,
            certificate,
            passphrase,
            output,
            digest_algorithm,
            signature_algorithm,
            profile,
        } => {
            let container = std::fs::read(&certificate)
                .with_context(|| format!("failed to read certificate {}", certificate.display()))?;
            let config = SignerConfig {
                digest_algorithm,
                signature_algorithm,
                profile,
                ..SignerConfig::default()
            };
            let signer = Signer::from_pkcs12(&container, &passphrase, config)
                .context("failed to load signing certificate")?;

            let mut document = read_invoice(&invoice)?;
            signer
                .sign(&mut document)
                .with_context(|| format!("failed to sign {}", invoice.display()))?;
            signer.dispose();

            let signed = document.to_string();
            match output {
                Some(path) => {
                    std::fs::write(&path, signed)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(output = %path.display(), "signed invoice written");
                }
                None => print!("{signed}"),
            }
        }
        Commands::Digest {
            invoice,
            digest_algorithm,
        } => {
            let document = read_invoice(&invoice)?;
            let digest = document_digest(&document, digest_algorithm)?;
            println!("{digest}");
        }
        Commands::Validate { invoice, xsd } => {
            let config = match xsd {
                Some(xsd) => Config::new(SignerConfig::default(), xsd),
                None => Config::default(),
            };
            validate_xml_file(&invoice, &config)?;
            println!("{} is valid", invoice.display());
        }
    }

    Ok(())
}
