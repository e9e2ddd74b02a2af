use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rsa_toolkit::ciphertext::WireFormat;
use rsa_toolkit::rsa::keygen::{LegacyKeyFile, LegacyKeyGenerator, LegacyKeyPair};
use rsa_toolkit::rsa::{PaddingScheme, ProductionKeyAdapter, ProductionKeyPair, RustCryptoPrimitive};
use rsa_toolkit::util::file_ops::{self, FileError};
use rsa_toolkit::{EngineConfig, Session};

#[derive(Parser)]
#[command(name = "rsa-toolkit")]
#[command(about = "Textbook and production RSA encryption")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "RSA_TOOLKIT_CONFIG", value_parser = parse_path)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key pair
    Keygen {
        #[command(subcommand)]
        engine: KeygenCommand,
    },
    /// Encrypt text or a file
    Encrypt {
        #[command(subcommand)]
        engine: EncryptCommand,
    },
    /// Decrypt ciphertext
    Decrypt {
        #[command(subcommand)]
        engine: DecryptCommand,
    },
}

#[derive(Subcommand)]
enum KeygenCommand {
    /// Machine-word key written as TOML
    Legacy {
        #[arg(long, value_parser = parse_path)]
        out: Option<PathBuf>,
    },
    /// Full-size key written as public.pem and private.pem
    Production {
        #[arg(long)]
        bits: Option<usize>,
        #[arg(long, value_parser = parse_path)]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum EncryptCommand {
    Legacy {
        #[arg(long, value_parser = parse_path)]
        key: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// base64 or csv
        #[arg(long)]
        format: Option<WireFormat>,
        #[arg(long, value_parser = parse_path)]
        output: Option<PathBuf>,
    },
    Production {
        #[arg(long, value_parser = parse_path)]
        public_key: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        /// pkcs1, oaep or oaep-sha256
        #[arg(long)]
        padding: Option<PaddingScheme>,
        #[arg(long, value_parser = parse_path)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum DecryptCommand {
    Legacy {
        #[arg(long, value_parser = parse_path)]
        key: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_parser = parse_path)]
        output: Option<PathBuf>,
    },
    Production {
        #[arg(long, value_parser = parse_path)]
        public_key: PathBuf,
        #[arg(long, value_parser = parse_path)]
        private_key: PathBuf,
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        padding: Option<PaddingScheme>,
        #[arg(long, value_parser = parse_path)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// Inline input
    #[arg(long)]
    text: Option<String>,
    /// Read input from a file
    #[arg(long, value_parser = parse_path)]
    input: Option<PathBuf>,
}

impl InputArgs {
    fn bytes(&self) -> Result<Vec<u8>> {
        match (&self.text, &self.input) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(path)) => {
                let data = file_ops::read_file(path)?;
                info!(
                    path = %path.display(),
                    size = %file_ops::format_file_size(data.len() as u64),
                    "Read input"
                );
                Ok(data)
            }
            (None, None) => bail!("either --text or --input is required"),
        }
    }

    fn text(&self) -> Result<String> {
        match (&self.text, &self.input) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => Ok(file_ops::read_text_file(path)?),
            (None, None) => bail!("either --text or --input is required"),
        }
    }
}

fn parse_path(input: &str) -> Result<PathBuf, FileError> {
    file_ops::normalize_path(input).map(PathBuf::from)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "rsa_toolkit=debug"
    } else {
        "rsa_toolkit=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Keygen { engine } => run_keygen(engine, &config),
        Commands::Encrypt { engine } => run_encrypt(engine, &config),
        Commands::Decrypt { engine } => run_decrypt(engine, &config),
    }
}

fn run_keygen(command: KeygenCommand, config: &EngineConfig) -> Result<()> {
    match command {
        KeygenCommand::Legacy { out } => {
            let key = LegacyKeyGenerator::new(config.legacy.clone())?.generate()?;
            let text = toml::to_string_pretty(&key.to_key_file()).context("Failed to encode key file")?;
            match out {
                Some(path) => {
                    file_ops::write_file(&path, text.as_bytes())?;
                    info!(path = %path.display(), bits = key.bit_length(), "Wrote legacy key");
                    println!("{}", key);
                }
                None => print!("{}", text),
            }
        }
        KeygenCommand::Production { bits, out_dir } => {
            let bits = bits.unwrap_or(config.production.key_bits);
            let keypair = ProductionKeyAdapter::new(RustCryptoPrimitive).generate_key_pair(bits)?;
            let private_pem = keypair
                .private_key_pem()?
                .context("Generated key is missing its private half")?;

            std::fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            file_ops::write_file(&out_dir.join("public.pem"), keypair.public_key_pem()?.as_bytes())?;
            file_ops::write_file(&out_dir.join("private.pem"), private_pem.as_bytes())?;
            println!(
                "Generated {}-bit key pair in {}",
                keypair.key_size_bits(),
                out_dir.display()
            );
        }
    }
    Ok(())
}

fn run_encrypt(command: EncryptCommand, config: &EngineConfig) -> Result<()> {
    let (session, input, output) = match command {
        EncryptCommand::Legacy {
            key,
            input,
            format,
            output,
        } => {
            let format = format.unwrap_or(config.output.format);
            (Session::legacy(load_legacy_key(&key)?, format), input, output)
        }
        EncryptCommand::Production {
            public_key,
            input,
            padding,
            output,
        } => {
            let public_pem = file_ops::read_text_file(&public_key)?;
            let keypair = ProductionKeyPair::from_pem(&public_pem, None)?;
            let padding = padding.unwrap_or(config.production.padding);
            (Session::production(RustCryptoPrimitive, keypair, padding), input, output)
        }
    };

    let plaintext = input.bytes()?;
    let wire = session
        .encrypt(&plaintext)
        .with_context(|| format!("{} encryption failed", session.mode_name()))?;
    emit(output.as_deref(), wire.as_bytes(), || println!("{}", wire))
}

fn run_decrypt(command: DecryptCommand, config: &EngineConfig) -> Result<()> {
    let (session, input, output) = match command {
        DecryptCommand::Legacy { key, input, output } => (
            Session::legacy(load_legacy_key(&key)?, config.output.format),
            input,
            output,
        ),
        DecryptCommand::Production {
            public_key,
            private_key,
            input,
            padding,
            output,
        } => {
            let public_pem = file_ops::read_text_file(&public_key)?;
            let private_pem = file_ops::read_text_file(&private_key)?;
            let keypair = ProductionKeyPair::from_pem(&public_pem, Some(&private_pem))?;
            let padding = padding.unwrap_or(config.production.padding);
            (Session::production(RustCryptoPrimitive, keypair, padding), input, output)
        }
    };

    let wire = input.text()?;
    let plaintext = session
        .decrypt(&wire)
        .with_context(|| format!("{} decryption failed", session.mode_name()))?;
    emit(output.as_deref(), &plaintext, || match std::str::from_utf8(&plaintext) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("(binary, hex) {}", hex::encode(&plaintext)),
    })
}

fn load_legacy_key(path: &Path) -> Result<LegacyKeyPair> {
    let text = file_ops::read_text_file(path)?;
    let file: LegacyKeyFile =
        toml::from_str(&text).with_context(|| format!("Invalid key file {}", path.display()))?;
    Ok(LegacyKeyPair::from_key_file(&file)?)
}

fn emit(output: Option<&Path>, data: &[u8], print: impl FnOnce()) -> Result<()> {
    match output {
        Some(path) => {
            file_ops::write_file(path, data)?;
            info!(
                path = %path.display(),
                size = %file_ops::format_file_size(data.len() as u64),
                "Wrote output"
            );
        }
        None => print(),
    }
    Ok(())
}
