use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use passhash::{EncodedHash, HashError, HashParams, Hasher};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, clap::Args)]
struct Argon2Args {
    /// Argon2 memory cost in KiB (default: 19456)
    #[arg(long = "memory", env = "PASSHASH_MEMORY")]
    mem_cost_kib: Option<u32>,

    /// Argon2 time cost / iterations (default: 2)
    #[arg(long = "iterations", env = "PASSHASH_ITERATIONS")]
    time_cost: Option<u32>,

    /// Argon2 parallelism (default: 1)
    #[arg(long = "parallelism", env = "PASSHASH_PARALLELISM")]
    parallelism: Option<u32>,

    /// Salt length in bytes (default: 16)
    #[arg(long = "salt-len", env = "PASSHASH_SALT_LEN")]
    salt_len: Option<u32>,

    /// Derived key length in bytes (default: 32)
    #[arg(long = "key-len", env = "PASSHASH_KEY_LEN")]
    key_len: Option<u32>,
}

impl Argon2Args {
    fn to_hash_params(&self) -> Result<HashParams> {
        let default = HashParams::default();

        HashParams::new(
            self.mem_cost_kib.unwrap_or(default.mem_cost_kib()),
            self.time_cost.unwrap_or(default.time_cost()),
            self.parallelism.unwrap_or(default.parallelism()),
            self.salt_len.unwrap_or(default.salt_len()),
            self.key_len.unwrap_or(default.key_len()),
        )
        .context("invalid Argon2 parameters")
    }
}

#[derive(Debug, Parser)]
#[command(name = "passhash")]
#[command(version, about = "Argon2id password hashing and verification.")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Hashes a password and prints the encoded hash
    Hash {
        #[command(flatten)]
        argon2: Argon2Args,
    },

    /// Checks a password against an encoded hash
    #[command(arg_required_else_help = true)]
    Verify { encoded: String },

    /// Shows the parameters embedded in an encoded hash
    #[command(arg_required_else_help = true)]
    Inspect {
        encoded: String,

        /// Print the parameters as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        #[command(flatten)]
        argon2: Argon2Args,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Commands::Hash { argon2 } => {
            let hasher = Hasher::new(argon2.to_hash_params()?)?;
            let password = auth::read_new_password_with_confirmation()?;
            let encoded = hasher.hash(&password)?;
            println!("{encoded}");
        }
        Commands::Verify { encoded } => {
            let password = auth::read_password()?;
            let matched = match passhash::verify_password(&password, encoded.trim()) {
                Ok(matched) => matched,
                Err(e @ (HashError::Malformed(_) | HashError::IncompatibleVersion { .. })) => {
                    debug!("stored hash rejected before derivation");
                    return Err(e).context("cannot read stored hash");
                }
                Err(e) => return Err(e.into()),
            };
            if !matched {
                bail!("password does not match");
            }
            println!("password matches");
        }
        Commands::Inspect {
            encoded,
            json,
            argon2,
        } => {
            let stored: EncodedHash = encoded
                .trim()
                .parse()
                .context("cannot read stored hash")?;
            let configured = Hasher::new(argon2.to_hash_params()?)?;
            let params = stored.params();
            let needs_rehash = configured.is_outdated(&stored);

            if json {
                let out = serde_json::json!({
                    "algorithm": passhash::format::ALGORITHM,
                    "version": passhash::format::VERSION,
                    "params": params,
                    "needs_rehash": needs_rehash,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("algorithm    : {}", passhash::format::ALGORITHM);
                println!("version      : {}", passhash::format::VERSION);
                println!("memory (KiB) : {}", params.mem_cost_kib());
                println!("iterations   : {}", params.time_cost());
                println!("parallelism  : {}", params.parallelism());
                println!("salt length  : {}", params.salt_len());
                println!("key length   : {}", params.key_len());
                println!("needs rehash : {}", if needs_rehash { "yes" } else { "no" });
            }
        }
    }

    Ok(())
}
