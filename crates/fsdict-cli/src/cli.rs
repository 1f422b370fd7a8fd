use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fsdict_hash::{Algorithm, Hash};

#[derive(Parser)]
#[command(
    name = "fsdict",
    about = "Hash-sharded, file-backed key/value stores",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new store
    Init(InitArgs),
    /// Store standard input under a key
    Put(PutArgs),
    /// Write the values of the given keys to standard output
    Cat(CatArgs),
    /// Delete keys and their values
    Remove(RemoveArgs),
    /// List every key, one per line
    Keys(KeysArgs),
    /// Show the bytes used by a store
    Usage(UsageArgs),
}

#[derive(Args)]
pub struct InitArgs {
    pub directory: PathBuf,
    #[arg(long, default_value_t = Algorithm::default())]
    pub algorithm: Algorithm,
    #[arg(long, default_value_t = Hash::DEFAULT_DEPTH)]
    pub depth: usize,
    /// Digest prefix length; the algorithm's full hex length if omitted
    #[arg(long)]
    pub length: Option<usize>,
}

#[derive(Args)]
pub struct PutArgs {
    pub directory: PathBuf,
    pub key: OsString,
}

#[derive(Args)]
pub struct CatArgs {
    pub directory: PathBuf,
    pub keys: Vec<OsString>,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub directory: PathBuf,
    #[arg(required = true)]
    pub keys: Vec<OsString>,
}

#[derive(Args)]
pub struct KeysArgs {
    pub directory: PathBuf,
}

#[derive(Args)]
pub struct UsageArgs {
    pub directory: PathBuf,
}
