use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use fsdict_hash::Hash;
use fsdict_store::{Dictionary, FileDictionary, Mode};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Init(args) => cmd_init(args, format, &mut io::stdout().lock()),
        Command::Put(args) => cmd_put(args, &mut io::stdin().lock()),
        Command::Cat(args) => cmd_cat(args, &mut io::stdout().lock()),
        Command::Remove(args) => cmd_remove(args),
        Command::Keys(args) => cmd_keys(args, format, &mut io::stdout().lock()),
        Command::Usage(args) => cmd_usage(args, format, &mut io::stdout().lock()),
    }
}

fn open(directory: &Path) -> anyhow::Result<Dictionary> {
    Dictionary::open(directory)
        .with_context(|| format!("cannot open store at {}", directory.display()))
}

fn cmd_init<W: Write>(args: InitArgs, format: OutputFormat, out: &mut W) -> anyhow::Result<()> {
    let addressing = Hash::new(args.algorithm, args.depth, args.length)?;
    let dictionary = Dictionary::create(addressing, &args.directory)?;
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{} Initialized store in {}\n  Addressing: {}",
            "✓".green().bold(),
            dictionary.directory().to_string().bold(),
            addressing.to_string().cyan(),
        )?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({ "directory": dictionary.directory().path(), "addressing": addressing })
        )?,
    }
    Ok(())
}

fn cmd_put<R: Read>(args: PutArgs, input: &mut R) -> anyhow::Result<()> {
    let dictionary = open(&args.directory)?;
    let route = dictionary.route(args.key.as_encoded_bytes())?;
    let mut file = route.open(Mode::Write)?;
    let written = io::copy(input, &mut file)?;
    debug!(key = ?args.key, bytes = written, path = %route, "value stored");
    Ok(())
}

fn cmd_cat<W: Write>(args: CatArgs, out: &mut W) -> anyhow::Result<()> {
    let dictionary = open(&args.directory)?;
    for key in &args.keys {
        let key = key.as_encoded_bytes();
        if !dictionary.has_key(key)? {
            continue;
        }
        let mut file = dictionary.route(key)?.open(Mode::Read)?;
        io::copy(&mut file, out)?;
    }
    out.flush()?;
    Ok(())
}

fn cmd_remove(args: RemoveArgs) -> anyhow::Result<()> {
    let dictionary = open(&args.directory)?;
    for key in &args.keys {
        dictionary
            .delete(key.as_encoded_bytes())
            .with_context(|| format!("cannot remove {key:?}"))?;
    }
    Ok(())
}

fn cmd_keys<W: Write>(args: KeysArgs, format: OutputFormat, out: &mut W) -> anyhow::Result<()> {
    let dictionary = open(&args.directory)?;
    match format {
        OutputFormat::Text => {
            for key in dictionary.keys() {
                out.write_all(&key?)?;
                out.write_all(b"\n")?;
            }
        }
        OutputFormat::Json => {
            let keys = dictionary
                .keys()
                .map(|key| key.map(|k| String::from_utf8_lossy(&k).into_owned()))
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::to_writer(&mut *out, &keys)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn cmd_usage<W: Write>(args: UsageArgs, format: OutputFormat, out: &mut W) -> anyhow::Result<()> {
    let dictionary = open(&args.directory)?;
    let bytes = dictionary.usage()?;
    match format {
        OutputFormat::Text => writeln!(out, "{} bytes in {}", bytes.to_string().bold(), dictionary.directory())?,
        OutputFormat::Json => writeln!(out, "{}", json!({ "directory": dictionary.directory().path(), "bytes": bytes }))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::path::PathBuf;

    use fsdict_hash::Algorithm;

    fn init_store(root: &Path) -> PathBuf {
        let directory = root.join("store");
        let args = InitArgs {
            directory: directory.clone(),
            algorithm: Algorithm::Fnv1a64,
            depth: 2,
            length: None,
        };
        cmd_init(args, OutputFormat::Json, &mut Vec::new()).unwrap();
        directory
    }

    fn put(directory: &Path, key: &str, value: &[u8]) {
        let args = PutArgs { directory: directory.to_path_buf(), key: key.into() };
        cmd_put(args, &mut &value[..]).unwrap();
    }

    fn cat(directory: &Path, keys: &[&str]) -> Vec<u8> {
        let args = CatArgs {
            directory: directory.to_path_buf(),
            keys: keys.iter().map(OsString::from).collect(),
        };
        let mut out = Vec::new();
        cmd_cat(args, &mut out).unwrap();
        out
    }

    #[test]
    fn init_writes_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let directory = dir.path().join("s");
        let args = InitArgs {
            directory: directory.clone(),
            algorithm: Algorithm::Sha256,
            depth: 3,
            length: Some(12),
        };
        let mut out = Vec::new();
        cmd_init(args, OutputFormat::Json, &mut out).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["addressing"]["algorithm"], "sha256");
        assert_eq!(report["addressing"]["depth"], 3);
        assert_eq!(report["addressing"]["length"], 12);
        assert_eq!(std::fs::read(directory.join("hash")).unwrap(), b"sha256 3 12\n");
    }

    #[test]
    fn init_rejects_bad_addressing_and_existing_store() {
        let dir = tempfile::tempdir().unwrap();
        let bad = InitArgs {
            directory: dir.path().join("bad"),
            algorithm: Algorithm::Fnv1a64,
            depth: 20,
            length: None,
        };
        assert!(cmd_init(bad, OutputFormat::Text, &mut Vec::new()).is_err());

        let directory = init_store(dir.path());
        let again = InitArgs {
            directory,
            algorithm: Algorithm::Fnv1a64,
            depth: 2,
            length: None,
        };
        assert!(cmd_init(again, OutputFormat::Text, &mut Vec::new()).is_err());
    }

    #[test]
    fn put_then_cat() {
        let dir = tempfile::tempdir().unwrap();
        let directory = init_store(dir.path());
        put(&directory, "a", b"alpha");
        put(&directory, "b", b"beta");

        assert_eq!(cat(&directory, &["a"]), b"alpha");
        assert_eq!(cat(&directory, &["b", "missing", "a"]), b"betaalpha");
        assert_eq!(cat(&directory, &[]), b"");
    }

    #[cfg(unix)]
    #[test]
    fn keys_may_be_arbitrary_bytes() {
        use std::os::unix::ffi::OsStringExt;

        let dir = tempfile::tempdir().unwrap();
        let directory = init_store(dir.path());
        let key = OsString::from_vec(b"caf\xe9".to_vec());

        let args = PutArgs { directory: directory.clone(), key: key.clone() };
        cmd_put(args, &mut &b"latin-1"[..]).unwrap();
        assert!(Dictionary::open(&directory).unwrap().has_key(b"caf\xe9").unwrap());

        let mut out = Vec::new();
        cmd_cat(CatArgs { directory: directory.clone(), keys: vec![key.clone()] }, &mut out).unwrap();
        assert_eq!(out, b"latin-1");

        let mut out = Vec::new();
        cmd_keys(KeysArgs { directory: directory.clone() }, OutputFormat::Text, &mut out).unwrap();
        assert_eq!(out, b"caf\xe9\n");

        cmd_remove(RemoveArgs { directory: directory.clone(), keys: vec![key] }).unwrap();
        assert!(!Dictionary::open(&directory).unwrap().has_key(b"caf\xe9").unwrap());
    }

    #[test]
    fn put_replaces_and_streams_large_input() {
        let dir = tempfile::tempdir().unwrap();
        let directory = init_store(dir.path());
        let large = vec![7u8; 100_000];
        put(&directory, "k", &large);
        assert_eq!(cat(&directory, &["k"]), large);
        put(&directory, "k", b"small");
        assert_eq!(cat(&directory, &["k"]), b"small");
    }

    #[test]
    fn commands_require_an_initialized_store() {
        let dir = tempfile::tempdir().unwrap();
        let args = PutArgs { directory: dir.path().join("nothing"), key: "k".into() };
        assert!(cmd_put(args, &mut &b"v"[..]).is_err());
        let args = KeysArgs { directory: dir.path().join("nothing") };
        assert!(cmd_keys(args, OutputFormat::Text, &mut Vec::new()).is_err());
    }

    #[test]
    fn remove_deletes_and_fails_on_first_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let directory = init_store(dir.path());
        put(&directory, "a", b"1");
        put(&directory, "b", b"2");
        put(&directory, "c", b"3");

        let args = RemoveArgs { directory: directory.clone(), keys: vec!["a".into()] };
        cmd_remove(args).unwrap();
        assert_eq!(cat(&directory, &["a", "b"]), b"2");

        let args = RemoveArgs {
            directory: directory.clone(),
            keys: vec!["b".into(), "a".into(), "c".into()],
        };
        assert!(cmd_remove(args).is_err());
        assert_eq!(cat(&directory, &["b", "c"]), b"3");
    }

    #[test]
    fn keys_lists_every_key() {
        let dir = tempfile::tempdir().unwrap();
        let directory = init_store(dir.path());
        for key in ["x", "y", "z"] {
            put(&directory, key, b"v");
        }

        let mut out = Vec::new();
        cmd_keys(KeysArgs { directory: directory.clone() }, OutputFormat::Text, &mut out).unwrap();
        let mut lines: Vec<&str> = std::str::from_utf8(&out).unwrap().lines().collect();
        lines.sort();
        assert_eq!(lines, ["x", "y", "z"]);

        let mut out = Vec::new();
        cmd_keys(KeysArgs { directory }, OutputFormat::Json, &mut out).unwrap();
        let mut keys: Vec<String> = serde_json::from_slice(&out).unwrap();
        keys.sort();
        assert_eq!(keys, ["x", "y", "z"]);
    }

    #[test]
    fn usage_reports_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let directory = init_store(dir.path());
        put(&directory, "k", &[0u8; 4096]);

        let mut out = Vec::new();
        cmd_usage(UsageArgs { directory }, OutputFormat::Json, &mut out).unwrap();
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(report["bytes"].as_u64().unwrap() >= 4096);
    }
}
