use clap::{CommandFactory, FromArgMatches, Parser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use diff_wsfilter::{Dialect, WsFilterError};
use log::LevelFilter;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "diff-wsfilter")]
#[command(about = "Drop whitespace-only hunks from diff output")]
#[command(args_override_self = true)]
struct Cli {
    /// Input is a context diff (diff -c)
    #[arg(short = 'c', long)]
    context: bool,

    /// Input is a unified diff (diff -u)
    #[arg(short = 'u', long)]
    unified: bool,

    /// Input format, overriding -c and -u
    #[arg(short = 'f', long, value_enum)]
    format: Option<Dialect>,

    /// Log hunk decisions to stderr
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Diff to read (stdin if omitted or "-")
    file: Option<PathBuf>,
}

/// Parse arguments, dropping any that clap does not recognize.
///
/// Unknown arguments are removed one at a time and parsing is retried; any
/// other parse error keeps whatever was recognized before it.
fn parse_lenient(mut args: Vec<OsString>) -> (Cli, Vec<String>) {
    let mut ignored = Vec::new();
    loop {
        let err = match Cli::try_parse_from(&args) {
            Ok(cli) => return (cli, ignored),
            Err(err) => err,
        };
        if err.kind() == ErrorKind::UnknownArgument
            && let Some(ContextValue::String(unknown)) = err.get(ContextKind::InvalidArg)
            && drop_unknown(&mut args, unknown)
        {
            ignored.push(unknown.clone());
            continue;
        }
        if !err.use_stderr() {
            err.exit();
        }
        ignored.push(err.kind().to_string());
        let matches = Cli::command().ignore_errors(true).get_matches_from(&args);
        match Cli::from_arg_matches(&matches) {
            Ok(cli) => return (cli, ignored),
            Err(_) => err.exit(),
        }
    }
}

/// Remove the argument clap reported as `unknown` from `args`.
///
/// Handles the argument as written (`--foo`, `stray`), with an attached
/// value (`--foo=bar`), or as one letter of a short flag cluster (`-ux`).
fn drop_unknown(args: &mut Vec<OsString>, unknown: &str) -> bool {
    let with_value = format!("{unknown}=");
    let position = args.iter().skip(1).position(|arg| {
        arg == unknown
            || (unknown.starts_with("--") && arg.to_string_lossy().starts_with(&with_value))
    });
    if let Some(idx) = position {
        args.remove(idx + 1);
        return true;
    }

    let Some(letter) = unknown
        .strip_prefix('-')
        .filter(|rest| rest.chars().count() == 1)
    else {
        return false;
    };
    let cluster = args.iter().enumerate().skip(1).find_map(|(idx, arg)| {
        let flags = arg.to_str()?.strip_prefix('-')?;
        (!flags.starts_with('-') && flags.contains(letter)).then(|| (idx, flags.replacen(letter, "", 1)))
    });
    match cluster {
        Some((idx, rest)) if rest.is_empty() => {
            args.remove(idx);
            true
        }
        Some((idx, rest)) => {
            args[idx] = OsString::from(format!("-{rest}"));
            true
        }
        None => false,
    }
}

fn run(cli: Cli) -> Result<(), WsFilterError> {
    let dialect = cli
        .format
        .unwrap_or_else(|| Dialect::from_flags(cli.context, cli.unified));
    let stdout = BufWriter::new(io::stdout().lock());

    match cli.file.filter(|path| path.as_os_str() != "-") {
        Some(path) => {
            let file = File::open(&path).map_err(|e| WsFilterError::OpenFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            dialect.run(BufReader::new(file), stdout)
        }
        None => dialect.run(io::stdin().lock(), stdout),
    }
}

fn main() -> ExitCode {
    let (cli, ignored) = parse_lenient(std::env::args_os().collect());

    env_logger::builder()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_target(false)
        .format_timestamp(None)
        .parse_default_env()
        .init();

    for arg in ignored {
        log::debug!("ignoring argument: {arg}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("diff-wsfilter: {err}");
            ExitCode::FAILURE
        }
    }
}
