// src/cli.rs
use std::{env, fs, path::PathBuf};

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use serde_json::Value;

use crate::{
    api,
    config::{consts::{DEFAULT_FIELD, KNOWN_FIELDS, TOKEN_ENV}, options::AppOptions},
    export::{self, ExportFormat},
    file,
    normalize::{self, NormalizedField},
    progress::Progress,
    request::{FetchRequest, Target},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CliArgs {
    pub token: Option<String>,
    pub target: Option<Target>,
    pub fields: Vec<String>,
    pub out: Option<PathBuf>,
    pub formats: Vec<ExportFormat>,
    /// Saved payload to export instead of calling the API.
    pub input: Option<PathBuf>,
    pub list_fields: bool,
    pub help: bool,
}

/// Prints one line per step to stderr.
struct CliProgress;

impl Progress for CliProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        eprintln!("  wrote {label}");
    }
}

pub fn run() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    if args.help {
        eprintln!("{}", include_str!("cli_help.txt"));
        return Ok(());
    }
    if args.list_fields {
        for f in KNOWN_FIELDS {
            println!("{f}");
        }
        return Ok(());
    }

    let options = AppOptions::load().wrap_err("loading configuration")?;
    for path in execute(args, options)? {
        println!("{}", path.display());
    }
    Ok(())
}

/// Fetch (or load) the payload and write every selected export.
pub fn execute(args: CliArgs, mut options: AppOptions) -> Result<Vec<PathBuf>> {
    let target = args.target.ok_or_else(|| eyre!("Missing target: pass --user ID or --all"))?;
    let fields = if args.fields.is_empty() { vec![s!(DEFAULT_FIELD)] } else { args.fields };
    let formats = if args.formats.is_empty() { ExportFormat::ALL.to_vec() } else { args.formats };
    if let Some(out) = &args.out {
        options.export.set_out_dir(&out.to_string_lossy());
    }

    let mut prog = CliProgress;

    let (payload, normalized) = match &args.input {
        Some(path) => load_payload(path, &fields)?,
        None => {
            let token = args
                .token
                .or_else(|| env::var(TOKEN_ENV).ok())
                .unwrap_or_default();
            let request = FetchRequest::new(target, fields, &token)?;
            let outcome = api::fetch(&options.client, &request, Some(&mut prog))?;
            for missing in outcome.missing_fields() {
                eprintln!("No data available for {missing}");
            }
            (outcome.payload, outcome.fields)
        }
    };

    let artifacts = export::batch_artifacts(target, &payload, &normalized, &formats)?;
    logf!("CLI: writing {} artifact(s) to {}", artifacts.len(), options.export.out_dir().display());
    let written = file::write_artifacts(options.export.out_dir(), &artifacts, Some(&mut prog))?;
    Ok(written)
}

fn load_payload(path: &PathBuf, fields: &[String]) -> Result<(Value, Vec<NormalizedField>)> {
    let text = fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    let payload: Value = serde_json::from_str(&text).wrap_err_with(|| format!("parsing {}", path.display()))?;
    api::check_api_status(&payload)?;
    let normalized = normalize::normalize(&payload, fields)?;
    logf!("CLI: loaded {} ({} fields)", path.display(), normalized.len());
    Ok((payload, normalized))
}

pub fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--token" => out.token = Some(args.next().ok_or_else(|| eyre!("Missing value for --token"))?),
            "-u" | "--user" => {
                let v = args.next().ok_or_else(|| eyre!("Missing user id"))?;
                out.target = Some(Target::parse(&v)?);
            }
            "-a" | "--all" => out.target = Some(Target::AllUsers),
            "-f" | "--fields" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --fields"))?;
                out.fields.extend(v.split(',').map(str::trim).filter(|f| !f.is_empty()).map(String::from));
            }
            "-o" | "--out" => out.out = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing output path"))?)),
            "--format" => {
                let v = args.next().ok_or_else(|| eyre!("Missing value for --format"))?;
                for part in v.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                    let Some(f) = ExportFormat::parse(part) else {
                        bail!("Unknown format: {part}");
                    };
                    if !out.formats.contains(&f) {
                        out.formats.push(f);
                    }
                }
            }
            "-i" | "--input" => out.input = Some(PathBuf::from(args.next().ok_or_else(|| eyre!("Missing input path"))?)),
            "--list-fields" => out.list_fields = true,
            "-h" | "--help" => out.help = true,
            _ => bail!("Unknown arg: {a}"),
        }
    }
    Ok(out)
}
