//! channel-sheet – command-line channel guide generator.
//!
//! Usage:
//!   channel-sheet [config.yaml] [--output out.pdf] [--plan-json plan.json]
//!   channel-sheet --init <dir>
//!
//! The config defaults to `config.yaml` in the current directory. The PDF is
//! written to `output_pdf` from the config unless `--output` overrides it.

use std::{env, path::PathBuf, process};

use channel_sheet::error::SheetError;
use channel_sheet::pipeline::{generate_from_config_file, write_output};
use channel_sheet::samples::{sample_channels_csv, sample_config_yaml};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut plan_path: Option<PathBuf> = None;
    let mut init_dir: Option<PathBuf> = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output" | "-o" => output_path = Some(required_path(&args[0], arg, iter.next())),
            "--plan-json" | "-p" => plan_path = Some(required_path(&args[0], arg, iter.next())),
            "--init" => init_dir = Some(required_path(&args[0], arg, iter.next())),
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if config_path.is_some() {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                config_path = Some(PathBuf::from(path));
            }
        }
    }

    if let Some(dir) = init_dir {
        if let Err(e) = write_samples(&dir) {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        eprintln!("Wrote sample config.yaml and channels.csv to '{}'", dir.display());
        return;
    }

    let config_path = config_path.unwrap_or_else(|| PathBuf::from("config.yaml"));

    let (config, sheet) = match generate_from_config_file(&config_path) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let output = output_path.unwrap_or_else(|| config.output_pdf.clone());
    if let Err(e) = write_output(&output, &sheet.pdf) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Some(plan_path) = plan_path {
        let written = sheet
            .plan
            .to_json()
            .and_then(|json| write_output(&plan_path, json.as_bytes()));
        if let Err(e) = written {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }

    let pages = sheet.page_count();
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        sheet.pdf.len(),
        pages,
        if pages == 1 { "" } else { "s" }
    );
}

fn required_path(prog: &str, flag: &str, value: Option<&String>) -> PathBuf {
    match value {
        Some(v) => PathBuf::from(v),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn write_samples(dir: &std::path::Path) -> Result<(), SheetError> {
    write_output(&dir.join("config.yaml"), sample_config_yaml().as_bytes())?;
    write_output(&dir.join("channels.csv"), sample_channels_csv().as_bytes())
}

fn print_usage(prog: &str) {
    eprintln!("channel-sheet – printable TV channel guide generator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} [config.yaml] [--output out.pdf] [--plan-json plan.json]");
    eprintln!("  {prog} --init <dir>");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [config.yaml]      YAML configuration (default: config.yaml)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --output, -o       PDF path (default: output_pdf from the config)");
    eprintln!("  --plan-json, -p    Also write the page/column/row placement plan as JSON");
    eprintln!("  --init <dir>       Write a sample config.yaml and channels.csv, then exit");
    eprintln!("  --help             Print this message");
    eprintln!();
    eprintln!("Set RUST_LOG=info (or debug) for progress logging.");
}
