//! exgrid - batch restructuring of spreadsheet grids

mod config;
mod logging;

use anyhow::{Context, Result};
use exgrid_core::{Operation, Recipe, Workbook, describe_shape};
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: exgrid [OPTIONS] FILE");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  FILE                      Workbook to open (.grd, .xlsx or .csv)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMD>       Run an operation, e.g. \"delete-rows 2 3\" (can be repeated)");
    eprintln!("  -r, --recipe <FILE>       Run the steps of a TOML recipe");
    eprintln!("  -s, --sheet <NAME>        Sheet that commands apply to (default: first sheet)");
    eprintln!("  -o, --output <FILE>       Save the workbook (.grd, .xlsx or .csv)");
    eprintln!("  --csv <FILE>              Export the selected sheet to CSV");
    eprintln!("  --shape                   Print the row/column bounds of every sheet");
    eprintln!("  --config <FILE>           Read settings from FILE instead of the user config");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -v, --verbose             Log every operation to stderr");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  delete-rows START [END]   delete-columns START [END]");
    eprintln!("  insert-row AT             insert-column AT");
    eprintln!("  move-row FROM TO          move-column FROM TO");
    eprintln!("  merge RANGE               unmerge-row ROW");
    eprintln!("  smear-row ROW             smear-column COL");
    eprintln!("  combine-rows FIRST SECOND [SEP]");
    eprintln!("  convert-column-to-percent COL [SKIP]");
    eprintln!("  normalize-names ROW       reset-styling");
    eprintln!("  remove-empty-rows         remove-empty-columns");
    eprintln!("  set-cell CELL VALUE");
}

/// Options collected from the command line.
#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    commands: Vec<String>,
    recipe: Option<PathBuf>,
    sheet: Option<String>,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    shape: bool,
    config_file: Option<PathBuf>,
    no_config: bool,
    verbose: bool,
}

fn required_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("Error: {} requires {}", flag, what);
            std::process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                opts.commands
                    .push(required_value(&args, i, "--command", "a command"));
            }
            "-r" | "--recipe" => {
                i += 1;
                opts.recipe = Some(PathBuf::from(required_value(
                    &args,
                    i,
                    "--recipe",
                    "a file path",
                )));
            }
            "-s" | "--sheet" => {
                i += 1;
                opts.sheet = Some(required_value(&args, i, "--sheet", "a sheet name"));
            }
            "-o" | "--output" => {
                i += 1;
                opts.output = Some(PathBuf::from(required_value(
                    &args,
                    i,
                    "--output",
                    "a file path",
                )));
            }
            "--csv" => {
                i += 1;
                opts.csv = Some(PathBuf::from(required_value(&args, i, "--csv", "a file path")));
            }
            "--shape" => opts.shape = true,
            "--config" => {
                i += 1;
                opts.config_file = Some(PathBuf::from(required_value(
                    &args,
                    i,
                    "--config",
                    "a file path",
                )));
            }
            "--no-config" => opts.no_config = true,
            "-v" | "--verbose" => opts.verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if opts.file_path.is_none() {
                    opts.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let (config, warnings) = if opts.no_config {
        (config::Config::default(), Vec::new())
    } else {
        config::load_config(opts.config_file.as_ref())
    };
    logging::init_logging(config.log_level.as_deref(), opts.verbose);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Err(e) = run(&opts, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(opts: &Options, config: &config::Config) -> Result<()> {
    let Some(file_path) = &opts.file_path else {
        print_usage();
        anyhow::bail!("no input file given");
    };

    let mut book = Workbook::load(file_path)
        .with_context(|| format!("Failed to load {}", file_path.display()))?;
    let defaults = config.operation_defaults();
    let default_sheet = opts.sheet.as_deref().or(config.header_sheet.as_deref());

    if let Some(recipe_path) = &opts.recipe {
        let recipe = Recipe::load(recipe_path)
            .with_context(|| format!("Failed to read recipe {}", recipe_path.display()))?;
        let summaries = book
            .apply_recipe(&recipe, default_sheet, &defaults)
            .with_context(|| format!("Recipe {} failed", recipe_path.display()))?;
        for summary in summaries {
            println!("{}", summary);
        }
    }

    for command in &opts.commands {
        let operation = Operation::parse_command(command)?;
        let summary = book
            .apply_operation(default_sheet, &operation, &defaults)
            .with_context(|| format!("Command '{}' failed", command))?;
        println!("{}", summary);
    }

    if opts.shape {
        let shapes = describe_shape(&book);
        print!("{}", toml::to_string(&shapes).context("Failed to render shape report")?);
    }

    if let Some(csv_path) = &opts.csv {
        let sheet = book.resolve_sheet(default_sheet)?;
        book.export_sheet_csv(&sheet, csv_path)
            .with_context(|| format!("Failed to export {}", csv_path.display()))?;
        eprintln!("Exported {} to {}", sheet, csv_path.display());
    }

    if let Some(output) = &opts.output {
        book.save(output)
            .with_context(|| format!("Failed to save {}", output.display()))?;
        eprintln!("Saved to {}", output.display());
    } else if book.modified {
        tracing::warn!("changes were not saved; pass --output FILE to keep them");
    }

    Ok(())
}
