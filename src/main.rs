use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use slmquote::export::{batch_table, breakdown_report, quote_line, ExportColumns, ExportOptions};
use slmquote::{init_logging_with, LogFormat, BUILD_DATE, VERSION};
use slmquote::mesh::{decode, detect_format, encode_ascii, encode_binary};
use slmquote::{
    init_standard_library, Config, ParameterSet, QuoteSession, SortKey, SortState, VolumeUnit,
};
use slmquote_core::units::format_money;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cost estimation for metal powder-bed (SLM) parts from STL meshes
#[derive(Parser)]
#[command(name = "slmquote", version, about, long_about = None)]
struct Cli {
    /// Config file (.toml or .json); defaults to the platform config directory
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log debug detail
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log events as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Overrides {
    /// Powder preset (AlSi10Mg, 316L, Ti64, custom)
    #[arg(short, long)]
    material: Option<String>,

    /// Parameter override such as `bed_x=250` (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

impl Overrides {
    fn params(&self) -> ParameterSet {
        ParameterSet::from_pairs(&self.set)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show mesh statistics
    Analyze {
        file: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Detailed powder-bed quote
    Quote {
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Line number used in the one-line quote
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        index: i64,

        /// Part name; defaults to the file name
        #[arg(long)]
        name: Option<String>,

        /// Print only the one-line quote
        #[arg(long, conflicts_with = "json")]
        line: bool,

        #[arg(long)]
        json: bool,
    },

    /// Simplified density and machine-rate quote
    Simple {
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Show how every value was derived
        #[arg(long)]
        trace: bool,

        #[arg(long)]
        json: bool,
    },

    /// Price several parts at one per-cm³ tariff
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Price per cm³; overrides the config file
        #[arg(long)]
        tariff: Option<f64>,

        /// Quantity of one line, as `LINE=QTY` (repeatable)
        #[arg(long = "quantity", value_name = "LINE=QTY")]
        quantities: Vec<String>,

        /// Sort column (num, name, volume, price, qty, total)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Exported columns, comma separated
        #[arg(long)]
        columns: Option<ExportColumns>,

        /// Volume unit of the table (cm3 or mm3)
        #[arg(long)]
        unit: Option<VolumeUnit>,

        #[arg(long)]
        json: bool,
    },

    /// Rewrite an STL file as binary or ASCII
    Convert {
        input: PathBuf,
        output: PathBuf,

        /// Write ASCII instead of binary
        #[arg(long)]
        ascii: bool,

        /// Solid name used for ASCII output
        #[arg(long)]
        name: Option<String>,
    },

    /// List the powder presets
    Materials {
        #[arg(long)]
        json: bool,
    },

    /// Write a config file with every default spelled out
    InitConfig {
        /// Destination; defaults to the platform config directory
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging_with(level, format)?;
    debug!("slmquote {} built {}", VERSION, BUILD_DATE);

    match &cli.command {
        Commands::Analyze { file, json } => analyze(file, *json),
        Commands::Quote {
            file,
            overrides,
            index,
            name,
            line,
            json,
        } => {
            let config = load_config(cli.config.as_deref(), overrides.material.as_deref())?;
            quote(&config, file, overrides, *index, name.as_deref(), *line, *json)
        }
        Commands::Simple {
            file,
            overrides,
            trace,
            json,
        } => {
            let config = load_config(cli.config.as_deref(), overrides.material.as_deref())?;
            simple(&config, file, overrides, *trace, *json)
        }
        Commands::Batch {
            files,
            tariff,
            quantities,
            sort,
            desc,
            columns,
            unit,
            json,
        } => {
            let config = load_config(cli.config.as_deref(), None)?;
            let options = ExportOptions {
                columns: columns.unwrap_or_default(),
                volume_unit: unit.unwrap_or(config.batch.volume_unit),
            };
            // --sort picks the column like a header click, --desc clicks it again
            let mut order = SortState::default();
            if let Some(key) = *sort {
                order.toggle(key);
                if *desc {
                    order.toggle(key);
                }
            }
            let tariff = tariff.unwrap_or(config.batch.tariff);
            batch(files, tariff, quantities, order, &options, *json)
        }
        Commands::Convert {
            input,
            output,
            ascii,
            name,
        } => convert(input, output, *ascii, name.as_deref()),
        Commands::Materials { json } => materials(*json),
        Commands::InitConfig { path, force } => init_config(path.as_deref(), *force),
    }
}

fn load_config(explicit: Option<&Path>, material: Option<&str>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        },
    };

    if let Some(material) = material {
        config.material_preset = Some(material.to_string());
    }
    config.resolve_material(&init_standard_library())?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn load_session(session: &mut QuoteSession, path: &Path) -> Result<()> {
    let bytes = read_file(path)?;
    session
        .load_mesh(&file_label(path), &bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    Ok(())
}

fn analyze(path: &Path, json: bool) -> Result<()> {
    let bytes = read_file(path)?;
    let layout = detect_format(&bytes)
        .with_context(|| format!("Failed to decode {}", path.display()))?;
    let stats = slmquote::analyze(&decode(&bytes)?);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("File:       {}", path.display());
    println!("Format:     {}", layout);
    println!("Triangles:  {}", stats.triangle_count);
    println!("Volume:     {:.2} cm³ ({:.0} mm³)", stats.volume_cm3(), stats.volume_mm3);
    println!("Area:       {:.1} cm²", stats.area_cm2());
    match stats.size_mm() {
        Some(size) => println!("Size:       {:.1} × {:.1} × {:.1} mm", size.x, size.y, size.z),
        None => println!("Size:       empty mesh"),
    }
    Ok(())
}

fn quote(
    config: &Config,
    path: &Path,
    overrides: &Overrides,
    index: i64,
    name: Option<&str>,
    line_only: bool,
    json: bool,
) -> Result<()> {
    let mut session = QuoteSession::new();
    load_session(&mut session, path)?;
    if let Some(name) = name {
        session.set_part_name(name);
    }

    let powder_bed = config.powder_bed_with(&overrides.params());
    let breakdown = session.quote_powder_bed(&powder_bed)?;
    info!(
        "Quoted {}: sell {} x{}",
        session.part_name(),
        format_money(breakdown.sell_price),
        breakdown.quantity
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        if !line_only {
            print!("{}", breakdown_report(&breakdown));
            println!();
        }
        println!("{}", quote_line(index, session.part_name(), &breakdown));
    }
    Ok(())
}

fn simple(
    config: &Config,
    path: &Path,
    overrides: &Overrides,
    trace: bool,
    json: bool,
) -> Result<()> {
    let mut session = QuoteSession::new();
    load_session(&mut session, path)?;

    let simple = config.simple_with(&overrides.params());
    let quote = session.quote_simple(&simple)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    println!("Part:            {}", session.part_name());
    println!("Mass:            {:.3} kg", quote.mass_kg);
    println!("Material:        {}", format_money(quote.material_cost));
    println!("Processing time: {:.2} h", quote.processing_hours);
    println!("Machine:         {}", format_money(quote.machine_cost));
    println!("Unit price:      {}", format_money(quote.unit_price));
    println!(
        "Total (x{}):      {}",
        quote.quantity,
        format_money(quote.line_total)
    );
    if trace {
        println!();
        print!("{}", quote.trace());
    }
    Ok(())
}

fn parse_quantity(spec: &str) -> Result<(usize, i64)> {
    let (line, qty) = spec
        .split_once('=')
        .with_context(|| format!("Expected LINE=QTY, got {:?}", spec))?;
    let line = line
        .trim()
        .parse()
        .with_context(|| format!("Invalid line number in {:?}", spec))?;
    let qty = qty
        .trim()
        .parse()
        .with_context(|| format!("Invalid quantity in {:?}", spec))?;
    Ok((line, qty))
}

fn batch(
    files: &[PathBuf],
    tariff: f64,
    quantities: &[String],
    order: SortState,
    options: &ExportOptions,
    json: bool,
) -> Result<()> {
    let mut session = QuoteSession::with_tariff(tariff);
    for path in files {
        load_session(&mut session, path)?;
        session.add_current_to_batch()?;
    }

    for spec in quantities {
        let (line, qty) = parse_quantity(spec)?;
        if !session.batch_mut().set_quantity(line, qty) {
            bail!("No batch line {}", line);
        }
    }

    session.batch_mut().apply_sort(order);

    let batch = session.batch();
    if json {
        println!("{}", serde_json::to_string_pretty(batch)?);
        return Ok(());
    }

    println!("{}", batch_table(batch, options));
    println!();
    println!("Grand total: {}", format_money(batch.grand_total()));
    Ok(())
}

fn convert(input: &Path, output: &Path, ascii: bool, name: Option<&str>) -> Result<()> {
    let mesh = decode(&read_file(input)?)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let bytes = if ascii {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        encode_ascii(&mesh, name.unwrap_or(&stem)).into_bytes()
    } else {
        encode_binary(&mesh)
    };

    std::fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        "Wrote {} triangles to {}",
        mesh.triangle_count(),
        output.display()
    );
    Ok(())
}

fn materials(json: bool) -> Result<()> {
    let library = init_standard_library();
    let all = library.get_all_materials();

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    println!(
        "{:<10} {:<16} {:<10} {:>8} {:>8} {:>8}",
        "ID", "Name", "Family", "Solid", "Powder", "Price"
    );
    for m in all {
        println!(
            "{:<10} {:<16} {:<10} {:>8.2} {:>8.2} {:>8.0}",
            m.id.to_string(),
            m.name,
            m.family.to_string(),
            m.density_solid,
            m.density_powder,
            m.price_per_kg
        );
    }
    Ok(())
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path().context("No platform config directory; pass a path")?,
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default().save_to_file(&path)?;
    println!("{}", path.display());
    Ok(())
}
