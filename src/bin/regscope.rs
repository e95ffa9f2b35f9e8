//! `regscope`: one-shot register inspection against a memory image.
//!
//! ```text
//! USAGE:
//!   regscope --description chip.toml --image mem.bin --image-base 0x40000000 show USART1 BRR
//!   regscope --vendor STMicro --file STM32F103xx.toml ... set /x USART1 CR1 UE 1
//!   regscope --description chip.toml complete "usart1 " ""
//!   regscope catalog [VENDOR]
//! ```

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use regscope::Inspector;
use regscope::config::Settings;
use regscope::loader::{Catalog, DescriptionSource, parse_numeric_literal};
use regscope::soc::target::{DetachedTarget, Endianness, RamTarget, Target};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "regscope", about = "Peripheral register inspector", version)]
struct Cli {
    /// Settings file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Description file to load.
    #[arg(long, global = true, conflicts_with_all = ["vendor", "file"])]
    description: Option<PathBuf>,

    /// Catalog vendor directory.
    #[arg(long, global = true, requires = "file")]
    vendor: Option<String>,

    /// Description file inside the vendor directory.
    #[arg(long, global = true, requires = "vendor")]
    file: Option<String>,

    /// Raw memory image standing in for the target.
    #[arg(long, global = true)]
    image: Option<PathBuf>,

    /// Address the first byte of the image is mapped at.
    #[arg(long, global = true, default_value = "0")]
    image_base: String,

    /// Assemble register words most-significant byte first.
    #[arg(long, global = true)]
    big_endian: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print a peripheral, a register, or one field.
    Show {
        /// `[/flags] peripheral [register [field]]`
        #[arg(required = true, num_args = 1..=4)]
        args: Vec<String>,
    },
    /// Update one field with a read-modify-write.
    Set {
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y')]
        yes: bool,
        /// `[/flags] peripheral register field value`
        #[arg(required = true, num_args = 4..=5)]
        args: Vec<String>,
    },
    /// List completion candidates for a partially typed command line.
    Complete {
        text: String,
        #[arg(default_value = "")]
        word: String,
    },
    /// List catalog vendors, or the descriptions of one vendor.
    Catalog { vendor: Option<String> },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("reading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if let Cmd::Catalog { vendor } = &cli.command {
        return cmd_catalog(&Catalog::new(&settings.catalog_root), vendor.as_deref());
    }

    match &cli.command {
        Cmd::Set { yes, args } => {
            let Some(image) = &cli.image else {
                bail!("set requires --image");
            };
            let ram = open_image(&cli, image)?;
            let mut inspector = inspector(&cli, settings, ram)?;
            if cmd_set(&mut inspector, *yes, args)? {
                inspector
                    .target()
                    .save(image)
                    .with_context(|| format!("writing memory image {}", image.display()))?;
            }
        }
        Cmd::Show { args } => {
            let mut inspector = inspector(&cli, settings, open_target(&cli)?)?;
            println!("{}", inspector.show_args(args)?);
        }
        Cmd::Complete { text, word } => {
            let inspector = inspector(&cli, settings, DetachedTarget)?;
            if let Some(candidates) = inspector.complete(text, word) {
                for candidate in candidates {
                    println!("{candidate}");
                }
            }
        }
        Cmd::Catalog { .. } => unreachable!("handled before a target is opened"),
    }
    Ok(())
}

fn inspector<T: Target>(cli: &Cli, settings: Settings, target: T) -> Result<Inspector<T>> {
    let mut inspector = Inspector::new(target, settings);
    if let Some(source) = description_source(cli) {
        inspector.load_description(&source)?;
    }
    Ok(inspector)
}

fn description_source(cli: &Cli) -> Option<DescriptionSource> {
    match (&cli.description, &cli.vendor, &cli.file) {
        (Some(path), _, _) => Some(DescriptionSource::Path(path.clone())),
        (None, Some(vendor), Some(file)) => Some(DescriptionSource::Catalog {
            vendor: vendor.clone(),
            file: file.clone(),
        }),
        _ => None,
    }
}

fn open_target(cli: &Cli) -> Result<Box<dyn Target>> {
    Ok(match &cli.image {
        Some(path) => Box::new(open_image(cli, path)?),
        None => Box::new(DetachedTarget),
    })
}

fn open_image(cli: &Cli, path: &Path) -> Result<RamTarget> {
    let base = parse_numeric_literal(&cli.image_base)
        .map_err(|reason| anyhow!("invalid --image-base '{}': {reason}", cli.image_base))?;
    let endian = if cli.big_endian {
        Endianness::Big
    } else {
        Endianness::Little
    };
    RamTarget::from_file(path, base, endian)
        .with_context(|| format!("mapping memory image {}", path.display()))
}

/// Returns whether the write went through.
fn cmd_set(inspector: &mut Inspector<RamTarget>, yes: bool, args: &[String]) -> Result<bool> {
    let write = if yes {
        inspector.set_args(args)?
    } else {
        let confirmed =
            inspector.set_args_confirmed(args, &mut io::stdin().lock(), &mut io::stdout())?;
        let Some(write) = confirmed else {
            println!("Aborted.");
            return Ok(false);
        };
        write
    };
    println!(
        "0x{:08x}: 0x{:x} -> 0x{:x}",
        write.address, write.before, write.after
    );
    println!("{}", write.rendered);
    Ok(true)
}

fn cmd_catalog(catalog: &Catalog, vendor: Option<&str>) -> Result<()> {
    let names = match vendor {
        Some(vendor) => catalog.files(vendor)?,
        None => catalog.vendors()?,
    };
    for name in names {
        println!("{name}");
    }
    Ok(())
}
