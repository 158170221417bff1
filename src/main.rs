use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use svgnorm::{Changes, Options, SvgError, process_directory_with};

#[derive(Parser)]
#[command(name = "svgnorm", version)]
#[command(about = "Normalize UML diagram SVG exports for word processors", long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Directory containing the SVG files (default: current directory)
    directory: Option<PathBuf>,

    /// Font family that replaces Arial in text elements
    #[arg(short, long, value_name = "NAME", default_value = "Cambria")]
    font: String,

    /// Leave text fonts untouched
    #[arg(long)]
    no_font_change: bool,

    /// Print help
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    help: Option<bool>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if exits_with_clap(&e) => e.exit(),
        Err(e) => {
            // Bad flags are reported without touching any file.
            e.print()?;
            return Ok(());
        }
    };
    let dir = cli.directory.unwrap_or_else(|| PathBuf::from("."));

    let options = Options {
        target_font: (!cli.no_font_change).then_some(cli.font),
        ..Options::default()
    };

    println!("Processing SVG files in {}\n", dir.display());

    let result = process_directory_with(&dir, &options, |path, result| {
        let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
        println!("Processing: {}", name);
        match result {
            Ok(report) if report.changes.is_modified() => {
                print_changes(&report.changes, &options);
                println!("  + Modified and saved");
            }
            Ok(_) => println!("  - No changes needed"),
            Err(e) => println!("  x Error: {}", e),
        }
    });

    let summary = match result {
        Ok(summary) => summary,
        Err(SvgError::DirectoryNotFound(dir)) => {
            eprintln!("Directory not found: {}", dir.display());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("\n=== Summary ===");
    println!("Files processed: {}", summary.processed());
    println!("Files modified: {}", summary.modified());
    println!("Files unchanged: {}", summary.unchanged());
    if !summary.failed.is_empty() {
        println!("Files failed: {}", summary.failed.len());
    }

    Ok(())
}

/// Help and version output is left to clap; usage errors are reported by us.
fn exits_with_clap(e: &clap::Error) -> bool {
    matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn print_changes(changes: &Changes, options: &Options) {
    if changes.viewbox_added {
        println!("    Added viewBox");
    }
    if changes.rects_removed > 0 {
        println!("    Rectangles removed: {}", changes.rects_removed);
    }
    if changes.fonts_changed > 0
        && let Some(target) = &options.target_font
    {
        println!(
            "    Fonts changed ({} -> {}): {}",
            options.source_font, target, changes.fonts_changed
        );
    }
    if changes.attributes_cleaned > 0 {
        println!("    Attributes cleaned: {}", changes.attributes_cleaned);
    }
    if changes.transforms_applied > 0 || changes.groups_folded > 0 {
        println!(
            "    Transforms applied: {} (groups folded: {})",
            changes.transforms_applied, changes.groups_folded
        );
    }
    if changes.empty_groups_removed > 0 {
        println!("    Empty elements removed: {}", changes.empty_groups_removed);
    }
}
