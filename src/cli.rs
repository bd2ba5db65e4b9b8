use clap::{Args, Parser, Subcommand};
use stamp_config::Fields;
use stamp_naming::MediaType;
use std::path::PathBuf;
use time::Date;
use time::macros::format_description;

#[derive(Parser)]
#[command(version, about = "Rename, convert and bundle media deliverables.")]
pub struct Cli {
    /// Configuration file, layered over the standard locations.
    #[arg(long, global = true, env = "STAMP_CONFIG")]
    pub config: Option<PathBuf>,
    /// More logging; repeat for more detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,
    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Prints the name each file would be renamed to.
    Preview {
        #[command(flatten)]
        input: Input,
    },
    /// Renames files and bundles them into a ZIP archive (or a directory).
    Bundle {
        #[command(flatten)]
        input: Input,
        /// Archive file name; `.zip` is appended when missing.
        #[arg(long, value_name = "NAME")]
        zip: Option<String>,
        /// Compress archive entries, optionally naming the method (store, deflate).
        #[arg(long, visible_alias = "method", value_name = "METHOD")]
        compress: Option<Option<String>>,
        /// Convert PNG images and compressed audio before renaming.
        #[arg(long)]
        convert: bool,
        /// Where the archive is written. With `--no-zip` the renamed files are copied here.
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
        /// Copy renamed files into the output directory instead of archiving them.
        #[arg(long, conflicts_with = "zip")]
        no_zip: bool,
    },
    /// Converts files (PNG to JPEG, compressed audio to WAV).
    Convert {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write converted files here instead of next to their sources.
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Lists media types, asset types and locations.
    Options,
    /// Prints conversion and archive capabilities.
    Doctor,
}

/// The files of a batch and the naming fields applied to them.
#[derive(Args)]
pub struct Input {
    /// Files or directories; directories are walked recursively.
    pub files: Vec<PathBuf>,
    /// A TOML batch description: ordered files with optional per-file `title` and `file_name`.
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Default)]
pub struct FieldArgs {
    /// Production stage (FINAL, DRAFT, ...).
    #[arg(long)]
    pub stage: Option<String>,
    #[arg(long)]
    pub entity: Option<String>,
    /// Leave the date out of generated names.
    #[arg(long)]
    pub no_date: bool,
    /// Date to stamp, as MMDDYYYY or YYYY-MM-DD. Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<Date>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub artist: Option<String>,
    /// Batch-wide title, overriding every per-file title.
    #[arg(long)]
    pub title: Option<String>,
    /// audio, video or image.
    #[arg(long, value_parser = parse_media_type)]
    pub media_type: Option<MediaType>,
    #[arg(long)]
    pub asset_type: Option<String>,
    #[arg(long)]
    pub creative1: Option<String>,
    #[arg(long)]
    pub creative2: Option<String>,
    #[arg(long)]
    pub uploader: Option<String>,
    /// An upon template replacing the built-in layout.
    #[arg(long)]
    pub template: Option<String>,
    /// Keep the template output's case.
    #[arg(long)]
    pub preserve_case: bool,
}
impl FieldArgs {
    /// The convention fields given on the command line.
    pub fn fields(&self) -> Fields {
        Fields {
            production_stage: self.stage.clone(),
            entity: self.entity.clone(),
            include_date: self.no_date.then_some(false),
            media_type: self.media_type,
            asset_type: self.asset_type.clone(),
            location: self.location.clone(),
            artist: self.artist.clone(),
            title: self.title.clone(),
            creative1: self.creative1.clone(),
            creative2: self.creative2.clone(),
            uploader: self.uploader.clone(),
        }
    }
}

fn parse_date(value: &str) -> Result<Date, String> {
    let value = value.trim();
    let compact = format_description!("[month][day][year]");
    let iso = format_description!("[year]-[month]-[day]");
    Date::parse(value, &compact)
        .or_else(|_| Date::parse(value, &iso))
        .map_err(|_| format!("{value:?} is not a date (expected MMDDYYYY or YYYY-MM-DD)"))
}

fn parse_media_type(value: &str) -> Result<MediaType, String> {
    value.parse::<MediaType>().map_err(|e| (*e).to_string())
}
