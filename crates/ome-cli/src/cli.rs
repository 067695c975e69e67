use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "omemeta",
    about = "Inspect and populate OME metadata stores",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; falls back to the config file, then text
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List entity kinds, or the properties of one entity
    Schema(SchemaArgs),
    /// Run a JSON population script against a fresh store
    Apply(ApplyArgs),
    /// Read one property from a saved root
    Get(GetArgs),
    /// Count the instances of an entity in a saved root
    Count(CountArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Entity name, e.g. `Pixels` or `OME`
    pub entity: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    pub script: PathBuf,
    /// Write the resulting root as JSON
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Verify every image is minimally populated and all references resolve
    #[arg(long)]
    pub check: bool,
}

#[derive(Args)]
pub struct GetArgs {
    pub root: PathBuf,
    /// Flattened accessor name, e.g. `PixelsSizeX`
    pub field: String,
    pub indices: Vec<usize>,
}

#[derive(Args)]
pub struct CountArgs {
    pub root: PathBuf,
    pub entity: String,
    pub indices: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_schema() {
        let cli = Cli::try_parse_from(["omemeta", "schema"]).unwrap();
        if let Command::Schema(args) = cli.command {
            assert!(args.entity.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_schema_entity() {
        let cli = Cli::try_parse_from(["omemeta", "schema", "Pixels"]).unwrap();
        if let Command::Schema(args) = cli.command {
            assert_eq!(args.entity.as_deref(), Some("Pixels"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_apply() {
        let cli = Cli::try_parse_from(["omemeta", "apply", "s.json", "--out", "r.json", "--check"]).unwrap();
        if let Command::Apply(args) = cli.command {
            assert_eq!(args.script, PathBuf::from("s.json"));
            assert_eq!(args.out, Some(PathBuf::from("r.json")));
            assert!(args.check);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_get_with_indices() {
        let cli = Cli::try_parse_from(["omemeta", "get", "r.json", "ChannelID", "0", "2"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.field, "ChannelID");
            assert_eq!(args.indices, vec![0, 2]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_count() {
        let cli = Cli::try_parse_from(["omemeta", "count", "r.json", "Image"]).unwrap();
        if let Command::Count(args) = cli.command {
            assert_eq!(args.entity, "Image");
            assert!(args.indices.is_empty());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "omemeta", "count", "r.json", "Image", "--format", "json", "-v", "--config", "c.toml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    #[test]
    fn negative_index_is_rejected() {
        assert!(Cli::try_parse_from(["omemeta", "get", "r.json", "ImageName", "-1"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["omemeta", "schema", "--format", "xml"]).is_err());
    }
}
