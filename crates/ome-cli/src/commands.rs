use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use ome_schema::{properties_of, EntityKind, Field};
use ome_store::{
    dangling_references, verify_minimum_populated, DanglingRef, InMemoryMetadataStore,
    MetadataRetrieve, MetadataRetrieveExt, MetadataRoot, MetadataStore, StoreConfig,
};
use ome_types::Value;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli, config: &CliConfig) -> anyhow::Result<()> {
    let format = config.format(cli.format);
    let store_config = config.store_config();
    match cli.command {
        Command::Schema(args) => cmd_schema(args, format),
        Command::Apply(args) => cmd_apply(args, &store_config, format),
        Command::Get(args) => cmd_get(args, format),
        Command::Count(args) => cmd_count(args, format),
    }
}

// ---------------------------------------------------------------------------
// schema
// ---------------------------------------------------------------------------

fn cmd_schema(args: SchemaArgs, format: OutputFormat) -> anyhow::Result<()> {
    let Some(name) = args.entity else {
        return list_entities(format);
    };
    let entity: EntityKind = name.parse()?;
    let rows: Vec<_> = properties_of(entity)
        .iter()
        .map(|def| {
            json!({
                "name": def.flat_name(),
                "kind": def.kind.to_string(),
                "repeated": def.is_repeated(),
                "variant": def.variant.map(|v| v.to_string()),
            })
        })
        .collect();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            let indices = entity.index_names().join(", ");
            println!("{} ({})", entity.to_string().bold(), indices.dimmed());
            for def in properties_of(entity) {
                let repeated = if def.is_repeated() { " [repeated]" } else { "" };
                println!("  {:<40} {}{}", def.flat_name(), def.kind.to_string().cyan(), repeated);
            }
        }
    }
    Ok(())
}

fn list_entities(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = EntityKind::ALL
                .iter()
                .map(|kind| {
                    json!({
                        "name": kind.to_string(),
                        "parent": kind.parent().map(|p| p.to_string()),
                        "indices": kind.index_names(),
                        "properties": properties_of(*kind).len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            for kind in EntityKind::ALL {
                let depth = kind.chain().len();
                println!(
                    "{}{} {}",
                    "  ".repeat(depth),
                    kind.to_string().bold(),
                    format!("({} properties)", properties_of(*kind).len()).dimmed()
                );
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

/// One write in a population script.
#[derive(Debug, Deserialize)]
pub struct ScriptEntry {
    /// Flattened accessor name, e.g. `PixelsSizeX`.
    pub field: String,
    #[serde(default)]
    pub path: Vec<usize>,
    pub value: serde_json::Value,
}

/// Outcome of `--check` over a populated store.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub missing: Vec<String>,
    pub dangling: Vec<DanglingRef>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.dangling.is_empty()
    }
}

fn cmd_apply(args: ApplyArgs, config: &StoreConfig, format: OutputFormat) -> anyhow::Result<()> {
    let (store, writes) = apply_script(&args.script, config)?;
    if let Some(out) = &args.out {
        save_root(out, &store.root())?;
    }
    let report = if args.check { Some(check_store(&store)) } else { None };

    match format {
        OutputFormat::Json => {
            let summary = json!({
                "writes": writes,
                "images": store.get_image_count(),
                "check": report,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            println!(
                "{} Applied {} writes ({} images)",
                "✓".green().bold(),
                writes,
                store.get_image_count()
            );
            if let Some(out) = &args.out {
                println!("  Root: {}", out.display().to_string().bold());
            }
            if let Some(report) = &report {
                for missing in &report.missing {
                    println!("  {} {}", "missing:".red(), missing);
                }
                for dangling in &report.dangling {
                    println!(
                        "  {} {} {:?} -> {}",
                        "dangling:".yellow(),
                        dangling.field,
                        dangling.path,
                        dangling.id
                    );
                }
            }
        }
    }

    if let Some(report) = report {
        if !report.is_clean() {
            bail!(
                "check failed: {} missing fields, {} dangling references",
                report.missing.len(),
                report.dangling.len()
            );
        }
    }
    Ok(())
}

/// Run the script at `path` against a fresh store. Returns the store and
/// the number of writes applied; the first rejected write aborts.
pub fn apply_script(
    path: &Path,
    config: &StoreConfig,
) -> anyhow::Result<(InMemoryMetadataStore, usize)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    let entries: Vec<ScriptEntry> = serde_json::from_str(&text)
        .with_context(|| format!("parsing script {}", path.display()))?;

    let store = InMemoryMetadataStore::with_config(config.clone());
    store.create_root();
    for (i, entry) in entries.iter().enumerate() {
        let field = Field::parse(&entry.field).with_context(|| format!("entry {i}"))?;
        let value = json_value(&entry.value).with_context(|| format!("entry {i}: {field}"))?;
        store
            .set(field, &entry.path, value)
            .with_context(|| format!("entry {i}: {field} at {:?}", entry.path))?;
    }
    tracing::debug!(writes = entries.len(), "applied script");
    Ok((store, entries.len()))
}

/// Minimum-population check on every image plus the reference pass.
pub fn check_store(store: &InMemoryMetadataStore) -> CheckReport {
    let missing = (0..store.get_image_count())
        .filter_map(|image| verify_minimum_populated(store, image).err())
        .map(|e| e.to_string())
        .collect();
    CheckReport {
        missing,
        dangling: dangling_references(store),
    }
}

/// Script values are plain JSON scalars; the store coerces them to the
/// property's kind.
fn json_value(v: &serde_json::Value) -> anyhow::Result<Value> {
    Ok(match v {
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Bool(b) => Value::Boolean(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => match n.as_f64() {
                Some(d) => Value::Double(d),
                None => bail!("number out of range: {n}"),
            },
        },
        other => bail!("expected a string, number or boolean, found {other}"),
    })
}

// ---------------------------------------------------------------------------
// get / count
// ---------------------------------------------------------------------------

fn cmd_get(args: GetArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_root(&args.root)?;
    let field = Field::parse(&args.field)?;
    let value = store.get(field, &args.indices);
    match format {
        OutputFormat::Json => {
            let out = json!({ "field": field, "path": args.indices, "value": value });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => match value {
            Some(v) => println!("{v}"),
            None => println!("{}", "(unset)".dimmed()),
        },
    }
    Ok(())
}

fn cmd_count(args: CountArgs, format: OutputFormat) -> anyhow::Result<()> {
    let store = open_root(&args.root)?;
    let entity: EntityKind = args.entity.parse()?;
    let count = store.count(entity, &args.indices);
    match format {
        OutputFormat::Json => {
            let out = json!({ "entity": entity.to_string(), "path": args.indices, "count": count });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => println!("{count}"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Root files
// ---------------------------------------------------------------------------

pub fn save_root(path: &Path, root: &MetadataRoot) -> anyhow::Result<()> {
    let json = root.to_json()?;
    std::fs::write(path, json).with_context(|| format!("writing root {}", path.display()))
}

pub fn load_root(path: &Path) -> anyhow::Result<MetadataRoot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading root {}", path.display()))?;
    MetadataRoot::from_json(&text).with_context(|| format!("parsing root {}", path.display()))
}

fn open_root(path: &Path) -> anyhow::Result<InMemoryMetadataStore> {
    let root = load_root(path)?;
    Ok(InMemoryMetadataStore::from_root(root, StoreConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ome_types::PixelType;

    const SCRIPT: &str = r#"[
        { "field": "ImageID", "path": [0], "value": "Image:0" },
        { "field": "PixelsID", "path": [0], "value": "Pixels:0" },
        { "field": "PixelsSizeX", "path": [0], "value": 512 },
        { "field": "PixelsSizeY", "path": [0], "value": 512 },
        { "field": "PixelsSizeZ", "path": [0], "value": 1 },
        { "field": "PixelsSizeC", "path": [0], "value": 1 },
        { "field": "PixelsSizeT", "path": [0], "value": 1 },
        { "field": "PixelsType", "path": [0], "value": "uint16" },
        { "field": "PixelsBigEndian", "path": [0], "value": false },
        { "field": "PixelsDimensionOrder", "path": [0], "value": "XYZCT" },
        { "field": "ChannelID", "path": [0, 0], "value": "Channel:0:0" }
    ]"#;

    fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("script.json");
        std::fs::write(&path, body).unwrap();
        path
    }

    // -----------------------------------------------------------------------
    // apply
    // -----------------------------------------------------------------------

    #[test]
    fn apply_populates_a_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), SCRIPT);
        let (store, writes) = apply_script(&script, &StoreConfig::default()).unwrap();
        assert_eq!(writes, 11);
        assert_eq!(store.get_image_count(), 1);
        assert_eq!(store.get_channel_count(0), 1);
        assert_eq!(store.get_pixels_type(0), Some(PixelType::Uint16));
        assert!(check_store(&store).is_clean());
    }

    #[test]
    fn apply_stops_at_first_rejected_write() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"[{ "field": "PixelsSizeX", "path": [0], "value": 0 }]"#,
        );
        let err = apply_script(&script, &StoreConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("PixelsSizeX"));
    }

    #[test]
    fn apply_rejects_unknown_fields_and_structured_values() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), r#"[{ "field": "PixelsSizeW", "value": 1 }]"#);
        assert!(apply_script(&script, &StoreConfig::default()).is_err());
        let script = write_script(dir.path(), r#"[{ "field": "ImageName", "path": [0], "value": [1] }]"#);
        assert!(apply_script(&script, &StoreConfig::default()).is_err());
    }

    #[test]
    fn apply_honours_sanitising_config() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"[{ "field": "ImageName", "path": [0], "value": "a\u0007b" }]"#,
        );
        let (store, _) = apply_script(&script, &StoreConfig::sanitizing()).unwrap();
        assert_eq!(store.get_image_name(0).as_deref(), Some("a b"));
    }

    #[test]
    fn check_reports_gaps_and_dangling_refs() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"[
                { "field": "ImageName", "path": [0], "value": "bare" },
                { "field": "ImageInstrumentRef", "path": [0], "value": "Instrument:4" }
            ]"#,
        );
        let (store, _) = apply_script(&script, &StoreConfig::default()).unwrap();
        let report = check_store(&store);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.dangling[0].id, "Instrument:4");
        assert!(!report.is_clean());
    }

    // -----------------------------------------------------------------------
    // Root files
    // -----------------------------------------------------------------------

    #[test]
    fn saved_root_reloads_identically() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), SCRIPT);
        let (store, _) = apply_script(&script, &StoreConfig::default()).unwrap();

        let out = dir.path().join("root.json");
        save_root(&out, &store.root()).unwrap();
        let reopened = open_root(&out).unwrap();
        assert_eq!(reopened.root(), store.root());
        assert_eq!(
            reopened.get(Field::parse("ChannelID").unwrap(), &[0, 0]),
            Some(Value::from("Channel:0:0"))
        );
        assert_eq!(reopened.count(EntityKind::Channel, &[0]), 1);
    }

    #[test]
    fn huge_script_index_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            r#"[{ "field": "ImageName", "path": [18446744073709551615], "value": "x" }]"#,
        );
        let err = apply_script(&script, &StoreConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("ImageName"));
    }

    #[test]
    fn malformed_root_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_root(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }

    #[test]
    fn missing_root_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_root(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn json_scalars_map_to_values() {
        assert_eq!(json_value(&json!(3)).unwrap(), Value::Integer(3));
        assert_eq!(json_value(&json!(2.5)).unwrap(), Value::Double(2.5));
        assert_eq!(json_value(&json!(true)).unwrap(), Value::Boolean(true));
        assert_eq!(json_value(&json!("x")).unwrap(), Value::from("x"));
        assert!(json_value(&json!(null)).is_err());
    }
}
