use crate::config::{Config, load_config};
use crate::ir::FamilyData;
use crate::layout::{TreeLayout, compute_layout_with_config};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_family;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "famtree", version, about = "Family tree layout and renderer")]
pub struct Args {
    /// Family document (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, tree spacing, render size)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Person to center the tree on
    #[arg(long = "root-person")]
    pub root_person: Option<String>,

    /// User whose first person becomes the root
    #[arg(long = "user")]
    pub user: Option<String>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Log layout stages to stderr (repeat for more detail)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let parsed = parse_family(&input)?;
    if parsed.skipped_relations > 0 {
        tracing::warn!(
            skipped = parsed.skipped_relations,
            "relations with unknown types ignored"
        );
    }

    let layout = layout_document(
        &parsed.data,
        args.root_person.as_deref(),
        args.user.as_deref(),
        &config,
    )?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.tree, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => write_png(&layout, &config, args.output.as_ref())?,
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout, &config.tree)?,
            None => println!("{}", serde_json::to_string_pretty(&layout)?),
        },
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(layout: &TreeLayout, config: &Config, output: Option<&PathBuf>) -> Result<()> {
    let output = ensure_output(output, "png")?;
    let svg = render_svg(layout, &config.theme, &config.tree, &config.render);
    write_output_png(&svg, &output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_layout: &TreeLayout, _config: &Config, _output: Option<&PathBuf>) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Picks the root (`--root-person`, then `--user`, then the document's
/// current user) and lays the family out around it.
pub fn layout_document(
    data: &FamilyData,
    root_person: Option<&str>,
    user: Option<&str>,
    config: &Config,
) -> Result<TreeLayout> {
    let current_user = user.or(data.current_user_id.as_deref());
    let root = match root_person {
        Some(id) => data
            .person(id)
            .map(|person| person.id.clone())
            .ok_or_else(|| anyhow::anyhow!("Person {id} not found in the document"))?,
        None => {
            let user = current_user.ok_or_else(|| {
                anyhow::anyhow!("No root: pass --root-person or --user, or set currentUserId")
            })?;
            data.root_person_for_user(user)
                .ok_or_else(|| anyhow::anyhow!("User {user} owns no person in the document"))?
                .to_string()
        }
    };
    tracing::info!(root = %root, persons = data.persons.len(), "laying out family");
    Ok(compute_layout_with_config(
        &data.persons,
        &data.relations,
        &root,
        current_user,
        &config.tree,
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(feature = "png")]
fn ensure_output(output: Option<&PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Person, Relation, RelationType};

    fn data() -> FamilyData {
        FamilyData {
            persons: vec![
                Person::new("p1", "u1"),
                Person::new("p2", "u2"),
                Person::new("p3", "u1"),
            ],
            relations: vec![
                Relation::new("p1", "p2", RelationType::Spouse),
                Relation::new("p1", "p3", RelationType::Father),
            ],
            current_user_id: Some("u2".to_string()),
        }
    }

    #[test]
    fn parses_arguments() {
        let args = Args::try_parse_from([
            "famtree", "-i", "family.json", "-e", "json", "--root-person", "p3", "-vv",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.root_person.as_deref(), Some("p3"));
        assert_eq!(args.verbose, 2);
        assert_eq!(args.width, 1200.0);
    }

    #[test]
    fn root_resolution_prefers_explicit_person() {
        let config = Config::default();
        let layout = layout_document(&data(), Some("p3"), Some("u1"), &config).unwrap();
        let root = layout.person("p3").unwrap();
        assert_eq!((root.x, root.y), (0.0, 0.0));
        assert!(root.is_current_user);
    }

    #[test]
    fn root_resolution_falls_back_to_user_then_document() {
        let config = Config::default();
        let layout = layout_document(&data(), None, Some("u1"), &config).unwrap();
        assert_eq!(layout.person("p1").unwrap().x, 0.0);
        assert_eq!(layout.person("p1").unwrap().y, 0.0);

        let layout = layout_document(&data(), None, None, &config).unwrap();
        let root = layout.person("p2").unwrap();
        assert_eq!((root.x, root.y), (0.0, 0.0));
        assert!(root.is_current_user);
    }

    #[test]
    fn unresolvable_root_is_an_error() {
        let mut data = data();
        data.current_user_id = None;
        assert!(layout_document(&data, None, None, &Config::default()).is_err());
        assert!(layout_document(&data, None, Some("nobody"), &Config::default()).is_err());
        assert!(layout_document(&data, Some("p9"), None, &Config::default()).is_err());
    }
}
