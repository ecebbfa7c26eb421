//! Subcommand handlers.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::args::{Args, Command, ConfigAction};
use super::enums::CharacterSet;
use crate::codec::CsShareCodec;
use crate::config::{default_path as get_config_path, Config, ConfigError, DEFAULT_CONFIG};
use crate::converter::{Completion, Conversion, Converter};
use crate::names::{FileStore, NameAllocator};
use crate::preview::{preview_lines, PreviewOptions, MAX_PREVIEW_COLUMNS};
use crate::record::{self, normalize, DecodeError, ParameterRecord};
use crate::render::{preset_color, Canvas};

/// Errors surfaced to the user by the binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {what}: {source}")]
    Read {
        what: String,
        source: std::io::Error,
    },
    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid name '{0}': must be non-empty without path separators or quotes")]
    InvalidName(String),
    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),
    #[error("Failed to create async runtime: {0}")]
    Runtime(std::io::Error),
}

/// Load configuration and dispatch the parsed command.
pub fn run(args: Args) -> Result<(), CliError> {
    if let Command::Config {
        action: ConfigAction::Init,
    } = args.command
    {
        let path = args.config.unwrap_or_else(get_config_path);
        return init_config(&path);
    }

    let mut config = Config::resolve(args.config.as_deref())?;
    if let Some(dir) = args.store {
        config.store.dir = Some(dir);
    }

    match args.command {
        Command::Convert {
            code,
            name,
            alias,
            out,
            no_preview,
            charset,
            print_only,
        } => {
            let conversion = convert(&config, &code, name, alias)?;
            if print_only {
                print!("{}", conversion.cfg_text());
            } else {
                let dir = out.unwrap_or_else(|| config.output_dir());
                let path = write_cfg(&dir, &conversion)?;
                println!("Wrote {}", path.display());
            }
            println!("{}", conversion.alias_line());
            if config.preview.enabled && !no_preview {
                println!();
                let options = preview_options(&config, charset, false, None);
                print_preview(&conversion, config.canvas(), &options);
            }
            Ok(())
        }
        Command::Preview {
            code,
            charset,
            invert,
            width,
        } => {
            let record = record::decode(&CsShareCodec::new(), &code)?;
            let conversion = Conversion::build(record, config.canvas(), String::new());
            let options = preview_options(&config, charset, invert, width);
            print_preview(&conversion, config.canvas(), &options);
            Ok(())
        }
        Command::Show { code, json } => {
            let record = record::decode(&CsShareCodec::new(), &code)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                for line in describe(&record) {
                    println!("{}", line);
                }
            }
            Ok(())
        }
        Command::Normalize { file } => {
            let input = read_input(file.as_deref())?;
            println!("{}", normalize_json(&input)?);
            Ok(())
        }
        Command::Encode { file } => {
            let input = read_input(file.as_deref())?;
            println!("{}", encode_json(&input)?);
            Ok(())
        }
        Command::Watch {
            no_preview,
            charset,
        } => watch(&config, no_preview, charset),
        Command::Names => {
            list_names(&config);
            Ok(())
        }
        Command::Config { action } => {
            handle_config_action(action, &config, args.config.as_deref())
        }
    }
}

fn new_converter(config: &Config) -> Converter<FileStore> {
    let allocator = NameAllocator::new(FileStore::new(config.store_dir()));
    Converter::new(Arc::new(CsShareCodec::new()), allocator)
        .with_canvas(config.canvas())
        .with_prefix(config.prefix())
}

/// Decode `code` and name the result, allocating a name unless one is given.
///
/// The alias defaults to the config name.
pub fn convert(
    config: &Config,
    code: &str,
    name: Option<String>,
    alias: Option<String>,
) -> Result<Conversion, CliError> {
    if let Some(alias) = &alias {
        validate_name(alias)?;
    }
    let conversion = match name {
        Some(name) => {
            validate_name(&name)?;
            let record = record::decode(&CsShareCodec::new(), code)?;
            Conversion::build(record, config.canvas(), name)
        }
        None => {
            let mut converter = new_converter(config);
            match converter.submit(code) {
                Completion::Failed(e) => return Err(e.into()),
                _ => converter
                    .current()
                    .cloned()
                    .ok_or(CliError::Decode(DecodeError::InvalidShareCode))?,
            }
        }
    };
    Ok(match alias {
        Some(alias) => conversion.with_alias(alias),
        None => conversion,
    })
}

fn validate_name(name: &str) -> Result<(), CliError> {
    if name.trim().is_empty()
        || name.contains(['/', '\\', '"'])
        || name == "."
        || name == ".."
    {
        return Err(CliError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Write `<dir>/<name>.cfg`, creating `dir` if needed.
pub fn write_cfg(dir: &Path, conversion: &Conversion) -> Result<PathBuf, CliError> {
    let path = dir.join(conversion.file_name());
    std::fs::create_dir_all(dir).map_err(|e| CliError::Write {
        path: dir.to_path_buf(),
        source: e,
    })?;
    std::fs::write(&path, conversion.cfg_text()).map_err(|e| CliError::Write {
        path: path.clone(),
        source: e,
    })?;
    log::info!("wrote {}", path.display());
    Ok(path)
}

/// Config preview settings with CLI overrides applied.
pub fn preview_options(
    config: &Config,
    charset: Option<CharacterSet>,
    invert: bool,
    width: Option<u32>,
) -> PreviewOptions {
    let mut options = config.preview_options();
    if let Some(charset) = charset {
        options.charset = charset.into();
    }
    if invert {
        options.invert = true;
    }
    if let Some(width) = width.filter(|&w| w > 0) {
        options.columns = width.min(MAX_PREVIEW_COLUMNS);
    }
    options
}

fn print_preview(conversion: &Conversion, canvas: Canvas, options: &PreviewOptions) {
    for line in preview_lines(&conversion.primitives, canvas, options) {
        println!("{}", line);
    }
}

/// Human-readable summary of a record.
pub fn describe(record: &ParameterRecord) -> Vec<String> {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let color = if record.uses_custom_color() {
        let c = record.color;
        format!("custom ({}, {}, {})", c.r, c.g, c.b)
    } else {
        let c = preset_color(record.color_type);
        format!("preset {} ({}, {}, {})", record.color_type, c.r, c.g, c.b)
    };
    vec![
        format!("size:      {}", record.size),
        format!("thickness: {}", record.thickness),
        format!("gap:       {}", record.gap),
        format!(
            "outline:   {} ({})",
            record.outline,
            if record.draw_outline { "drawn" } else { "off" }
        ),
        format!("color:     {}", color),
        format!(
            "alpha:     {} ({})",
            record.alpha,
            if record.alpha_enabled { "enabled" } else { "disabled" }
        ),
        format!("t-style:   {}", yes_no(record.t_style)),
        format!("dot:       {}", yes_no(record.dot)),
    ]
}

/// Read a file, or stdin when `file` is `None`.
pub fn read_input(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| CliError::Read {
            what: format!("'{}'", path.display()),
            source: e,
        }),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| CliError::Read {
                    what: "stdin".to_string(),
                    source: e,
                })?;
            Ok(input)
        }
    }
}

/// Normalize a raw field JSON object into a pretty-printed record.
pub fn normalize_json(input: &str) -> Result<String, CliError> {
    let raw = serde_json::from_str(input)?;
    Ok(serde_json::to_string_pretty(&normalize(&raw))?)
}

/// Share code for a (possibly partial) record JSON object.
pub fn encode_json(input: &str) -> Result<String, CliError> {
    let raw = serde_json::from_str(input)?;
    Ok(CsShareCodec::new().encode(&normalize(&raw)))
}

fn watch(config: &Config, no_preview: bool, charset: Option<CharacterSet>) -> Result<(), CliError> {
    let options = preview_options(config, charset, false, None);
    let show_preview = config.preview.enabled && !no_preview;
    let canvas = config.canvas();
    let mut converter = new_converter(config);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    rt.block_on(converter.watch(stdin, |converter, completion| match completion {
        Completion::Applied => {
            if let Some(conversion) = converter.current() {
                println!("{}", conversion.alias_line());
                print!("{}", conversion.cfg_text());
                if show_preview {
                    print_preview(conversion, canvas, &options);
                }
                println!();
            }
        }
        Completion::Failed(e) => eprintln!("Error: {}", e),
        Completion::Cleared => log::info!("input cleared"),
        Completion::Stale => {}
    }))
    .map_err(|e| CliError::Read {
        what: "stdin".to_string(),
        source: e,
    })
}

fn list_names(config: &Config) {
    let store = FileStore::new(config.store_dir());
    let path = store.dir().to_path_buf();
    let names = NameAllocator::new(store).issued_names();

    if names.is_empty() {
        println!("No names issued yet.");
    } else {
        println!("Issued names:");
        for name in &names {
            println!("  {}", name);
        }
        println!();
        println!("Total: {}", names.len());
    }
    println!("Store: {}", path.display());
}

/// Handle config subcommand actions.
pub fn handle_config_action(
    action: ConfigAction,
    config: &Config,
    explicit: Option<&Path>,
) -> Result<(), CliError> {
    let config_path = explicit.map(PathBuf::from).unwrap_or_else(get_config_path);
    match action {
        ConfigAction::Show => {
            let options = config.preview_options();
            println!("Current configuration:");
            println!("  Output dir: {}", config.output_dir().display());
            println!("  Prefix: {}", config.prefix());
            println!("  Store dir: {}", config.store_dir().display());
            println!(
                "  Preview: {}",
                if config.preview.enabled { "yes" } else { "no" }
            );
            println!("  Charset: {}", options.charset.name());
            println!("  Width: {}", options.columns);
            println!("  Invert: {}", if options.invert { "yes" } else { "no" });
            println!("  Canvas: {}", config.canvas().width);
            println!();

            if config_path.exists() {
                println!("Config file: {} (exists)", config_path.display());
            } else {
                println!("Config file: {} (not found)", config_path.display());
            }
            Ok(())
        }
        ConfigAction::Init => init_config(&config_path),
    }
}

/// Write the default config file. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::ConfigExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CliError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, DEFAULT_CONFIG).map_err(|e| CliError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;

    println!("Created config file: {}", path.display());
    Ok(())
}
