//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::enums::CharacterSet;

/// Convert crosshair share codes into config files with a terminal preview
#[derive(Parser, Debug)]
#[command(name = "crosshair-cfg")]
#[command(version, about = "Crosshair share code to config converter", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Config file path
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for the issued-name store
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a share code and write a .cfg file
    Convert {
        /// Share code (CSGO-xxxxx-xxxxx-xxxxx-xxxxx-xxxxx)
        code: String,

        /// Use this name instead of allocating one
        #[arg(long, short)]
        name: Option<String>,

        /// Alias name (default: same as the config name)
        #[arg(long, short)]
        alias: Option<String>,

        /// Output directory (default: config or current directory)
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Skip the terminal preview
        #[arg(long)]
        no_preview: bool,

        /// Preview character set
        #[arg(long)]
        charset: Option<CharacterSet>,

        /// Print the config instead of writing a file
        #[arg(long)]
        print_only: bool,
    },
    /// Print a terminal preview of a share code
    Preview {
        code: String,

        /// Preview character set
        #[arg(long)]
        charset: Option<CharacterSet>,

        /// Invert brightness (for light terminals)
        #[arg(long)]
        invert: bool,

        /// Preview width in columns
        #[arg(long, short)]
        width: Option<u32>,
    },
    /// Print the normalized parameters of a share code
    Show {
        code: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Normalize a raw field JSON object (stdin when no file)
    Normalize { file: Option<PathBuf> },
    /// Encode a parameter JSON object as a share code (stdin when no file)
    Encode { file: Option<PathBuf> },
    /// Read share codes line by line from stdin and convert the latest
    Watch {
        /// Skip the terminal preview
        #[arg(long)]
        no_preview: bool,

        /// Preview character set
        #[arg(long)]
        charset: Option<CharacterSet>,
    },
    /// List names issued so far
    Names,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show effective configuration
    Show,
    /// Create default config file
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODE: &str = "CSGO-O4Jsi-V36wY-rTMGK-9w7qF-jQ8WB";

    #[test]
    fn test_args_convert_defaults() {
        let args = Args::parse_from(["crosshair-cfg", "convert", CODE]);
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
                assert_eq!(code, CODE);
                assert!(name.is_none());
                assert!(alias.is_none());
                assert!(out.is_none());
                assert!(!no_preview);
                assert!(charset.is_none());
                assert!(!print_only);
            }
            _ => panic!("Expected Convert subcommand"),
        }
        assert!(args.config.is_none());
        assert!(args.store.is_none());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_args_convert_options() {
        let args = Args::parse_from([
            "crosshair-cfg",
            "convert",
            CODE,
            "--name",
            "mine",
            "-a",
            "xh",
            "-o",
            "/tmp/out",
            "--no-preview",
            "--charset",
            "braille",
            "--print-only",
        ]);
        match args.command {
            Command::Convert {
                name,
                alias,
                out,
                no_preview,
                charset,
                print_only,
                ..
            } => {
                assert_eq!(name, Some("mine".to_string()));
                assert_eq!(alias, Some("xh".to_string()));
                assert_eq!(out, Some(PathBuf::from("/tmp/out")));
                assert!(no_preview);
                assert_eq!(charset, Some(CharacterSet::Braille));
                assert!(print_only);
            }
            _ => panic!("Expected Convert subcommand"),
        }
    }

    #[test]
    fn test_args_preview_options() {
        let args = Args::parse_from([
            "crosshair-cfg",
            "preview",
            CODE,
            "--invert",
            "-w",
            "60",
            "--charset",
            "blocks",
        ]);
        match args.command {
            Command::Preview {
                invert,
                width,
                charset,
                ..
            } => {
                assert!(invert);
                assert_eq!(width, Some(60));
                assert_eq!(charset, Some(CharacterSet::Blocks));
            }
            _ => panic!("Expected Preview subcommand"),
        }
    }

    #[test]
    fn test_args_show_json() {
        let args = Args::parse_from(["crosshair-cfg", "show", CODE, "--json"]);
        assert!(matches!(args.command, Command::Show { json: true, .. }));
    }

    #[test]
    fn test_args_normalize_and_encode_files() {
        let args = Args::parse_from(["crosshair-cfg", "normalize"]);
        assert!(matches!(args.command, Command::Normalize { file: None }));

        let args = Args::parse_from(["crosshair-cfg", "encode", "record.json"]);
        match args.command {
            Command::Encode { file } => assert_eq!(file, Some(PathBuf::from("record.json"))),
            _ => panic!("Expected Encode subcommand"),
        }
    }

    #[test]
    fn test_args_global_options_after_subcommand() {
        let args = Args::parse_from([
            "crosshair-cfg",
            "names",
            "--store",
            "/tmp/store",
            "-c",
            "/tmp/config.toml",
            "-vv",
        ]);
        assert!(matches!(args.command, Command::Names));
        assert_eq!(args.store, Some(PathBuf::from("/tmp/store")));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/config.toml")));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_args_watch_subcommand() {
        let args = Args::parse_from(["crosshair-cfg", "watch", "--no-preview"]);
        assert!(matches!(
            args.command,
            Command::Watch {
                no_preview: true,
                charset: None
            }
        ));
    }

    #[test]
    fn test_args_config_show_subcommand() {
        let args = Args::parse_from(["crosshair-cfg", "config", "show"]);
        match args.command {
            Command::Config {
                action: ConfigAction::Show,
            } => (),
            _ => panic!("Expected Config Show subcommand"),
        }
    }

    #[test]
    fn test_args_config_init_subcommand() {
        let args = Args::parse_from(["crosshair-cfg", "config", "init"]);
        match args.command {
            Command::Config {
                action: ConfigAction::Init,
            } => (),
            _ => panic!("Expected Config Init subcommand"),
        }
    }

    #[test]
    fn test_args_subcommand_required() {
        assert!(Args::try_parse_from(["crosshair-cfg"]).is_err());
    }

    #[test]
    fn test_args_rejects_unknown_charset() {
        assert!(
            Args::try_parse_from(["crosshair-cfg", "preview", CODE, "--charset", "emoji"]).is_err()
        );
    }
}
