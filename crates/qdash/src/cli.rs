#![forbid(unsafe_code)]

//! Command-line argument parsing for the `qdash` binary.
//!
//! Parses args manually to keep the binary lean. Environment variables
//! (`QDASH_*`) supply defaults; explicit flags override them.

use std::env;
use std::path::PathBuf;

use qdash_core::MarginConfig;
use qdash_runtime::PreferenceValue;

use crate::Error;

/// Crate version, printed by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Usage text.
pub const HELP_TEXT: &str = "\
qdash - inspect and drive dashboard state

USAGE:
    qdash [--state-file=PATH] <COMMAND> [OPTIONS]

COMMANDS:
    pref get                 Print the stored 'expandable' preference
    pref set <BOOL>          Store it (true/false, 1/0, yes/no, on/off)
    pref toggle              Flip it and print the new value
    style [OPTIONS]          Confirm a save dialog and print the container CSS
        --height=TEXT        Save a fixed height (px, vh, %, em, rem)
        --full-viewport      Save with no height override (default)
        --top-margin=LEN     Top margin subtracted from 100vh (default: 37px)
        --right-margin=LEN   Right margin subtracted from 100vw (default: 0px)
    editor [OPTIONS]         Mount a query editor and print its state
        --focused            Mount with focus supplied by the caller
        --toggle             Press the expand/fixed toggle once

OPTIONS:
    --state-file=PATH        Preference file (overrides QDASH_STATE_FILE)
    --help, -h               Show this help message
    --version, -V            Show version

ENVIRONMENT VARIABLES:
    QDASH_STATE_FILE         Preference file path
    QDASH_TOP_MARGIN         Default for --top-margin
    QDASH_RIGHT_MARGIN       Default for --right-margin
    QDASH_LOG                Log filter directives (default: warn)
    QDASH_LOG_FORMAT         'human' (default) or 'json'

EXIT STATUS:
    0  success
    1  usage or storage error
    2  invalid height";

/// What to do with the `expandable` preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefAction {
    Get,
    Set(bool),
    Toggle,
}

/// Arguments of `qdash style`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleArgs {
    /// Raw `--height` text; `None` saves with the full viewport.
    pub height: Option<String>,
    /// Margin overrides, flags first then environment.
    pub margins: MarginConfig,
}

/// Arguments of `qdash editor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorArgs {
    pub focused: bool,
    pub toggle: bool,
}

/// A parsed subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Version,
    Pref(PrefAction),
    Style(StyleArgs),
    Editor(EditorArgs),
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Explicit preference file; `None` leaves the choice to
    /// `QDASH_STATE_FILE` and the platform default.
    pub state_file: Option<PathBuf>,
    pub command: Command,
}

impl Opts {
    /// Parse the process arguments and environment.
    pub fn parse() -> Result<Self, Error> {
        let args: Vec<String> = env::args().skip(1).collect();
        Self::parse_from(&args, MarginConfig::from_env())
    }

    /// Parse `args` (without the program name); `env_margins` fills margins
    /// the flags leave unset.
    pub fn parse_from(args: &[String], env_margins: MarginConfig) -> Result<Self, Error> {
        let mut state_file = None;
        let mut rest = Vec::new();
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Self::bare(Command::Help)),
                "--version" | "-V" => return Ok(Self::bare(Command::Version)),
                other => {
                    if let Some(path) = other.strip_prefix("--state-file=") {
                        if path.is_empty() {
                            return Err(usage("--state-file needs a path"));
                        }
                        state_file = Some(PathBuf::from(path));
                    } else {
                        rest.push(other);
                    }
                }
            }
        }

        let Some((&name, tail)) = rest.split_first() else {
            return Err(usage("missing command"));
        };
        let command = match name {
            "pref" => Command::Pref(parse_pref(tail)?),
            "style" => Command::Style(parse_style(tail, env_margins)?),
            "editor" => Command::Editor(parse_editor(tail)?),
            other => return Err(usage(format!("unknown command: {other}"))),
        };
        Ok(Self {
            state_file,
            command,
        })
    }

    fn bare(command: Command) -> Self {
        Self {
            state_file: None,
            command,
        }
    }
}

fn usage(message: impl Into<String>) -> Error {
    Error::Usage(message.into())
}

fn parse_pref(args: &[&str]) -> Result<PrefAction, Error> {
    match args {
        ["get"] => Ok(PrefAction::Get),
        ["toggle"] => Ok(PrefAction::Toggle),
        ["set", value] => bool::decode(value)
            .map(PrefAction::Set)
            .ok_or_else(|| usage(format!("not a boolean: {value}"))),
        ["set"] => Err(usage("pref set needs a value")),
        [] => Err(usage("pref needs get, set or toggle")),
        [other, ..] => Err(usage(format!("unknown pref action: {other}"))),
    }
}

fn parse_style(args: &[&str], env_margins: MarginConfig) -> Result<StyleArgs, Error> {
    let mut height = None;
    let mut full_viewport = false;
    let mut flags = MarginConfig::new();
    for &arg in args {
        if arg == "--full-viewport" {
            full_viewport = true;
        } else if let Some(val) = arg.strip_prefix("--height=") {
            height = Some(val.to_owned());
        } else if let Some(val) = arg.strip_prefix("--top-margin=") {
            flags.top_margin = Some(val.to_owned());
        } else if let Some(val) = arg.strip_prefix("--right-margin=") {
            flags.right_margin = Some(val.to_owned());
        } else {
            return Err(usage(format!("unknown style option: {arg}")));
        }
    }
    if full_viewport && height.is_some() {
        return Err(usage("--height and --full-viewport are mutually exclusive"));
    }
    Ok(StyleArgs {
        height,
        margins: flags.or(env_margins),
    })
}

fn parse_editor(args: &[&str]) -> Result<EditorArgs, Error> {
    let mut opts = EditorArgs::default();
    for &arg in args {
        match arg {
            "--focused" => opts.focused = true,
            "--toggle" => opts.toggle = true,
            other => return Err(usage(format!("unknown editor option: {other}"))),
        }
    }
    Ok(opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Opts, Error> {
        let args: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();
        Opts::parse_from(&args, MarginConfig::new())
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["pref", "--help"]).unwrap().command, Command::Help);
        assert_eq!(parse(&["-V"]).unwrap().command, Command::Version);
    }

    #[test]
    fn pref_actions() {
        assert_eq!(parse(&["pref", "get"]).unwrap().command, Command::Pref(PrefAction::Get));
        assert_eq!(
            parse(&["pref", "set", "off"]).unwrap().command,
            Command::Pref(PrefAction::Set(false))
        );
        assert_eq!(
            parse(&["pref", "toggle"]).unwrap().command,
            Command::Pref(PrefAction::Toggle)
        );
        assert!(matches!(parse(&["pref", "set", "maybe"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["pref"]), Err(Error::Usage(_))));
    }

    #[test]
    fn style_flags_override_env() {
        let args: Vec<String> = ["style", "--height=600px", "--top-margin=10px"]
            .iter()
            .map(|a| (*a).to_owned())
            .collect();
        let env_margins = MarginConfig::new()
            .with_top_margin("99px")
            .with_right_margin("5px");
        let opts = Opts::parse_from(&args, env_margins).unwrap();
        let Command::Style(style) = opts.command else {
            panic!("expected style command");
        };
        assert_eq!(style.height.as_deref(), Some("600px"));
        assert_eq!(style.margins.top_margin.as_deref(), Some("10px"));
        assert_eq!(style.margins.right_margin.as_deref(), Some("5px"));
    }

    #[test]
    fn style_rejects_conflicting_heights() {
        assert!(matches!(
            parse(&["style", "--height=1px", "--full-viewport"]),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn state_file_flag_anywhere() {
        let opts = parse(&["pref", "--state-file=/tmp/a.json", "get"]).unwrap();
        assert_eq!(opts.state_file, Some(PathBuf::from("/tmp/a.json")));
        assert_eq!(opts.command, Command::Pref(PrefAction::Get));
        assert!(matches!(parse(&["--state-file=", "pref", "get"]), Err(Error::Usage(_))));
    }

    #[test]
    fn unknown_input_is_usage_error() {
        assert!(matches!(parse(&[]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["frobnicate"]), Err(Error::Usage(_))));
        assert!(matches!(parse(&["editor", "--wide"]), Err(Error::Usage(_))));
    }

    #[test]
    fn help_text_lists_env_vars() {
        assert!(HELP_TEXT.contains("QDASH_STATE_FILE"));
        assert!(HELP_TEXT.contains("QDASH_TOP_MARGIN"));
        assert!(HELP_TEXT.contains("QDASH_LOG"));
    }
}
