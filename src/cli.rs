// Command line interface module
// Handles parsing of command line arguments

use crate::qterminal;
use clap::Parser;
use std::fmt;
use std::path::PathBuf;

/// pimpterm - Set a translucent background image for your terminal
#[derive(Parser, Debug)]
#[command(name = "pimpterm")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Background image absolute path (supply a directory for a random image)
    #[arg(short, long, value_name = "PATH")]
    pub target: PathBuf,

    /// Background image alpha value (0 - 255)
    #[arg(short, long, default_value = "127", value_parser = parse_alpha)]
    pub alpha: u8,

    /// Name of the terminal being customized (qterminal, gnome, xfce, mate)
    #[arg(short, long, value_name = "TERMINAL", value_parser = parse_terminal)]
    pub name: Terminal,

    /// Terminal configuration file to patch
    #[arg(short, long, value_name = "FILE", default_value = qterminal::DEFAULT_CONFIG)]
    pub config: String,
}

/// Terminal emulators known by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    QTerminal,
    /// Anything we have no config writer for yet
    Unsupported(String),
}

impl Terminal {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("qterminal") {
            Terminal::QTerminal
        } else {
            Terminal::Unsupported(name.to_string())
        }
    }

    /// Name used as the prefix of generated background images
    pub fn name(&self) -> &str {
        match self {
            Terminal::QTerminal => "qterminal",
            Terminal::Unsupported(name) => name,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed arguments with the config path resolved
#[derive(Debug)]
pub struct ParsedArgs {
    pub target: PathBuf,
    pub alpha: u8,
    pub terminal: Terminal,
    /// Absolute config path (`~/` expanded)
    pub config_path: PathBuf,
}

impl From<Args> for ParsedArgs {
    fn from(args: Args) -> Self {
        Self {
            target: args.target,
            alpha: args.alpha,
            terminal: args.name,
            config_path: qterminal::expand_home(&args.config),
        }
    }
}

/// Parse alpha value and ensure it's within valid range
fn parse_alpha(s: &str) -> Result<u8, String> {
    let alpha: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid alpha value: {s}"))?;
    u8::try_from(alpha).map_err(|_| "Alpha must be between 0 and 255".to_string())
}

fn parse_terminal(s: &str) -> Result<Terminal, String> {
    Ok(Terminal::from_name(s))
}

/// Parse command line arguments
pub fn parse_args() -> ParsedArgs {
    Args::parse().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_defaults_to_127() {
        let args = Args::try_parse_from(["pimpterm", "-t", "/tmp/a.png", "-n", "qterminal"]).unwrap();
        assert_eq!(args.alpha, 127);
        assert_eq!(args.name, Terminal::QTerminal);
    }

    #[test]
    fn test_alpha_range() {
        assert_eq!(parse_alpha("0"), Ok(0));
        assert_eq!(parse_alpha("255"), Ok(255));
        assert_eq!(parse_alpha(" 64 "), Ok(64));
        assert!(parse_alpha("256").is_err());
        assert!(parse_alpha("-1").is_err());
        assert!(parse_alpha("half").is_err());
    }

    #[test]
    fn test_out_of_range_alpha_is_usage_error() {
        let result =
            Args::try_parse_from(["pimpterm", "-t", "/tmp/a.png", "-n", "qterminal", "-a", "300"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_target_and_name_are_required() {
        assert!(Args::try_parse_from(["pimpterm", "-n", "qterminal"]).is_err());
        assert!(Args::try_parse_from(["pimpterm", "-t", "/tmp/a.png"]).is_err());
    }

    #[test]
    fn test_terminal_names() {
        assert_eq!(Terminal::from_name("QTerminal"), Terminal::QTerminal);
        assert_eq!(
            Terminal::from_name("gnome"),
            Terminal::Unsupported("gnome".to_string())
        );
        assert_eq!(Terminal::QTerminal.name(), "qterminal");
        assert_eq!(Terminal::from_name("mate").to_string(), "mate");
    }

    #[test]
    fn test_long_flags_and_config_override() {
        let args = Args::try_parse_from([
            "pimpterm",
            "--target",
            "/srv/walls",
            "--alpha",
            "200",
            "--name",
            "xfce",
            "--config",
            "/etc/qterminal.ini",
        ])
        .unwrap();
        let parsed = ParsedArgs::from(args);
        assert_eq!(parsed.target, PathBuf::from("/srv/walls"));
        assert_eq!(parsed.alpha, 200);
        assert_eq!(parsed.terminal, Terminal::Unsupported("xfce".to_string()));
        assert_eq!(parsed.config_path, PathBuf::from("/etc/qterminal.ini"));
    }
}
