// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::time::Duration;

use clap::Parser;

use crate::rain::Settings;

pub const DEFAULT_FRAME_DELAY_MS: u64 = 80;
pub const DEFAULT_QUIT_KEY: char = 'q';

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rainterm",
    about = "Digital rain with a live clock for the terminal",
    disable_version_flag = true,
    allow_negative_numbers = true
)]
pub struct Args {
    #[arg(
        value_name = "DELAY_MS",
        help = "Frame delay in milliseconds (default 80)"
    )]
    pub delay: Option<String>,

    /// Anything past the delay; only here so it can be reported as usage.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,

    #[arg(
        short = 'k',
        long = "quit-key",
        default_value_t = DEFAULT_QUIT_KEY,
        help = "Key that stops the rain"
    )]
    pub quit_key: char,

    #[arg(long = "info", short = 'i', help = "Print version info and exit")]
    pub info: bool,

    #[arg(long = "version", short = 'v', help = "Print version and exit")]
    pub version: bool,
}

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Launch {
    Run(Settings),
    /// Print usage and exit with this code.
    Usage(i32),
}

pub fn interpret(args: &Args) -> Launch {
    if !args.extra.is_empty() {
        return Launch::Usage(0);
    }

    let delay_ms = match args.delay.as_deref() {
        None => DEFAULT_FRAME_DELAY_MS,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(ms) => ms,
            Err(_) => return Launch::Usage(1),
        },
    };

    Launch::Run(Settings {
        frame_delay: Duration::from_millis(delay_ms),
        quit_key: args.quit_key,
    })
}

pub fn usage_text(quit_key: char) -> String {
    format!(
        "USAGE:\n  rainterm [frame delay in milliseconds]\n\nNo arguments required. Default frame delay is {} ms.\nHit '{}' to exit.\n",
        DEFAULT_FRAME_DELAY_MS, quit_key
    )
}

pub fn print_usage(quit_key: char) {
    let text = usage_text(quit_key);
    if color_enabled_stdout() {
        if let Some(rest) = text.strip_prefix("USAGE:") {
            print!("\x1b[1;36mUSAGE:\x1b[0m{}", rest);
            return;
        }
    }
    print!("{}", text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(argv: &[&str]) -> Launch {
        let mut full = vec!["rainterm"];
        full.extend_from_slice(argv);
        interpret(&Args::try_parse_from(full).unwrap())
    }

    #[test]
    fn no_args_uses_default_delay() {
        assert_eq!(
            launch(&[]),
            Launch::Run(Settings {
                frame_delay: Duration::from_millis(80),
                quit_key: 'q',
            })
        );
    }

    #[test]
    fn delay_override() {
        match launch(&["30"]) {
            Launch::Run(s) => assert_eq!(s.frame_delay, Duration::from_millis(30)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn too_many_args_is_usage_with_success() {
        assert_eq!(launch(&["10", "20"]), Launch::Usage(0));
        assert_eq!(launch(&["10", "20", "30"]), Launch::Usage(0));
    }

    #[test]
    fn bad_delay_is_usage_with_failure() {
        assert_eq!(launch(&["fast"]), Launch::Usage(1));
        assert_eq!(launch(&["-5"]), Launch::Usage(1));
        assert_eq!(launch(&["1.5"]), Launch::Usage(1));
    }

    #[test]
    fn quit_key_override() {
        match launch(&["-k", "x", "40"]) {
            Launch::Run(s) => {
                assert_eq!(s.quit_key, 'x');
                assert_eq!(s.frame_delay, Duration::from_millis(40));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn multi_char_quit_key_is_rejected_by_parser() {
        assert!(Args::try_parse_from(["rainterm", "--quit-key", "qq"]).is_err());
    }

    #[test]
    fn usage_mentions_default_and_key() {
        let text = usage_text('q');
        assert!(text.contains("80 ms"));
        assert!(text.contains("'q'"));
    }
}
