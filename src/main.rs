// Copyright (c) 2026 rezky_nightky

mod cell;
mod clock;
mod config;
mod density;
mod droplet;
mod error;
mod frame;
mod palette;
mod pool;
mod rain;
mod runtime;
mod surface;
mod terminal;

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
use std::thread;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM, SIGWINCH};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{print_usage, Args, Launch};
use crate::palette::{detect_color_mode, Palette};
use crate::rain::Rain;
use crate::surface::ResizeFlag;
use crate::terminal::{restore_terminal_best_effort, Terminal};

fn build_info() -> String {
    let sha = env!("RAINTERM_GIT_SHA");
    if sha.is_empty() {
        env!("RAINTERM_BUILD").to_string()
    } else {
        format!("{} ({})", env!("RAINTERM_BUILD"), sha)
    }
}

/// Different on every run: pid mixed with the wall clock.
fn process_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ ((std::process::id() as u64) << 32)
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn watch_resize(flag: &ResizeFlag) {
    #[cfg(unix)]
    {
        if let Err(e) = signal_hook::flag::register(SIGWINCH, flag.shared()) {
            eprintln!("warning: can't watch SIGWINCH ({}); relying on resize events", e);
        }
    }
    #[cfg(not(unix))]
    {
        let _ = flag;
    }
}

fn main() {
    let args = match Args::try_parse_from(env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            use clap::error::ErrorKind;
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            eprintln!("{}", e);
            print_usage(config::DEFAULT_QUIT_KEY);
            std::process::exit(1);
        }
    };

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return;
    }

    let settings = match config::interpret(&args) {
        Launch::Run(settings) => settings,
        Launch::Usage(code) => {
            print_usage(args.quit_key);
            std::process::exit(code);
        }
    };

    install_exit_handlers();

    let resize = ResizeFlag::new();
    watch_resize(&resize);

    let palette = Palette::new(detect_color_mode());
    let term = match Terminal::acquire(palette, resize) {
        Ok(term) => term,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut rain = Rain::new(term, StdRng::seed_from_u64(process_seed()), settings);
    let res = rain.run();
    // Leave raw mode before reporting anything.
    drop(rain);

    if let Err(e) = res {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
