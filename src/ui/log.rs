//! Unified logging system

use chrono::Local;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOGO: &str = r#"
                 __              __
  ___  ____ ___  / /_  ___  ____/ /
 / _ \/ __ `__ \/ __ \/ _ \/ __  /
/  __/ / / / / / /_/ /  __/ /_/ /   cluster
\___/_/ /_/ /_/_.___/\___/\__,_/    "#;

pub fn print_logo() {
	println!("{}", LOGO.bright_blue().bold());
	println!(
		"{}",
		format!("v{}  dedup · umap · hdbscan", env!("CARGO_PKG_VERSION"))
			.dimmed()
			.italic()
	);
}

pub struct Log;

impl Log {
	pub fn set_verbose(enabled: bool) {
		VERBOSE.store(enabled, Ordering::Relaxed);
	}

	pub fn is_verbose() -> bool {
		VERBOSE.load(Ordering::Relaxed)
	}
}

fn timestamp() -> ColoredString {
	Local::now().format("%H:%M:%S").to_string().dimmed()
}

pub fn info(msg: &str) {
	println!("[{}] {} {}", timestamp(), "ℹ".bright_blue().bold(), msg.bright_white());
}

pub fn success(msg: &str) {
	println!("[{}] {} {}", timestamp(), "✓".bright_green().bold(), msg.bright_white());
}

pub fn warn(msg: &str) {
	println!("[{}] {} {}", timestamp(), "⚠".bright_yellow().bold(), msg.bright_white());
}

pub fn error(msg: &str) {
	eprintln!("[{}] {} {}", timestamp(), "✗".bright_red().bold(), msg.bright_white());
}

pub fn debug(msg: &str) {
	if Log::is_verbose() {
		println!("[{}] {} {}", timestamp(), "⚙".bright_black().bold(), msg.dimmed());
	}
}
