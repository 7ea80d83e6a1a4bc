use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::Parser;
use colored::Colorize;

use crate::config;
use crate::core::PipelineParams;

fn parse_threshold(s: &str) -> Result<f32, String> {
	let val: f32 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=1.0).contains(&val) {
		Err(format!("threshold must be between 0.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.usage(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "embed-cluster",
	author,
	version,
	about = "Deduplicate, reduce and cluster file embeddings over HTTP",
	styles = styles(),
	after_help = format!(
		"{title}
  {bin}                        {default_desc}
  {bin} {port_args}            {port_desc}
  {bin} {dedup_args}   {dedup_desc}
  {bin} {seed_args}         {seed_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "embed-cluster".bright_blue(),
		default_desc = "Serve on 0.0.0.0:5001".dimmed(),
		port_args = "-p 8080".yellow(),
		port_desc = "Serve on another port".dimmed(),
		dedup_args = "--threshold 0.9".yellow(),
		dedup_desc = "Only drop very close duplicates".dimmed(),
		seed_args = "--seed 42 -v".yellow(),
		seed_desc = "Reproducible UMAP, debug output".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose")]
	pub verbose: bool,

	/// Interface to bind (default: $EMBED_CLUSTER_HOST or 0.0.0.0)
	#[arg(long = "host")]
	pub host: Option<String>,

	/// Port to listen on (default: $EMBED_CLUSTER_PORT or 5001)
	#[arg(short = 'p', long = "port")]
	pub port: Option<u16>,

	/// Cosine similarity above which an embedding counts as a duplicate
	#[arg(short = 't', long = "threshold", default_value_t = config::DUPLICATE_THRESHOLD, value_parser = parse_threshold)]
	pub threshold: f32,

	/// Skip duplicate removal (responses omit the "duplicates" key)
	#[arg(long = "no-dedup")]
	pub no_dedup: bool,

	/// Seed for the UMAP initial layout
	#[arg(long = "seed")]
	pub seed: Option<u64>,
}

impl Cli {
	/// Bind address, falling back to environment then built-in defaults
	pub fn addr(&self) -> String {
		let host = self.host.clone().unwrap_or_else(config::default_host);
		let port = self.port.unwrap_or_else(config::default_port);
		format!("{}:{}", host, port)
	}

	pub fn pipeline_params(&self) -> PipelineParams {
		let mut params = PipelineParams {
			dedup: !self.no_dedup,
			duplicate_threshold: self.threshold,
			..Default::default()
		};
		params.reduction.seed = self.seed;
		params
	}
}
