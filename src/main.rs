//! Command-line front end for the usage exporter.

// std
use std::{path::PathBuf, process::ExitCode};
// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{EnvFilter, fmt};
// self
use usage_export::{
	auth::Credentials,
	config::{Destination, ExportConfig},
	sink::remote::DEFAULT_UPLOAD_API,
	window::BatchSize,
};

/// Exports usage data from a self-hosted instance.
#[derive(Debug, Parser)]
#[command(name = "usage-export", version, about)]
struct Cli {
	/// Base URL of your instance, e.g. `https://spacelift.companyname.com`.
	#[arg(long)]
	base_url: String,
	/// API key id used for export purposes. Requires admin permissions.
	#[arg(long, env = "SPACELIFT_API_KEY_ID")]
	api_key_id: String,
	/// API key secret used for export purposes. Requires admin permissions.
	#[arg(long, env = "SPACELIFT_API_KEY_SECRET", hide_env_values = true)]
	api_key_secret: String,
	/// Export start date, format: YYYY-MM-DD.
	#[arg(long)]
	start_date: String,
	/// Export end date; this day is not included in the exported data. Format: YYYY-MM-DD.
	#[arg(long)]
	end_date: String,
	/// Number of days to export in a single batch.
	#[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..))]
	batch_size: u32,
	/// Skip TLS verification for calls to the instance.
	#[arg(long)]
	skip_tls_verification: bool,
	/// Send data directly to Spacelift instead of saving it locally.
	#[arg(long)]
	send_to_spacelift: bool,
	/// Directory receiving exported files when saving locally.
	#[arg(long, default_value = ".", conflicts_with = "send_to_spacelift")]
	output_dir: PathBuf,
	/// Public API serving presigned upload URLs.
	#[arg(long, default_value = DEFAULT_UPLOAD_API, hide = true)]
	upload_api_url: String,
}
impl Cli {
	fn into_config(self) -> usage_export::error::Result<ExportConfig> {
		let batch = BatchSize::from_days(self.batch_size).unwrap_or_default();
		let destination = if self.send_to_spacelift {
			Destination::Remote {
				api_base: ExportConfig::parse_url("upload API", &self.upload_api_url)?,
			}
		} else {
			Destination::Local { dir: self.output_dir }
		};

		Ok(ExportConfig {
			base_url: ExportConfig::parse_url("base", &self.base_url)?,
			credentials: Credentials::new(self.api_key_id, self.api_key_secret),
			start_date: self.start_date,
			end_date: self.end_date,
			batch,
			skip_tls_verification: self.skip_tls_verification,
			destination,
		})
	}
}

fn init_logging() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	fmt().with_env_filter(filter).with_target(true).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
	color_eyre::install()?;
	init_logging();

	let cli = Cli::parse();
	let outcome = match cli.into_config() {
		Ok(config) => config.run().await,
		Err(e) => Err(e),
	};

	match outcome {
		Ok(()) => Ok(ExitCode::SUCCESS),
		Err(e) => {
			tracing::error!("Export aborted: {e}");

			Ok(ExitCode::FAILURE)
		},
	}
}
