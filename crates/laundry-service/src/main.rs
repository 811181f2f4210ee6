//! Main entry point for the laundry ordering service.
//!
//! This binary runs an ordering session: it places the configured demo
//! orders, then advances them through pickup, processing and delivery on a
//! timer until interrupted. It also offers one-shot commands for pricing a
//! quantity and for listing the provider catalog.

use clap::{Parser, Subcommand};
use laundry_config::Config;
use laundry_core::SessionEngine;
use laundry_pricing::PriceQuote;
use laundry_types::{Order, ProviderCatalog, ServiceOffering};
use std::path::PathBuf;

mod factory_registry;

/// Command-line arguments for the laundry service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/demo.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
	/// Run a session until ctrl-c, advancing orders on a timer
	Run,
	/// Place the demo orders and run a fixed number of ticks immediately
	Simulate {
		/// Number of ticks to run
		#[arg(short, long, default_value_t = 3)]
		ticks: u32,
		/// Print the final order lists as JSON
		#[arg(long)]
		json: bool,
	},
	/// Price a quantity of a service
	Quote {
		/// Raw price expression, e.g. '$1.50/lb'
		#[arg(long, conflicts_with = "service")]
		price: Option<String>,
		/// Catalog service to price
		#[arg(long, required_unless_present = "price")]
		service: Option<String>,
		/// Number of items or pounds
		#[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
		quantity: u32,
	},
	/// List service offerings and providers
	Catalog,
}

/// Main entry point for the laundry service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file when the command needs it
/// 4. Dispatches to the selected command
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	match args.command.unwrap_or(Command::Run) {
		Command::Quote {
			price: Some(price),
			quantity,
			..
		} => {
			println!("{}", quote_line(&ServiceOffering::new("Custom", price), quantity)?);
		},
		Command::Quote {
			service, quantity, ..
		} => {
			let config = load_config(&args.config).await?;
			let service = service.unwrap_or_default();
			let offering = config
				.catalog
				.offering(&service)
				.ok_or_else(|| format!("Unknown service '{}'", service))?;
			println!("{}", quote_line(offering, quantity)?);
		},
		Command::Catalog => {
			let config = load_config(&args.config).await?;
			print!("{}", render_catalog(&config.catalog));
		},
		Command::Simulate { ticks, json } => {
			let config = load_config(&args.config).await?;
			let session = factory_registry::build_session_from_config(config)?;
			place_demo_orders(&session).await?;

			for _ in 0..ticks {
				session.tick().await;
			}

			let snapshot = session.snapshot().await;
			if json {
				println!("{}", serde_json::to_string_pretty(&snapshot)?);
			} else {
				for order in snapshot.active.iter().chain(&snapshot.completed) {
					println!("{}", render_order(order));
				}
			}
		},
		Command::Run => {
			let config = load_config(&args.config).await?;
			let session = factory_registry::build_session_from_config(config)?;
			place_demo_orders(&session).await?;

			tracing::info!("Starting session");
			session.run().await?;
			tracing::info!("Stopped session");
		},
	}

	Ok(())
}

async fn load_config(path: &std::path::Path) -> Result<Config, Box<dyn std::error::Error>> {
	let path = path
		.to_str()
		.ok_or_else(|| format!("Config path is not valid UTF-8: {}", path.display()))?;
	let config = Config::from_file(path).await?;
	tracing::info!("Loaded configuration [{}]", config.session.id);
	Ok(config)
}

/// Places every configured demo order, skipping the ones that fail validation.
async fn place_demo_orders(session: &SessionEngine) -> Result<usize, Box<dyn std::error::Error>> {
	let today = laundry_types::local_today();
	let mut placed = 0;

	for demo in &session.config().demo.orders {
		let draft = demo.to_draft(today)?;
		match session.place_order(&draft).await {
			Ok(order) => {
				placed += 1;
				tracing::info!(
					order_id = %order.short_id(),
					service = %order.service,
					total = %order.display_total(),
					"Placed demo order"
				);
			},
			Err(e) => {
				tracing::warn!(service = %demo.service, error = %e, "Skipping demo order");
			},
		}
	}

	Ok(placed)
}

fn quote_line(offering: &ServiceOffering, quantity: u32) -> Result<String, Box<dyn std::error::Error>> {
	let quote = PriceQuote::for_offering(offering, quantity)?;
	Ok(format!(
		"{}: {} x {}{} = {}",
		quote.service,
		quote.quantity_label(),
		quote.currency,
		quote.rate,
		quote.total_label()
	))
}

/// Renders an order card: badge, status, progress and the tracker row.
fn render_order(order: &Order) -> String {
	let display = order.status.display();
	let tracker: Vec<String> = order
		.status
		.tracker_steps()
		.iter()
		.map(|step| {
			let mark = if step.current {
				"●"
			} else if step.completed {
				"✓"
			} else {
				"○"
			};
			format!("{} {}", mark, step.label)
		})
		.collect();

	let mut card = format!(
		"#{} {} ({}) - {} [{}] {}%\n  {}",
		order.short_id(),
		order.service,
		order.quantity_label(),
		display.label,
		display.icon.as_str(),
		display.progress,
		tracker.join(" → ")
	);
	if let Some(stars) = order.rating {
		card.push_str(&format!("\n  Rated {}/5", stars));
	}
	card
}

fn render_catalog(catalog: &ProviderCatalog) -> String {
	let mut out = String::from("Services:\n");
	for offering in &catalog.offerings {
		out.push_str(&format!("  {:<16} {}\n", offering.name, offering.unit_price));
	}

	out.push_str("Providers:\n");
	for provider in &catalog.providers {
		let rating = provider
			.rating
			.map(|r| format!(" ★{:.1}", r))
			.unwrap_or_default();
		out.push_str(&format!("  {}{} - {}\n", provider.name, rating, provider.address));
		for offering in catalog.offerings_for(&provider.name) {
			out.push_str(&format!("    {} {}\n", offering.name, offering.unit_price));
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use laundry_types::testing::{sample_catalog, sample_order};
	use laundry_types::OrderStatus;
	use std::io::Write;
	use tempfile::NamedTempFile;

	const DEMO_CONFIG: &str = r#"
[session]
id = "cli-test"

[advance]
primary = "always"
[advance.implementations.always]

[[catalog.offerings]]
name = "Wash & Fold"
unit_price = "$1.50/lb"

[[demo.orders]]
service = "Wash & Fold"
address = "42 Elm Street"
items = 4

[[demo.orders]]
service = "Ironing"
address = "42 Elm Street"
items = 2
"#;

	#[test]
	fn test_args_default_values() {
		let args = Args::try_parse_from(["laundry"]).unwrap();

		assert_eq!(args.config, PathBuf::from("config/demo.toml"));
		assert_eq!(args.log_level, "info");
		assert_eq!(args.command, None);
	}

	#[test]
	fn test_quote_args() {
		let args =
			Args::try_parse_from(["laundry", "quote", "--price", "$1.50/lb", "--quantity", "4"])
				.unwrap();
		assert_eq!(
			args.command,
			Some(Command::Quote {
				price: Some("$1.50/lb".to_string()),
				service: None,
				quantity: 4,
			})
		);

		assert!(Args::try_parse_from(["laundry", "quote", "--quantity", "4"]).is_err());
	}

	#[test]
	fn test_quote_rejects_zero_quantity() {
		let result =
			Args::try_parse_from(["laundry", "quote", "--price", "$1.50/lb", "--quantity", "0"]);
		assert!(result.is_err());

		let args =
			Args::try_parse_from(["laundry", "quote", "--service", "Ironing", "-q", "1"]).unwrap();
		assert!(matches!(args.command, Some(Command::Quote { quantity: 1, .. })));
	}

	#[test]
	fn test_quote_line() {
		let line = quote_line(&ServiceOffering::new("Wash & Fold", "$1.50/lb"), 4).unwrap();
		assert_eq!(line, "Wash & Fold: 4 lbs x $1.50 = $6.00");

		assert!(quote_line(&ServiceOffering::new("Odd", "free"), 4).is_err());
	}

	#[test]
	fn test_render_order_marks_current_step() {
		let card = render_order(&sample_order(OrderStatus::Processing));

		assert!(card.contains("Processing [package] 50%"));
		assert!(card.contains("✓ Pickup → ● Processing → ○ Delivery → ○ Complete"));
	}

	#[test]
	fn test_render_catalog_groups_offerings_by_provider() {
		let out = render_catalog(&sample_catalog());

		assert!(out.contains("Fresh & Clean Laundry ★4.8 - 123 Main St"));
		assert!(out.contains("    Express $2.50/lb"));
	}

	#[tokio::test]
	async fn test_demo_orders_skip_invalid_entries() {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(DEMO_CONFIG.as_bytes()).unwrap();

		let config = load_config(file.path()).await.unwrap();
		let session = factory_registry::build_session_from_config(config).unwrap();

		assert_eq!(place_demo_orders(&session).await.unwrap(), 1);
		assert_eq!(session.snapshot().await.active.len(), 1);
	}
}
