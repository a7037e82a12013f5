//! `shopfront` command-line register.
//!
//! ```text
//! shopfront init
//! shopfront seed
//! shopfront inventory search ram --category Memory
//! shopfront sell --item 1:2 --service 3 --customer "Juan Dela Cruz"
//! shopfront report today
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use shopfront_core::{InventoryItem, Sale, Service};
use shopfront_db::seed::seed_demo_data;
use shopfront_register::commands::{self, CheckoutResponse, DailyReport, InventoryForm, ServiceForm};
use shopfront_register::error::ApiError;
use shopfront_register::state::{default_config_path, AppConfig, CartState, ConfigError};

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Parser)]
#[command(name = "shopfront", version, about = "Shopfront POS register")]
struct Cli {
    /// Config file (default: shopfront.toml in the platform config dir)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database and write a default config file
    Init,

    /// Load the demo catalog into empty tables
    Seed,

    /// Manage stocked products
    #[command(subcommand)]
    Inventory(InventoryCommand),

    /// Manage services
    #[command(subcommand)]
    Services(ServiceCommand),

    /// Record a sale
    Sell(SellArgs),

    /// Sales reports
    #[command(subcommand)]
    Report(ReportCommand),

    /// Show the effective configuration
    Config,
}

#[derive(Debug, Subcommand)]
enum InventoryCommand {
    List,
    Search {
        #[arg(default_value = "")]
        term: String,
        #[arg(long)]
        category: Option<String>,
    },
    Categories,
    Add(ItemArgs),
    Update {
        id: i64,
        #[command(flatten)]
        item: ItemArgs,
    },
    /// Items below the low-stock threshold
    LowStock {
        #[arg(long)]
        threshold: Option<i64>,
    },
    SetStock {
        id: i64,
        stock: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    category: Option<String>,
    /// Unit price, e.g. 1000 or 1000.50
    #[arg(long)]
    price: String,
    #[arg(long, default_value = "0")]
    stock: String,
}

impl From<ItemArgs> for InventoryForm {
    fn from(args: ItemArgs) -> Self {
        InventoryForm {
            name: args.name,
            brand: args.brand,
            category: args.category,
            price: args.price,
            stock: args.stock,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ServiceCommand {
    List,
    Search {
        #[arg(default_value = "")]
        term: String,
        #[arg(long)]
        category: Option<String>,
    },
    Add(ServiceArgs),
    Update {
        id: i64,
        #[command(flatten)]
        service: ServiceArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Debug, Args)]
struct ServiceArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    price: String,
    #[arg(long)]
    description: Option<String>,
}

impl From<ServiceArgs> for ServiceForm {
    fn from(args: ServiceArgs) -> Self {
        ServiceForm {
            name: args.name,
            category: args.category,
            price: args.price,
            description: args.description,
        }
    }
}

#[derive(Debug, Args)]
struct SellArgs {
    /// Inventory item as ID or ID:QTY (repeatable)
    #[arg(long = "item", value_parser = parse_line_spec)]
    items: Vec<LineSpec>,

    /// Service as ID or ID:QTY (repeatable)
    #[arg(long = "service", value_parser = parse_line_spec)]
    services: Vec<LineSpec>,

    #[arg(long)]
    customer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineSpec {
    id: i64,
    quantity: i64,
}

fn parse_line_spec(raw: &str) -> Result<LineSpec, String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, qty)) => (id, qty),
        None => (raw, "1"),
    };
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid id in '{}'", raw))?;
    let quantity = quantity
        .trim()
        .parse()
        .map_err(|_| format!("invalid quantity in '{}'", raw))?;
    Ok(LineSpec { id, quantity })
}

#[derive(Debug, Subcommand)]
enum ReportCommand {
    /// Today's sales
    Today,
    /// Sales on one date (YYYY-MM-DD)
    Date { date: NaiveDate },
    /// Every recorded sale, newest first
    All,
}

// =============================================================================
// Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    shopfront_register::init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                match serde_json::to_string(&err) {
                    Ok(body) => eprintln!("{}", body),
                    Err(_) => eprintln!("error: {}", err.message),
                }
            } else {
                eprintln!("error: {}", err.message);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ApiError> {
    let mut config = AppConfig::load(cli.config.clone())?;
    if let Some(path) = cli.db {
        config.database.path = Some(path);
    }
    let out = Output {
        json: cli.json,
        config: &config,
    };
    debug!(command = ?cli.command, "Running command");

    if let Command::Config = cli.command {
        return out.show(&config, |c| {
            println!("store.name              = {}", c.store.name);
            println!("store.currency_symbol   = {}", c.store.currency_symbol);
            println!("database.path           = {}", c.database_path().display());
            println!("database.busy_timeout_ms = {}", c.database.busy_timeout_ms);
            println!("database.max_connections = {}", c.database.max_connections);
            println!("inventory.low_stock_threshold = {}", c.inventory.low_stock_threshold);
            println!("inventory.strict_stock  = {}", c.inventory.strict_stock);
            println!("inventory.reject_missing_items = {}", c.inventory.reject_missing_items);
        });
    }

    let db = shopfront_register::open_database(&config).await?;

    let result = match cli.command {
        Command::Config => Ok(()),
        Command::Init => init(&db, &config, cli.config, &out).await,
        Command::Seed => {
            let summary = seed_demo_data(&db).await?;
            println!(
                "Seeded {} inventory items and {} services",
                summary.items, summary.services
            );
            Ok(())
        }
        Command::Inventory(cmd) => inventory(&db, &config, cmd, &out).await,
        Command::Services(cmd) => services(&db, cmd, &out).await,
        Command::Sell(args) => sell(&db, &config, args, &out).await,
        Command::Report(cmd) => report(&db, cmd, &out).await,
    };

    db.close().await;
    result
}

async fn init(
    db: &shopfront_db::Database,
    config: &AppConfig,
    config_path: Option<PathBuf>,
    out: &Output<'_>,
) -> Result<(), ApiError> {
    db.ensure_schema().await?;
    let (total, applied) = db.schema_status().await?;
    out.line(format!(
        "Database ready at {} ({}/{} migrations applied)",
        config.database_path().display(),
        applied,
        total
    ));

    let path = config_path
        .or_else(default_config_path)
        .ok_or(ConfigError::NoConfigDir)?;
    if path.exists() {
        out.line(format!("Config already present at {}", path.display()));
    } else {
        config.save(&path)?;
        out.line(format!("Config written to {}", path.display()));
    }
    Ok(())
}

async fn inventory(
    db: &shopfront_db::Database,
    config: &AppConfig,
    cmd: InventoryCommand,
    out: &Output<'_>,
) -> Result<(), ApiError> {
    match cmd {
        InventoryCommand::List => {
            let items = commands::list_inventory(db).await?;
            out.items(&items)
        }
        InventoryCommand::Search { term, category } => {
            let items = commands::search_inventory(db, &term, category.as_deref()).await?;
            out.items(&items)
        }
        InventoryCommand::Categories => {
            let categories = commands::list_inventory_categories(db).await?;
            out.show(&categories, |c| c.iter().for_each(|name| println!("{}", name)))
        }
        InventoryCommand::Add(args) => {
            let item = commands::add_inventory_item(db, args.into()).await?;
            out.items(std::slice::from_ref(&item))
        }
        InventoryCommand::Update { id, item } => {
            let item = commands::update_inventory_item(db, id, item.into()).await?;
            out.items(std::slice::from_ref(&item))
        }
        InventoryCommand::LowStock { threshold } => {
            let items = commands::low_stock(db, config, threshold).await?;
            out.items(&items)
        }
        InventoryCommand::SetStock { id, stock } => {
            let item = commands::set_stock(db, id, stock).await?;
            out.items(std::slice::from_ref(&item))
        }
        InventoryCommand::Delete { id } => {
            commands::delete_inventory_item(db, id).await?;
            out.line(format!("Deleted inventory item {}", id));
            Ok(())
        }
    }
}

async fn services(
    db: &shopfront_db::Database,
    cmd: ServiceCommand,
    out: &Output<'_>,
) -> Result<(), ApiError> {
    match cmd {
        ServiceCommand::List => {
            let services = commands::list_services(db).await?;
            out.services(&services)
        }
        ServiceCommand::Search { term, category } => {
            let services = commands::search_services(db, &term, category.as_deref()).await?;
            out.services(&services)
        }
        ServiceCommand::Add(args) => {
            let service = commands::add_service(db, args.into()).await?;
            out.services(std::slice::from_ref(&service))
        }
        ServiceCommand::Update { id, service } => {
            let service = commands::update_service(db, id, service.into()).await?;
            out.services(std::slice::from_ref(&service))
        }
        ServiceCommand::Delete { id } => {
            commands::delete_service(db, id).await?;
            out.line(format!("Deleted service {}", id));
            Ok(())
        }
    }
}

async fn sell(
    db: &shopfront_db::Database,
    config: &AppConfig,
    args: SellArgs,
    out: &Output<'_>,
) -> Result<(), ApiError> {
    let cart = CartState::new();
    for line in &args.items {
        commands::add_item_to_cart(db, &cart, line.id, line.quantity).await?;
    }
    for line in &args.services {
        commands::add_service_to_cart(db, &cart, line.id, line.quantity).await?;
    }
    if let Some(customer) = &args.customer {
        commands::set_customer_name(&cart, customer).await;
    }

    let response = commands::checkout(db, &cart, config).await?;
    info!(sale_id = %response.sale_id, "Sale recorded from CLI");
    out.checkout(&response)
}

async fn report(
    db: &shopfront_db::Database,
    cmd: ReportCommand,
    out: &Output<'_>,
) -> Result<(), ApiError> {
    match cmd {
        ReportCommand::Today => {
            let report = commands::today_report(db).await?;
            out.daily(&report)
        }
        ReportCommand::Date { date } => {
            let report = commands::daily_report(db, date).await?;
            out.daily(&report)
        }
        ReportCommand::All => {
            let history = commands::sales_history(db).await?;
            out.show(&history, |h| {
                out.sales(&h.sales);
                println!("{} sales, {}", h.sales.len(), out.money(h.total));
            })
        }
    }
}

// =============================================================================
// Output
// =============================================================================

struct Output<'a> {
    json: bool,
    config: &'a AppConfig,
}

impl Output<'_> {
    /// Prints `value` as JSON, or through `human` otherwise.
    fn show<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<(), ApiError> {
        if self.json {
            let body = serde_json::to_string_pretty(value)
                .map_err(|e| ApiError::internal(format!("Could not encode output: {}", e)))?;
            println!("{}", body);
        } else {
            human(value);
        }
        Ok(())
    }

    /// Status lines are suppressed in JSON mode.
    fn line(&self, message: String) {
        if !self.json {
            println!("{}", message);
        }
    }

    fn money(&self, amount: shopfront_core::Money) -> String {
        self.config.format_money(amount)
    }

    fn items(&self, items: &[InventoryItem]) -> Result<(), ApiError> {
        self.show(&items, |items| {
            println!(
                "{:>5}  {:<28} {:<12} {:<14} {:>12} {:>6}",
                "ID", "NAME", "BRAND", "CATEGORY", "PRICE", "STOCK"
            );
            for item in items.iter() {
                println!(
                    "{:>5}  {:<28} {:<12} {:<14} {:>12} {:>6}",
                    item.id,
                    item.name,
                    item.brand.as_deref().unwrap_or("-"),
                    item.category.as_deref().unwrap_or("-"),
                    self.money(item.price),
                    item.stock
                );
            }
        })
    }

    fn services(&self, services: &[Service]) -> Result<(), ApiError> {
        self.show(&services, |services| {
            println!("{:>5}  {:<28} {:<14} {:>12}  {}", "ID", "NAME", "CATEGORY", "PRICE", "DESCRIPTION");
            for service in services.iter() {
                println!(
                    "{:>5}  {:<28} {:<14} {:>12}  {}",
                    service.id,
                    service.name,
                    service.category.as_deref().unwrap_or("-"),
                    self.money(service.price),
                    service.description.as_deref().unwrap_or("")
                );
            }
        })
    }

    fn sales(&self, sales: &[Sale]) {
        for sale in sales {
            let customer = if sale.customer_name.is_empty() {
                "walk-in"
            } else {
                sale.customer_name.as_str()
            };
            println!(
                "#{:<5} {}  {:>12}  {} ({} lines)",
                sale.id,
                sale.sale_date,
                self.money(sale.total_amount),
                customer,
                sale.items.len()
            );
        }
    }

    fn daily(&self, report: &DailyReport) -> Result<(), ApiError> {
        self.show(report, |r| {
            println!("{} - {}", self.config.store.name, r.date);
            self.sales(&r.sales);
            println!(
                "{} sales, {} units, total {}",
                r.sale_count,
                r.units_sold,
                self.money(r.total)
            );
        })
    }

    fn checkout(&self, response: &CheckoutResponse) -> Result<(), ApiError> {
        self.show(response, |r| {
            println!("Sale #{} recorded on {}", r.sale_id, r.sale_date);
            for line in &r.items {
                println!(
                    "  {:>3} x {:<28} {:>12}",
                    line.quantity,
                    line.name,
                    self.money(line.total())
                );
            }
            println!("  Total {}", self.money(r.total));
            if !r.customer_name.is_empty() {
                println!("  Customer: {}", r.customer_name);
            }
            for adjustment in &r.clamped {
                println!(
                    "  warning: item {} had only {} in stock ({} sold)",
                    adjustment.item_id, adjustment.previous, adjustment.requested
                );
            }
        })
    }
}
