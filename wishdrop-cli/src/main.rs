//! WishDrop CLI: price advice, catalog, profile and board commands.
//!
//! Commands:
//! - `simulate`: generate a price history for a current price
//! - `signal`: BUY / WAIT / CONSIDER for a price against a history CSV
//! - `advise`: advice for one catalog product, or all of them
//! - `catalog generate`: write a demo catalog CSV
//! - `catalog facets`: brands, stores and categories in a catalog
//! - `profile`: list, show, create and delete shopper profiles
//! - `board`: saved and tracked items per profile, CSV export of saved items
//! - `feed`: catalog items matching a profile
//! - `alerts`: tracked items close to their 30-day low

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use wishdrop_core::advisor::{AdviceView, Advisor};
use wishdrop_core::alerts::evaluate_alerts;
use wishdrop_core::catalog::{generate_catalog, write_products_csv, Catalog};
use wishdrop_core::domain::{PricePoint, PricePreference, PriceSeries, Profile, Sizes};
use wishdrop_core::feed::{personalized_feed, FeedFilter};
use wishdrop_core::signal::{Signal, SignalEngine};
use wishdrop_core::simulator::PriceHistorySimulator;
use wishdrop_core::store::{BoardStore, JsonFileStore, ProfileStore};
use wishdrop_core::WishdropConfig;

#[derive(Parser)]
#[command(
    name = "wishdrop",
    about = "WishDrop CLI: wishlist price advice and tracking"
)]
struct Cli {
    /// TOML config file. Defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides `data_dir` from the config).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose logging (debug level). RUST_LOG takes precedence.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a simulated daily price history ending today.
    Simulate {
        /// Current price.
        #[arg(long)]
        price: f64,

        /// Number of days. Defaults to the configured horizon (60).
        #[arg(long)]
        days: Option<usize>,

        /// Seed for a reproducible history.
        #[arg(long)]
        seed: Option<u64>,

        /// Write `date,price` CSV to stdout instead of a table.
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Evaluate a current price against a `date,price` history CSV.
    Signal {
        /// Current price.
        #[arg(long)]
        price: f64,

        /// History CSV with a `date,price` header, oldest first.
        #[arg(long)]
        series: PathBuf,

        /// Print the full signal as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Price advice for catalog products.
    Advise {
        /// Product id (e.g. P-1042).
        #[arg(long, required_unless_present = "all", conflicts_with = "all")]
        product: Option<String>,

        /// Advise every product in the catalog.
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Catalog CSV. Defaults to <data-dir>/sample_products.csv.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Session seed. A fresh one is drawn when omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Print JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Catalog commands.
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Shopper profile commands.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Board commands (saved and tracked items).
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },
    /// Show the personalized feed for a profile.
    Feed {
        /// Profile name.
        name: String,

        /// Minimum discount, in percent.
        #[arg(long, default_value_t = 10)]
        min_discount: u32,

        /// Case-insensitive search over name, brand and category.
        #[arg(long)]
        query: Option<String>,

        /// Catalog CSV. Defaults to <data-dir>/sample_products.csv.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Tracked items within their alert threshold of the 30-day low.
    Alerts {
        /// Profile name.
        name: String,

        /// Catalog CSV. Defaults to <data-dir>/sample_products.csv.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Session seed. A fresh one is drawn when omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Write a demo catalog of discounted luxury items.
    Generate {
        /// Number of products.
        #[arg(long, default_value_t = 100)]
        count: usize,

        /// Seed for a reproducible catalog.
        #[arg(long)]
        seed: Option<u64>,

        /// Output CSV. Defaults to <data-dir>/sample_products.csv.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the brands, stores and categories a profile can pick from.
    Facets {
        /// Catalog CSV. Defaults to <data-dir>/sample_products.csv.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List saved profile names.
    List,
    /// Print one profile as JSON.
    Show { name: String },
    /// Delete a profile.
    Delete { name: String },
    /// Create or replace a profile.
    Create {
        name: String,

        /// Height in inches (50-80).
        #[arg(long, default_value_t = 64, value_parser = clap::value_parser!(u32).range(50..=80))]
        height_in: u32,

        /// Weight in pounds (80-300).
        #[arg(long, default_value_t = 140, value_parser = clap::value_parser!(u32).range(80..=300))]
        weight_lb: u32,

        #[arg(long, default_value = "")]
        top: String,

        #[arg(long, default_value = "")]
        bottom: String,

        #[arg(long, default_value = "")]
        shoe: String,

        /// Style tags (repeatable).
        #[arg(long)]
        style: Vec<String>,

        #[arg(long, value_enum, default_value_t = PriceLevel::MidRange)]
        price_pref: PriceLevel,

        /// Preferred brands (repeatable). Empty means any.
        #[arg(long = "brand")]
        brands: Vec<String>,

        /// Preferred stores (repeatable). Empty means any.
        #[arg(long = "store")]
        stores: Vec<String>,

        /// Preferred categories (repeatable). Empty means any.
        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[derive(Subcommand)]
enum BoardAction {
    /// Print a profile's board as JSON.
    Show { name: String },
    /// Save an item to the board.
    Save { name: String, product: String },
    /// Track an item for price-drop alerts.
    Track {
        name: String,
        product: String,

        /// Alert threshold in percent (1-50). Without it an already tracked
        /// item keeps its threshold and a new one gets the configured default.
        #[arg(long)]
        threshold: Option<u32>,
    },
    /// Write the saved items as catalog CSV rows.
    Export {
        name: String,

        /// Output CSV. Writes to stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Catalog CSV. Defaults to <data-dir>/sample_products.csv.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Stop tracking an item.
    Untrack { name: String, product: String },
    /// Remove all saved items (tracking is kept).
    Clear { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum PriceLevel {
    Budget,
    MidRange,
    LuxuryOnly,
}

impl From<PriceLevel> for PricePreference {
    fn from(level: PriceLevel) -> Self {
        match level {
            PriceLevel::Budget => PricePreference::Budget,
            PriceLevel::MidRange => PricePreference::MidRange,
            PriceLevel::LuxuryOnly => PricePreference::LuxuryOnly,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => WishdropConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => WishdropConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    tracing::debug!(data_dir = %config.data_dir.display(), "config loaded");

    match cli.command {
        Commands::Simulate {
            price,
            days,
            seed,
            csv,
        } => run_simulate(&config, price, days, seed, csv),
        Commands::Signal {
            price,
            series,
            json,
        } => run_signal(&config, price, &series, json),
        Commands::Advise {
            product,
            all,
            catalog,
            seed,
            json,
        } => run_advise(&config, product, all, catalog, seed, json),
        Commands::Catalog { action } => match action {
            CatalogAction::Generate { count, seed, out } => {
                run_catalog_generate(&config, count, seed, out)
            }
            CatalogAction::Facets { catalog } => run_catalog_facets(&config, catalog),
        },
        Commands::Profile { action } => run_profile(&config, action),
        Commands::Board { action } => run_board(&config, action),
        Commands::Feed {
            name,
            min_discount,
            query,
            catalog,
        } => run_feed(&config, &name, min_discount, query, catalog),
        Commands::Alerts {
            name,
            catalog,
            seed,
        } => run_alerts(&config, &name, catalog, seed),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_catalog(config: &WishdropConfig, path: Option<PathBuf>) -> Result<Catalog> {
    let path = path.unwrap_or_else(|| config.catalog_path());
    if !path.exists() {
        bail!(
            "catalog not found: {} (create one with `wishdrop catalog generate`)",
            path.display()
        );
    }
    Catalog::from_csv_path(&path).with_context(|| format!("loading catalog {}", path.display()))
}

fn run_simulate(
    config: &WishdropConfig,
    price: f64,
    days: Option<usize>,
    seed: Option<u64>,
    csv: bool,
) -> Result<()> {
    let sim = PriceHistorySimulator::new(config.simulator.clone());
    let days = days.unwrap_or(config.simulator.days);
    let series = sim.simulate(price, days, seed)?;

    if csv {
        let mut wtr = csv::Writer::from_writer(std::io::stdout().lock());
        for point in series.points() {
            wtr.serialize(point)?;
        }
        wtr.flush()?;
        return Ok(());
    }

    let mut out = std::io::stdout().lock();
    for point in series.points() {
        writeln!(out, "{}  {:>10.2}", point.date, point.price)?;
    }
    let signal = SignalEngine::new(config.signal.clone()).evaluate(&series, price)?;
    writeln!(out)?;
    print_signal(&mut out, price, &signal)?;
    Ok(())
}

fn read_series(path: &Path) -> Result<PriceSeries> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening series {}", path.display()))?;
    let points = rdr
        .deserialize::<PricePoint>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parsing series {}", path.display()))?;
    Ok(PriceSeries::new(points)?)
}

fn run_signal(config: &WishdropConfig, price: f64, series: &Path, json: bool) -> Result<()> {
    let series = read_series(series)?;
    let signal = SignalEngine::new(config.signal.clone()).evaluate(&series, price)?;

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&signal)?)?;
    } else {
        print_signal(&mut out, price, &signal)?;
    }
    Ok(())
}

fn print_signal(out: &mut impl Write, price: f64, signal: &Signal) -> Result<()> {
    writeln!(out, "Price:          {price:.2}")?;
    writeln!(out, "Recommendation: {}", signal.recommendation)?;
    writeln!(out, "Why:            {}", signal.rationale)?;
    writeln!(
        out,
        "Window:         {} days, min {:.2}, mean {:.2}, slope {:+.3}/day (score {})",
        signal.stats.len, signal.stats.min, signal.stats.mean, signal.stats.slope, signal.score
    )?;
    Ok(())
}

fn run_advise(
    config: &WishdropConfig,
    product: Option<String>,
    all: bool,
    catalog: Option<PathBuf>,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(config, catalog)?;
    let mut advisor = Advisor::from_config(config, seed);
    tracing::debug!(master_seed = advisor.seeds().master_seed(), "advisor session");

    let views = if all {
        advisor.advise_all(catalog.products())
    } else {
        let id = product.unwrap_or_default();
        let product = catalog
            .get_product(&id)
            .with_context(|| format!("unknown product: {id}"))?;
        vec![advisor.advise_or_fallback(product)]
    };

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&views)?)?;
        return Ok(());
    }
    for view in &views {
        match view {
            AdviceView::Available(advice) => {
                let name = catalog
                    .get_product(&advice.product_id)
                    .map(|p| p.name.as_str())
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{:<8} {:<10} {:>10.2}  {}  {}",
                    advice.product_id,
                    advice.signal.recommendation,
                    advice.current_price,
                    name,
                    advice.signal.rationale
                )?;
            }
            AdviceView::Unavailable {
                product_id,
                message,
            } => writeln!(out, "{product_id:<8} {message}")?,
        }
    }
    Ok(())
}

fn run_catalog_generate(
    config: &WishdropConfig,
    count: usize,
    seed: Option<u64>,
    out: Option<PathBuf>,
) -> Result<()> {
    let catalog = match seed {
        Some(seed) => generate_catalog(count, &mut rand::rngs::StdRng::seed_from_u64(seed)),
        None => generate_catalog(count, &mut rand::thread_rng()),
    };
    let path = out.unwrap_or_else(|| config.catalog_path());
    catalog
        .write_csv(&path)
        .with_context(|| format!("writing catalog {}", path.display()))?;
    println!("Wrote {} products to {}", catalog.len(), path.display());
    Ok(())
}

fn run_catalog_facets(config: &WishdropConfig, catalog: Option<PathBuf>) -> Result<()> {
    let catalog = load_catalog(config, catalog)?;
    let mut out = std::io::stdout().lock();
    for (label, values) in [
        ("Brands", catalog.brands()),
        ("Stores", catalog.stores()),
        ("Categories", catalog.categories()),
    ] {
        writeln!(out, "{label}:")?;
        for v in values {
            writeln!(out, "  {v}")?;
        }
    }
    Ok(())
}

fn run_profile(config: &WishdropConfig, action: ProfileAction) -> Result<()> {
    let store = JsonFileStore::new(&config.data_dir);
    match action {
        ProfileAction::List => {
            for name in store.list_profiles()? {
                println!("{name}");
            }
        }
        ProfileAction::Show { name } => {
            let profile = store
                .get_profile(&name)?
                .with_context(|| format!("no profile named '{name}'"))?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        ProfileAction::Delete { name } => {
            if !store.delete_profile(&name)? {
                bail!("no profile named '{name}'");
            }
            println!("Deleted profile '{name}'");
        }
        ProfileAction::Create {
            name,
            height_in,
            weight_lb,
            top,
            bottom,
            shoe,
            style,
            price_pref,
            brands,
            stores,
            categories,
            notes,
        } => {
            let profile = Profile {
                height_in,
                weight_lb,
                sizes: Sizes { top, bottom, shoe },
                style,
                price_pref: price_pref.into(),
                brands,
                stores,
                categories,
                notes,
            };
            store.save_profile(&name, &profile)?;
            println!("Saved profile '{}'", name.trim());
        }
    }
    Ok(())
}

fn run_board(config: &WishdropConfig, action: BoardAction) -> Result<()> {
    let store = JsonFileStore::new(&config.data_dir);
    match action {
        BoardAction::Show { name } => {
            let board = store.get_board(&name)?;
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
        BoardAction::Save { name, product } => {
            let mut board = store.get_board(&name)?;
            if board.save_item(product.clone()) {
                store.save_board(&name, &board)?;
                println!("Saved {product}");
            } else {
                println!("{product} is already saved");
            }
        }
        BoardAction::Track {
            name,
            product,
            threshold,
        } => {
            let mut board = store.get_board(&name)?;
            let applied = match threshold {
                Some(requested) => {
                    let applied = board.track(product.clone(), requested);
                    if applied != requested {
                        tracing::warn!(requested, applied, "threshold clamped to 1-50");
                    }
                    applied
                }
                None => board.track_default(product.clone(), config.alerts.default_threshold_pct),
            };
            store.save_board(&name, &board)?;
            println!("Tracking {product} at {applied}%");
        }
        BoardAction::Export { name, out, catalog } => {
            let board = store.get_board(&name)?;
            let catalog = load_catalog(config, catalog)?;
            let products = catalog.select(&board.saved);
            if products.len() < board.saved.len() {
                tracing::warn!(
                    missing = board.saved.len() - products.len(),
                    "saved items not in catalog were skipped"
                );
            }
            match out {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    write_products_csv(file, products.iter().copied())?;
                    println!("Exported {} items to {}", products.len(), path.display());
                }
                None => write_products_csv(std::io::stdout().lock(), products.iter().copied())?,
            }
        }
        BoardAction::Untrack { name, product } => {
            let mut board = store.get_board(&name)?;
            if board.untrack(&product).is_none() {
                bail!("{product} is not tracked");
            }
            store.save_board(&name, &board)?;
            println!("Stopped tracking {product}");
        }
        BoardAction::Clear { name } => {
            let mut board = store.get_board(&name)?;
            board.clear_saved();
            store.save_board(&name, &board)?;
            println!("Cleared saved items");
        }
    }
    Ok(())
}

fn run_feed(
    config: &WishdropConfig,
    name: &str,
    min_discount: u32,
    query: Option<String>,
    catalog: Option<PathBuf>,
) -> Result<()> {
    let store = JsonFileStore::new(&config.data_dir);
    let profile = store
        .get_profile(name)?
        .with_context(|| format!("no profile named '{name}'"))?;
    let catalog = load_catalog(config, catalog)?;
    let filter = FeedFilter {
        min_discount_pct: min_discount,
        query,
    };

    let feed = personalized_feed(catalog.products(), &profile, &filter);
    let mut out = std::io::stdout().lock();
    writeln!(out, "{} items for {name}", feed.len())?;
    for p in feed {
        writeln!(
            out,
            "{:<8} {:>9.2} (was {:>8.2}, -{}%)  {}  [{} / {}]",
            p.id, p.price, p.msrp, p.discount_pct, p.name, p.category, p.store
        )?;
    }
    Ok(())
}

fn run_alerts(
    config: &WishdropConfig,
    name: &str,
    catalog: Option<PathBuf>,
    seed: Option<u64>,
) -> Result<()> {
    let store = JsonFileStore::new(&config.data_dir);
    let board = store.get_board(name)?;
    if board.tracked.is_empty() {
        println!("No tracked items for {name}");
        return Ok(());
    }
    let catalog = load_catalog(config, catalog)?;
    let mut advisor = Advisor::from_config(config, seed);

    let alerts = evaluate_alerts(&board, &catalog, &mut advisor);
    if alerts.is_empty() {
        println!("No alerts ({} tracked)", board.tracked.len());
        return Ok(());
    }
    let mut out = std::io::stdout().lock();
    for a in &alerts {
        writeln!(
            out,
            "{:<8} {:>9.2}  {:.1}% above 30-day low {:.2} (threshold {}%)  {}",
            a.product_id, a.price, a.proximity_pct, a.recent_low, a.threshold_pct, a.name
        )?;
    }
    Ok(())
}
