use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::load_config;
use exchange::{Exchange, StockMetrics};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the GBCE command-line driver.
fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let exchange = Exchange::with_settings(config.exchange.clone());
    for stock in config.build_stocks()? {
        exchange.add_stock(stock);
    }

    match cli.command {
        Commands::Quote(args) => handle_quote(&exchange, args),
        Commands::Report(args) => handle_report(&exchange, args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Global Beverage Corporation Exchange: stock metrics and the all-share index.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the exchange configuration file.
    #[arg(long, short, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dividend yield and P/E ratio of one stock at a given price.
    Quote(QuoteArgs),
    /// Record trades, then print VWSP, dividend metrics and the all-share index.
    Report(ReportArgs),
}

#[derive(Parser)]
struct QuoteArgs {
    /// The stock symbol (any case).
    symbol: String,

    /// The price to evaluate the stock at.
    #[arg(long)]
    price: Decimal,
}

#[derive(Parser)]
struct ReportArgs {
    /// Trailing window in minutes. Defaults to `exchange.default_window_minutes`.
    #[arg(long)]
    window: Option<u32>,

    /// A trade to record now, as SYMBOL,QUANTITY,SIDE,PRICE (repeatable).
    #[arg(long = "trade")]
    trades: Vec<TradeArg>,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone)]
struct TradeArg {
    symbol: String,
    quantity: i64,
    side: String,
    price: Decimal,
}

impl FromStr for TradeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [symbol, quantity, side, price] = parts.as_slice() else {
            return Err(format!("expected SYMBOL,QUANTITY,SIDE,PRICE, got '{}'", s));
        };
        Ok(Self {
            symbol: symbol.to_string(),
            quantity: quantity
                .parse()
                .map_err(|e| format!("invalid quantity '{}': {}", quantity, e))?,
            side: side.to_string(),
            price: price
                .parse()
                .map_err(|e| format!("invalid price '{}': {}", price, e))?,
        })
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_quote(exchange: &Exchange, args: QuoteArgs) -> Result<()> {
    let Some(stock) = exchange.get_stock(&args.symbol) else {
        bail!("stock '{}' is not listed", args.symbol);
    };

    let dividend_yield = stock.dividend_yield(args.price)?;
    let pe_ratio = stock.pe_ratio(args.price)?;

    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Type", "Price", "Dividend Yield", "P/E Ratio"]);
    table.add_row(vec![
        stock.symbol().to_string(),
        stock.stock_type().to_string(),
        args.price.to_string(),
        dividend_yield.to_string(),
        display(pe_ratio),
    ]);
    println!("{table}");
    Ok(())
}

fn handle_report(exchange: &Exchange, args: ReportArgs) -> Result<()> {
    let window = args
        .window
        .unwrap_or(exchange.settings().default_window_minutes);

    // Each trade is recorded from its own thread; the exchange serializes the appends.
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = args
            .trades
            .iter()
            .map(|t| {
                scope.spawn(move || {
                    exchange.record_trade(&t.symbol, t.quantity, &t.side, t.price, None)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });
    for result in results {
        match result {
            Ok(recorded) => {
                recorded?;
            }
            Err(_) => bail!("a trade recording thread panicked"),
        }
    }
    tracing::info!(trades = exchange.trade_count(), window, "Trades recorded");

    let mut metrics: Vec<StockMetrics> = Vec::new();
    for symbol in exchange.symbols() {
        if let Some(m) = exchange.stock_metrics(&symbol, window)? {
            metrics.push(m);
        }
    }
    let index = exchange.gbce_all_share_index(window);

    if args.json {
        let report = serde_json::json!({
            "window_minutes": window,
            "stocks": metrics,
            "all_share_index": index,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Symbol", "Trades", "VWSP", "Dividend Yield", "P/E Ratio"]);
    for m in &metrics {
        table.add_row(vec![
            m.symbol.clone(),
            m.trade_count.to_string(),
            display(m.vwsp),
            display(m.dividend_yield),
            display(m.pe_ratio),
        ]);
    }
    println!("{table}");
    println!("GBCE All Share Index ({} min): {}", window, display(index));
    Ok(())
}

fn display(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}
