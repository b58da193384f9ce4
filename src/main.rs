use anyhow::Result;
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use park_explorer::{load_catalog, Cli, Command, Config, LoadedCatalog, Shell, SystemBrowser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from(&cli);

    match cli.command() {
        Command::Play => run_play(&config, cli.plain),
        Command::Refresh => run_refresh(&config),
        Command::Report => run_report(&config),
    }
}

fn run_play(config: &Config, plain: bool) -> Result<()> {
    println!("🏞️  Loading National Park data...");
    let loaded = load_catalog(config, false)?;
    println!("✓ {}", loaded.summary());

    let shell = Shell::new(loaded.catalog);

    if plain {
        return run_plain_mode(shell);
    }
    run_ui_mode(shell)
}

fn run_plain_mode(mut shell: Shell) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    park_explorer::plain::run_plain(&mut shell, &SystemBrowser, stdin.lock(), &mut stdout)
}

#[cfg(feature = "tui")]
fn run_ui_mode(shell: Shell) -> Result<()> {
    let mut app = park_explorer::ui::App::new(shell, Box::new(SystemBrowser));
    park_explorer::ui::run_ui(&mut app)?;

    println!("\nGoodbye!");
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(shell: Shell) -> Result<()> {
    run_plain_mode(shell)
}

fn run_refresh(config: &Config) -> Result<()> {
    println!("🌐 Refreshing park data from {}", config.endpoint);
    let loaded = load_catalog(config, true)?;

    println!("✓ Cache written to {}", config.cache_path.display());
    println!("✓ {}", loaded.summary());
    Ok(())
}

fn run_report(config: &Config) -> Result<()> {
    let loaded = load_catalog(config, false)?;
    print_report(config, &loaded);
    Ok(())
}

fn print_report(config: &Config, loaded: &LoadedCatalog) {
    let cache = park_explorer::CacheStore::new(&config.cache_path);

    println!("📊 Catalog Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Cache:    {} ({:?})", config.cache_path.display(), loaded.cache_status);
    if let Some(modified) = cache.modified_at() {
        println!("Written:  {}", modified.format("%Y-%m-%d %H:%M"));
    }
    println!("Visitors: {}", config.visitor_path.display());
    println!("Summary:  {}", loaded.summary());
    println!("States:   {}", loaded.catalog.state_codes().into_iter().collect::<Vec<_>>().join(" "));

    if !loaded.dropped.is_empty() {
        println!("\nDropped park records:");
        for record in &loaded.dropped {
            println!(
                "  #{} {} (missing {})",
                record.index,
                record.name.as_deref().unwrap_or("<unnamed>"),
                record.field
            );
        }
    }

    if !loaded.visitors.skipped.is_empty() {
        println!("\nSkipped visitor rows:");
        for row in &loaded.visitors.skipped {
            println!("  row {}: {} = {:?}", row.row, row.park_name_raw, row.value);
        }
    }

    let unmatched = loaded.unmatched_names();
    if !unmatched.is_empty() {
        println!("\nVisitor names with no matching park ({}):", unmatched.len());
        for name in unmatched {
            println!("  {}", name);
        }
    }
}
