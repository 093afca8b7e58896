use clap::ArgMatches;
use colored::Colorize;
use pulse_core::catalog::ProductCatalog;
use pulse_core::config::{default_config_path, load_config_or_default};
use pulse_core::pipeline::{KeywordMatch, PipelineOptions, lookup_keyword, run_pipeline};
use pulse_core::report::{
    ReportFormat, format_match, generate_catalog_report, generate_pass_report,
    generate_variant_report,
};
use pulse_core::watch::{CatalogWatcher, PassOutcome};
use pulse_scanner::fetcher::SitemapFetcher;
use pulse_scanner::sitemap::DecodePolicy;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Everything the catalog command needs, resolved from the command line
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub base_url: Url,
    pub config_path: Option<PathBuf>,
    pub format: ReportFormat,
    pub policy: DecodePolicy,
    pub keyword: Option<String>,
    pub watch: bool,
    pub poll: Duration,
    pub quiet: bool,
}

/// Logs go to stderr so stdout only carries the report. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn settings_from_matches(matches: &ArgMatches) -> Result<CatalogSettings, String> {
    let base_url = matches
        .get_one::<Url>("base-url")
        .cloned()
        .ok_or_else(|| "--base-url must be provided".to_string())?;

    let config_path = match matches.get_one::<String>("config") {
        Some(path) => Some(PathBuf::from(shellexpand::tilde(path).into_owned())),
        None => default_config_path(),
    };

    let format = matches
        .get_one::<String>("format")
        .map(|f| f.parse::<ReportFormat>())
        .transpose()?
        .unwrap_or_default();

    let policy = if matches.get_flag("strict") {
        DecodePolicy::Strict
    } else {
        DecodePolicy::Lenient
    };

    let keyword = matches
        .get_one::<String>("keyword")
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let poll = Duration::from_secs(*matches.get_one::<u64>("poll").unwrap_or(&10));

    Ok(CatalogSettings {
        base_url,
        config_path,
        format,
        policy,
        keyword,
        watch: matches.get_flag("watch"),
        poll,
        quiet: matches.get_flag("quiet"),
    })
}

fn exit_with_error(context: &str, err: impl Display) -> ! {
    eprintln!("{} {}: {}", "✗".red().bold(), context, err);
    std::process::exit(1);
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

fn print_keyword_matches(matches: &[KeywordMatch], base_url: &Url) {
    for found in matches {
        println!("{}", format_match(&found.name, &found.url));
        if let Some(ref variants) = found.variants {
            print!("{}", generate_variant_report(variants, base_url));
        }
    }
}

async fn report_keyword(
    fetcher: &SitemapFetcher,
    catalog: &ProductCatalog,
    settings: &CatalogSettings,
) {
    if let Some(ref keyword) = settings.keyword {
        let matches = lookup_keyword(fetcher, catalog, keyword).await;
        info!("{} products match '{}'", matches.len(), keyword);
        print_keyword_matches(&matches, &settings.base_url);
    }
}

pub async fn handle_catalog(matches: &ArgMatches) {
    let settings = match settings_from_matches(matches) {
        Ok(settings) => settings,
        Err(e) => exit_with_error("Invalid arguments", e),
    };

    info!("Base URL: {}", settings.base_url);
    if let Some(ref path) = settings.config_path {
        info!("Config path: {}", path.display());
    }
    // Only the webhook is read from the config, and nothing sends to it yet
    let _config = load_config_or_default(settings.config_path.as_deref());

    let fetcher = match SitemapFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => exit_with_error("Failed to create HTTP client", e),
    };

    let options = PipelineOptions::new(settings.base_url.clone())
        .with_policy(settings.policy)
        .with_progress(!settings.quiet);

    if !settings.watch {
        let catalog = match run_pipeline(&fetcher, &options).await {
            Ok(catalog) => catalog,
            Err(e) => exit_with_error("Catalog failed", e),
        };
        print!("{}", generate_catalog_report(&catalog, settings.format));
        report_keyword(&fetcher, &catalog, &settings).await;
        return;
    }

    handle_watch(fetcher, options, &settings).await;
}

async fn handle_watch(fetcher: SitemapFetcher, options: PipelineOptions, settings: &CatalogSettings) {
    let mut watcher = match CatalogWatcher::start(fetcher, options).await {
        Ok(watcher) => watcher,
        Err(e) => exit_with_error("Catalog failed", e),
    };
    print!(
        "{}",
        generate_catalog_report(watcher.catalog(), settings.format)
    );
    report_keyword(watcher.fetcher(), watcher.catalog(), settings).await;

    loop {
        tokio::time::sleep(settings.poll).await;

        let outcome = watcher.refresh().await;
        let now = timestamp();
        if let PassOutcome::Stale { ref error } = outcome {
            eprintln!(
                "{} {} :: {} - using stale catalog this pass",
                "[!]".yellow().bold(),
                now,
                error
            );
        }
        print!(
            "{}",
            generate_pass_report(&now, watcher.catalog().len(), &outcome)
        );

        report_keyword(watcher.fetcher(), watcher.catalog(), settings).await;
    }
}
