use clap::{Command, arg};
use pulse_scanner::fetcher::normalize_base_url;
use url::Url;

/// Storefront cataloged when `--base-url` is not given
pub const DEFAULT_BASE_URL: &str = "a7.co";

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn parse_base_url(s: &str) -> Result<Url, String> {
    normalize_base_url(s).map_err(|e| e.to_string())
}

pub fn command_argument_builder() -> Command {
    Command::new("pulse")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pulse")
        .about("Catalogs a storefront's products from its sitemap")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-b --"base-url" <URL>)
                .required(false)
                .help("Base URL of the storefront, ie. \"a7.co\", \"us.bape.com\"")
                .value_parser(parse_base_url)
                .default_value(DEFAULT_BASE_URL),
        )
        .arg(
            arg!(-c --"config" <PATH>)
                .required(false)
                .help("Path to config.json (default: next to the executable)"),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(--"strict")
                .required(false)
                .help("Fail on malformed sitemap XML instead of using what was decoded")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-k --"keyword" <KEYWORD>)
                .required(false)
                .help("Search keyword for a desired product, ie. \"cap\", \"striped\""),
        )
        .arg(
            arg!(-w --"watch")
                .required(false)
                .help("Keep refreshing the catalog and report added, removed and updated items")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(-p --"poll" <SECONDS>)
                .required(false)
                .help("Seconds between sitemap refresh sweeps in watch mode")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(arg!(-q --"quiet" "Suppress the progress spinner").required(false))
        .arg(
            arg!(-v --"verbose" ...)
                .required(false)
                .help("Log more to stderr (-v info, -vv debug)"),
        )
}
