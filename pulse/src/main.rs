use pulse::commands::command_argument_builder;
use pulse::handlers::{handle_catalog, init_logging};

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    init_logging(matches.get_count("verbose"));
    handle_catalog(&matches).await;
}
