//! geoboundaries - resolve, check and query geoBoundaries catalog assets.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let default_filter = if cli::is_verbose() {
        "geoboundaries_ee=info"
    } else {
        "geoboundaries_ee=warn"
    };

    // Logs go to stderr so JSON on stdout stays pipeable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run()
}
