use tracing_subscriber::EnvFilter;

mod runtime;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sonata=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    runtime::run()
}
