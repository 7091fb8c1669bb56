use lealone_config::ConfigLoader;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), lealone_config::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LEALONE_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // LEALONE_CONFIG overrides the identifier; otherwise lealone.yaml is
    // looked up in ./, ./conf and next to the binary.
    let mut loader = ConfigLoader::builder();
    if let Some(identifier) = std::env::args().nth(1) {
        loader = loader.with_identifier(identifier);
    }
    let config: lealone_config::Config = loader.load()?;

    println!("base_dir: {}", config.base_dir);
    println!("listen_address: {}", config.listen_address);
    for engine in config
        .sql_engines
        .iter()
        .chain(&config.storage_engines)
        .chain(&config.transaction_engines)
        .chain(&config.protocol_server_engines)
    {
        println!(
            "engine {} (enabled={}) {:?}",
            engine.name, engine.enabled, engine.parameters
        );
    }

    Ok(())
}
