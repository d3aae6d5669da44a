use clap::Parser;
use facility_etl::utils::{logger, validation::Validate};
use facility_etl::{CliConfig, EtlEngine, EtlError, FacilityPipeline, GoogleGeocoder, LocalStorage};

fn exit_with(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Wrong argument count prints usage and exits here.
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting facility converter");

    let config = match cli.into_run_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    tracing::debug!("Run config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let geocoder = match GoogleGeocoder::new(config.api_key.clone(), &config.geocoder) {
        Ok(geocoder) => geocoder,
        Err(e) => exit_with(&e),
    };

    let pipeline = FacilityPipeline::new(LocalStorage::default(), config, geocoder);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            tracing::info!("✅ Conversion completed successfully!");
            println!(
                "✅ Wrote {} facilities to {}",
                summary.written, summary.output_path
            );
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
