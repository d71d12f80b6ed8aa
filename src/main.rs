//! scoremap - zero-centered diverging heatmaps of comparison scores
//!
//! Reads a JSON score request, builds the figure and writes it as an image.

use std::time::Instant;
use tracing::{error, info};

use scoremap::data_loader::load_request;
use scoremap::{
    colormap_plot, init_tracing, log_error, log_operation_end, log_operation_start, save_figure,
    Config, Result,
};

fn main() -> Result<()> {
    // Load configuration
    let (config, paths) = Config::load()?;

    init_tracing(&config.log_level);
    info!("Starting scoremap v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let start = Instant::now();
    let input = paths.input.display().to_string();
    log_operation_start("plot", Some(&input));

    let result = run(&config, &paths.input, &paths.output);
    if let Err(e) = &result {
        log_error(e, "plot");
    }
    log_operation_end("plot", start, result.is_ok());
    result
}

fn run(config: &Config, input: &std::path::Path, output: &std::path::Path) -> Result<()> {
    let request = load_request(input)?;
    let source = request.source_table()?;

    let figure = colormap_plot(
        &source,
        &request.var_names,
        request.n_groups,
        request.group_names(),
        &config.plot,
    )?;

    save_figure(&figure, output, &config.render)?;
    info!("Heatmap written to {}", output.display());
    Ok(())
}
