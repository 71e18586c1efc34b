use anyhow::Result;
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = renderer_config(&args);
    tracing::info!(
        vertex = %config.vertex_source.display(),
        fragment = %config.fragment_source.display(),
        width = config.surface_size.0,
        height = config.surface_size.1,
        fps = ?config.target_fps,
        "starting shaderquad"
    );
    Renderer::new(config).run()
}

fn renderer_config(args: &RunArgs) -> RendererConfig {
    RendererConfig {
        surface_size: args.size,
        vertex_source: args.vertex.clone(),
        fragment_source: args.fragment.clone(),
        window_title: args.title.clone(),
        target_fps: match args.fps {
            Some(v) if v > 0.0 => Some(v),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    #[test]
    fn zero_fps_disables_the_cap() {
        let cli = Cli::try_parse_from(["shaderquad", "--fps", "0"]).unwrap();
        let config = renderer_config(&cli.run);
        assert_eq!(config.target_fps, None);
    }

    #[test]
    fn positive_fps_is_forwarded() {
        let cli = Cli::try_parse_from(["shaderquad", "--fps", "60"]).unwrap();
        let config = renderer_config(&cli.run);
        assert_eq!(config.target_fps, Some(60.0));
    }
}
