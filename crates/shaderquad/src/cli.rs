use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shaderquad",
    author,
    version,
    about = "Fullscreen-quad GLSL demo",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Vertex shader source path.
    #[arg(long, value_name = "PATH", default_value = "Shaders/vertex.vert")]
    pub vertex: PathBuf,

    /// Fragment shader source path.
    #[arg(long, value_name = "PATH", default_value = "Shaders/fragment.frag")]
    pub fragment: PathBuf,

    /// Window size (e.g. `640x640`).
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_surface_size,
        default_value = "640x640"
    )]
    pub size: (u32, u32),

    /// Optional FPS cap (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Window title.
    #[arg(long, value_name = "TITLE", default_value = "Graphics Demo")]
    pub title: String,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (w, h) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_size_variants() {
        assert_eq!(parse_surface_size("640x640").unwrap(), (640, 640));
        assert_eq!(parse_surface_size("1280X720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 800 x 600 ").unwrap(), (800, 600));
        assert!(parse_surface_size("640").is_err());
        assert!(parse_surface_size("0x480").is_err());
        assert!(parse_surface_size("wide x tall").is_err());
    }

    #[test]
    fn defaults_match_the_demo() {
        let cli = Cli::try_parse_from(["shaderquad"]).unwrap();
        assert_eq!(cli.run.size, (640, 640));
        assert_eq!(cli.run.title, "Graphics Demo");
        assert_eq!(cli.run.vertex, PathBuf::from("Shaders/vertex.vert"));
        assert_eq!(cli.run.fragment, PathBuf::from("Shaders/fragment.frag"));
        assert_eq!(cli.run.fps, None);
    }

    #[test]
    fn accepts_shader_and_pacing_overrides() {
        let cli = Cli::try_parse_from([
            "shaderquad",
            "--fragment",
            "demo/plasma.frag",
            "--size",
            "1024x768",
            "--fps",
            "30",
        ])
        .unwrap();
        assert_eq!(cli.run.fragment, PathBuf::from("demo/plasma.frag"));
        assert_eq!(cli.run.size, (1024, 768));
        assert_eq!(cli.run.fps, Some(30.0));
    }
}
