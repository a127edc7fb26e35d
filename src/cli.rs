// src/cli.rs
// CLI argument parsing for the viewer binary
// Maps flags into a ViewerConfig and launches the main viewer loop

use std::env;
use std::path::PathBuf;

use crate::viewer::{run_viewer, ViewerConfig, MAX_RESOLUTION, MIN_RESOLUTION};

/// Parse viewer flags from an argument list.
///
/// Recognized flags: `--size WxH`, `--resolution N` (or `-n N`),
/// `--texture PATH`, `--no-vsync`. Unknown flags are rejected rather than
/// ignored so a typo never fails silently.
pub fn parse_args(args: &[String]) -> Result<ViewerConfig, String> {
    let mut config = ViewerConfig::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--size" => {
                let dim = iter
                    .next()
                    .ok_or_else(|| "--size requires a WxH value".to_string())?;
                let (w, h) = dim
                    .split_once('x')
                    .ok_or_else(|| format!("invalid --size value '{}', expected WxH", dim))?;
                config.width = w
                    .parse::<u32>()
                    .map_err(|_| format!("invalid width '{}'", w))?;
                config.height = h
                    .parse::<u32>()
                    .map_err(|_| format!("invalid height '{}'", h))?;
                if config.width == 0 || config.height == 0 {
                    return Err("--size dimensions must be nonzero".to_string());
                }
            }
            "--resolution" | "-n" => {
                let val = iter
                    .next()
                    .ok_or_else(|| "--resolution requires a value".to_string())?;
                let n = val
                    .parse::<u32>()
                    .map_err(|_| format!("invalid resolution '{}'", val))?;
                if !(MIN_RESOLUTION..=MAX_RESOLUTION).contains(&n) {
                    return Err(format!(
                        "resolution {} out of range [{}, {}]",
                        n, MIN_RESOLUTION, MAX_RESOLUTION
                    ));
                }
                config.resolution = n;
            }
            "--texture" => {
                let path = iter
                    .next()
                    .ok_or_else(|| "--texture requires a path".to_string())?;
                config.texture_path = Some(PathBuf::from(path));
            }
            "--no-vsync" => config.vsync = false,
            other => return Err(format!("unknown argument: {}", other)),
        }
    }

    Ok(config)
}

/// Entry point used by the `kiss_viewer` binary.
pub fn run_kiss_viewer_cli() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kissview: {}", e);
            eprintln!(
                "usage: kiss_viewer [--size WxH] [--resolution N] [--texture PATH] [--no-vsync]"
            );
            std::process::exit(1);
        }
    };
    run_viewer(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_with_no_args() {
        let config = parse_args(&[]).unwrap();
        assert_eq!(config.resolution, 20);
        assert!(config.vsync);
        assert!(config.texture_path.is_none());
    }

    #[test]
    fn parses_size_resolution_and_texture() {
        let config = parse_args(&args(&[
            "--size",
            "800x600",
            "--resolution",
            "40",
            "--texture",
            "assets/pattern.png",
            "--no-vsync",
        ]))
        .unwrap();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.resolution, 40);
        assert_eq!(
            config.texture_path,
            Some(PathBuf::from("assets/pattern.png"))
        );
        assert!(!config.vsync);
    }

    #[test]
    fn rejects_unknown_flags() {
        let err = parse_args(&args(&["--bogus"])).unwrap_err();
        assert!(err.contains("unknown argument"));
    }

    #[test]
    fn rejects_degenerate_resolution() {
        let err = parse_args(&args(&["--resolution", "1"])).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn rejects_malformed_size() {
        assert!(parse_args(&args(&["--size", "800"])).is_err());
        assert!(parse_args(&args(&["--size", "800x"])).is_err());
        assert!(parse_args(&args(&["--size", "0x600"])).is_err());
    }
}
