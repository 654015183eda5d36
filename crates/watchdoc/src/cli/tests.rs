#[cfg(test)]
mod tests {
    use crate::cli::{parse_host, parse_port, Cli};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080"), Ok(8080));
        assert_eq!(parse_port(" 3000 "), Ok(3000));
        assert_eq!(parse_port("65535"), Ok(65535));

        assert!(parse_port("0").is_err());
        assert!(parse_port("65536").is_err());
        assert!(parse_port("http").is_err());
        assert!(parse_port("").is_err());
    }

    #[test]
    fn test_parse_host() {
        assert_eq!(parse_host("0.0.0.0"), Ok("0.0.0.0".to_string()));
        assert!(parse_host("   ").is_err());
    }

    #[test]
    fn test_no_flags_leaves_everything_unset() {
        let cli = Cli::try_parse_from(["watchdoc"]).unwrap();

        assert!(cli.port.is_none());
        assert!(cli.host.is_none());
        assert!(cli.serve_dir.is_none());
        assert!(cli.watch_dirs.is_none());
        assert!(cli.cmd.is_none());
        assert!(!cli.no_browser);
        assert!(!cli.verbose && !cli.quiet && !cli.no_color);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "watchdoc", "-p", "3000", "-d", "public", "-w", "src,docs", "-c", "make html",
        ])
        .unwrap();

        assert_eq!(cli.port, Some(3000));
        assert_eq!(cli.serve_dir, Some(PathBuf::from("public")));
        assert_eq!(cli.watch_dirs.as_deref(), Some("src,docs"));
        assert_eq!(cli.cmd.as_deref(), Some("make html"));
    }

    #[test]
    fn test_long_flags() {
        let cli = Cli::try_parse_from([
            "watchdoc",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--serve-dir",
            "site",
            "--watch-dirs",
            "content",
            "--cmd",
            "hugo",
            "--no-browser",
            "--config",
            "dev.toml",
        ])
        .unwrap();

        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.serve_dir, Some(PathBuf::from("site")));
        assert!(cli.no_browser);
        assert_eq!(cli.config, Some(PathBuf::from("dev.toml")));
    }

    #[test]
    fn test_port_zero_rejected() {
        assert!(Cli::try_parse_from(["watchdoc", "--port", "0"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["watchdoc", "--verbose", "--quiet"]).is_err());
    }
}
