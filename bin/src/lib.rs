pub mod cli;
pub mod commands;

use cli::{Cli, Command};
use quicklogs::Registry;
use std::io;

/// Run a parsed command line against `registry`.
pub fn run(cli: Cli, registry: &Registry) -> anyhow::Result<()> {
    match cli.command {
        Command::Emit { at, messages } => {
            commands::emit::handle(registry, &cli.logger, at, &messages, io::stdin().lock())?;
        }
        Command::Resolve => {
            commands::resolve::handle(registry.resolver(), &cli.logger, &mut io::stdout().lock())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use quicklogs::{Level, LevelArg, MapEnv, Resolver, SourceDisplay};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("quicklogs").chain(args.iter().copied()))
            .expect("valid command line")
    }

    #[test]
    fn unset_flags_stay_unset() {
        let cli = parse(&["resolve"]);
        let options = cli.logger.options();
        assert_eq!(options, quicklogs::LoggerOptions::new());
    }

    #[test]
    fn flags_map_onto_options() {
        let cli = parse(&[
            "emit",
            "--name",
            "svc",
            "--level",
            "15",
            "--console",
            "false",
            "--show-source",
            "pathname",
            "--max-bytes",
            "1000",
            "--backup-count",
            "0",
            "--at",
            "warning",
            "hello",
        ]);
        let options = cli.logger.options();
        assert_eq!(cli.logger.name(), Some("svc"));
        assert_eq!(options.level, Some(LevelArg::Ordinal(15)));
        assert_eq!(options.console, Some(false));
        assert_eq!(options.source_display, Some(SourceDisplay::FullPath));
        assert_eq!(options.max_file_bytes, Some(1000));
        assert_eq!(options.max_rotations, Some(0));
        match cli.command {
            Command::Emit { at, messages } => {
                assert_eq!(at, Level::Warning);
                assert_eq!(messages, vec!["hello".to_string()]);
            }
            Command::Resolve => panic!("expected emit"),
        }
    }

    #[test]
    fn rejects_unknown_source_display() {
        let result = Cli::try_parse_from(["quicklogs", "--show-source", "module", "resolve"]);
        assert!(result.is_err());
    }

    #[test]
    fn emit_writes_messages_to_file() {
        let dir = TempDir::new().expect("temp dir");
        let registry = Registry::with_env(MapEnv::new());
        let cli = parse(&[
            "emit",
            "--name",
            "cli",
            "--file-dir",
            dir.path().to_str().expect("utf-8 temp path"),
            "--at",
            "error",
            "first",
            "second",
        ]);
        let Command::Emit { at, messages } = cli.command else {
            panic!("expected emit");
        };

        let count = commands::emit::handle(&registry, &cli.logger, at, &messages, io::empty())
            .expect("emit");

        assert_eq!(count, 2);
        let contents = std::fs::read_to_string(dir.path().join("cli.log")).expect("read");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.lines().all(|l| l.contains("[ERROR][cli]")));
    }

    #[test]
    fn emit_reads_stdin_lines_without_messages() {
        let dir = TempDir::new().expect("temp dir");
        let registry = Registry::with_env(
            MapEnv::new().with("piped_FILE_DIR", dir.path().display().to_string()),
        );
        let cli = parse(&["emit", "--name", "piped"]);
        let input = io::Cursor::new("one\ntwo\nthree\n");

        let count = commands::emit::handle(&registry, &cli.logger, Level::Info, &[], input)
            .expect("emit");

        assert_eq!(count, 3);
        let contents = std::fs::read_to_string(dir.path().join("piped.log")).expect("read");
        assert!(contents.ends_with("] three\n"));
    }

    #[test]
    fn resolve_prints_environment_values() {
        let resolver = Resolver::new(
            Arc::new(
                MapEnv::new()
                    .with("SVC_LOG_LEVEL", "debug")
                    .with("QUICKLOGS_FILE_DIR", "/var/log/app")
                    .with("QUICKLOGS_SHOW_FILE_PATH", "true"),
            ),
            "QUICKLOGS",
        );
        let cli = parse(&["resolve", "--name", "svc", "--max-bytes", "5"]);
        let mut out = Vec::new();

        commands::resolve::handle(&resolver, &cli.logger, &mut out).expect("resolve");

        let text = String::from_utf8(out).expect("utf-8");
        assert_eq!(
            text,
            "name: svc\n\
             level: DEBUG\n\
             console: false\n\
             file: /var/log/app/svc.log\n\
             source: pathname\n\
             max_bytes: 5\n\
             backup_count: 2\n"
        );
    }
}
