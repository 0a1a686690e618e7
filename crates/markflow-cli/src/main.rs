use anyhow::{Context, Result, bail};
use markflow_config::Config;
use markflow_tokenizer::{ParseOptions, format_event_log, format_events, tokenize};
use std::{env, path::PathBuf, process};

const USAGE: &str = "Usage: markflow-cli [--config PATH] [--events] <file.md>
       markflow-cli [--config PATH] --init-config";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Print the tokens of a file.
    Tokenize(PathBuf),
    /// Write a config file holding the defaults.
    InitConfig,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    events: bool,
    command: Command,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut config = None;
    let mut events = false;
    let mut init_config = false;
    let mut file = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config needs a path"),
            },
            "--events" => events = true,
            "--init-config" => init_config = true,
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            _ if file.is_some() => bail!("only one file can be tokenized at a time"),
            _ => file = Some(PathBuf::from(&arg)),
        }
    }

    let command = match (init_config, file) {
        (true, Some(_)) => bail!("--init-config takes no input file"),
        (true, None) => Command::InitConfig,
        (false, Some(file)) => Command::Tokenize(file),
        (false, None) => bail!("no input file given"),
    };
    Ok(Args {
        config,
        events,
        command,
    })
}

fn resolve_config_path(config: Option<&PathBuf>) -> PathBuf {
    match config {
        Some(path) => Config::expand_path(path).unwrap_or_else(|| path.clone()),
        None => Config::config_path(),
    }
}

/// Options from `--config`, else from the default config file, else defaults.
fn load_options(config: Option<&PathBuf>) -> Result<ParseOptions> {
    let config = match config {
        Some(path) => {
            let path = resolve_config_path(Some(path));
            log::info!("Config path: {}", path.display());
            match Config::load_from_path(&path)? {
                Some(config) => config,
                None => bail!("config file '{}' does not exist", path.display()),
            }
        }
        None => {
            log::debug!("Config path: {}", Config::config_path().display());
            Config::load()?.unwrap_or_default()
        }
    };
    Ok(config.to_parse_options())
}

/// Write the default config, never over an existing file.
fn init_config(config: Option<&PathBuf>) -> Result<String> {
    let path = resolve_config_path(config);
    if path.exists() {
        bail!("config file '{}' already exists", path.display());
    }
    Config::default()
        .save_to_path(&path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(format!("Wrote default config to {}\n", path.display()))
}

fn run(args: &Args) -> Result<String> {
    let file = match &args.command {
        Command::InitConfig => return init_config(args.config.as_ref()),
        Command::Tokenize(file) => file,
    };
    let options = load_options(args.config.as_ref())?;
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;

    let events = tokenize(&source, &options);
    log::info!("{}: {} events", file.display(), events.len());

    Ok(if args.events {
        format_event_log(&events)
    } else {
        format_events(&events, &source)
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    print!("{}", run(&args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = args(&["--config", "~/m.toml", "--events", "doc.md"]).unwrap();
        assert_eq!(
            parsed,
            Args {
                config: Some(PathBuf::from("~/m.toml")),
                events: true,
                command: Command::Tokenize(PathBuf::from("doc.md")),
            }
        );
    }

    #[test]
    fn test_parse_file_only() {
        let parsed = args(&["doc.md"]).unwrap();
        assert_eq!(parsed.config, None);
        assert!(!parsed.events);
    }

    #[test]
    fn test_parse_init_config() {
        let parsed = args(&["--init-config"]).unwrap();
        assert_eq!(parsed.command, Command::InitConfig);
    }

    #[rstest]
    #[case(&[], "no input file given")]
    #[case(&["--config"], "--config needs a path")]
    #[case(&["--json", "a.md"], "unknown option --json")]
    #[case(&["a.md", "b.md"], "only one file can be tokenized at a time")]
    #[case(&["--init-config", "a.md"], "--init-config takes no input file")]
    fn test_parse_errors(#[case] list: &[&str], #[case] message: &str) {
        let error = args(list).unwrap_err();
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn test_init_config_writes_defaults_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("markflow").join("config.toml");
        let args = Args {
            config: Some(path.clone()),
            events: false,
            command: Command::InitConfig,
        };

        let message = run(&args).unwrap();
        assert!(message.starts_with("Wrote default config to"));
        assert_eq!(Config::load_from_path(&path).unwrap(), Some(Config::default()));

        let error = run(&args).unwrap_err();
        assert!(error.to_string().contains("already exists"));
    }

    #[test]
    fn test_tokenize_with_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = temp_dir.path().join("config.toml");
        std::fs::write(&config, "[tokenizer]\ndisable = [\"attention\"]\n").unwrap();
        let file = temp_dir.path().join("doc.md");
        std::fs::write(&file, "*a*").unwrap();

        let output = run(&Args {
            config: Some(config),
            events: false,
            command: Command::Tokenize(file),
        })
        .unwrap();

        assert_eq!(output, "CONTENT@0..3\n  PARAGRAPH@0..3\n    DATA@0..3 \"*a*\"\n");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let missing = PathBuf::from("/nonexistent/markflow/config.toml");
        assert!(load_options(Some(&missing)).is_err());
    }
}
