use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chatty_core::{
    check_input, config, ChatOptions, ChatQuery, ChattyConfig, ClientConfig, DEFAULT_MODEL,
};

#[derive(Parser, Debug)]
#[command(name = "chatty")]
#[command(author, version, about = "Ask an LLM one question and print the answer", long_about = None)]
struct Cli {
    /// `[MODEL] PROMPT`: the last argument is the prompt, sent as a single
    /// user message; a leading one names the model
    #[arg(value_name = "[MODEL] PROMPT", num_args = 1..=2, required = true)]
    args: Vec<String>,

    /// Model identifier, when not given positionally
    #[arg(short, long, env = "CHATTY_MODEL")]
    model: Option<String>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long)]
    temperature: Option<f64>,

    /// Nucleus sampling (0.0 to 1.0)
    #[arg(long)]
    top_p: Option<f64>,

    /// YAML or JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn prompt(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or_default()
    }

    fn positional_model(&self) -> Option<&str> {
        match self.args.as_slice() {
            [model, _] => Some(model),
            _ => None,
        }
    }

    /// Positional model, then flags, then the config file, then defaults.
    fn merge(&self, file: &ChattyConfig) -> (String, ChatOptions) {
        let model = self
            .positional_model()
            .map(str::to_string)
            .or_else(|| self.model.clone())
            .or_else(|| file.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let options = ChatOptions {
            temperature: self.temperature.or(file.temperature),
            top_p: self.top_p.or(file.top_p),
        };
        (model, options)
    }
}

fn describe(config: &ClientConfig, model: &str) -> String {
    format!(
        "Using {} at {} ({:?}, key {})",
        model,
        config.base_url,
        config.provider(),
        config.api_key.partial_redact()
    )
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file = match &cli.config {
        Some(path) => config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ChattyConfig::default(),
    };

    let (model, options) = cli.merge(&file);
    check_input(&model, cli.prompt())?;

    let client_config: ClientConfig = file.resolve()?;
    debug!("{}", describe(&client_config, &model));

    let query = ChatQuery::new(client_config)?.with_options(options);
    let answer = query.ask(&model, cli.prompt()).await?;

    println!("{}", answer);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["chatty", "What is the C++ FQA?"]).unwrap();
        assert_eq!(cli.prompt(), "What is the C++ FQA?");
        assert_eq!(cli.positional_model(), None);
        let (model, options) = cli.merge(&ChattyConfig::default());
        if std::env::var("CHATTY_MODEL").is_err() {
            assert_eq!(model, "gpt-4o");
        }
        assert_eq!(options, ChatOptions::default());
    }

    #[test]
    fn test_flags_override_file() {
        let cli = Cli::try_parse_from([
            "chatty",
            "--model",
            "gpt-4o-mini",
            "--temperature",
            "0.1",
            "hello",
        ])
        .unwrap();
        let file = ChattyConfig {
            model: Some("llama-3".to_string()),
            temperature: Some(1.0),
            top_p: Some(0.5),
            ..Default::default()
        };
        let (model, options) = cli.merge(&file);
        assert_eq!(model, "gpt-4o-mini");
        assert_eq!(options.temperature, Some(0.1));
        assert_eq!(options.top_p, Some(0.5));
    }

    #[test]
    fn test_prompt_is_required() {
        assert!(Cli::try_parse_from(["chatty"]).is_err());
        assert!(Cli::try_parse_from(["chatty", "gpt-4o", "hi", "extra"]).is_err());
    }

    #[test]
    fn test_positional_model() {
        let cli = Cli::try_parse_from([
            "chatty",
            "--model",
            "gpt-4o-mini",
            "llama-3.1-8b-instant",
            "hello",
        ])
        .unwrap();
        assert_eq!(cli.prompt(), "hello");
        let file = ChattyConfig {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        let (model, _) = cli.merge(&file);
        assert_eq!(model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_empty_prompt_fails_before_credentials() {
        let cli = Cli::try_parse_from(["chatty", "gpt-4o", ""]).unwrap();
        let (model, _) = cli.merge(&ChattyConfig::default());
        let err = check_input(&model, cli.prompt()).unwrap_err();
        assert_eq!(err.kind(), chatty_core::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_describe_hides_key() {
        let config = ClientConfig::new("https://api.groq.com/openai/v1", "gsk_0123456789abcdef");
        let line = describe(&config, "llama-3.1-8b-instant");
        assert!(line.contains("gsk...cdef"), "{}", line);
        assert!(!line.contains("0123456789"), "{}", line);
        assert!(line.contains("Groq"), "{}", line);
    }
}
