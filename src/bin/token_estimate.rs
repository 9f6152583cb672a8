//! token-estimate — 从标准输入估算 token 数量与费用
//!
//! Usage:
//!   token-estimate [--model <id>] [--output-tokens <n>] [--output-text <file>] [--rate <r>]
//!   token-estimate --list
//!
//! Reads the prompt from stdin and prints the cost report as JSON. When
//! `GEMINI_API_KEY` is set, Gemini models are counted exactly.

use ai_token_estimator::catalog::DEFAULT_MODEL_ID;
use ai_token_estimator::{EstimateRequest, EstimatorConfig, OutputSpec, ProviderRegistry};
use anyhow::{bail, Context};
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    model: Option<String>,
    output: Option<OutputSpec>,
    rate: Option<f64>,
    list: bool,
}

fn print_usage() {
    println!(
        r#"token-estimate — AI token 与费用估算

USAGE:
    token-estimate [OPTIONS] < prompt.txt

OPTIONS:
    --model <id>            Model id (default: {DEFAULT_MODEL_ID})
    --output-tokens <n>     Expected output tokens (default: half of input)
    --output-text <file>    Sample output; its token count becomes the output figure
    --rate <r>              USD to JPY exchange rate
    --list                  List providers and models
    help, --help, -h        Show this help message

ENVIRONMENT:
    GEMINI_API_KEY          Enables exact counting for Gemini models
    AI_TOKEN_EXCHANGE_RATE  Default exchange rate
    AI_TOKEN_CATALOG        Custom catalog file (YAML or JSON)
    RUST_LOG                Log filter (default: warn)"#
    );
}

fn parse_args(raw: &[String]) -> anyhow::Result<Option<Args>> {
    let mut args = Args::default();
    let mut iter = raw.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{flag} requires a value"))
        };
        match flag.as_str() {
            "--model" => args.model = Some(value()?),
            "--output-tokens" => args.output = Some(OutputSpec::parse_tokens(&value()?)?),
            "--output-text" => {
                let path = value()?;
                let sample = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {path}"))?;
                args.output = Some(OutputSpec::Text(sample));
            }
            "--rate" => {
                let raw = value()?;
                let rate: f64 = raw
                    .parse()
                    .with_context(|| format!("invalid exchange rate: {raw}"))?;
                args.rate = Some(rate);
            }
            "--list" => args.list = true,
            "help" | "--help" | "-h" => return Ok(None),
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(Some(args))
}

fn list_models(registry: &ProviderRegistry) {
    for provider in registry.list_providers() {
        println!("{} ({})", provider.display_name, provider.id);
        for model in &provider.models {
            println!(
                "  {:<40} {:<12} in ${:<8} out ${:<8} {}",
                model.id,
                model.category,
                model.pricing.input,
                model.pricing.output,
                if model.features.supports_thinking { "thinking" } else { "" }
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw)? else {
        print_usage();
        return Ok(());
    };

    let config = EstimatorConfig::from_env();
    let registry = ProviderRegistry::from_config(&config).context("building provider registry")?;

    if args.list {
        list_models(&registry);
        return Ok(());
    }

    let model_id = args.model.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("reading prompt from stdin")?;

    let mut request = EstimateRequest::new(text, model_id)
        .with_output(args.output.unwrap_or_default())
        .with_exchange_rate(args.rate.unwrap_or(config.exchange_rate));
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        request = request.with_credential(key);
    }

    let report = registry.estimate(&request).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
