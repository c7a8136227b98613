//! Prediction Client - Main Entry Point

mod api;

use anyhow::{bail, Context};
use serde::Serialize;

use prediction_client::constants::{APP_NAME, APP_VERSION};
use prediction_client::Domain;

const USAGE: &str = "\
Usage: prediction-client [--json] <command> [args...]

Commands:
  health <domain>                 Probe the backend once
  predict <domain> [input...]     Wait for the backend, then submit one prediction
                                  (no input submits a sample)
  sample <domain>                 Print a random feature vector or the sample inputs
  extract <url>                   Print the phishing feature vector for a URL
  history <symbol> [period]       Daily prices from the stock backend (default 3mo)
  popular                         Symbols the stock backend suggests

Domains: phishing, fraud, spam, recommendation, stock

Environment:
  PREDICT_API_URL, PREDICT_HEALTH_PATH, PREDICT_PATH,
  PREDICT_POLL_INTERVAL_MS, PREDICT_REQUEST_TIMEOUT_SECS, PREDICT_PROBE_TIMEOUT_SECS";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = take_flag(&mut args, "--json");

    if args.is_empty() || take_flag(&mut args, "--help") || take_flag(&mut args, "-h") {
        println!("{} v{}\n\n{}", APP_NAME, APP_VERSION, USAGE);
        return Ok(());
    }

    let command = args.remove(0);
    log::debug!("{} v{}: {} {:?}", APP_NAME, APP_VERSION, command, args);

    match command.as_str() {
        "health" => {
            let report = api::check_health(domain_arg(&args)?).await?;
            emit(json, &report, report.render())
        }
        "predict" => {
            let domain = domain_arg(&args)?;
            let report = api::run_prediction(domain, &args[1..]).await?;
            emit(json, &report, report.render())
        }
        "sample" => {
            let report = api::sample(domain_arg(&args)?);
            emit(json, &report, report.render())
        }
        "extract" => {
            let url = args.first().context("extract needs a URL")?;
            let report = api::extract(url)?;
            emit(json, &report, report.render())
        }
        "history" => {
            let symbol = args.first().context("history needs a symbol")?;
            let report = api::history(symbol, args.get(1).map(String::as_str)).await?;
            emit(json, &report, report.render())
        }
        "popular" => {
            let report = api::popular().await?;
            emit(json, &report, report.render())
        }
        other => bail!("Unknown command {:?}\n\n{}", other, USAGE),
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn domain_arg(args: &[String]) -> anyhow::Result<Domain> {
    let name = args.first().context("missing <domain> argument")?;
    Ok(name.parse()?)
}

fn emit<T: Serialize>(json: bool, report: &T, text: String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", text);
    }
    Ok(())
}
