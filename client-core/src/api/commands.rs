//! CLI Commands - health, predict, sample, extract, history, popular

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;

use prediction_client::logic::features::sample::{presets, sample_features, sample_input};
use prediction_client::logic::features::url::extract_url_features;
use prediction_client::logic::features::FeatureLayout;
use prediction_client::logic::health::classify_probe;
use prediction_client::logic::market::DEFAULT_HISTORY_PERIOD;
use prediction_client::logic::normalize::format_percent;
use prediction_client::{
    extractor_for, fetch_history, fetch_popular, Backend, ClientConfig, Domain, FeatureVector,
    HealthMonitor, HealthState, HttpBackend, Label, Orchestrator, PopularStock, PredictionResult,
    PriceHistory, RawInput,
};

// ============================================================================
// REPORTS
// ============================================================================

/// One health probe
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub domain: Domain,
    pub url: String,
    pub state: HealthState,
    pub payload: Option<Value>,
    pub error: Option<String>,
}

impl HealthReport {
    pub fn render(&self) -> String {
        let mut out = format!("{} backend at {}: {}", self.domain, self.url, self.state);
        if let Some(error) = &self.error {
            let _ = write!(out, "\n  {}", error);
        }
        if let Some(payload) = &self.payload {
            let _ = write!(out, "\n  {}", payload);
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedFeature {
    pub name: String,
    pub value: f64,
}

/// A feature vector with its layout names
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub domain: Domain,
    pub layout_hash: String,
    pub features: Vec<NamedFeature>,
}

impl FeatureReport {
    fn from_vector(vector: FeatureVector) -> Self {
        let layout = FeatureLayout::for_domain(vector.domain);

        let features = vector
            .as_slice()
            .iter()
            .enumerate()
            .map(|(i, value)| NamedFeature {
                name: layout
                    .and_then(|layout| layout.feature_name(i))
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("feature_{}", i + 1)),
                value: *value,
            })
            .collect();

        Self {
            domain: vector.domain,
            layout_hash: format!("{:08x}", vector.layout_hash),
            features,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("{} features (layout {})", self.domain, self.layout_hash);
        for (i, feature) in self.features.iter().enumerate() {
            let _ = write!(out, "\n  {:>2}. {:<20} {:>7.2}", i + 1, feature.name, feature.value);
        }
        out
    }
}

/// Fixed inputs a payload domain's demo backend knows about
#[derive(Debug, Clone, Serialize)]
pub struct PresetGroup {
    pub label: &'static str,
    pub values: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SampleReport {
    Features(FeatureReport),
    Presets { domain: Domain, groups: Vec<PresetGroup> },
}

impl SampleReport {
    pub fn render(&self) -> String {
        match self {
            SampleReport::Features(report) => report.render(),
            SampleReport::Presets { domain, groups } => {
                let mut out = format!("{} sample inputs", domain);
                for group in groups {
                    let _ = write!(out, "\n  {}:", group.label);
                    for value in &group.values {
                        let _ = write!(out, "\n    {}", value);
                    }
                }
                out
            }
        }
    }
}

/// Successful prediction
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub result: PredictionResult,
    /// Recent prices, stock forecasts only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<PriceHistory>,
}

impl PredictionReport {
    pub fn render(&self) -> String {
        let result = &self.result;
        let mut out = format!(
            "{}: {} (confidence {})",
            result.domain,
            result.headline(),
            result.confidence_percent()
        );

        match &result.label {
            Label::Recommendations { items, message, .. } => {
                if let Some(message) = message {
                    let _ = write!(out, "\n  {}", message);
                }
                for (rank, rec) in items.iter().enumerate() {
                    let _ = write!(out, "\n  {}. {} ({:.1}/5)", rank + 1, rec.item, rec.rating);
                }
            }
            Label::Price(forecast) => {
                if let Some(name) = &forecast.company_name {
                    let _ = write!(out, "\n  {}", name);
                }
                let trend = if forecast.is_upward() { "up" } else { "down" };
                let _ = write!(out, "\n  trend: {}", trend);
                if let Some(date) = &forecast.prediction_date {
                    let _ = write!(out, "\n  forecast for {}", date);
                }
                for (name, value) in &result.secondary_scores {
                    let _ = write!(out, "\n  {}: {:.2}", name, value);
                }
            }
            Label::Class { .. } => {
                for (name, value) in &result.secondary_scores {
                    let _ = write!(out, "\n  {}: {}", name, format_percent(*value));
                }
            }
        }

        if let Some(history) = &self.history {
            let _ = write!(out, "\n  {}", history_summary(history));
        }
        out
    }
}

/// Daily prices for one symbol
#[derive(Debug, Clone, Serialize)]
pub struct HistoryReport {
    pub history: PriceHistory,
}

impl HistoryReport {
    pub fn render(&self) -> String {
        let mut out = history_summary(&self.history);
        for day in &self.history.points {
            let _ = write!(
                out,
                "\n  {}  open {:>9.2}  high {:>9.2}  low {:>9.2}  close {:>9.2}  vol {}",
                day.date, day.open, day.high, day.low, day.close, day.volume
            );
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PopularReport {
    pub stocks: Vec<PopularStock>,
}

impl PopularReport {
    pub fn render(&self) -> String {
        let mut out = format!("{} popular symbols", self.stocks.len());
        for stock in &self.stocks {
            let _ = write!(out, "\n  {:<6} {}", stock.symbol, stock.name);
        }
        out
    }
}

fn history_summary(history: &PriceHistory) -> String {
    let mut out = format!("{} over {}: {} days", history.symbol, history.period, history.points.len());
    if let Some(latest) = history.latest() {
        let _ = write!(out, ", last close {:.2} on {}", latest.close, latest.date);
    }
    if let Some(change) = history.change_ratio() {
        let _ = write!(out, " ({:+.2}%)", change * 100.0);
    }
    out
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Probe the domain's backend once
pub async fn check_health(domain: Domain) -> anyhow::Result<HealthReport> {
    let backend = HttpBackend::new(ClientConfig::from_env(domain)?)?;
    let url = backend.config().health_url();

    let probe = backend.health().await;
    let state = classify_probe(&probe);

    let (payload, error) = match probe {
        Ok(body) => (Some(body), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(HealthReport { domain, url, state, payload, error })
}

/// Start monitoring, wait for the first probe, submit once.
/// No input words means a sample input.
pub async fn run_prediction(domain: Domain, args: &[String]) -> anyhow::Result<PredictionReport> {
    let config = ClientConfig::from_env(domain)?;
    let poll_interval = config.poll_interval;
    log::info!("Using {} backend at {}", domain, config.base_url);

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config)?);
    let monitor = HealthMonitor::start(backend.clone(), poll_interval);
    let health = monitor.first_probe().await;
    log::info!("{} backend is {}", domain, health);

    let orchestrator = Orchestrator::new(extractor_for(domain), backend.clone(), monitor.subscribe());
    let input = if args.is_empty() {
        let input = sample_input(domain);
        log::info!("No input given, using sample {:?}", input);
        input
    } else {
        parse_input(domain, args)
    };
    let outcome = orchestrator.submit(&input).await;

    let history = match &outcome {
        Ok(PredictionResult { label: Label::Price(forecast), .. }) => {
            recent_history(backend.as_ref(), &forecast.symbol).await
        }
        _ => None,
    };

    orchestrator.shutdown();
    monitor.stop().await;

    let result = outcome.with_context(|| format!("{} prediction failed", domain))?;
    Ok(PredictionReport { result, history })
}

/// History shown next to a forecast; missing history never fails the forecast
async fn recent_history(backend: &dyn Backend, symbol: &str) -> Option<PriceHistory> {
    match fetch_history(backend, symbol, DEFAULT_HISTORY_PERIOD).await {
        Ok(history) => Some(history),
        Err(e) => {
            log::warn!("No {} history for {}: {}", DEFAULT_HISTORY_PERIOD, symbol, e);
            None
        }
    }
}

/// Random valid vector for a vector domain, the presets for the others
pub fn sample(domain: Domain) -> SampleReport {
    match sample_features(domain) {
        Some(vector) => SampleReport::Features(FeatureReport::from_vector(vector)),
        None => SampleReport::Presets {
            domain,
            groups: presets(domain)
                .into_iter()
                .map(|(label, values)| PresetGroup { label, values: values.to_vec() })
                .collect(),
        },
    }
}

/// Heuristic phishing features for a URL
pub fn extract(url: &str) -> anyhow::Result<FeatureReport> {
    let vector = extract_url_features(url)?;
    log::debug!("Extracted {}", vector.to_log_entry());
    Ok(FeatureReport::from_vector(vector))
}

/// Daily prices from the stock backend
pub async fn history(symbol: &str, period: Option<&str>) -> anyhow::Result<HistoryReport> {
    let backend = HttpBackend::new(ClientConfig::from_env(Domain::Stock)?)?;
    let period = period.unwrap_or(DEFAULT_HISTORY_PERIOD);

    let history = fetch_history(&backend, symbol, period)
        .await
        .with_context(|| format!("{} history for {} failed", period, symbol))?;
    Ok(HistoryReport { history })
}

/// Symbols the stock backend suggests
pub async fn popular() -> anyhow::Result<PopularReport> {
    let backend = HttpBackend::new(ClientConfig::from_env(Domain::Stock)?)?;
    let stocks = fetch_popular(&backend).await.context("popular symbols failed")?;
    Ok(PopularReport { stocks })
}

/// Command-line words → the raw input a domain's extractor expects
pub fn parse_input(domain: Domain, args: &[String]) -> RawInput {
    match domain {
        // One word is a URL, anything else is a hand-edited vector
        Domain::Phishing if args.len() == 1 => RawInput::Url(args[0].clone()),
        Domain::Phishing | Domain::Fraud => RawInput::Fields(args.to_vec()),
        Domain::Spam => RawInput::Text(args.join(" ")),
        Domain::Recommendation => RawInput::User(args.join(" ")),
        Domain::Stock => RawInput::Symbol(args.join(" ")),
    }
}
