// src/utils/mod.rs
use crate::error::RouterError;
use log::info;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn setup_logging(level: Option<&str>) -> Result<(), fern::InitError> {
    let level = match level.unwrap_or("info").to_ascii_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}

/// Parses a decimal-as-string field from an upstream snapshot, naming the
/// field in the error so bad pool data is traceable in logs.
pub fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, RouterError> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        RouterError::ParseError(format!("field '{}' value '{}': {}", field, raw, e))
    })
}
