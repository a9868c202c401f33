//! Doctor command - validate configuration and show status

use anyhow::Result;
use post_sync_adapters::{external::HttpExternalApi, store::SqlitePostRepository};
use post_sync_domain::{ExternalApi, PostRepository};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    store: CheckResult,
    external_api: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        store: CheckResult::error("Not checked"),
        external_api: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    // Check config
    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.store = check_store(config).await;

        report.external_api = if args.offline {
            CheckResult::warn("Skipped (--offline)")
        } else {
            check_external_api(config).await
        };
    }

    let checks = [&report.config, &report.store, &report.external_api];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    // Output report
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_store(config: &AppConfig) -> CheckResult {
    if config.store.in_memory {
        return CheckResult::warn("In-memory store configured, posts are not persisted");
    }

    let path = &config.store.database_path;
    let store = match SqlitePostRepository::new(path).await {
        Ok(store) => store,
        Err(e) => {
            return CheckResult::error(format!(
                "Failed to open database {}: {}",
                path.display(),
                e
            ));
        }
    };

    match store.list_distinct_user_ids().await {
        Ok(user_ids) => CheckResult::ok(format!(
            "Database {} ({} distinct users)",
            path.display(),
            user_ids.len()
        ))
        .with_details(serde_json::json!({
            "path": path.display().to_string(),
            "user_ids": user_ids,
        })),
        Err(e) => CheckResult::error(format!("Database query failed: {}", e)),
    }
}

async fn check_external_api(config: &AppConfig) -> CheckResult {
    let base_url = &config.external_api.base_url;

    if base_url.trim().is_empty() {
        return CheckResult::error("External API base_url is empty");
    }

    let api = match HttpExternalApi::new(base_url.clone(), config.external_api.timeout()) {
        Ok(api) => api,
        Err(e) => return CheckResult::error(e.to_string()),
    };

    match api.fetch_user(1).await {
        Ok(Some(_)) => CheckResult::ok(format!("Reachable: {}", api.base_url())),
        Ok(None) => CheckResult::warn(format!(
            "Reachable: {}, but user 1 does not exist",
            api.base_url()
        )),
        Err(e) => CheckResult::error(format!("Unreachable: {}: {}", api.base_url(), e)),
    }
}

fn print_report(report: &DoctorReport) {
    println!("post-sync Doctor Report");
    println!("=======================");
    println!();

    print_check("Config", &report.config);
    print_check("Store", &report.store);
    print_check("External API", &report.external_api);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall == "ok" {
        println!();
        println!("Ready to serve! Try: post-sync serve");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
