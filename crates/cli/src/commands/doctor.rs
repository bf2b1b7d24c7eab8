use serde::Serialize;
use storefront_core::config::{AppConfig, LoadOptions};
use storefront_core::view::PageRenderer;
use storefront_core::{Catalog, Storefront};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(options: LoadOptions, json_output: bool) -> String {
    let report = build_report(options);

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report(options: LoadOptions) -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(options) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            let catalog = check_catalog(&config, &mut checks);
            checks.push(check_templates(&config, catalog));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["catalog_load", "page_render"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_catalog(config: &AppConfig, checks: &mut Vec<DoctorCheck>) -> Option<Catalog> {
    match config.load_catalog() {
        Ok(catalog) if catalog.is_empty() => {
            checks.push(DoctorCheck {
                name: "catalog_load",
                status: CheckStatus::Fail,
                details: "catalog loaded but contains no products".to_string(),
            });
            None
        }
        Ok(catalog) => {
            checks.push(DoctorCheck {
                name: "catalog_load",
                status: CheckStatus::Pass,
                details: format!("{} products available", catalog.len()),
            });
            Some(catalog)
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "catalog_load",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            None
        }
    }
}

fn check_templates(config: &AppConfig, catalog: Option<Catalog>) -> DoctorCheck {
    let Some(catalog) = catalog else {
        return DoctorCheck {
            name: "page_render",
            status: CheckStatus::Skipped,
            details: "skipped because the catalog is unavailable".to_string(),
        };
    };

    let rendered =
        PageRenderer::new(&config.display.title, &config.display.currency_symbol).and_then(
            |renderer| renderer.render(&Storefront::new(catalog)),
        );

    match rendered {
        Ok(page) => DoctorCheck {
            name: "page_render",
            status: CheckStatus::Pass,
            details: format!("products page rendered ({} lines)", page.lines().count()),
        },
        Err(error) => {
            DoctorCheck { name: "page_render", status: CheckStatus::Fail, details: error.to_string() }
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
