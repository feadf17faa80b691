//! Server-rendered HTML pages built from an inline base template.

use axum::{extract::State, response::Html};
use chrono::Utc;
use std::sync::Arc;

use crate::api_errors::ApiError;
use crate::app_state::AppState;
use crate::errors::SafeRead;
use crate::platform::{compliance_snapshot, RegulationSyncStatus, TOTAL_FEATURES};

const BASE_STYLE: &str = r#"
:root {
    --primary-color: #6366f1;
    --primary-dark: #4f46e5;
    --success-color: #10b981;
    --warning-color: #f59e0b;
    --error-color: #ef4444;
    --gray-50: #f9fafb;
    --gray-200: #e5e7eb;
    --gray-300: #d1d5db;
    --gray-600: #4b5563;
    --gray-900: #111827;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, sans-serif;
    background: var(--gray-50);
    color: var(--gray-900);
    line-height: 1.6;
}
.header {
    background: white;
    border-bottom: 1px solid var(--gray-200);
    padding: 0 24px;
    position: sticky;
    top: 0;
}
.header-content {
    max-width: 1200px;
    margin: 0 auto;
    display: flex;
    align-items: center;
    justify-content: space-between;
    height: 64px;
}
.logo { font-size: 20px; font-weight: 700; color: var(--primary-color); text-decoration: none; }
.nav { display: flex; gap: 8px; }
.nav-item {
    padding: 8px 16px;
    border-radius: 8px;
    text-decoration: none;
    color: var(--gray-600);
    font-weight: 500;
}
.nav-item.active { background: var(--primary-color); color: white; }
.container { max-width: 1200px; margin: 0 auto; padding: 24px; }
.page-title { font-size: 32px; font-weight: 700; margin-bottom: 8px; }
.page-subtitle { font-size: 16px; color: var(--gray-600); margin-bottom: 32px; }
.status-banner {
    background: linear-gradient(135deg, var(--success-color), #059669);
    color: white;
    padding: 20px 24px;
    border-radius: 12px;
    margin-bottom: 32px;
    display: flex;
    justify-content: space-between;
    align-items: center;
}
.status-banner.partial { background: linear-gradient(135deg, var(--warning-color), #d97706); }
.content-grid {
    display: grid;
    gap: 24px;
    grid-template-columns: repeat(auto-fit, minmax(400px, 1fr));
}
.content-card {
    background: white;
    border-radius: 12px;
    border: 1px solid var(--gray-200);
    padding: 24px;
}
.card-title { font-size: 18px; font-weight: 600; margin-bottom: 16px; }
.metric-value { font-size: 32px; font-weight: 700; color: var(--primary-color); }
.metric-label { font-size: 14px; color: var(--gray-600); }
.framework-row {
    display: flex;
    justify-content: space-between;
    padding: 12px;
    background: var(--gray-50);
    border-radius: 6px;
    margin-bottom: 8px;
}
.feature-row {
    display: flex;
    gap: 12px;
    padding: 12px;
    border-radius: 6px;
    margin-bottom: 8px;
    background: var(--success-color);
    color: white;
}
.feature-row.inactive { background: var(--gray-300); color: var(--gray-600); }
.btn {
    display: inline-block;
    padding: 12px 24px;
    border-radius: 8px;
    font-weight: 500;
    text-decoration: none;
    background: var(--primary-color);
    color: white;
}
"#;

fn base_page(title: &str, active_page: &str, content: &str) -> String {
    let nav_class = |page: &str| {
        if page == active_page {
            "nav-item active"
        } else {
            "nav-item"
        }
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - ZenThera AI Compliance Suite</title>
    <style>{BASE_STYLE}</style>
</head>
<body>
    <header class="header">
        <div class="header-content">
            <a href="/" class="logo">ZenThera</a>
            <nav class="nav">
                <a href="/" class="{dashboard_class}">Dashboard</a>
                <a href="/setup" class="{setup_class}">Setup</a>
            </nav>
        </div>
    </header>
    <main class="container">
{content}
    </main>
</body>
</html>"#,
        dashboard_class = nav_class("dashboard"),
        setup_class = nav_class("setup"),
    )
}

fn feature_row(label: &str, active: bool, hint: &str) -> String {
    if active {
        format!(r#"<div class="feature-row"><span>&#10003;</span><span>{label}</span></div>"#)
    } else {
        format!(
            r#"<div class="feature-row inactive"><span>&#9208;</span><span>{label} ({hint})</span></div>"#
        )
    }
}

pub async fn dashboard_page(
    State(st): State<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let active = st.platform.active_feature_count()?;
    let docs_uploaded = !st.platform.uploaded_files.safe_read()?.is_empty();
    let llm_connected = st.platform.llm_connected()?;
    let snapshot = compliance_snapshot();
    let sync = RegulationSyncStatus::default();

    let banner_class = if active < TOTAL_FEATURES {
        "status-banner partial"
    } else {
        "status-banner"
    };
    let banner_note = if active < TOTAL_FEATURES {
        "Complete setup to unlock all compliance monitoring features"
    } else {
        "All features active - comprehensive compliance monitoring enabled"
    };

    let framework_rows: String = ["eu_ai_act", "gdpr", "iso_27001", "soc2"]
        .iter()
        .map(|key| {
            let score = snapshot["frameworks"][key]["score"].as_f64().unwrap_or(0.0);
            let label = match *key {
                "eu_ai_act" => "EU AI Act",
                "gdpr" => "GDPR",
                "iso_27001" => "ISO 27001",
                _ => "SOC2",
            };
            format!(
                r#"<div class="framework-row"><span>{label}</span><span><strong>{score:.1}%</strong></span></div>"#
            )
        })
        .collect();

    let feature_rows = [
        feature_row("Regulation Sync Module", true, ""),
        feature_row("Predictive Compliance Engine", true, ""),
        feature_row("Ethical AI Score", true, ""),
        feature_row("Compliance Grid", docs_uploaded, "Upload docs to activate"),
        feature_row("Bias & Dataset Tracker", docs_uploaded, "Upload docs to activate"),
        feature_row("Synthetic Testing Sandbox", docs_uploaded, "Upload docs to activate"),
        feature_row("LLM Observability Engine", llm_connected, "Connect LLM to activate"),
    ]
    .join("\n");

    let content = format!(
        r#"<h1 class="page-title">AI Compliance Dashboard</h1>
<p class="page-subtitle">Monitor your AI systems compliance and governance in real-time</p>

<div class="{banner_class}">
    <div>
        <strong>{active}/{total} Features Active</strong>
        <div style="font-size: 14px; opacity: 0.9;">{banner_note}</div>
    </div>
    <div style="font-size: 24px;">{percent}%</div>
</div>

<div class="content-grid">
    <div class="content-card">
        <h3 class="card-title">Compliance Overview</h3>
        <div style="text-align: center; margin-bottom: 20px;">
            <div class="metric-value">{overall:.1}%</div>
            <div class="metric-label">Overall Compliance Score</div>
        </div>
        {framework_rows}
    </div>

    <div class="content-card">
        <h3 class="card-title">Active Features</h3>
        {feature_rows}
    </div>

    <div class="content-card">
        <h3 class="card-title">System Status</h3>
        <div class="framework-row"><span>Regulatory Sources</span><span><strong>{sources}</strong></span></div>
        <div class="framework-row"><span>Alerts Generated</span><span><strong>{alerts}</strong></span></div>
        <div class="framework-row"><span>LLM Connected</span><span><strong>{llm}</strong></span></div>
        <div class="metric-label" style="margin-top: 16px;">Last updated {updated}</div>
    </div>

    <div class="content-card">
        <h3 class="card-title">Quick Actions</h3>
        <p style="margin-bottom: 16px;" class="metric-label">Complete setup to activate every feature.</p>
        <a href="/setup" class="btn">Complete Setup</a>
    </div>
</div>"#,
        total = TOTAL_FEATURES,
        percent = (active as f64 / TOTAL_FEATURES as f64 * 100.0).round(),
        overall = snapshot["overall_score"].as_f64().unwrap_or(0.0),
        sources = sync.monitored_sources,
        alerts = sync.alerts_generated,
        llm = if llm_connected { "yes" } else { "no" },
        updated = Utc::now().format("%Y-%m-%d %H:%M:%S"),
    );

    Ok(Html(base_page("Dashboard", "dashboard", &content)))
}

pub async fn setup_page(State(st): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let active = st.platform.active_feature_count()?;
    let docs = st.platform.uploaded_files.safe_read()?.len();
    let llm_connected = st.platform.llm_connected()?;

    let banner_class = if active < TOTAL_FEATURES {
        "status-banner partial"
    } else {
        "status-banner"
    };

    let upload_status = if docs > 0 {
        format!("{docs} document(s) uploaded - Compliance Grid, Bias Tracker and Testing Sandbox active.")
    } else {
        "POST a JSON file list to /api/upload to activate three more features.".to_string()
    };
    let llm_status = if llm_connected {
        "LLM connected - observability, explainability and failure detection active.".to_string()
    } else {
        "POST provider credentials to /api/connect-llm to activate LLM monitoring.".to_string()
    };

    let content = format!(
        r#"<h1 class="page-title">Setup &amp; Configuration</h1>
<p class="page-subtitle">Configure your ZenThera AI Compliance Suite for maximum coverage</p>

<div class="{banner_class}">
    <div>
        <strong>Setup Progress: {active}/{total} Features Active</strong>
        <div style="font-size: 14px; opacity: 0.9;">Complete the steps below to unlock full compliance monitoring</div>
    </div>
    <div style="font-size: 24px;">{percent}%</div>
</div>

<div class="content-grid">
    <div class="content-card">
        <h3 class="card-title">Step 1: Independent Features</h3>
        <p class="metric-label">Regulation Sync, Predictive Compliance, and Ethical AI Score require no setup and are monitoring automatically.</p>
    </div>

    <div class="content-card">
        <h3 class="card-title">Step 2: Upload Documents</h3>
        <p class="metric-label">{upload_status}</p>
    </div>

    <div class="content-card">
        <h3 class="card-title">Step 3: Connect an LLM</h3>
        <p class="metric-label">{llm_status}</p>
    </div>
</div>"#,
        total = TOTAL_FEATURES,
        percent = (active as f64 / TOTAL_FEATURES as f64 * 100.0).round(),
    );

    Ok(Html(base_page("Setup", "setup", &content)))
}
