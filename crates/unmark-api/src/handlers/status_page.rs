//! HTML status page.
//!
//! Shows the aggregate counters, today's counts and a seven-day table, plus
//! a manual upload form posting to `/api/remove-watermark`. Styling and the
//! upload script are served from `/static`.

use axum::{extract::State, response::Html};
use chrono::NaiveDate;

use unmark_core::{last_seven_days, Statistics};

use crate::{ApiError, AppState};

/// Render the status page.
pub async fn status_page(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let stats = state.stats.get().await.map_err(ApiError::Page)?;
    let today = state.stats.today();
    Ok(Html(render_dashboard(
        &stats,
        today,
        &state.chain.provider_names(),
    )))
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn trend_rows(stats: &Statistics, today: NaiveDate) -> String {
    last_seven_days(today)
        .into_iter()
        .map(|date| {
            let day = stats.daily_stats.get(&date).copied().unwrap_or_default();
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                date, day.total, day.successful, day.failed
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the dashboard HTML for a statistics snapshot.
pub fn render_dashboard(stats: &Statistics, today: NaiveDate, providers: &[String]) -> String {
    let success_rate = stats
        .success_rate()
        .map(|rate| format!("{:.1}%", rate))
        .unwrap_or_else(|| "n/a".to_string());
    let last_run = stats
        .last_run_timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let providers = if providers.is_empty() {
        "none configured".to_string()
    } else {
        escape_html(&providers.join(", "))
    };
    let today_stats = stats.day(today);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>unmark status</title>
<link rel="stylesheet" href="/static/dashboard.css">
</head>
<body>
<main>
<h1>unmark</h1>
<p class="providers">Providers: {providers}</p>

<section class="cards">
  <div class="card"><h2>Total runs</h2><p id="total-runs">{total}</p></div>
  <div class="card"><h2>Successful</h2><p id="successful-runs">{successful}</p></div>
  <div class="card"><h2>Failed</h2><p id="failed-runs">{failed}</p></div>
  <div class="card"><h2>Success rate</h2><p id="success-rate">{success_rate}</p></div>
</section>
<p class="last-run">Last run: {last_run}</p>

<section>
<h2>Today ({today})</h2>
<p>Total {today_total}, successful {today_successful}, failed {today_failed}</p>
</section>

<section>
<h2>Last 7 days</h2>
<table id="trend">
<thead><tr><th>Date</th><th>Total</th><th>Successful</th><th>Failed</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
</section>

<section>
<h2>Try it</h2>
<form id="upload-form">
  <input type="file" id="image-input" accept="image/*" required>
  <input type="text" id="removal-text" placeholder="watermarks">
  <button type="submit">Remove</button>
</form>
<p id="upload-status"></p>
<img id="result-image" alt="" hidden>
</section>
</main>
<script src="/static/dashboard.js"></script>
</body>
</html>
"#,
        providers = providers,
        total = stats.total_runs,
        successful = stats.successful_runs,
        failed = stats.failed_runs,
        success_rate = success_rate,
        last_run = last_run,
        today = today.format("%Y-%m-%d"),
        today_total = today_stats.total,
        today_successful = today_stats.successful,
        today_failed = today_stats.failed,
        rows = trend_rows(stats, today),
    )
}
