//! HTML and CSV rendering for the calculator page.

use tickmean_core::{format_date, AverageError, AverageResult, SourceErrorKind};
use time::Date;

pub const CSV_HEADER: &str = "symbol,start,end,observations,average_price";

/// Values echoed back into the sidebar form.
#[derive(Debug, Default, Clone)]
pub struct FormValues<'a> {
    pub symbol: &'a str,
    pub start: &'a str,
    pub end: &'a str,
}

/// What the main panel shows.
pub enum Panel<'a> {
    Instructions { lookback_days: u16 },
    Result(&'a AverageResult),
    Error(&'a AverageError),
}

/// A simple HTML table builder.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| (*h).to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut output = String::from("<table>\n<thead><tr>");
        for header in &self.headers {
            output.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        output.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            output.push_str("<tr>");
            for cell in row {
                output.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            output.push_str("</tr>\n");
        }
        output.push_str("</tbody>\n</table>");
        output
    }
}

/// Message shown to the user for each failure class.
pub fn user_message(error: &AverageError) -> String {
    match error {
        AverageError::InvalidSymbol(reason) => {
            format!("Please enter a valid stock/ETF symbol and date range ({reason}).")
        }
        AverageError::NoData { symbol, interval } => format!(
            "No trading data available for {symbol} between {} and {}.",
            format_date(interval.start()),
            format_date(interval.end())
        ),
        AverageError::Provider(source) if source.kind() == SourceErrorKind::RateLimited => {
            format!(
                "API call frequency limit reached. Please try again later. ({})",
                source.message()
            )
        }
        AverageError::Provider(source) if source.retryable() => format!(
            "Data provider is unavailable right now. Please try again shortly. ({})",
            source.message()
        ),
        AverageError::Provider(source) => format!("Data provider error: {}", source.message()),
    }
}

pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

pub fn result_table(result: &AverageResult) -> Table {
    let mut table = Table::new(&["Symbol", "Start", "End", "Observations", "Average Price"]);
    table.add_row(vec![
        result.symbol.to_string(),
        format_date(result.interval.start()),
        format_date(result.interval.end()),
        result.points.to_string(),
        format_price(result.average),
    ]);
    table
}

pub fn csv(result: &AverageResult) -> String {
    format!(
        "{CSV_HEADER}\n{},{},{},{},{:.2}\n",
        result.symbol,
        format_date(result.interval.start()),
        format_date(result.interval.end()),
        result.points,
        result.average
    )
}

/// `AAPL_average_20240108.csv`
pub fn csv_filename(result: &AverageResult, today: Date) -> String {
    format!(
        "{}_average_{:04}{:02}{:02}.csv",
        result.symbol,
        today.year(),
        u8::from(today.month()),
        today.day()
    )
}

pub fn page(form: &FormValues<'_>, panel: Panel<'_>) -> String {
    let main = match panel {
        Panel::Instructions { lookback_days } => instructions(lookback_days),
        Panel::Result(result) => result_panel(result),
        Panel::Error(error) => format!(
            "<div class=\"error\">{}</div>",
            escape_html(&user_message(error))
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Interval Price Calculator</title>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
aside {{ width: 18rem; padding: 1.5rem; background: #f0f2f6; min-height: 100vh; }}
main {{ flex: 1; padding: 1.5rem 3rem; }}
label {{ display: block; margin-top: 1rem; }}
input {{ width: 100%; padding: 0.4rem; box-sizing: border-box; }}
button {{ margin-top: 1.5rem; padding: 0.5rem 1rem; background: #ff4b4b; color: #fff; border: 0; border-radius: 0.3rem; }}
table {{ border-collapse: collapse; }}
th, td {{ border: 1px solid #ddd; padding: 0.4rem 0.8rem; text-align: left; }}
.error {{ background: #ffe0e0; padding: 1rem; border-radius: 0.3rem; }}
.info {{ background: #e0ecff; padding: 1rem; border-radius: 0.3rem; }}
</style>
</head>
<body>
<aside>
<h2>Configuration</h2>
<form method="get" action="/">
<label for="symbol">Enter Stock/ETF Symbol:</label>
<input id="symbol" name="symbol" placeholder="e.g., AAPL, SPY, QQQ" value="{symbol}">
<label for="start">Start date (optional):</label>
<input id="start" name="start" type="date" value="{start}">
<label for="end">End date (optional, exclusive):</label>
<input id="end" name="end" type="date" value="{end}">
<button type="submit">Calculate Averages</button>
</form>
</aside>
<main>
<h1>📈 Stock/ETF Interval Price Calculator</h1>
{main}
</main>
</body>
</html>
"#,
        symbol = escape_html(form.symbol),
        start = escape_html(form.start),
        end = escape_html(form.end),
    )
}

fn instructions(lookback_days: u16) -> String {
    format!(
        r#"<p class="info">👈 Enter a stock or ETF symbol in the sidebar and click 'Calculate Averages' to get started.</p>
<h3>How it works:</h3>
<ol>
<li><strong>Enter Symbol</strong>: Input any valid stock or ETF symbol (e.g., AAPL, SPY, QQQ)</li>
<li><strong>Pick Dates</strong>: Leave them empty to average the past {lookback_days} days</li>
<li><strong>Calculate</strong>: The mean of every price observation in the range is computed</li>
<li><strong>Export</strong>: Download the result as a CSV file</li>
</ol>
<h3>Notes:</h3>
<ul>
<li>The end date is exclusive</li>
<li>Weekends are excluded and market holidays simply have no data</li>
<li>Data is sourced from Alpha Vantage</li>
</ul>"#
    )
}

fn result_panel(result: &AverageResult) -> String {
    let start = format_date(result.interval.start());
    let end = format_date(result.interval.end());
    let csv_href = format!(
        "/api/average.csv?symbol={}&amp;start={start}&amp;end={end}",
        escape_html(result.symbol.as_str())
    );
    format!(
        "<h3>Average Price for {symbol}</h3>\n{table}\n<p><a href=\"{csv_href}\">📥 Download CSV</a></p>",
        symbol = escape_html(result.symbol.as_str()),
        table = result_table(result).render(),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
