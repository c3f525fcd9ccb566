//! Email report model: subject line and HTML body.
//!
//! Each section covers one horizon and references its chart image through a
//! `cid:` URL. Rendering the images and sending the message belong to the
//! caller's mail transport.

use cotation_core::analysis::Analysis;
use cotation_core::domain::Horizon;
use serde::{Deserialize, Serialize};

const GAIN_COLOR: &str = "#26a69a";
const LOSS_COLOR: &str = "#ef5350";

/// Period figures shown in one report section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    pub open: f64,
    pub close: f64,
    pub diff: f64,
    pub percent: f64,
    /// RSI at the closing candle.
    pub rsi: Option<f64>,
}

impl ReportStats {
    /// `None` when the analysis covers no quotes.
    pub fn from_analysis(analysis: &Analysis) -> Option<Self> {
        let summary = analysis.summary?;
        Some(Self {
            open: summary.open,
            close: summary.close,
            diff: summary.diff,
            percent: summary.percent,
            rsi: analysis.last_rsi(),
        })
    }

    fn is_gain(&self) -> bool {
        self.diff >= 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub horizon: Horizon,
    pub stats: ReportStats,
    /// Content-ID of the chart image attached to the message.
    pub image_cid: String,
}

impl ReportSection {
    pub fn new(symbol: &str, horizon: Horizon, stats: ReportStats) -> Self {
        Self {
            horizon,
            stats,
            image_cid: format!("chart-{}-{}", symbol.to_lowercase(), horizon.code()),
        }
    }
}

/// `Crypto report BTCUSDC: 30d (+1.2%) | 7d (-0.4%)`
pub fn subject_line(symbol: &str, sections: &[ReportSection]) -> String {
    let parts: Vec<String> = sections
        .iter()
        .map(|s| format!("{} ({:+.1}%)", s.horizon.label(), s.stats.percent))
        .collect();
    format!("Crypto report {symbol}: {}", parts.join(" | "))
}

fn signed(value: f64, positive: bool) -> String {
    if positive {
        format!("+{value:.2}")
    } else {
        format!("{value:.2}")
    }
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn write_section(html: &mut String, section: &ReportSection) {
    let stats = &section.stats;
    let gain = stats.is_gain();
    let color = if gain { GAIN_COLOR } else { LOSS_COLOR };
    let rsi = stats
        .rsi
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    html.push_str(&format!(
        "<h2 style=\"border-bottom: 2px solid #eee; padding-bottom: 5px;\">{} analysis</h2>\n",
        section.horizon.label()
    ));
    html.push_str("<table style=\"margin-bottom: 25px;\">\n");
    html.push_str(&format!(
        "<tr><td style=\"padding: 4px;\">Open:</td><td style=\"padding: 4px;\">{:.2} USDC</td></tr>\n",
        stats.open
    ));
    html.push_str(&format!(
        "<tr><td style=\"padding: 4px;\">Close:</td><td style=\"padding: 4px;\">{:.2} USDC</td></tr>\n",
        stats.close
    ));
    html.push_str(&format!(
        "<tr style=\"font-weight: bold; color: {color};\"><td style=\"padding: 4px;\">Change:</td><td style=\"padding: 4px;\">{} USDC ({} %)</td></tr>\n",
        signed(stats.diff, gain),
        signed(stats.percent, gain)
    ));
    html.push_str(&format!(
        "<tr><td style=\"padding: 4px;\">Closing RSI:</td><td style=\"padding: 4px;\">{rsi}</td></tr>\n"
    ));
    html.push_str("</table>\n");
    html.push_str(&format!(
        "<img src=\"cid:{}\"><br><br>\n",
        escape_html(&section.image_cid)
    ));
}

/// HTML body with one table and chart per section, in section order.
pub fn build_report_html(symbol: &str, sections: &[ReportSection]) -> String {
    let mut html = String::with_capacity(1024 + sections.len() * 1024);
    html.push_str("<html>\n<body style=\"font-family: sans-serif; color: #333;\">\n");
    html.push_str("<p>Hello,</p>\n");
    html.push_str(&format!(
        "<p>Here is your crypto report for <strong>{}</strong>.</p>\n",
        escape_html(symbol)
    ));
    for section in sections {
        write_section(&mut html, section);
    }
    html.push_str("</body>\n</html>\n");
    html
}
