//! Result formatting: human-readable and machine-readable report output

use crate::app::RunReport;
use crate::models::{RunConfig, TestServer};
use chrono::Utc;
use colored::Colorize;

/// Formats servers and measurement results for the terminal.
///
/// Human mode prints labeled lines; report mode prints a single line of
/// fields joined by the configured separator, for scripted consumers.
pub struct Formatter {
    use_color: bool,
    report_mode: bool,
    report_char: String,
}

impl Formatter {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            use_color: config.enable_color,
            report_mode: config.report_mode,
            report_char: config.report_char.clone(),
        }
    }

    /// One catalog line: `id | sponsor (name, country)`.
    pub fn server_line(&self, server: &TestServer) -> String {
        if self.use_color {
            format!("{:<4} | {}", server.id.bold(), server.describe())
        } else {
            format!("{:<4} | {}", server.id, server.describe())
        }
    }

    /// The full server catalog, one line per server, payload order.
    pub fn server_list(&self, servers: &[TestServer]) -> String {
        servers
            .iter()
            .map(|s| self.server_line(s))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a completed measurement run.
    pub fn run_report(&self, report: &RunReport) -> String {
        if self.report_mode {
            self.machine_report(report)
        } else {
            self.human_report(report)
        }
    }

    fn human_report(&self, report: &RunReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Client: {} ({})",
            report.profile.ip, report.profile.isp
        ));
        lines.push(format!(
            "Server: {} | {} [{:.2} km]",
            report.server.id,
            report.server.describe(),
            report.server.distance
        ));

        let ping = format!("Ping: {:.2} ms", report.server.latency);
        lines.push(if self.use_color { ping.cyan().to_string() } else { ping });

        if let Some(download) = report.download_mbps {
            let line = format!("Download: {:.2} Mbps", download);
            lines.push(if self.use_color { line.green().to_string() } else { line });
        }

        if let Some(upload) = report.upload_mbps {
            let line = format!("Upload: {:.2} Mbps", upload);
            lines.push(if self.use_color { line.green().to_string() } else { line });
        }

        lines.join("\n")
    }

    fn machine_report(&self, report: &RunReport) -> String {
        let sep = &self.report_char;
        let mut fields = vec![
            Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            report.profile.ip.clone(),
            report.profile.isp.clone(),
            report.server.id.clone(),
            format!("{}({}, {})", report.server.sponsor, report.server.name, report.server.country),
            format!("{:.2}", report.server.distance),
            format!("{:.2}", report.server.latency),
        ];

        if let Some(download) = report.download_mbps {
            fields.push(format!("{:.2}", download));
        }
        if let Some(upload) = report.upload_mbps {
            fields.push(format!("{:.2}", upload));
        }

        fields.join(sep)
    }
}
