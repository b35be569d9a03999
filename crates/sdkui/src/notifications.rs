use notify_rust::Notification;

const APP_NAME: &str = "sdkui";
const TIMEOUT_MS: i32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    const fn icon(self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Error => "dialog-error",
        }
    }
}

/// Fire-and-forget desktop notification; delivery failures are only logged.
pub fn notify(enabled: bool, severity: Severity, summary: &str, body: &str) {
    match severity {
        Severity::Info => log::info!("{summary}: {body}"),
        Severity::Error => log::error!("{summary}: {body}"),
    }
    if !enabled {
        return;
    }

    let summary = summary.to_string();
    let body = body.to_string();
    std::thread::spawn(move || {
        if let Err(e) = Notification::new()
            .summary(&summary)
            .body(&body)
            .icon(severity.icon())
            .appname(APP_NAME)
            .timeout(TIMEOUT_MS)
            .show()
        {
            log::debug!("Desktop notification failed: {e}");
        }
    });
}

/// First meaningful line of tool output, for notification bodies.
pub fn summarize(output: &str) -> &str {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("done")
}
