//! Pure text formatting for the terminal view.

use crate::chain::types::CampaignStatus;
use crate::wallet::session::WalletConnection;

/// Render a funding progress bar, e.g. `[#####---------------] 25.0%`.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((clamped / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!(
        "[{}{}] {:.1}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        clamped
    )
}

/// Estimate time remaining until the deadline ledger.
///
/// Ledger close time is an assumed constant, so this is an estimate and is
/// rendered with a leading `~`.
pub fn format_remaining(deadline: u32, current_ledger: u32, ledger_close_secs: u64) -> String {
    if deadline == 0 || current_ledger == 0 {
        return "unknown".to_string();
    }
    if current_ledger >= deadline {
        return "ended".to_string();
    }
    let remaining_secs = u64::from(deadline - current_ledger) * ledger_close_secs;
    format!("~{}", format_duration(remaining_secs))
}

/// Render a duration as its two most significant units, e.g. `2d 3h`.
pub fn format_duration(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Abbreviate a public key for display: `GDXF…K2M7`.
pub fn abbreviate_key(key: &str) -> String {
    if key.len() <= 10 {
        return key.to_string();
    }
    format!("{}…{}", &key[..4], &key[key.len() - 4..])
}

/// Render the campaign card.
pub fn render_status(status: &CampaignStatus, current_ledger: u32, ledger_close_secs: u64) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Raised {:.2} / {:.2} XLM\n",
        status.total_raised, status.target_amount
    ));
    out.push_str(&progress_bar(status.percent_funded(), 30));
    out.push('\n');
    out.push_str(&format!(
        "Deadline: ledger {} (current {}), time remaining {}\n",
        status.deadline,
        current_ledger,
        format_remaining(status.deadline, current_ledger, ledger_close_secs)
    ));

    if status.target_reached {
        out.push_str("Target reached!\n");
    }
    if status.deadline_passed {
        out.push_str("Campaign closed.\n");
    }
    if status.is_finalized {
        out.push_str("Funds withdrawn by the campaign owner.\n");
    }

    out
}

/// Render the wallet connection line.
pub fn render_connection(connection: &WalletConnection, last_error: Option<&str>) -> String {
    let mut out = String::new();
    if connection.connected {
        out.push_str(&format!(
            "Wallet: {} ({})\n",
            connection
                .public_key
                .as_deref()
                .map(abbreviate_key)
                .unwrap_or_default(),
            connection.network.as_deref().unwrap_or("unknown network"),
        ));
    } else {
        out.push_str("Wallet: not connected\n");
    }
    if let Some(message) = last_error {
        out.push_str(&format!("  ! {}\n", message));
    }
    out
}
