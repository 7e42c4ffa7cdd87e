use std::time::{SystemTime, UNIX_EPOCH};

use floatdict_translator::{HistoryEntry, TranslationService};

/// Prints past lookups, newest first
pub fn print_history(translator: &TranslationService, filter: Option<&str>) {
    let filter = filter.filter(|f| !f.is_empty());
    let entries = translator.history(filter);
    if entries.is_empty() {
        println!("No lookups recorded");
        return;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    for entry in &entries {
        println!("{}", history_line(entry, now));
    }
}

fn history_line(entry: &HistoryEntry, now: u64) -> String {
    format!(
        "{:<10} {:?} {}->{}  {}",
        age(now.saturating_sub(entry.looked_up_at)),
        entry.mode(),
        entry.key.from,
        entry.key.to,
        entry.word().replace('\n', " ")
    )
}

fn age(seconds: u64) -> String {
    match seconds {
        0..60 => "just now".to_string(),
        60..3_600 => format!("{}m ago", seconds / 60),
        3_600..86_400 => format!("{}h ago", seconds / 3_600),
        _ => format!("{}d ago", seconds / 86_400),
    }
}
