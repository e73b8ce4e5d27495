use chrono::{DateTime, Local};

use autopilot_core::{status_label, Alert, AppViewModel, Locale, Phase, PresetRowView, QueueEntry};

const BAR_WIDTH: usize = 20;

/// Turns view-model changes into terminal lines. Only what changed since
/// the previous render is printed.
#[derive(Debug, Default)]
pub struct Renderer {
    last_progress: Option<(u8, String)>,
    last_alert: Option<Alert>,
}

impl Renderer {
    pub fn render(
        &mut self,
        view: &AppViewModel,
        activity: Vec<String>,
        now: DateTime<Local>,
    ) -> Vec<String> {
        let stamp = now.format("%H:%M:%S");
        let mut lines: Vec<String> = activity
            .into_iter()
            .map(|line| format!("[{stamp}] {line}"))
            .collect();

        if view.phase != Phase::Idle {
            let progress = (view.progress, view.status_text.clone());
            if self.last_progress.as_ref() != Some(&progress) {
                lines.push(progress_line(view.progress, &view.status_text));
                self.last_progress = Some(progress);
            }
        }

        if view.alert != self.last_alert {
            if let Some(alert) = &view.alert {
                lines.push(format!("! {}", alert.message));
            }
            self.last_alert = view.alert.clone();
        }

        lines
    }
}

pub fn progress_line(progress: u8, status_text: &str) -> String {
    let filled = usize::from(progress.min(100)) * BAR_WIDTH / 100;
    format!(
        "[{}{}] {:>3}% {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress,
        status_text
    )
}

pub fn queue_lines(entries: &[QueueEntry], count: usize, locale: Locale) -> Vec<String> {
    let mut lines = vec![format!("{count} queued")];
    lines.extend(entries.iter().map(|entry| {
        format!(
            "  #{:<6} {:<12} {}{}",
            entry.id,
            status_label(&entry.status, locale),
            entry.topic.as_deref().unwrap_or("-"),
            entry
                .created_at
                .as_deref()
                .map(|created| format!("  ({created})"))
                .unwrap_or_default()
        )
    }));
    lines
}

pub fn preset_lines(presets: &[PresetRowView]) -> Vec<String> {
    if presets.is_empty() {
        return vec!["no presets".to_string()];
    }
    presets
        .iter()
        .map(|preset| format!("  {:<6} {}", preset.id, preset.name))
        .collect()
}
