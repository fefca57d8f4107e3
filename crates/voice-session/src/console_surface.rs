use std::io::Write;

use tracing::warn;
use voice_session_core::{ControlAffordance, ControlAffordances, ControlSurface, StyleVariant};

/// Draws the controls as one text line per frame.
pub struct ConsoleSurface<W> {
    out: W,
}

impl<W: Write> ConsoleSurface<W> {
    /// Draw onto `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ControlSurface for ConsoleSurface<W> {
    fn render(&mut self, affordances: &ControlAffordances) {
        let line = format_affordances(affordances);

        if let Err(e) = writeln!(self.out, "{}", line).and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to draw controls");
        }
    }
}

/// `[text: Send] [record: Stop *] [call: Call -]`
///
/// `*` active, `~` busy, `!` interruptible, `-` disabled, `...` loading.
pub fn format_affordances(affordances: &ControlAffordances) -> String {
    format!(
        "[text: {}] [record: {}] [call: {}]",
        format_control(&affordances.text_button),
        format_control(&affordances.record_button),
        format_control(&affordances.call_button),
    )
}

fn format_control(affordance: &ControlAffordance) -> String {
    let mut out = affordance.style.label.to_string();

    match affordance.style.variant {
        StyleVariant::Normal => {}
        StyleVariant::Active => out.push_str(" *"),
        StyleVariant::Busy => out.push_str(" ~"),
        StyleVariant::Interruptible => out.push_str(" !"),
    }
    if affordance.loading {
        out.push_str(" ...");
    }
    if affordance.disabled {
        out.push_str(" -");
    }

    out
}
