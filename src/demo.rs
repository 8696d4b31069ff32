// Demo mode: scripted client that reports events to the panel
//
// Plays the role of the network client the panel serves in a real
// deployment: a background task that registers with an imaginary edge
// service and reports each outcome through the panel handle. It runs off
// the owning task on purpose - every report here exercises the marshaling
// path a real callback thread would take.
//
// The panel never inspects these payloads; they are opaque text.

use crate::config::DemoConfig;
use crate::events::EventKind;
use crate::panel::PanelHandle;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// One scripted burst: (kind, text, delay before the next line)
type Line = (EventKind, &'static str, u64);

const BURSTS: &[&[Line]] = &[
    &[
        (EventKind::Info, "Registering client...", 900),
        (EventKind::Info, "Register OK. Session active.", 700),
        (EventKind::Info, "Finding nearest edge site...", 1100),
        (EventKind::Info, "Closest site: sjc-edge-2 (12.3 km)", 600),
    ],
    &[
        (EventKind::Info, "Latency probe: 18 ms avg over 5 pings", 800),
        (EventKind::Info, "Verifying location...", 900),
        (
            EventKind::Error,
            "Verify location failed: GPS unavailable",
            700,
        ),
    ],
    &[
        (EventKind::Info, "Retrying location verify...", 900),
        (EventKind::Info, "Location verified (tower match)", 700),
        (EventKind::Info, "Edge connection established", 600),
    ],
    &[
        (EventKind::Info, "Heartbeat OK (seq 42)", 800),
        (
            EventKind::Error,
            "Heartbeat timeout after 2000 ms, reconnecting",
            900,
        ),
        (EventKind::Info, "Reconnected on attempt 2", 700),
    ],
];

/// Run the scripted client until shutdown is signalled.
///
/// After each burst the panel is asked to hide itself after
/// `collapse_after` of inactivity - superseded automatically if the next
/// burst starts sooner.
pub async fn run_demo(
    panel: PanelHandle,
    config: DemoConfig,
    collapse_after: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    // Initial delay to let the TUI render its first frame
    sleep(Duration::from_millis(1500)).await;

    let mut cycle = 0usize;
    loop {
        let burst = BURSTS[cycle % BURSTS.len()];
        cycle += 1;

        for (kind, text, delay_ms) in burst {
            if shutdown_rx.try_recv().is_ok() {
                return;
            }
            match kind {
                EventKind::Info => panel.show_message(*text),
                EventKind::Error => panel.show_error(*text),
            }
            sleep(Duration::from_millis(*delay_ms)).await;
        }

        panel.schedule_auto_collapse(collapse_after);

        // Idle between bursts, but react to shutdown promptly.
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::debug!("demo received shutdown signal");
                return;
            }
            _ = sleep(Duration::from_millis(config.pause_ms)) => {}
        }
    }
}
