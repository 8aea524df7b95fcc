// self
use crate::obs::WindowOutcome;

/// Records a window outcome via the global metrics recorder (when enabled).
pub fn record_window_outcome(outcome: WindowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("usage_export_window_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
