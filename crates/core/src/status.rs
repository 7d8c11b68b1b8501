use serde::{Deserialize, Serialize};

/// Reply to `get_status`, one per poll cycle.
///
/// Every reading is optional: `None` means the backend did not report it,
/// which is distinct from a reading of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    pub ok: bool,
    /// Present when `ok` is false.
    pub error: Option<String>,
    /// Profile the backend currently has applied.
    pub profile: Option<String>,
    pub cpu_rpm: Option<f64>,
    pub gpu_rpm: Option<f64>,
    pub cpu_temp_c: Option<f64>,
    pub gpu_temp_c: Option<f64>,
    /// Raw hardware mode code for fan 1. Opaque; displayed as reported.
    pub pwm1_enable: Option<i64>,
    /// Raw hardware mode code for fan 2. Opaque; displayed as reported.
    pub pwm2_enable: Option<i64>,
    #[serde(rename = "curve_cpu_pwm1")]
    pub cpu_curve: Option<Vec<CurvePoint>>,
    #[serde(rename = "curve_gpu_pwm2")]
    pub gpu_curve: Option<Vec<CurvePoint>>,
}

/// One point of a fan curve as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurvePoint {
    #[serde(rename = "i")]
    pub index:  u32,
    pub temp_c: i64,
    /// Raw PWM duty, 0–255.
    pub pwm:    i64,
}

impl CurvePoint {
    /// Duty cycle as a whole percentage of 255.
    pub fn duty_percent(&self) -> i64 {
        (self.pwm.clamp(0, 255) * 100 + 127) / 255
    }
}

/// Fallback text when the backend fails without saying why.
pub const UNSPECIFIED_FAILURE: &str = "backend reported failure";

impl Status {
    /// A failed snapshot carrying `message`.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Value this snapshot reports for `metric`.
    pub fn reading(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::CpuTemp => self.cpu_temp_c,
            Metric::GpuTemp => self.gpu_temp_c,
            Metric::CpuFan  => self.cpu_rpm,
            Metric::GpuFan  => self.gpu_rpm,
        }
    }

    /// Classify this reply as a successful or failed poll.
    pub fn into_outcome(self) -> PollOutcome {
        if self.ok {
            PollOutcome::Success(self)
        } else {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| UNSPECIFIED_FAILURE.to_string());
            PollOutcome::Failure(message)
        }
    }
}

/// Result of a single poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Success(Status),
    /// Transport error, timeout or `ok: false`, as a human-readable message.
    Failure(String),
}

/// Reply to `set_profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyResponse {
    pub ok: bool,
    pub error: Option<String>,
}

impl ApplyResponse {
    pub fn accepted() -> Self {
        Self { ok: true, error: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}

/// The four readings that get a rolling history and a sparkline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    CpuTemp,
    GpuTemp,
    CpuFan,
    GpuFan,
}

impl Metric {
    pub const ALL: [Metric; 4] = [Metric::CpuTemp, Metric::GpuTemp, Metric::CpuFan, Metric::GpuFan];

    pub fn index(self) -> usize {
        match self {
            Metric::CpuTemp => 0,
            Metric::GpuTemp => 1,
            Metric::CpuFan  => 2,
            Metric::GpuFan  => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::CpuTemp => "CPU Temp (°C)",
            Metric::GpuTemp => "GPU Temp (°C)",
            Metric::CpuFan  => "CPU Fan (RPM)",
            Metric::GpuFan  => "GPU Fan (RPM)",
        }
    }

    /// Format a reading for display; `"n/a"` when absent.
    pub fn format(self, value: Option<f64>) -> String {
        match (self, value) {
            (_, None) => "n/a".to_string(),
            (Metric::CpuTemp | Metric::GpuTemp, Some(v)) => format!("{v:.1}"),
            (Metric::CpuFan | Metric::GpuFan, Some(v)) => format!("{v:.0}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_and_missing_fields_are_absent() {
        let s: Status = serde_json::from_str(
            r#"{"ok":true,"cpu_temp_c":65.2,"gpu_temp_c":null,"cpu_rpm":3200,"gpu_rpm":null,"profile":"aggressive"}"#,
        )
        .unwrap();
        assert!(s.ok);
        assert_eq!(s.cpu_temp_c, Some(65.2));
        assert_eq!(s.gpu_temp_c, None);
        assert_eq!(s.cpu_rpm, Some(3200.0));
        assert_eq!(s.pwm1_enable, None);
        assert_eq!(s.profile.as_deref(), Some("aggressive"));
    }

    #[test]
    fn zero_is_a_reading() {
        let s: Status = serde_json::from_str(r#"{"ok":true,"gpu_rpm":0}"#).unwrap();
        assert_eq!(s.reading(Metric::GpuFan), Some(0.0));
        assert_eq!(Metric::GpuFan.format(s.gpu_rpm), "0");
    }

    #[test]
    fn parses_curves_and_ignores_unknown_fields() {
        let s: Status = serde_json::from_str(
            r#"{"ok":true,"asus":"/sys/class/hwmon/hwmon3","pwm1_enable":2,
                "curve_cpu_pwm1":[{"i":1,"temp_c":30,"pwm":51},{"i":2,"temp_c":50,"pwm":255}]}"#,
        )
        .unwrap();
        assert_eq!(s.pwm1_enable, Some(2));
        let curve = s.cpu_curve.unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].duty_percent(), 20);
        assert_eq!(curve[1].duty_percent(), 100);
        assert!(s.gpu_curve.is_none());
    }

    #[test]
    fn not_ok_becomes_failure_with_message() {
        let s: Status = serde_json::from_str(r#"{"ok":false,"error":"sensor timeout"}"#).unwrap();
        assert_eq!(s.into_outcome(), PollOutcome::Failure("sensor timeout".into()));

        let bare = Status { ok: false, ..Status::default() };
        assert_eq!(bare.into_outcome(), PollOutcome::Failure(UNSPECIFIED_FAILURE.into()));
    }

    #[test]
    fn readings_format_per_unit() {
        assert_eq!(Metric::CpuTemp.format(Some(65.26)), "65.3");
        assert_eq!(Metric::CpuFan.format(Some(3200.4)), "3200");
        assert_eq!(Metric::GpuTemp.format(None), "n/a");
    }

    #[test]
    fn apply_response_defaults_error() {
        let r: ApplyResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert_eq!(r, ApplyResponse::accepted());
    }
}
