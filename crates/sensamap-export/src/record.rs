//! Sensation record serialization: one CSV row per recorded sensation.
//!
//! The engine never touches widget state; everything the researcher
//! entered in the form arrives here as an explicit, caller-owned
//! [`SensationRecord`], combined with the selection and centroid read
//! back from the session. The output is a header line and quoted data
//! rows — appending them to a log file is the shell's job.

use sensamap_engine::{HandSide, Point};

use crate::area;

/// Which stimulation parameter is being modulated during the trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulation {
    /// Current amplitude is swept; the other parameters are fixed.
    Amplitude,
    /// Pulse width is swept.
    PulseWidth,
    /// Pulse frequency is swept.
    Frequency,
}

impl Modulation {
    /// The identifier stored in the `Modulation Type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amplitude => "amplitude",
            Self::PulseWidth => "pulse_width",
            Self::Frequency => "frequency",
        }
    }

    /// Human-readable name of the swept parameter, with its unit.
    #[must_use]
    pub const fn param_name(self) -> &'static str {
        match self {
            Self::Amplitude => "Current (mA)",
            Self::PulseWidth => "Pulse width (μs)",
            Self::Frequency => "Frequency (Hz)",
        }
    }
}

/// Caller-owned form state for one recorded sensation.
///
/// A fixed parameter is `None` when it is the modulated one (its value
/// then lives in `modulation_value`); the corresponding column is left
/// empty.
#[derive(Debug, Clone)]
pub struct SensationRecord<'a> {
    /// Anonymized subject identifier.
    pub patient_id: &'a str,
    /// Stimulation device name.
    pub device_name: &'a str,
    /// Checked sensation descriptors, joined with `", "` in the row.
    pub sensation_types: &'a [&'a str],
    /// Free-text description of the sensation.
    pub description: &'a str,
    /// "How natural was the sensation?" (0-10).
    pub natural_rating: u8,
    /// "How painful was the sensation?" (0-10).
    pub pain_rating: u8,
    /// "Sensation under the electrode" (0-10).
    pub electrode_rating: u8,
    /// Which hand the selection was drawn on.
    pub hand: HandSide,
    /// The swept parameter.
    pub modulation: Modulation,
    /// Value of the swept parameter for this trial.
    pub modulation_value: f64,
    /// Fixed current in mA, `None` when amplitude is modulated.
    pub current_ma: Option<f64>,
    /// Fixed frequency in Hz, `None` when frequency is modulated.
    pub frequency_hz: Option<f64>,
    /// Fixed pulse width in μs, `None` when pulse width is modulated.
    pub pulse_width_us: Option<f64>,
    /// Interphase distance in μs (always fixed).
    pub interphase_us: f64,
    /// Whether the median nerve was stimulated.
    pub median_nerve: bool,
    /// Whether the ulnar nerve was stimulated.
    pub ulnar_nerve: bool,
}

/// Column names of the sensation log, in row order.
const COLUMNS: [&str; 19] = [
    "Patient ID",
    "Device Name",
    "Sensation Types",
    "Additional Description",
    "Natural Rating",
    "Pain Rating",
    "Electrode Sensation",
    "Center X",
    "Center Y",
    "Area",
    "Hand",
    "Modulation Type",
    "Modulation Value",
    "Current (mA)",
    "Frequency (Hz)",
    "Pulse Width (μs)",
    "Interphase (μs)",
    "Median Nerve",
    "Ulnar Nerve",
];

/// The header line written when a log file is created.
#[must_use]
pub fn csv_header() -> String {
    COLUMNS.join(",")
}

impl SensationRecord<'_> {
    /// Serialize one data row combining this form state with the
    /// selection and centroid read from the session.
    ///
    /// Fields are quoted per RFC 4180 when they contain commas, quotes
    /// or line breaks; `None` parameters and a `None` centroid become
    /// empty columns.
    #[must_use]
    pub fn to_csv_row(&self, selection: &[Point], centroid: Option<Point>) -> String {
        let (center_x, center_y) = area::centroid_fields(centroid);
        let fields: [String; 19] = [
            self.patient_id.to_string(),
            self.device_name.to_string(),
            self.sensation_types.join(", "),
            self.description.to_string(),
            self.natural_rating.to_string(),
            self.pain_rating.to_string(),
            self.electrode_rating.to_string(),
            center_x,
            center_y,
            area::area_string(selection),
            self.hand.as_str().to_string(),
            self.modulation.as_str().to_string(),
            self.modulation_value.to_string(),
            optional_field(self.current_ma),
            optional_field(self.frequency_hz),
            optional_field(self.pulse_width_us),
            self.interphase_us.to_string(),
            nerve_field(self.median_nerve, "Median"),
            nerve_field(self.ulnar_nerve, "Ulnar"),
        ];

        let mut row = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                row.push(',');
            }
            write_escaped(&mut row, field);
        }
        row
    }
}

fn optional_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn nerve_field(stimulated: bool, name: &str) -> String {
    if stimulated {
        name.to_string()
    } else {
        String::new()
    }
}

/// Append a field, quoting it when it contains a comma, quote or line
/// break. Embedded quotes are doubled.
fn write_escaped(out: &mut String, field: &str) {
    if field.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}
