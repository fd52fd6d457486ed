//! Upload response normalization
//!
//! Maps the loosely-typed rows returned by the processing service into the
//! fixed [`DrillingRecord`] chart schema.
//!
//! Rules:
//! - `depth` comes from `DEPTH`, falling back to `depth`.
//! - Lithology percentages prefer the `%`-prefixed column. A present prefixed
//!   column wins even if its value is null; the bare column is then ignored.
//! - Missing, null, zero or non-numeric values take the field default:
//!   1 for `MINFINAL` and `RAT`, 0 for everything else.

use serde_json::{Map, Value};

use crate::types::{DrillingRecord, Lithology, RATIO_FIELD_DEFAULT};

/// One item of the service's `processedData` array.
pub type RawRecord = Map<String, Value>;

/// Interpret a JSON value as a number. Numeric strings are accepted since
/// some processors emit CSV cells verbatim.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// A usable, non-zero number. Zero counts as "not provided" so the field
/// default applies.
fn truthy(value: Option<&Value>) -> Option<f64> {
    value.and_then(numeric).filter(|v| *v != 0.0)
}

fn field_or(raw: &RawRecord, key: &str, default: f64) -> f64 {
    truthy(raw.get(key)).unwrap_or(default)
}

fn lithology_value(raw: &RawRecord, kind: Lithology) -> f64 {
    let chosen = if raw.contains_key(kind.prefixed_key()) {
        raw.get(kind.prefixed_key())
    } else {
        raw.get(kind.bare_key())
    };
    truthy(chosen).unwrap_or(0.0)
}

/// Normalize a single upload row.
pub fn normalize_record(raw: &RawRecord) -> DrillingRecord {
    let mut record = DrillingRecord {
        depth: truthy(raw.get("DEPTH")).or_else(|| raw.get("depth").and_then(numeric)),
        dt: field_or(raw, "DT", 0.0),
        gr: field_or(raw, "GR", 0.0),
        minfinal: field_or(raw, "MINFINAL", RATIO_FIELD_DEFAULT),
        ucs: field_or(raw, "UCS", 0.0),
        fa: field_or(raw, "FA", 0.0),
        rat: field_or(raw, "RAT", RATIO_FIELD_DEFAULT),
        rop: field_or(raw, "ROP", 0.0),
        ..DrillingRecord::default()
    };
    for kind in Lithology::ALL {
        record.set_lithology(kind, lithology_value(raw, kind));
    }
    record
}

/// Normalize every row, preserving order.
pub fn normalize_records(raw: &[RawRecord]) -> Vec<DrillingRecord> {
    raw.iter().map(normalize_record).collect()
}
