//! Normalized drilling telemetry rows consumed by the chart and chat panels

use serde::{Deserialize, Serialize};

/// Default for `MINFINAL` and `RAT` when the upload omits them.
pub const RATIO_FIELD_DEFAULT: f64 = 1.0;

/// Lithology percentage columns.
///
/// Upstream processors emit either the symbol-prefixed column (`%SH`) or the
/// bare one (`SH`); the prefixed form takes precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lithology {
    Shale,
    Sandstone,
    Limestone,
    Dolomite,
    Anhydrite,
    Coal,
    Salt,
}

impl Lithology {
    pub const ALL: [Self; 7] = [
        Self::Shale,
        Self::Sandstone,
        Self::Limestone,
        Self::Dolomite,
        Self::Anhydrite,
        Self::Coal,
        Self::Salt,
    ];

    /// Column name without the percent symbol.
    pub const fn bare_key(self) -> &'static str {
        match self {
            Self::Shale => "SH",
            Self::Sandstone => "SS",
            Self::Limestone => "LS",
            Self::Dolomite => "DOL",
            Self::Anhydrite => "ANH",
            Self::Coal => "Coal",
            Self::Salt => "Salt",
        }
    }

    /// Column name with the percent symbol, e.g. `%SH`.
    pub const fn prefixed_key(self) -> &'static str {
        match self {
            Self::Shale => "%SH",
            Self::Sandstone => "%SS",
            Self::Limestone => "%LS",
            Self::Dolomite => "%DOL",
            Self::Anhydrite => "%ANH",
            Self::Coal => "%Coal",
            Self::Salt => "%Salt",
        }
    }
}

/// One normalized row of drilling telemetry.
///
/// Field names on the wire match the chart schema (`SH`, `DT`, `MINFINAL`...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillingRecord {
    /// Measured depth; absent when the upload carried neither `DEPTH` nor `depth`
    pub depth: Option<f64>,
    #[serde(rename = "SH")]
    pub sh: f64,
    #[serde(rename = "SS")]
    pub ss: f64,
    #[serde(rename = "LS")]
    pub ls: f64,
    #[serde(rename = "DOL")]
    pub dol: f64,
    #[serde(rename = "ANH")]
    pub anh: f64,
    #[serde(rename = "Coal")]
    pub coal: f64,
    #[serde(rename = "Salt")]
    pub salt: f64,
    /// Sonic travel time
    #[serde(rename = "DT")]
    pub dt: f64,
    /// Gamma ray
    #[serde(rename = "GR")]
    pub gr: f64,
    #[serde(rename = "MINFINAL")]
    pub minfinal: f64,
    /// Unconfined compressive strength
    #[serde(rename = "UCS")]
    pub ucs: f64,
    #[serde(rename = "FA")]
    pub fa: f64,
    #[serde(rename = "RAT")]
    pub rat: f64,
    /// Rate of penetration
    #[serde(rename = "ROP")]
    pub rop: f64,
}

impl Default for DrillingRecord {
    fn default() -> Self {
        Self {
            depth: None,
            sh: 0.0,
            ss: 0.0,
            ls: 0.0,
            dol: 0.0,
            anh: 0.0,
            coal: 0.0,
            salt: 0.0,
            dt: 0.0,
            gr: 0.0,
            minfinal: RATIO_FIELD_DEFAULT,
            ucs: 0.0,
            fa: 0.0,
            rat: RATIO_FIELD_DEFAULT,
            rop: 0.0,
        }
    }
}

impl DrillingRecord {
    pub const fn lithology(&self, kind: Lithology) -> f64 {
        match kind {
            Lithology::Shale => self.sh,
            Lithology::Sandstone => self.ss,
            Lithology::Limestone => self.ls,
            Lithology::Dolomite => self.dol,
            Lithology::Anhydrite => self.anh,
            Lithology::Coal => self.coal,
            Lithology::Salt => self.salt,
        }
    }

    pub fn set_lithology(&mut self, kind: Lithology, value: f64) {
        let slot = match kind {
            Lithology::Shale => &mut self.sh,
            Lithology::Sandstone => &mut self.ss,
            Lithology::Limestone => &mut self.ls,
            Lithology::Dolomite => &mut self.dol,
            Lithology::Anhydrite => &mut self.anh,
            Lithology::Coal => &mut self.coal,
            Lithology::Salt => &mut self.salt,
        };
        *slot = value;
    }

    /// Sum of all lithology percentages. Useful as a sanity check on
    /// processor output, which should land near 100.
    pub fn lithology_total(&self) -> f64 {
        Lithology::ALL.iter().map(|&k| self.lithology(k)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_uses_ratio_defaults() {
        let r = DrillingRecord::default();
        assert_eq!(r.minfinal, 1.0);
        assert_eq!(r.rat, 1.0);
        assert_eq!(r.rop, 0.0);
        assert!(r.depth.is_none());
        assert_eq!(r.lithology_total(), 0.0);
    }

    #[test]
    fn test_serializes_with_chart_field_names() {
        let mut r = DrillingRecord::default();
        r.depth = Some(5000.0);
        r.set_lithology(Lithology::Coal, 12.0);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["depth"], 5000.0);
        assert_eq!(v["Coal"], 12.0);
        assert_eq!(v["MINFINAL"], 1.0);
        assert!(v.get("coal").is_none());
    }

    #[test]
    fn test_lithology_keys() {
        for kind in Lithology::ALL {
            assert_eq!(kind.prefixed_key(), format!("%{}", kind.bare_key()));
        }
    }
}
