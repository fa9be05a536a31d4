// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Manufacturing feasibility request/verdict types.
//!
//! Process capability rules live outside this engine. [`StubFeasibilityChecker`]
//! returns a fixed verdict until a real checker is plugged in.

use serde::{Deserialize, Serialize};

/// Requested dimensional tolerance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToleranceClass {
    #[default]
    Standard,
    Tight,
    Critical,
}

impl ToleranceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToleranceClass::Standard => "STANDARD",
            ToleranceClass::Tight => "TIGHT",
            ToleranceClass::Critical => "CRITICAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityRequest {
    /// Content hash of a previously analyzed file
    pub file_hash: String,
    pub process_id: String,
    pub material_id: String,
    pub tolerance_class: ToleranceClass,
}

/// Build orientation as a unit direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResult {
    pub feasible: bool,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
    pub recommended_orientation: Orientation,
    /// mm³
    pub estimated_support_volume: f64,
}

/// Decides whether a part can be made with a process/material/tolerance.
pub trait FeasibilityChecker: Send + Sync {
    fn check(&self, request: &FeasibilityRequest) -> FeasibilityResult;
}

/// Fixed verdict: feasible, printed upright
#[derive(Debug, Clone, Copy, Default)]
pub struct StubFeasibilityChecker;

impl StubFeasibilityChecker {
    pub const SUPPORT_VOLUME: f64 = 45_000.0;
}

impl FeasibilityChecker for StubFeasibilityChecker {
    fn check(&self, request: &FeasibilityRequest) -> FeasibilityResult {
        tracing::debug!(
            file_hash = %request.file_hash,
            process = %request.process_id,
            material = %request.material_id,
            tolerance = request.tolerance_class.as_str(),
            "Feasibility check (stub)"
        );

        FeasibilityResult {
            feasible: true,
            blockers: Vec::new(),
            warnings: Vec::new(),
            recommended_orientation: Orientation {
                x: 0.0,
                y: 0.0,
                z: 1.0,
            },
            estimated_support_volume: Self::SUPPORT_VOLUME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tolerance_class: ToleranceClass) -> FeasibilityRequest {
        FeasibilityRequest {
            file_hash: "abc123".into(),
            process_id: "fdm".into(),
            material_id: "pla".into(),
            tolerance_class,
        }
    }

    #[test]
    fn test_stub_verdict_is_fixed() {
        let checker = StubFeasibilityChecker;
        let first = checker.check(&request(ToleranceClass::Standard));
        let second = checker.check(&request(ToleranceClass::Critical));

        assert_eq!(first, second);
        assert!(first.feasible);
        assert!(first.blockers.is_empty());
        assert_eq!(first.recommended_orientation.z, 1.0);
        assert_eq!(first.estimated_support_volume, 45_000.0);
    }

    #[test]
    fn test_wire_names() {
        let verdict = StubFeasibilityChecker.check(&request(ToleranceClass::Tight));
        let json = serde_json::to_value(verdict).unwrap();
        assert_eq!(json["recommendedOrientation"]["z"], 1.0);
        assert_eq!(json["estimatedSupportVolume"], 45_000.0);

        let parsed: FeasibilityRequest = serde_json::from_str(
            r#"{"fileHash":"h","processId":"sla","materialId":"resin","toleranceClass":"TIGHT"}"#,
        )
        .unwrap();
        assert_eq!(parsed.tolerance_class, ToleranceClass::Tight);
        assert_eq!(
            serde_json::to_string(&ToleranceClass::Critical).unwrap(),
            "\"CRITICAL\""
        );
    }
}
