//! `GET /quality-info`

use axum::{extract::State, Json};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::AppState;

/// role → label, serialized as a JSON object in preset table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityLabels(pub Vec<(String, String)>);

impl Serialize for QualityLabels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (role, label) in &self.0 {
            map.serialize_entry(role, label)?;
        }
        map.end()
    }
}

#[derive(Debug, serde::Serialize)]
pub struct QualityInfoResponse {
    pub available_qualities: QualityLabels,
}

pub async fn quality_info(State(state): State<AppState>) -> Json<QualityInfoResponse> {
    let labels = state
        .presets
        .labels()
        .into_iter()
        .map(|(role, label)| (role.to_string(), label.to_string()))
        .collect();

    Json(QualityInfoResponse {
        available_qualities: QualityLabels(labels),
    })
}
