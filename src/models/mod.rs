use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One uploaded food photo, kept in memory for the lifetime of a request.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub image_bytes: Vec<u8>,
    pub mime_type: String,
}

impl AnalysisRequest {
    pub fn new(image_bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            image_bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Calories, protein and fat come back either as numbers or as free text ("~350 kcal").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NutrientValue::Number(n) => write!(f, "{}", n),
            NutrientValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(rename = "platoDescripcion")]
    pub plato_descripcion: String,
    pub ingredientes: Vec<String>,
    pub calorias: NutrientValue,
    pub proteinas: NutrientValue,
    pub grasas: NutrientValue,
}

impl AnalysisResult {
    /// Typed view of an extracted mapping. `None` when the model ignored the
    /// requested schema; the mapping itself is still returned to the client.
    pub fn from_map(map: &Map<String, Value>) -> Option<Self> {
        serde_json::from_value(Value::Object(map.clone())).ok()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} | {} ingredients | {} kcal, {} g protein, {} g fat",
            self.plato_descripcion,
            self.ingredientes.len(),
            self.calorias,
            self.proteinas,
            self.grasas
        )
    }
}

/// Which extraction stage recovered the JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStage {
    Direct,
    FencedBlock,
    BraceSpan,
}

impl std::fmt::Display for ExtractionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExtractionStage::Direct => "direct parse",
            ExtractionStage::FencedBlock => "fenced block",
            ExtractionStage::BraceSpan => "brace span",
        };
        write!(f, "{}", s)
    }
}

/// Result of running the extraction cascade over the model's text.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Parsed {
        analysis: Map<String, Value>,
        stage: ExtractionStage,
    },
    /// Carries the untouched model text so callers can show it.
    Failed { raw: String },
}

/// Body of a successful `POST /analyze-food`.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: Map<String, Value>,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "rawResponse", skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}
