use std::fmt;

/// Pipeline stage a per-feature failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Roof,
    Walls,
    Door,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Roof => "roof",
            Stage::Walls => "walls",
            Stage::Door => "door",
        };
        f.write_str(name)
    }
}

/// Record of a booth feature dropped from an output collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDiagnostic {
    pub booth_id: String,
    pub stage: Stage,
    pub reason: String,
}

impl fmt::Display for FeatureDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of booth {}: {}", self.stage, self.booth_id, self.reason)
    }
}
