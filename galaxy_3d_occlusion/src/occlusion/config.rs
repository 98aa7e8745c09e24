/// Culling configuration
#[derive(Debug, Clone)]
pub struct CullingConfig {
    /// Padding added to every object's world bounds before leaf queries
    pub bounds_epsilon: f32,
    /// Case-insensitive substrings marking tool-only geometry
    pub excluded_name_patterns: Vec<String>,
    /// Decode every PVS row at load instead of on first use
    pub eager_pvs_decode: bool,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            bounds_epsilon: 0.05,
            excluded_name_patterns: [
                "toolsnodraw",
                "toolsclip",
                "toolsskybox",
                "toolstrigger",
                "trigger_",
            ]
            .iter()
            .map(|p| p.to_string())
            .collect(),
            eager_pvs_decode: true,
        }
    }
}

impl CullingConfig {
    /// Whether `name` matches one of the tool-only patterns.
    pub fn is_excluded_name(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.excluded_name_patterns
            .iter()
            .any(|pattern| name.contains(&pattern.to_ascii_lowercase()))
    }
}
