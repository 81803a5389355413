//! Language name to judge language id mapping
//!
//! The judge identifies languages by numeric id. The platform exposes a
//! small, configured set of language names; everything else is rejected
//! before any judge call. One table, injected wherever it is needed.

use std::collections::HashMap;

/// Configured language table
#[derive(Debug, Clone)]
pub struct LanguageMap {
    ids: HashMap<String, u32>,
}

impl LanguageMap {
    /// Build the default table
    pub fn with_defaults() -> Self {
        let ids = [
            ("c", 50),
            ("c++", 54),
            ("java", 62),
            ("javascript", 63),
            ("python", 71),
            ("typescript", 74),
        ]
        .into_iter()
        .map(|(name, id)| (name.to_string(), id))
        .collect();

        Self { ids }
    }

    /// Parse a table from a `name=id,name=id` spec string
    pub fn parse(spec: &str) -> Result<Self, String> {
        let mut ids = HashMap::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            let (name, id) = entry
                .split_once('=')
                .ok_or_else(|| format!("invalid language entry: {entry}"))?;
            let id: u32 = id
                .trim()
                .parse()
                .map_err(|_| format!("invalid language id in entry: {entry}"))?;
            ids.insert(name.trim().to_lowercase(), id);
        }
        if ids.is_empty() {
            return Err("language table is empty".to_string());
        }
        Ok(Self { ids })
    }

    /// Look up the judge id for a language name (case-insensitive)
    pub fn id_for(&self, language: &str) -> Option<u32> {
        self.ids.get(&language.to_lowercase()).copied()
    }

    /// Configured language names, sorted for stable error messages
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ids.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
