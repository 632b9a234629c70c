//! Persona management for reviewer agents
//!
//! Loads modular persona definitions from TOML files, enabling easy
//! customization and extension of reviewer behaviors.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A persona definition loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub reviewer: ReviewerMetadata,
    pub prompt: PromptConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewerMetadata {
    pub id: String,
    pub name: String,
    /// Which slice of the snapshot this reviewer critiques:
    /// "visual", "copy", or "marketing"
    pub specialty: String,
    #[serde(default)]
    pub enabled: bool,
    /// Whether this reviewer's prompt should include competitor
    /// search results
    #[serde(default)]
    pub wants_research: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    pub system: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_format() -> String {
    "markdown".to_string()
}

fn default_max_tokens() -> u32 {
    2048
}

/// Registry of all loaded personas
#[derive(Debug, Default)]
pub struct PersonaRegistry {
    personas: HashMap<String, Persona>,
}

impl PersonaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load all personas from the embedded prompts
    pub fn load_embedded() -> Self {
        let mut registry = Self::new();

        let embedded = [
            include_str!("../prompts/art_director.toml"),
            include_str!("../prompts/copywriter.toml"),
            include_str!("../prompts/marketer.toml"),
        ];

        for toml_str in embedded {
            if let Ok(persona) = toml::from_str::<Persona>(toml_str) {
                if persona.reviewer.enabled {
                    registry.register(persona);
                }
            }
        }

        registry
    }

    /// Load personas from a directory
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> std::io::Result<Self> {
        let mut registry = Self::new();

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "toml") {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    if let Ok(persona) = toml::from_str::<Persona>(&content) {
                        if persona.reviewer.enabled {
                            registry.register(persona);
                        }
                    }
                }
            }
        }

        Ok(registry)
    }

    /// Register a persona
    pub fn register(&mut self, persona: Persona) {
        self.personas.insert(persona.reviewer.id.clone(), persona);
    }

    /// Get a persona by ID
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.get(id)
    }

    /// All enabled reviewers, ordered by id for stable report output
    pub fn reviewers(&self) -> Vec<&Persona> {
        let mut reviewers: Vec<_> = self.personas.values().collect();
        reviewers.sort_by(|a, b| a.reviewer.id.cmp(&b.reviewer.id));
        reviewers
    }

    /// Reviewers whose prompts consume competitor research
    pub fn research_consumers(&self) -> Vec<&Persona> {
        self.reviewers()
            .into_iter()
            .filter(|p| p.reviewer.wants_research)
            .collect()
    }

    /// List all persona IDs
    pub fn list_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.personas.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Count of loaded personas
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

impl Persona {
    /// Get the system prompt
    pub fn system_prompt(&self) -> &str {
        &self.prompt.system
    }
}
