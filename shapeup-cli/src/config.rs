//! Configuration de l'outil

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use shapeup::{Sr, Units};

/// Configuration principale
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Autorité appliquée aux codes numériques seuls (ex: "4326")
    #[serde(default = "default_authority")]
    pub default_authority: String,

    /// Unités des distances quand `--units` est absent
    #[serde(default)]
    pub default_units: Units,

    /// Noms de références (ex: "wgs84" -> "epsg:4326")
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Sortie JSON indentée
    #[serde(default)]
    pub pretty: bool,
}

fn default_authority() -> String {
    "epsg".to_string()
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "km" => Self::load_embedded(include_str!("presets/km.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: default, km", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Preset embarqué ou chemin vers un fichier JSON
    pub fn resolve(source: &str) -> Result<Self> {
        match source {
            "default" | "km" => Self::from_preset(source),
            _ => Self::load(Path::new(source)),
        }
    }

    /// Interprète une référence : alias, "authority:code" ou code seul
    pub fn parse_sr(&self, text: &str) -> Result<Sr> {
        let text = text.trim();
        let target = self
            .aliases
            .get(&text.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or(text);

        if !target.is_empty() && target.bytes().all(|b| b.is_ascii_digit()) {
            let identifier: u32 = target
                .parse()
                .context(format!("Invalid reference code: {}", target))?;
            return Ok(Sr::new(identifier, self.default_authority.to_ascii_lowercase()));
        }

        target
            .parse()
            .context(format!("Invalid spatial reference: {}", text))
    }

    /// Unités d'une option `--units`, ou celles de la configuration
    pub fn units(&self, units: Option<&str>) -> Result<Units> {
        match units {
            Some(name) => name.parse().context("Invalid --units"),
            None => Ok(self.default_units),
        }
    }
}
