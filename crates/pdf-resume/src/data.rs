//! Resume content collected from the user

use crate::constants::{FALLBACK_FILENAME_STEM, FILENAME_SUFFIX};
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PersonalInfo {
    pub full_name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
}

impl PersonalInfo {
    /// Non-empty contact fields in display order
    pub fn contact_fields(&self) -> Vec<&str> {
        [
            self.email.as_str(),
            self.phone.as_str(),
            self.location.as_str(),
            self.website.as_str(),
        ]
        .into_iter()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Experience {
    pub role: String,
    pub company: String,
    pub period: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Education {
    pub degree: String,
    pub school: String,
    pub period: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResumeData {
    pub personal: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<String>,
    pub languages: Vec<String>,
    pub certifications: Vec<String>,
    /// Photo file, resolved relative to the working directory
    pub photo: Option<PathBuf>,
}

impl ResumeData {
    /// Load resume data from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let data = serde_json::from_slice(&bytes)?;
        Ok(data)
    }

    /// Output filename for this resume with the default suffix
    pub fn file_name(&self) -> String {
        output_file_name(&self.personal.full_name, FILENAME_SUFFIX)
    }
}

/// Build the download filename: every character outside `[A-Za-z0-9]`
/// becomes `_`, surrounding underscores are trimmed.
pub fn output_file_name(owner_name: &str, suffix: &str) -> String {
    let sanitized: String = owner_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stem = sanitized.trim_matches('_');
    let stem = if stem.is_empty() {
        FALLBACK_FILENAME_STEM
    } else {
        stem
    };
    format!("{}{}", stem, suffix)
}
