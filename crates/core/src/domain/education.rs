use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationalContent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub difficulty: Difficulty,
    pub estimated_minutes: u32,
    pub topics: Vec<String>,
}
