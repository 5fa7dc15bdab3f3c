use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed set of news sections. Stored and shown by Korean name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NewsCategory {
    Politics,
    Economy,
    Society,
    Tourism,
    Culture,
    Lifestyle,
    Community,
    /// Sentinel for anything unknown or missing
    #[default]
    Other,
}

impl NewsCategory {
    pub const ALL: [NewsCategory; 8] = [
        NewsCategory::Politics,
        NewsCategory::Economy,
        NewsCategory::Society,
        NewsCategory::Tourism,
        NewsCategory::Culture,
        NewsCategory::Lifestyle,
        NewsCategory::Community,
        NewsCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::Politics => "정치",
            NewsCategory::Economy => "경제",
            NewsCategory::Society => "사회",
            NewsCategory::Tourism => "관광",
            NewsCategory::Culture => "문화",
            NewsCategory::Lifestyle => "생활",
            NewsCategory::Community => "교민",
            NewsCategory::Other => "기타",
        }
    }

    /// Map free text from the model (or a form) onto the fixed set.
    ///
    /// Korean names match exactly; English aliases ignore case. Everything
    /// else becomes `Other`.
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(category) = Self::ALL.iter().find(|c| c.as_str() == raw) {
            return *category;
        }

        match raw.to_lowercase().as_str() {
            "politics" => NewsCategory::Politics,
            "economy" | "business" | "비즈니스" => NewsCategory::Economy,
            "society" => NewsCategory::Society,
            "tourism" | "travel" | "여행" => NewsCategory::Tourism,
            "culture" | "entertainment" | "연예" => NewsCategory::Culture,
            "lifestyle" | "life" => NewsCategory::Lifestyle,
            "community" | "korean community" | "한인" => NewsCategory::Community,
            _ => NewsCategory::Other,
        }
    }

    /// Comma-separated Korean names, for prompts.
    pub fn prompt_list() -> String {
        Self::ALL
            .iter()
            .map(NewsCategory::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NewsCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NewsCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::coerce(&raw))
    }
}
