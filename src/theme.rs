use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub card_fill: String,
    pub card_fill_male: String,
    pub card_fill_female: String,
    pub card_border: String,
    pub current_user_border: String,
    pub text_color: String,
    pub secondary_text_color: String,
    pub line_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            card_fill: "#ECECFF".to_string(),
            card_fill_male: "#DDEBFF".to_string(),
            card_fill_female: "#FFE3EC".to_string(),
            card_border: "#9370DB".to_string(),
            current_user_border: "#E8A317".to_string(),
            text_color: "#333333".to_string(),
            secondary_text_color: "#666666".to_string(),
            line_color: "#333333".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            card_fill: "#F8FAFF".to_string(),
            card_fill_male: "#EEF4FF".to_string(),
            card_fill_female: "#FFF1F5".to_string(),
            card_border: "#C7D2E5".to_string(),
            current_user_border: "#3B82F6".to_string(),
            text_color: "#1C2430".to_string(),
            secondary_text_color: "#5B6B85".to_string(),
            line_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
