use family_tree_layout::config::{TreeConfig, TreeConfigPatch};
use family_tree_layout::layout::{TreeLayout, compute_layout_with_config};
use family_tree_layout::parse_family;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    root_person_id: Option<String>,
    current_user_id: Option<String>,
    #[serde(default)]
    tree: TreeConfigPatch,
}

fn layout_document(document: &str, options: LayoutOptions) -> Result<TreeLayout, String> {
    let parsed = parse_family(document).map_err(|error| error.to_string())?;
    let data = parsed.data;
    let current_user = options.current_user_id.or(data.current_user_id.clone());
    let root = match options.root_person_id {
        Some(id) => id,
        None => current_user
            .as_deref()
            .and_then(|user| data.root_person_for_user(user))
            .unwrap_or_default()
            .to_string(),
    };

    let mut config = TreeConfig::default();
    config.apply(&options.tree);
    Ok(compute_layout_with_config(
        &data.persons,
        &data.relations,
        &root,
        current_user.as_deref(),
        &config,
    ))
}

/// Lays out a family document and returns the layout as JSON
/// (`positionedPersons`, `drawableEdges`, `bounds`).
#[wasm_bindgen(js_name = computeLayout)]
pub fn compute_family_layout(
    document: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<LayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        LayoutOptions::default()
    };

    let layout = layout_document(document, options).map_err(|error| JsValue::from_str(&error))?;
    serde_json::to_string(&layout).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{LayoutOptions, layout_document};

    const DOCUMENT: &str = r#"{
        "currentUserId": "u1",
        "persons": [
            { "id": "me", "userId": "u1" },
            { "id": "wife", "userId": "u2" },
            { "id": "kid", "userId": "u1", "birthDate": "2019-09-03" }
        ],
        "relations": [
            { "fromPersonId": "me", "toPersonId": "wife", "type": "spouse" },
            { "fromPersonId": "me", "toPersonId": "kid", "type": "father" }
        ]
    }"#;

    #[test]
    fn lays_out_document_for_current_user() {
        let layout = layout_document(DOCUMENT, LayoutOptions::default()).unwrap();
        let me = layout.person("me").unwrap();
        assert_eq!((me.x, me.y), (0.0, 0.0));
        assert_eq!(layout.person("wife").unwrap().x, 240.0);
        assert_eq!(layout.person("kid").unwrap().y, 320.0);

        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["positionedPersons"].as_array().unwrap().len(), 3);
        assert_eq!(json["drawableEdges"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn options_override_root_and_spacing() {
        let options: LayoutOptions = serde_json::from_str(
            r#"{ "rootPersonId": "kid", "tree": { "verticalSpacing": 80 } }"#,
        )
        .unwrap();
        let layout = layout_document(DOCUMENT, options).unwrap();
        let kid = layout.person("kid").unwrap();
        assert_eq!((kid.x, kid.y), (0.0, 0.0));
        assert_eq!(layout.person("me").unwrap().y, -200.0);
    }

    #[test]
    fn invalid_documents_are_reported() {
        assert!(layout_document("{ persons: [", LayoutOptions::default()).is_err());
    }
}
