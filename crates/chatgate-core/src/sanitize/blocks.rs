use serde_json::{Map, Value};

use crate::limits::{MAX_ACTION_OPTIONS, MAX_FORM_FIELDS, MAX_UI_BLOCKS};
use crate::models::ui_block::{
    ActionOption, FormBlock, FormField, FormFieldKind, MenuBlock, QuickRepliesBlock,
    SelectOption, UiBlock,
};
use crate::sanitize::{non_empty_str, optional_string};

/// Normalize an untrusted `ui` value into renderer-safe blocks.
///
/// Looks at no more than [`MAX_UI_BLOCKS`] elements. Blocks with an unknown
/// `type`, missing required fields, or no valid children are dropped.
/// Anything that is not an array yields no blocks.
pub fn normalize_ui_blocks(value: Option<&Value>) -> Vec<UiBlock> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .take(MAX_UI_BLOCKS)
        .filter_map(normalize_block)
        .collect()
}

fn normalize_block(value: &Value) -> Option<UiBlock> {
    let object = value.as_object()?;

    match object.get("type").and_then(Value::as_str)? {
        "quick-replies" => normalize_quick_replies(object).map(UiBlock::QuickReplies),
        "menu" => normalize_menu(object).map(UiBlock::Menu),
        "form" => normalize_form(object).map(UiBlock::Form),
        _ => None,
    }
}

fn normalize_quick_replies(object: &Map<String, Value>) -> Option<QuickRepliesBlock> {
    let options = normalize_action_options(object.get("options"));
    if options.is_empty() {
        return None;
    }

    Some(QuickRepliesBlock {
        title: optional_string(object.get("title")),
        options,
    })
}

fn normalize_menu(object: &Map<String, Value>) -> Option<MenuBlock> {
    let title = non_empty_str(object.get("title"))?;
    let items = normalize_action_options(object.get("items"));
    if items.is_empty() {
        return None;
    }

    Some(MenuBlock {
        title: title.to_string(),
        description: optional_string(object.get("description")),
        items,
    })
}

fn normalize_form(object: &Map<String, Value>) -> Option<FormBlock> {
    let id = non_empty_str(object.get("id"))?;
    let title = non_empty_str(object.get("title"))?;

    let fields: Vec<FormField> = object
        .get("fields")
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .take(MAX_FORM_FIELDS)
                .filter_map(normalize_form_field)
                .collect()
        })
        .unwrap_or_default();

    if fields.is_empty() {
        return None;
    }

    Some(FormBlock {
        id: id.to_string(),
        title: title.to_string(),
        description: optional_string(object.get("description")),
        submit_label: optional_string(object.get("submitLabel")),
        fields,
    })
}

/// Options are capped before validation; ids default to the 1-based
/// position in the capped list and payloads default to the label.
fn normalize_action_options(value: Option<&Value>) -> Vec<ActionOption> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .take(MAX_ACTION_OPTIONS)
        .enumerate()
        .filter_map(|(index, item)| normalize_action_option(index, item))
        .collect()
}

fn normalize_action_option(index: usize, value: &Value) -> Option<ActionOption> {
    let object = value.as_object()?;
    let label = non_empty_str(object.get("label"))?;

    Some(ActionOption {
        id: optional_string(object.get("id")).unwrap_or_else(|| format!("option-{}", index + 1)),
        label: label.to_string(),
        payload: optional_string(object.get("payload")).unwrap_or_else(|| label.to_string()),
        description: optional_string(object.get("description")),
    })
}

fn normalize_form_field(value: &Value) -> Option<FormField> {
    let object = value.as_object()?;
    let name = non_empty_str(object.get("name"))?;
    let label = non_empty_str(object.get("label"))?;
    let kind = object
        .get("kind")
        .and_then(Value::as_str)
        .and_then(FormFieldKind::parse)?;

    let options = if kind == FormFieldKind::Select {
        let options = normalize_select_options(object.get("options"));
        // A select without choices cannot be answered; drop it.
        if options.is_empty() {
            return None;
        }
        options
    } else {
        Vec::new()
    };

    Some(FormField {
        name: name.to_string(),
        label: label.to_string(),
        kind,
        required: object.get("required").and_then(Value::as_bool),
        placeholder: optional_string(object.get("placeholder")),
        options,
    })
}

fn normalize_select_options(value: Option<&Value>) -> Vec<SelectOption> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .take(MAX_ACTION_OPTIONS)
        .filter_map(|item| {
            let object = item.as_object()?;
            let label = non_empty_str(object.get("label"))?;
            Some(SelectOption {
                label: label.to_string(),
                value: optional_string(object.get("value")).unwrap_or_else(|| label.to_string()),
            })
        })
        .collect()
}
