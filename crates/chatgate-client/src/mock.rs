//! Canned replies used when no backend is configured.

use chatgate_core::models::reply::StructuredReply;
use chatgate_core::models::ui_block::{
    ActionOption, FormBlock, FormField, FormFieldKind, MenuBlock, QuickRepliesBlock, SelectOption,
    UiBlock,
};

pub fn mock_reply(input: &str) -> StructuredReply {
    let lowered = input.to_lowercase();

    if lowered.contains("support") {
        return StructuredReply {
            reply: "I can open a support ticket for you. Tell me a bit more below.".to_string(),
            ui: vec![UiBlock::Form(support_form())],
        };
    }

    if lowered.contains("menu") || lowered.contains("plan") {
        return StructuredReply {
            reply: "Here are the options I can help with.".to_string(),
            ui: vec![UiBlock::Menu(MenuBlock {
                title: "What would you like to do?".to_string(),
                description: None,
                items: vec![
                    option("plans", "Compare plans", Some("See what each plan includes.")),
                    option("billing", "Billing questions", None),
                    option("support", "Contact support", None),
                ],
            })],
        };
    }

    StructuredReply {
        reply: format!("You said: \"{}\". This is a demo reply.", input.trim()),
        ui: vec![UiBlock::QuickReplies(QuickRepliesBlock {
            title: Some("Try one of these".to_string()),
            options: vec![
                option("menu", "Show menu", None),
                option("plans", "See plans", None),
                option("support", "Get support", None),
            ],
        })],
    }
}

fn option(id: &str, label: &str, description: Option<&str>) -> ActionOption {
    ActionOption {
        id: id.to_string(),
        label: label.to_string(),
        payload: label.to_string(),
        description: description.map(str::to_string),
    }
}

fn support_form() -> FormBlock {
    FormBlock {
        id: "support-request".to_string(),
        title: "Support request".to_string(),
        description: None,
        submit_label: Some("Send".to_string()),
        fields: vec![
            FormField {
                name: "email".to_string(),
                label: "Email".to_string(),
                kind: FormFieldKind::Email,
                required: Some(true),
                placeholder: Some("you@example.com".to_string()),
                options: Vec::new(),
            },
            FormField {
                name: "topic".to_string(),
                label: "Topic".to_string(),
                kind: FormFieldKind::Select,
                required: Some(true),
                placeholder: None,
                options: ["Account", "Billing", "Other"]
                    .into_iter()
                    .map(|label| SelectOption {
                        label: label.to_string(),
                        value: label.to_lowercase(),
                    })
                    .collect(),
            },
            FormField {
                name: "details".to_string(),
                label: "Details".to_string(),
                kind: FormFieldKind::Text,
                required: None,
                placeholder: None,
                options: Vec::new(),
            },
        ],
    }
}
