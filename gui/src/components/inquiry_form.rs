// Config-driven inquiry modal. The engine's InquiryForm owns the state; this file only
// renders it and forwards edits.
#![allow(non_snake_case)]
use dioxus::prelude::*;
use site_engine::forms::{presets, FieldConfig, InquiryForm, ScrollLock, SubmitAttempt};
use site_engine::recommendations::InteractionKind;
use site_engine::theme::platform::Document;
use site_shared::models::{FieldType, FieldValue, FileHandle, FormData, Service};
use std::path::Path;
use std::rc::Rc;
use tracing::warn;

use super::price_estimate::EstimatePanel;
use crate::services::submission_client::SubmissionClient;
use crate::services::webview::WebviewDocument;
use crate::state::app_state::AppState;

type FormSlot = Result<InquiryForm, String>;

fn build_form(service: Service) -> FormSlot {
    let config = presets::for_service(service).map_err(|e| e.to_string())?;
    let mut form = InquiryForm::new(config).map_err(|e| e.to_string())?;
    form.open(FormData::new());
    Ok(form)
}

/// Escape closes the form. Returns whether the modal should go away.
fn dismisses(form: &mut InquiryForm, key: &Key) -> bool {
    form.handle_key(&key.to_string())
}

fn with_form<T>(mut slot: Signal<FormSlot>, edit: impl FnOnce(&mut InquiryForm) -> T) -> Option<T> {
    let mut guard = slot.write();
    match &mut *guard {
        Ok(form) => Some(edit(form)),
        Err(_) => None,
    }
}

#[component]
pub fn InquiryModal(service: Service, on_close: EventHandler<()>) -> Element {
    let document = use_context::<Rc<WebviewDocument>>();
    let client = use_context::<SubmissionClient>();
    let mut app_state = use_context::<Signal<AppState>>();
    let slot = use_signal(|| build_form(service));
    // Released when the modal unmounts.
    let _scroll_lock = use_hook(|| Rc::new(ScrollLock::acquire(Some(document.clone() as Rc<dyn Document>))));

    let slot_ref = slot.read();
    let form = match &*slot_ref {
        Ok(form) => form,
        Err(message) => {
            return rsx! {
                div { class: "overlay",
                    div { class: "modal",
                        p { class: "submission-error", "This form is unavailable: {message}" }
                        button { onclick: move |_| on_close.call(()), "Close" }
                    }
                }
            };
        }
    };

    let config = form.config().clone();
    let state = form.state().clone();
    let sections: Vec<(String, String, Vec<FieldConfig>)> = form
        .visible_sections()
        .into_iter()
        .map(|(section, fields)| {
            (
                section.name.clone(),
                section.title.clone(),
                fields.into_iter().cloned().collect(),
            )
        })
        .collect();
    drop(slot_ref);

    let submit = move |_| {
        let attempt = with_form(slot, |form| form.begin_submit());
        match attempt {
            Some(Ok(SubmitAttempt::Ready(submission))) => {
                let client = client.clone();
                spawn(async move {
                    let outcome = client.submit(submission).await;
                    let delivered = outcome.is_ok();
                    if let Some(Err(e)) = with_form(slot, |form| form.complete_submission(outcome)) {
                        warn!("Submission finished on a form that moved on: {}", e);
                    }
                    if delivered {
                        app_state.write().record(service, InteractionKind::FormSubmit);
                    }
                });
            }
            Some(Ok(SubmitAttempt::Invalid(_))) | None => {}
            Some(Err(e)) => warn!("Ignoring submit: {}", e),
        }
    };

    let close = move |_| {
        with_form(slot, |form| form.close());
        on_close.call(());
    };

    rsx! {
        div {
            class: "overlay",
            tabindex: "-1",
            // Keyboard events only reach the overlay while focus is inside it.
            onmounted: move |evt: MountedEvent| async move {
                if let Err(e) = evt.set_focus(true).await {
                    warn!("Couldn't focus the inquiry dialog: {:?}", e);
                }
            },
            onkeydown: move |evt: KeyboardEvent| {
                let key = evt.key();
                if with_form(slot, |form| dismisses(form, &key)) == Some(true) {
                    on_close.call(());
                }
            },
            div { class: "modal", role: "dialog", aria_label: "{config.title}",
                h2 { "{config.title}" }
                if let Some(description) = config.description.clone() {
                    p { "{description}" }
                }

                if state.is_submitted {
                    p { class: "success",
                        {config.success_message.clone().unwrap_or_else(|| "Thanks, I'll be in touch soon.".to_string())}
                    }
                    button { onclick: close, "Close" }
                } else {
                    for (name, title, fields) in sections {
                        fieldset { key: "{name}",
                            legend { "{title}" }
                            for field in fields {
                                FieldInput {
                                    key: "{field.name}",
                                    value: state.data.get(&field.name).cloned(),
                                    error: state.errors.get(&field.name).cloned(),
                                    on_change: {
                                        let name = field.name.clone();
                                        move |value: Option<FieldValue>| {
                                            let result = with_form(slot, |form| match value {
                                                Some(value) => form.set_field(&name, value),
                                                None => form.clear_field(&name),
                                            });
                                            if let Some(Err(e)) = result {
                                                warn!("Rejected edit to '{}': {}", name, e);
                                            }
                                        }
                                    },
                                    field: field.clone(),
                                }
                            }
                        }
                    }

                    if service != Service::Teaching || state.data.contains_key("lesson_length") {
                        EstimatePanel { service: service, data: state.data.clone() }
                    }

                    if let Some(error) = state.submission_error.clone() {
                        p { class: "submission-error", role: "alert", "Couldn't send your inquiry: {error}" }
                    }
                    div { class: "actions",
                        button { class: "secondary", onclick: close, "Cancel" }
                        button {
                            disabled: state.is_submitting,
                            onclick: submit,
                            if state.is_submitting { "Sending…" } else { "{config.submit_label}" }
                        }
                    }
                }
            }
        }
    }
}

fn file_handle(path: &str) -> FileHandle {
    let path = Path::new(path);
    FileHandle {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size_bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
        mime: None,
    }
}

fn input_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Email => "email",
        FieldType::Tel => "tel",
        FieldType::Date => "date",
        FieldType::Time => "time",
        FieldType::Number => "number",
        _ => "text",
    }
}

#[component]
fn FieldInput(
    field: FieldConfig,
    value: Option<FieldValue>,
    error: Option<String>,
    on_change: EventHandler<Option<FieldValue>>,
) -> Element {
    let current = value.as_ref().map(FieldValue::display_value).unwrap_or_default();
    let label = if field.required { format!("{} *", field.label) } else { field.label.clone() };
    let placeholder = field.placeholder.clone().unwrap_or_default();
    let input_id = format!("field-{}", field.name);

    let control = match field.field_type {
        FieldType::Textarea => rsx! {
            textarea {
                id: "{input_id}",
                placeholder: "{placeholder}",
                value: "{current}",
                oninput: move |evt: FormEvent| on_change.call(Some(FieldValue::Text(evt.value()))),
            }
        },
        FieldType::Select => rsx! {
            select {
                id: "{input_id}",
                onchange: move |evt: FormEvent| {
                    let chosen = evt.value();
                    on_change.call((!chosen.is_empty()).then(|| FieldValue::Choice(chosen)));
                },
                option { value: "", selected: current.is_empty(), "Select…" }
                for opt in field.options.clone() {
                    option {
                        key: "{opt.value}",
                        value: "{opt.value}",
                        selected: current == opt.value,
                        "{opt.label}"
                    }
                }
            }
        },
        FieldType::Radio => rsx! {
            div { class: "choices",
                for opt in field.options.clone() {
                    label { key: "{opt.value}",
                        input {
                            r#type: "radio",
                            name: "{field.name}",
                            checked: current == opt.value,
                            onchange: {
                                let chosen = opt.value.clone();
                                move |_| on_change.call(Some(FieldValue::Choice(chosen.clone())))
                            },
                        }
                        "{opt.label}"
                    }
                }
            }
        },
        FieldType::Checkbox => {
            let checked = value == Some(FieldValue::Bool(true));
            rsx! {
                input {
                    id: "{input_id}",
                    r#type: "checkbox",
                    checked: checked,
                    onchange: move |_| on_change.call(Some(FieldValue::Bool(!checked))),
                }
            }
        }
        FieldType::Number => rsx! {
            input {
                id: "{input_id}",
                r#type: "number",
                value: "{current}",
                oninput: move |evt: FormEvent| {
                    on_change.call(evt.value().trim().parse::<f64>().ok().map(FieldValue::Number))
                },
            }
        },
        FieldType::File => rsx! {
            input {
                id: "{input_id}",
                r#type: "file",
                onchange: move |evt: FormEvent| {
                    let picked = evt
                        .files()
                        .and_then(|engine| engine.files().into_iter().next())
                        .map(|path| FieldValue::File(file_handle(&path)));
                    on_change.call(picked);
                },
            }
        },
        other => rsx! {
            input {
                id: "{input_id}",
                r#type: input_type(other),
                placeholder: "{placeholder}",
                value: "{current}",
                oninput: move |evt: FormEvent| on_change.call(Some(FieldValue::Text(evt.value()))),
            }
        },
    };

    rsx! {
        div { class: "field",
            label { r#for: "{input_id}", "{label}" }
            {control}
            if let Some(help) = field.help_text.clone() {
                span { class: "help", "{help}" }
            }
            if let Some(error) = error {
                span { class: "error", role: "alert", "{error}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_service_form_builds_open() {
        for service in Service::ALL {
            let form = build_form(service).unwrap();
            assert!(form.is_open());
        }
    }

    #[test]
    fn only_escape_dismisses_the_modal() {
        let mut form = build_form(Service::Performance).unwrap();
        assert!(!dismisses(&mut form, &Key::Enter));
        assert!(!dismisses(&mut form, &Key::Character("q".into())));
        assert!(form.is_open());

        assert!(dismisses(&mut form, &Key::Escape));
        assert!(!form.is_open());
    }

    #[test]
    fn file_handle_uses_the_file_name() {
        let handle = file_handle("/nonexistent/dir/demo.mp3");
        assert_eq!(handle.name, "demo.mp3");
        assert_eq!(handle.size_bytes, 0);
    }
}
