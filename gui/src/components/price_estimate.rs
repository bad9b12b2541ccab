#![allow(non_snake_case)]
use dioxus::prelude::*;
use site_engine::pricing::{
    estimate_collaboration_pricing, estimate_performance_pricing, package_options,
    CollaborationInquiry, PerformanceInquiry,
};
use site_shared::models::{Confidence, FieldValue, FormData, PackagePricing, PriceEstimate, Service};
use site_shared::utils::{format_price, format_price_cents, format_price_range};

const DEFAULT_LESSON_MINUTES: i64 = 60;

fn estimate_for(service: Service, data: &FormData) -> Option<PriceEstimate> {
    match service {
        Service::Performance => Some(estimate_performance_pricing(&PerformanceInquiry::from_form_data(data))),
        Service::Collaboration => Some(estimate_collaboration_pricing(&CollaborationInquiry::from_form_data(data))),
        Service::Teaching => None,
    }
}

fn lesson_minutes(data: &FormData) -> i64 {
    data.get("lesson_length")
        .and_then(FieldValue::as_str)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_LESSON_MINUTES)
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::Low => "rough guess",
        Confidence::Medium => "fair estimate",
        Confidence::High => "solid estimate",
    }
}

fn savings_label(package: &PackagePricing) -> String {
    if package.savings > 0.0 {
        format!("{}% ({})", package.discount_percent, format_price_cents(package.savings))
    } else {
        "–".to_string()
    }
}

/// Live estimate next to an inquiry form. Lessons show package prices instead.
#[component]
pub fn EstimatePanel(service: Service, data: FormData) -> Element {
    match estimate_for(service, &data) {
        Some(estimate) => rsx! { EstimateCard { estimate: estimate } },
        None => rsx! { PackageTable { lesson_minutes: lesson_minutes(&data) } },
    }
}

#[component]
pub fn EstimateCard(estimate: PriceEstimate) -> Element {
    let range = format_price_range(&estimate.range);
    let confidence = confidence_label(estimate.confidence);
    let valid_days = estimate.estimate_valid_days;

    rsx! {
        div { class: "card estimate",
            h3 { "Estimated investment" }
            p { class: "range", "{range}" }
            p { "Based on your answers so far ({confidence})." }
            ul {
                for factor in estimate.factors.iter() {
                    li { key: "{factor}", "{factor}" }
                }
            }
            if !estimate.adjustments.is_empty() {
                table {
                    tbody {
                        tr {
                            td { "Base rate" }
                            td { {format_price(estimate.base_price)} }
                        }
                        for adjustment in estimate.adjustments.iter() {
                            tr { key: "{adjustment.label}",
                                td { "{adjustment.label}" }
                                td { {format_price(adjustment.amount)} }
                            }
                        }
                    }
                }
            }
            if estimate.consultation_recommended {
                p { class: "consult", "This one is best scoped on a short call. Mention a good time in your notes." }
            }
            small { "Estimates are valid for {valid_days} days." }
        }
    }
}

#[component]
pub fn PackageTable(lesson_minutes: i64) -> Element {
    let options = package_options(lesson_minutes);

    rsx! {
        div { class: "card packages",
            h3 { "Lesson packages ({lesson_minutes} min)" }
            table {
                thead {
                    tr {
                        th { "Lessons" }
                        th { "Per lesson" }
                        th { "Total" }
                        th { "You save" }
                    }
                }
                tbody {
                    for package in options {
                        tr { key: "{package.lessons}",
                            td { "{package.lessons}" }
                            td { {format_price_cents(package.price_per_lesson)} }
                            td { {format_price_cents(package.total)} }
                            td { {savings_label(&package)} }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_length_falls_back_to_an_hour() {
        let mut data = FormData::new();
        assert_eq!(lesson_minutes(&data), 60);
        data.insert("lesson_length".into(), FieldValue::Choice("45".into()));
        assert_eq!(lesson_minutes(&data), 45);
    }

    #[test]
    fn only_quoted_services_get_an_estimate() {
        let data = FormData::new();
        assert!(estimate_for(Service::Teaching, &data).is_none());
        assert!(estimate_for(Service::Performance, &data).is_some());
        assert!(estimate_for(Service::Collaboration, &data).is_some());
    }
}
