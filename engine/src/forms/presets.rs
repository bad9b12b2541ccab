// Built-in inquiry forms, one per service.
use super::config::InquiryFormConfig;
use super::validation::ValidatorRegistry;
use crate::error::Result;
use site_shared::models::Service;

const TEACHING: &str = include_str!("../../assets/forms/teaching.json");
const PERFORMANCE: &str = include_str!("../../assets/forms/performance.json");
const COLLABORATION: &str = include_str!("../../assets/forms/collaboration.json");

fn load(raw: &str) -> Result<InquiryFormConfig> {
    let config = InquiryFormConfig::from_json(raw)?;
    config.validate(&ValidatorRegistry::with_builtins())?;
    Ok(config)
}

pub fn teaching() -> Result<InquiryFormConfig> {
    load(TEACHING)
}

pub fn performance() -> Result<InquiryFormConfig> {
    load(PERFORMANCE)
}

pub fn collaboration() -> Result<InquiryFormConfig> {
    load(COLLABORATION)
}

pub fn for_service(service: Service) -> Result<InquiryFormConfig> {
    match service {
        Service::Teaching => teaching(),
        Service::Performance => performance(),
        Service::Collaboration => collaboration(),
    }
}
