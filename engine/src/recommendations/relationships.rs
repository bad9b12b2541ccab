use site_shared::models::Service;

/// A directed "people who came for `from` often also want `to`" edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceRelationship {
    pub from: Service,
    pub to: Service,
    pub strength: f64,
    pub reason: &'static str,
    pub context_tags: &'static [&'static str],
}

pub static RELATIONSHIPS: [ServiceRelationship; 6] = [
    ServiceRelationship {
        from: Service::Teaching,
        to: Service::Performance,
        strength: 0.7,
        reason: "Put what you've learned in front of an audience",
        context_tags: &["performance", "stage", "gigs", "recital"],
    },
    ServiceRelationship {
        from: Service::Teaching,
        to: Service::Collaboration,
        strength: 0.5,
        reason: "Turn your ideas into a finished recording",
        context_tags: &["recording", "songwriting", "composition"],
    },
    ServiceRelationship {
        from: Service::Performance,
        to: Service::Teaching,
        strength: 0.5,
        reason: "Sharpen your own playing with one-on-one lessons",
        context_tags: &["technique", "lessons", "improvisation"],
    },
    ServiceRelationship {
        from: Service::Performance,
        to: Service::Collaboration,
        strength: 0.6,
        reason: "Take the live sound into the studio",
        context_tags: &["recording", "original music", "arrangement"],
    },
    ServiceRelationship {
        from: Service::Collaboration,
        to: Service::Performance,
        strength: 0.6,
        reason: "Launch the finished project with a live show",
        context_tags: &["live", "release show", "launch"],
    },
    ServiceRelationship {
        from: Service::Collaboration,
        to: Service::Teaching,
        strength: 0.4,
        reason: "Learn the production and theory behind the record",
        context_tags: &["production", "arranging", "theory"],
    },
];

pub fn relationships_from(service: Service) -> impl Iterator<Item = &'static ServiceRelationship> {
    RELATIONSHIPS.iter().filter(move |r| r.from == service)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_service_links_to_both_others() {
        for service in Service::ALL {
            let targets: Vec<Service> = relationships_from(service).map(|r| r.to).collect();
            assert_eq!(targets.len(), 2);
            assert!(!targets.contains(&service));
        }
    }

    #[test]
    fn strengths_are_fractions() {
        assert!(RELATIONSHIPS.iter().all(|r| r.strength > 0.0 && r.strength <= 1.0));
    }
}
