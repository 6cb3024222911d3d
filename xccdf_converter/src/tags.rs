//! XCCDF 1.2 tag vocabulary recognized by the interpreter

use crate::stream::QualifiedName;

pub const XCCDF_NAMESPACE: &str = "http://checklists.nist.gov/xccdf/1.2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XccdfTag {
    Benchmark,
    TestResult,
    Target,
    Identity,
    /// `profile` reference inside a TestResult
    ProfileRef,
    /// `Profile` definition
    Profile,
    Select,
    Rule,
    Title,
    Description,
    Rationale,
    Score,
    RuleResult,
    Result,
    Ident,
}

impl XccdfTag {
    pub const ALL: [XccdfTag; 15] = [
        XccdfTag::Benchmark,
        XccdfTag::TestResult,
        XccdfTag::Target,
        XccdfTag::Identity,
        XccdfTag::ProfileRef,
        XccdfTag::Profile,
        XccdfTag::Select,
        XccdfTag::Rule,
        XccdfTag::Title,
        XccdfTag::Description,
        XccdfTag::Rationale,
        XccdfTag::Score,
        XccdfTag::RuleResult,
        XccdfTag::Result,
        XccdfTag::Ident,
    ];

    pub fn local_name(&self) -> &'static str {
        match self {
            XccdfTag::Benchmark => "Benchmark",
            XccdfTag::TestResult => "TestResult",
            XccdfTag::Target => "target",
            XccdfTag::Identity => "identity",
            XccdfTag::ProfileRef => "profile",
            XccdfTag::Profile => "Profile",
            XccdfTag::Select => "select",
            XccdfTag::Rule => "Rule",
            XccdfTag::Title => "title",
            XccdfTag::Description => "description",
            XccdfTag::Rationale => "rationale",
            XccdfTag::Score => "score",
            XccdfTag::RuleResult => "rule-result",
            XccdfTag::Result => "result",
            XccdfTag::Ident => "ident",
        }
    }

    /// Only names in the XCCDF namespace are part of the vocabulary
    pub fn classify(name: &QualifiedName) -> Option<Self> {
        if !name.is_in(XCCDF_NAMESPACE) {
            return None;
        }
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.local_name() == name.local_name)
    }

    pub fn qualified_name(&self) -> QualifiedName {
        QualifiedName::new(Some(XCCDF_NAMESPACE), self.local_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_sensitive() {
        let profile_ref = QualifiedName::new(Some(XCCDF_NAMESPACE), "profile");
        let profile = QualifiedName::new(Some(XCCDF_NAMESPACE), "Profile");

        assert_eq!(XccdfTag::classify(&profile_ref), Some(XccdfTag::ProfileRef));
        assert_eq!(XccdfTag::classify(&profile), Some(XccdfTag::Profile));
    }

    #[test]
    fn test_foreign_namespace_is_not_classified() {
        let rule = QualifiedName::new(Some("http://checklists.nist.gov/xccdf/1.1"), "Rule");
        assert_eq!(XccdfTag::classify(&rule), None);
        assert_eq!(XccdfTag::classify(&QualifiedName::new(None, "Rule")), None);
    }

    #[test]
    fn test_every_tag_round_trips_through_its_name() {
        for tag in XccdfTag::ALL {
            assert_eq!(XccdfTag::classify(&tag.qualified_name()), Some(tag));
        }
    }
}
